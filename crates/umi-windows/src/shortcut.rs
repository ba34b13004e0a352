//! Windows 快捷方式（.lnk）的创建与解析。
//!
//! 实现方式：
//! - 使用 COM：`IShellLinkW` + `IPersistFile::Save` / `IPersistFile::Load`
//! - 通过 Known Folder 获取桌面目录；开始菜单/自启目录由 `%APPDATA%` 或 `%ProgramData%` 推导
//! - 按放置位置解析目录时只查询该位置需要的根目录（[`shortcut_dir`]）
//!
//! 异常处理：
//! - COM 初始化/对象创建/保存/加载失败会返回错误，由 `umi-core` 映射为对外错误分类
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use umi_core::app::InstallScope;
use umi_core::shortcut::{app_data_dir, LinkBackend, ShellRoots, ShortcutPosition};
use windows::core::{Interface, PCWSTR, PWSTR};
use windows::Win32::Foundation::MAX_PATH;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, IPersistFile,
    CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED, STGM_READ,
};
use windows::Win32::UI::Shell::{
    FOLDERID_Desktop, IShellLinkW, SHGetKnownFolderPath, ShellLink, KF_FLAG_DEFAULT,
};

use crate::to_wide;

/// 基于 `IShellLinkW` 的快捷方式实现。
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLinkBackend;

impl LinkBackend for ShellLinkBackend {
    /// 创建指向 `target` 的快捷方式，工作目录设为目标所在目录。
    fn create_link(&self, target: &Path, link: &Path) -> Result<()> {
        unsafe {
            let _guard = ComGuard::init()?;
            let shell_link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)
                .context("创建 ShellLink 实例失败")?;

            shell_link
                .SetPath(PCWSTR(to_wide(target.as_os_str()).as_ptr()))
                .context("设置快捷方式路径失败")?;
            if let Some(dir) = target.parent() {
                shell_link
                    .SetWorkingDirectory(PCWSTR(to_wide(dir.as_os_str()).as_ptr()))
                    .context("设置快捷方式工作目录失败")?;
            }

            let persist: IPersistFile = shell_link.cast().context("获取 IPersistFile 失败")?;
            persist
                .Save(PCWSTR(to_wide(link.as_os_str()).as_ptr()), true)
                .context("保存快捷方式失败")?;
        }
        Ok(())
    }

    /// 仅 `.lnk` 扩展名视为快捷方式；目标为空（非文件系统目标）时同样返回 `None`。
    fn link_target(&self, path: &Path) -> Result<Option<PathBuf>> {
        let is_lnk = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("lnk"));
        if !is_lnk {
            return Ok(None);
        }

        let target = unsafe {
            let _guard = ComGuard::init()?;
            let shell_link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)
                .context("创建 ShellLink 实例失败")?;
            let persist: IPersistFile = shell_link.cast().context("获取 IPersistFile 失败")?;
            persist
                .Load(PCWSTR(to_wide(path.as_os_str()).as_ptr()), STGM_READ)
                .context("读取快捷方式失败")?;
            read_link_path(&shell_link)?
        };
        Ok((!target.is_empty()).then(|| PathBuf::from(OsString::from_wide(&target))))
    }
}

/// `GetPath` 的缓冲区容量，依次尝试；最后一档为 Windows 长路径上限。
const GET_PATH_CAPACITIES: [usize; 3] = [MAX_PATH as usize, 4096, 32768];

/// 读取快捷方式目标（UTF-16，不含结尾 0）。
///
/// `GetPath` 在缓冲区不足时静默截断，所以结果填满缓冲区时换更大的缓冲区重读。
unsafe fn read_link_path(shell_link: &IShellLinkW) -> Result<Vec<u16>> {
    let last = GET_PATH_CAPACITIES.len() - 1;
    for (i, &cap) in GET_PATH_CAPACITIES.iter().enumerate() {
        let mut buf = vec![0u16; cap];
        shell_link
            .GetPath(&mut buf, std::ptr::null_mut(), 0)
            .context("读取快捷方式目标失败")?;
        let len = buf.iter().position(|&c| c == 0).unwrap_or(cap);
        if len + 1 < cap || i == last {
            buf.truncate(len);
            return Ok(buf);
        }
    }
    Ok(Vec::new())
}

/// 解析放置位置对应的目录，只查询该位置需要的系统根目录。
///
/// 参数：
/// - `scope`：安装范围，决定开始菜单/自启目录取 `APPDATA` 还是 `ProgramData`
/// - `position`：放置位置
///
/// 异常处理：
/// - 桌面：Known Folder 查询失败时返回错误
/// - 开始菜单/自启：对应环境变量不存在时返回错误（不依赖桌面查询）
pub fn shortcut_dir(scope: InstallScope, position: ShortcutPosition) -> Result<PathBuf> {
    match position {
        ShortcutPosition::Desktop => desktop_folder(),
        _ => {
            let app_data = app_data_root(scope)?;
            app_data_dir(&app_data, position)
                .with_context(|| format!("{position} 不在应用数据目录下"))
        }
    }
}

/// 读取系统报告的桌面目录与指定范围的应用数据根目录。
///
/// 异常处理：
/// - Known Folder 查询失败，或 `APPDATA` / `ProgramData` 环境变量不存在时返回错误
pub fn shell_roots(scope: InstallScope) -> Result<ShellRoots> {
    Ok(ShellRoots {
        desktop: desktop_folder()?,
        app_data: app_data_root(scope)?,
    })
}

fn app_data_root(scope: InstallScope) -> Result<PathBuf> {
    let var = scope.env_var();
    let app_data =
        std::env::var_os(var).with_context(|| format!("读取 {var} 环境变量失败"))?;
    Ok(PathBuf::from(app_data))
}

fn desktop_folder() -> Result<PathBuf> {
    unsafe {
        let path_ptr: PWSTR = SHGetKnownFolderPath(&FOLDERID_Desktop, KF_FLAG_DEFAULT, None)
            .context("读取桌面 Known Folder 失败")?;
        // SHGetKnownFolderPath 返回的内存由 COM 分配，必须用 CoTaskMemFree 释放。
        let _guard = CoTaskMemGuard(path_ptr);
        let s = path_ptr.to_string().context("Known Folder 路径解码失败")?;
        Ok(PathBuf::from(s))
    }
}

/// COM 初始化守卫：离开作用域时调用 `CoUninitialize`。
struct ComGuard;

impl ComGuard {
    /// ShellLink 相关 COM 接口要求 STA（单线程单元）。
    unsafe fn init() -> Result<Self> {
        CoInitializeEx(None, COINIT_APARTMENTTHREADED)
            .ok()
            .context("COM 初始化失败")?;
        Ok(ComGuard)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe { CoUninitialize() }
    }
}

struct CoTaskMemGuard(PWSTR);

impl Drop for CoTaskMemGuard {
    fn drop(&mut self) {
        unsafe {
            if !self.0.is_null() {
                CoTaskMemFree(Some(self.0 .0 as *const core::ffi::c_void));
            }
        }
    }
}
