//! 快捷方式管理：目录解析、重名编号、按指向目标批量删除。
//!
//! 实现方式：
//! - 真正创建/解析 `.lnk` 的系统调用由 [`LinkBackend`] 提供（Windows 下为 COM `IShellLinkW`）
//! - 本模块只负责“放在哪里、叫什么名字、删哪些”这类与系统无关的逻辑
//!
//! 异常处理：
//! - 创建：exe 不存在返回 `ExecutableNotFound`；系统创建失败返回 `ShortcutCreationFailed`
//! - 删除：单个条目失败只记录日志并继续扫描，整体不返回错误
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::app::AppInfo;
use crate::error::{OpResult, PlatformError};

/// 重名编号上限；超过后视为创建失败，避免目录被预先填满时无限循环。
pub const MAX_NAME_SUFFIX: u32 = 999;

/// 快捷方式放置位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutPosition {
    /// 桌面。
    #[serde(rename = "desktop")]
    Desktop,
    /// 开始菜单。
    #[serde(rename = "startMenu")]
    StartMenu,
    /// 开机自启（开始菜单 Programs\Startup）。
    #[serde(rename = "startup")]
    Startup,
}

impl ShortcutPosition {
    pub const ALL: [ShortcutPosition; 3] = [
        ShortcutPosition::Desktop,
        ShortcutPosition::StartMenu,
        ShortcutPosition::Startup,
    ];

    /// 对外接口使用的名称。
    pub fn as_str(self) -> &'static str {
        match self {
            ShortcutPosition::Desktop => "desktop",
            ShortcutPosition::StartMenu => "startMenu",
            ShortcutPosition::Startup => "startup",
        }
    }
}

impl fmt::Display for ShortcutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutPosition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(ShortcutPosition::Desktop),
            "startmenu" | "start_menu" | "start-menu" => Ok(ShortcutPosition::StartMenu),
            "startup" => Ok(ShortcutPosition::Startup),
            _ => Err(anyhow!("未知的快捷方式位置: {s}（可选 desktop / startMenu / startup）")),
        }
    }
}

/// 解析快捷方式目录所需的系统根目录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRoots {
    /// 系统报告的桌面目录。
    pub desktop: PathBuf,
    /// `%APPDATA%`（用户）或 `%ProgramData%`（全局）。
    pub app_data: PathBuf,
}

impl ShellRoots {
    /// `<app_data>\Microsoft\Windows\Start Menu`
    pub fn start_menu(&self) -> PathBuf {
        start_menu_under(&self.app_data)
    }

    /// 将放置位置映射为目录。
    pub fn resolve(&self, position: ShortcutPosition) -> PathBuf {
        app_data_dir(&self.app_data, position).unwrap_or_else(|| self.desktop.clone())
    }
}

/// `<app_data>\Microsoft\Windows\Start Menu`
pub fn start_menu_under(app_data: &Path) -> PathBuf {
    app_data.join("Microsoft").join("Windows").join("Start Menu")
}

/// 位于应用数据根目录下的放置位置（开始菜单/自启）对应的目录；桌面返回 `None`。
pub fn app_data_dir(app_data: &Path, position: ShortcutPosition) -> Option<PathBuf> {
    match position {
        ShortcutPosition::Desktop => None,
        ShortcutPosition::StartMenu => Some(start_menu_under(app_data)),
        ShortcutPosition::Startup => Some(
            start_menu_under(app_data)
                .join("Programs")
                .join("Startup"),
        ),
    }
}

/// 系统快捷方式能力。
pub trait LinkBackend {
    /// 在 `link` 处创建指向 `target` 的快捷方式。
    fn create_link(&self, target: &Path, link: &Path) -> anyhow::Result<()>;

    /// 读取快捷方式指向的目标。
    ///
    /// 返回值：
    /// - `Ok(Some(target))`：`path` 是快捷方式
    /// - `Ok(None)`：`path` 不是快捷方式
    fn link_target(&self, path: &Path) -> anyhow::Result<Option<PathBuf>>;
}

/// 在目录中找到第一个未被占用的快捷方式文件名。
///
/// 依次尝试 `<name>.lnk`、`<name> (1).lnk`、`<name> (2).lnk` …，
/// 编号超过 [`MAX_NAME_SUFFIX`] 仍无空位时返回 `None`。
pub fn free_link_path(dir: &Path, name: &str) -> Option<PathBuf> {
    let first = dir.join(format!("{name}.lnk"));
    if !first.exists() {
        return Some(first);
    }
    (1..=MAX_NAME_SUFFIX)
        .map(|i| dir.join(format!("{name} ({i}).lnk")))
        .find(|p| !p.exists())
}

/// 在目录 `dir`（由放置位置解析而来）中创建指向应用 exe 的快捷方式。
///
/// 返回值：
/// - 成功：新建 `.lnk` 的完整路径
///
/// 异常处理：
/// - exe 路径未设置或不存在：`ExecutableNotFound`
/// - 目录创建、编号耗尽或系统创建失败：`ShortcutCreationFailed`
pub fn create_shortcut<B: LinkBackend + ?Sized>(
    app: &AppInfo,
    dir: &Path,
    backend: &B,
) -> OpResult<PathBuf> {
    let app_path = app.verified_exe("创建快捷方式", "creating a shortcut")?;
    let failed = |detail: String, link_path: PathBuf| PlatformError::ShortcutCreationFailed {
        detail,
        app_path: app_path.to_path_buf(),
        link_path: Some(link_path),
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("创建快捷方式目录失败: {}", dir.display()))
        .map_err(|e| failed(format!("{e:#}"), dir.to_path_buf()))?;

    let link_path = free_link_path(dir, &app.name).ok_or_else(|| {
        failed(
            format!("同名快捷方式过多（已超过 {MAX_NAME_SUFFIX} 个）"),
            dir.join(format!("{}.lnk", app.name)),
        )
    })?;

    backend
        .create_link(app_path, &link_path)
        .map_err(|e| failed(format!("{e:#}"), link_path.clone()))?;

    info!("已创建快捷方式: {}", link_path.display());
    Ok(link_path)
}

/// 删除目录 `dir` 下所有指向本应用的快捷方式。
///
/// 判定规则：
/// - 只处理目录下的直接条目，且必须是普通文件
/// - 必须是快捷方式，且其目标文件名包含应用名称
///
/// 返回值：
/// - 实际删除的文件个数
///
/// 异常处理：
/// - 目录不可读：记录日志并返回 0
/// - 单个条目解析/删除失败：记录日志并跳过，继续处理其余条目
pub fn delete_shortcuts<B: LinkBackend + ?Sized>(
    app: &AppInfo,
    dir: &Path,
    backend: &B,
) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("读取快捷方式目录失败: {}: {e}", dir.display());
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                error!("遍历快捷方式目录失败: {}: {e}", dir.display());
                continue;
            }
        };
        match remove_if_points_to_app(&path, &app.name, backend) {
            Ok(true) => {
                info!("已删除快捷方式: {}", path.display());
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => error!("删除快捷方式失败。 lnkPath: {}: {e:#}", path.display()),
        }
    }
    removed
}

fn remove_if_points_to_app<B: LinkBackend + ?Sized>(
    path: &Path,
    app_name: &str,
    backend: &B,
) -> anyhow::Result<bool> {
    let meta = std::fs::metadata(path).context("读取文件信息失败")?;
    if !meta.is_file() {
        return Ok(false);
    }
    let Some(target) = backend.link_target(path)? else {
        return Ok(false);
    };
    let target_name = file_name_of(&target);
    if !target_name.contains(app_name) {
        debug!("快捷方式指向其他程序，跳过: {} -> {}", path.display(), target.display());
        return Ok(false);
    }
    std::fs::remove_file(path).context("删除文件失败")?;
    Ok(true)
}

/// 取目标路径的文件名部分；同时识别 `\` 与 `/` 分隔符。
fn file_name_of(target: &Path) -> String {
    let s = target.to_string_lossy();
    s.rsplit(['\\', '/']).next().unwrap_or_default().to_string()
}
