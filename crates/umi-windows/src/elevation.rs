//! 提权与 Shell 执行（`ShellExecuteW`）。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::ffi::OsStr;

use anyhow::{anyhow, Result};
use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use crate::to_wide;

/// 判断当前进程是否以管理员权限运行。
///
/// 异常处理：
/// - 该 Win32 API 本身不返回错误码；此处保留 `Result` 以统一上层调用风格。
pub fn is_running_as_admin() -> Result<bool> {
    unsafe { Ok(IsUserAnAdmin().as_bool()) }
}

/// 以 UAC 提权方式启动程序（`runas` 动词）。
///
/// 参数：
/// - `file`：程序名或路径
/// - `params`：已按命令行规则转义拼接的参数串
///
/// 说明：
/// - 子进程启动后立即返回，不等待其结束
pub fn run_elevated(file: &OsStr, params: &str) -> Result<()> {
    shell_execute("runas", file, Some(params))
}

/// 用系统默认程序打开文件或目录（`open` 动词）。
pub fn open_default(path: &OsStr) -> Result<()> {
    shell_execute("open", path, None)
}

/// 调用 `ShellExecuteW`。
///
/// 异常处理：
/// - 返回值 ≤ 32 表示失败（用户拒绝 UAC、文件不存在、无关联程序等），转换为错误
fn shell_execute(verb: &str, file: &OsStr, params: Option<&str>) -> Result<()> {
    let verb_w = to_wide(OsStr::new(verb));
    let file_w = to_wide(file);
    let params_w = params.map(|p| to_wide(OsStr::new(p)));
    let params_ptr = params_w
        .as_ref()
        .map_or(PCWSTR::null(), |p| PCWSTR(p.as_ptr()));

    let code = unsafe {
        ShellExecuteW(
            HWND::default(),
            PCWSTR(verb_w.as_ptr()),
            PCWSTR(file_w.as_ptr()),
            params_ptr,
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    let code = code.0 as isize;
    if code <= 32 {
        return Err(anyhow!(
            "ShellExecuteW({verb}) 失败，返回码 {code}: {}",
            file.to_string_lossy()
        ));
    }
    Ok(())
}
