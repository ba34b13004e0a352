//! Windows 平台能力封装（快捷方式、管理员自启任务、电源控制、进程启动、系统版本）。
//!
//! 目标：
//! - 为 `umi-core` 中与系统无关的逻辑提供真实的 Win32/COM/命令行实现
//! - 通过 [`api::Api`] 向上层提供统一的对外接口
//!
//! 安全注意：
//! - 计划任务以最高权限运行，创建/删除需要管理员权限（非管理员时会触发 UAC）
//! - 全局范围（ProgramData）的开始菜单目录同样需要管理员权限
//!
//! 非 Windows 平台上本库为空。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

#[cfg(windows)]
pub mod api;
#[cfg(windows)]
pub mod elevation;
#[cfg(windows)]
pub mod power;
#[cfg(windows)]
pub mod process;
#[cfg(windows)]
pub mod schtasks;
#[cfg(windows)]
pub mod shortcut;
#[cfg(windows)]
pub mod version;

/// 将 Windows 宽字符串（UTF-16）编码并追加 NUL 结尾。
#[cfg(windows)]
pub(crate) fn to_wide(s: &std::ffi::OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// 不为子进程弹出控制台窗口。
#[cfg(windows)]
pub(crate) const CREATE_NO_WINDOW: u32 = 0x0800_0000;
