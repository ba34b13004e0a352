//! 进程与文件启动（不阻塞当前进程）。
//!
//! 实现策略：
//! - 独立进程：经 `cmd /C start "" "<path>" <args>` 在新控制台、新进程组中启动，
//!   `cmd` 随即退出，子进程生命周期与当前进程完全解耦
//! - 默认程序打开：`ShellExecuteW("open")`
//!
//! 两者失败时只记录日志。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::os::windows::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{error, info};

use crate::elevation;

const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// 启动独立进程。
///
/// 参数：
/// - `path`：可执行文件路径
/// - `args`：原样追加到命令行的参数串（可为空）
pub fn run_detached(path: &Path, args: &str) {
    let mut line = format!("/C start \"\" \"{}\"", path.display());
    if !args.trim().is_empty() {
        line.push(' ');
        line.push_str(args);
    }
    info!("启动独立进程: {} {args}", path.display());

    let spawned = Command::new("cmd")
        .raw_arg(&line)
        .creation_flags(CREATE_NEW_CONSOLE | CREATE_NEW_PROCESS_GROUP)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    // 不收集退出状态，句柄随 Child 一起释放。
    if let Err(e) = spawned {
        error!("启动独立进程失败: {}: {e}", path.display());
    }
}

/// 用系统默认程序打开文件或目录。
pub fn open_with_default_app(path: &Path) {
    info!("使用默认程序打开: {}", path.display());
    if let Err(e) = elevation::open_default(path.as_os_str()) {
        error!("打开文件失败: {e:#}");
    }
}
