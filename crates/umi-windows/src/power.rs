//! 电源控制（关机/休眠）。
//!
//! 两个操作均为“发出即不管”：失败只记录日志，不向调用方返回。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::os::windows::process::CommandExt;
use std::process::Command;

use tracing::{info, warn};

use crate::CREATE_NO_WINDOW;

/// 立即关机（`shutdown /s /t 0`）。
pub fn shutdown() {
    run_shutdown(&["/s", "/t", "0"]);
}

/// 休眠（`shutdown /h`）。
pub fn hibernate() {
    run_shutdown(&["/h"]);
}

fn run_shutdown(args: &[&str]) {
    info!("执行 shutdown {}", args.join(" "));
    match Command::new("shutdown")
        .args(args)
        .creation_flags(CREATE_NO_WINDOW)
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("shutdown {} 退出码非 0: {status}", args.join(" ")),
        Err(e) => warn!("执行 shutdown 失败: {e}"),
    }
}
