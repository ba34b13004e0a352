//! 任务计划程序访问（基于 `schtasks.exe`）。
//!
//! 说明：
//! - 使用 `schtasks` 命令行而非 Task Scheduler COM API，便于排障（命令可直接复现）
//! - 非管理员时通过 `runas` 提权启动同一命令；提权调用只保证子进程已启动
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::ffi::OsStr;
use std::os::windows::process::CommandExt;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use umi_core::cmdline::join_args;
use umi_core::error::{OpResult, PlatformError};
use umi_core::task::{CommandOutput, SchedulerBackend};

use crate::{elevation, CREATE_NO_WINDOW};

/// `schtasks.exe` 实现的任务计划程序后端。
#[derive(Debug, Clone, Copy, Default)]
pub struct SchTasks;

impl SchedulerBackend for SchTasks {
    fn is_elevated(&self) -> bool {
        elevation::is_running_as_admin().unwrap_or(false)
    }

    fn task_exists(&self, task_name: &str) -> bool {
        match run_schtasks(&["/Query", "/TN", task_name]) {
            Ok(out) => out.success,
            Err(e) => {
                warn!("查询计划任务失败: {task_name}: {e:#}");
                false
            }
        }
    }

    fn run(&self, args: &[String]) -> OpResult<CommandOutput> {
        run_schtasks(args).map_err(|e| PlatformError::CommandFailed {
            detail: format!("{e:#}"),
        })
    }

    fn run_elevated(&self, args: &[String]) -> OpResult {
        let params = join_args(args);
        debug!("提权执行: schtasks.exe {params}");
        elevation::run_elevated(OsStr::new("schtasks.exe"), &params).map_err(|e| {
            PlatformError::ElevationFailed {
                detail: format!("{e:#}"),
            }
        })
    }
}

/// 执行 `schtasks` 子命令并捕获输出。
///
/// 异常处理：
/// - 启动失败：返回错误（通常是系统缺失或权限问题）
/// - 退出码非 0 不视为错误，由调用方根据 [`CommandOutput::success`] 判断
fn run_schtasks<S: AsRef<OsStr>>(args: &[S]) -> Result<CommandOutput> {
    let out = Command::new("schtasks")
        .args(args)
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .context("执行 schtasks 失败")?;
    Ok(CommandOutput {
        success: out.status.success(),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}
