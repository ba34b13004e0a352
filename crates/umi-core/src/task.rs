//! 管理员自启计划任务（登录时以最高权限启动应用）。
//!
//! 状态：
//! - `Absent` / `Present`，通过任务计划程序按任务名查询
//!
//! 流程（创建与删除对称）：
//! 1) 已处于目标状态：直接成功，不发出任何命令
//! 2) 当前进程已是管理员：直接执行 `schtasks`，按退出码判断
//! 3) 否则请求提权（UAC）执行同一命令；提权调用在子进程启动后即返回，
//!    因此随后有界轮询任务状态以确认结果
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::AppInfo;
use crate::error::{OpResult, PlatformError};
use crate::wait::{wait_until, Clock, PollPolicy, SystemClock};

/// 任务名后缀。
pub const TASK_NAME_SUFFIX: &str = ".AdminStartup";

/// 计划任务状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskState {
    Absent,
    Present,
}

impl TaskState {
    fn from_exists(exists: bool) -> Self {
        if exists {
            TaskState::Present
        } else {
            TaskState::Absent
        }
    }
}

/// 运行级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLevel {
    Highest,
}

/// 触发器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTrigger {
    OnLogon,
}

/// 由应用名推导任务名：去掉所有空格并追加 `.AdminStartup`。
pub fn task_name_for(app_name: &str) -> String {
    let compact: String = app_name.chars().filter(|c| *c != ' ').collect();
    format!("{compact}{TASK_NAME_SUFFIX}")
}

/// 期望的计划任务定义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: String,
    pub executable: PathBuf,
    pub run_level: RunLevel,
    pub trigger: TaskTrigger,
}

impl TaskDescriptor {
    pub fn new(app_name: &str, executable: PathBuf) -> Self {
        Self {
            name: task_name_for(app_name),
            executable,
            run_level: RunLevel::Highest,
            trigger: TaskTrigger::OnLogon,
        }
    }

    /// `schtasks` 创建参数（不含程序名）。
    pub fn create_args(&self) -> Vec<String> {
        let schedule = match self.trigger {
            TaskTrigger::OnLogon => "ONLOGON",
        };
        let level = match self.run_level {
            RunLevel::Highest => "HIGHEST",
        };
        vec![
            "/Create".into(),
            "/TN".into(),
            self.name.clone(),
            "/SC".into(),
            schedule.into(),
            "/RL".into(),
            level.into(),
            "/F".into(),
            "/TR".into(),
            self.executable.to_string_lossy().into_owned(),
        ]
    }
}

/// `schtasks` 删除参数（不含程序名）。
pub fn delete_args(task_name: &str) -> Vec<String> {
    vec!["/Delete".into(), "/TN".into(), task_name.into(), "/F".into()]
}

/// 系统命令的捕获输出。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// 失败说明：优先取去除首尾空白后的 stderr，为空时回退到 stdout。
    pub fn error_detail(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            self.stdout.trim().to_string()
        } else {
            err.to_string()
        }
    }

    /// 退出码为 0 时 `Ok(())`，否则转换为 `CommandFailed`。
    pub fn into_result(self) -> OpResult {
        if self.success {
            Ok(())
        } else {
            Err(PlatformError::CommandFailed {
                detail: self.error_detail(),
            })
        }
    }
}

/// 任务计划程序能力。
pub trait SchedulerBackend {
    /// 当前进程是否已持有管理员权限。
    fn is_elevated(&self) -> bool;

    /// 按任务名查询任务是否存在。
    fn task_exists(&self, task_name: &str) -> bool;

    /// 直接执行 `schtasks <args>` 并捕获输出。
    ///
    /// 异常处理：
    /// - 进程无法启动时返回 `CommandFailed`
    fn run(&self, args: &[String]) -> OpResult<CommandOutput>;

    /// 以提权方式启动 `schtasks <args>`；子进程启动后立即返回。
    ///
    /// 异常处理：
    /// - 用户拒绝或启动失败时返回 `ElevationFailed`
    fn run_elevated(&self, args: &[String]) -> OpResult;
}

/// 管理员自启任务管理器。
pub struct AdminStartupTask<'a, B: ?Sized, C = SystemClock> {
    backend: &'a B,
    clock: C,
    policy: PollPolicy,
}

impl<'a, B: SchedulerBackend + ?Sized> AdminStartupTask<'a, B, SystemClock> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            clock: SystemClock,
            policy: PollPolicy::default(),
        }
    }
}

impl<'a, B: SchedulerBackend + ?Sized, C: Clock> AdminStartupTask<'a, B, C> {
    /// 替换时钟与轮询参数（测试使用）。
    pub fn with_clock<C2: Clock>(self, clock: C2, policy: PollPolicy) -> AdminStartupTask<'a, B, C2> {
        AdminStartupTask {
            backend: self.backend,
            clock,
            policy,
        }
    }

    /// 查询任务当前状态。
    pub fn state(&self, app: &AppInfo) -> TaskState {
        TaskState::from_exists(self.backend.task_exists(&task_name_for(&app.name)))
    }

    /// 创建任务。
    ///
    /// 异常处理：
    /// - exe 路径未设置或不存在：`ExecutableNotFound`
    /// - 管理员直接执行失败：`CommandFailed`（附 stderr/stdout）
    /// - 提权被拒绝：`ElevationFailed`
    /// - 提权后超时仍未观察到任务：`TaskConfirmationTimeout`（任务可能仍在异步创建）
    pub fn create(&self, app: &AppInfo) -> OpResult {
        let exe = app.verified_exe("设置自启", "setting auto-start")?;
        let task = TaskDescriptor::new(&app.name, exe.to_path_buf());
        if self.backend.task_exists(&task.name) {
            info!("管理员自启任务已存在: {}", task.name);
            return Ok(());
        }
        self.transition(&task.name, &task.create_args(), TaskState::Present, "创建")
    }

    /// 删除任务。
    ///
    /// 异常处理：与 [`AdminStartupTask::create`] 对称（无 exe 前置检查）。
    pub fn delete(&self, app: &AppInfo) -> OpResult {
        let name = task_name_for(&app.name);
        if !self.backend.task_exists(&name) {
            info!("管理员自启任务不存在，无需删除: {name}");
            return Ok(());
        }
        self.transition(&name, &delete_args(&name), TaskState::Absent, "删除")
    }

    fn transition(
        &self,
        name: &str,
        args: &[String],
        target: TaskState,
        action: &'static str,
    ) -> OpResult {
        if self.backend.is_elevated() {
            info!("以管理员权限{action}计划任务: {name}");
            return self.backend.run(args)?.into_result();
        }

        info!("请求提权以{action}计划任务: {name}");
        self.backend.run_elevated(args)?;
        let confirmed = wait_until(&self.clock, self.policy, || {
            TaskState::from_exists(self.backend.task_exists(name)) == target
        });
        if confirmed {
            Ok(())
        } else {
            warn!("提权{action}计划任务后未能在超时内确认: {name}");
            Err(PlatformError::TaskConfirmationTimeout { action })
        }
    }
}
