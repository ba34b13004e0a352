//! 平台操作的错误分类与对外报告格式。
//!
//! 设计：
//! - [`PlatformError`] 的 `Display` 即面向最终用户的中英双语提示，调用方可原样展示
//! - [`ErrorKind`] 是稳定的错误身份，供测试与上层分支判断使用，与展示文本解耦
//! - 旧接口约定的 `"[Success]"` / `"[Error] ..."` 文本由 [`legacy_report`] 生成
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// 平台操作结果。
pub type OpResult<T = ()> = std::result::Result<T, PlatformError>;

/// 错误身份（与展示文本无关）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ExecutableNotFound,
    ShortcutCreationFailed,
    ElevationFailed,
    TaskConfirmationTimeout,
    CommandFailed,
}

/// 平台操作错误。
///
/// 所有变体都只作为返回值向上传递，不会跨越对外接口 panic。
#[derive(Debug, Error)]
pub enum PlatformError {
    /// 程序自身 exe 路径未设置或文件不存在。
    #[error(
        "未找到程序exe文件。请尝试手动{manual}。\n[Error] Exe path not exist. Please try {manual_en} manually.\n\n{}",
        display_opt(.path)
    )]
    ExecutableNotFound {
        path: Option<PathBuf>,
        manual: &'static str,
        manual_en: &'static str,
    },

    /// 系统创建快捷方式失败（通常是权限不足）。
    #[error(
        "{detail}\n请尝试以管理员权限启动软件。\nPlease try starting the software as an administrator.\nappPath: {}{}",
        .app_path.display(),
        link_line(.link_path)
    )]
    ShortcutCreationFailed {
        detail: String,
        app_path: PathBuf,
        /// 目标目录未能解析时为 `None`。
        link_path: Option<PathBuf>,
    },

    /// 用户拒绝 UAC 提示或提权进程无法启动。
    #[error("无法获取管理员权限。\nPlease approve the UAC prompt.{}", suffix_detail(.detail))]
    ElevationFailed { detail: String },

    /// 已发出提权请求，但在超时内未观察到计划任务状态变化。
    #[error("未能确认已{action}管理员自启任务。\nPlease check Task Scheduler manually.")]
    TaskConfirmationTimeout { action: &'static str },

    /// 系统命令退出码非 0（或无法启动）。
    #[error("{detail}")]
    CommandFailed { detail: String },
}

impl PlatformError {
    /// 返回错误身份。
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlatformError::ExecutableNotFound { .. } => ErrorKind::ExecutableNotFound,
            PlatformError::ShortcutCreationFailed { .. } => ErrorKind::ShortcutCreationFailed,
            PlatformError::ElevationFailed { .. } => ErrorKind::ElevationFailed,
            PlatformError::TaskConfirmationTimeout { .. } => ErrorKind::TaskConfirmationTimeout,
            PlatformError::CommandFailed { .. } => ErrorKind::CommandFailed,
        }
    }
}

fn display_opt(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn link_line(link_path: &Option<PathBuf>) -> String {
    link_path
        .as_ref()
        .map(|p| format!("\nlnkPath: {}", p.display()))
        .unwrap_or_default()
}

fn suffix_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!("\n{detail}")
    }
}

/// 将操作结果格式化为旧接口的文本形式。
///
/// 返回值：
/// - 成功：`"[Success]"`
/// - 失败：`"[Error] <双语说明>"`
pub fn legacy_report<T>(result: &OpResult<T>) -> String {
    match result {
        Ok(_) => "[Success]".to_string(),
        Err(e) => format!("[Error] {e}"),
    }
}

/// 结构化的操作报告（用于 JSON 输出）。
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl OperationReport {
    /// 由操作结果构造报告；成功时 `message` 为 `"[Success]"`。
    pub fn from_result<T>(result: &OpResult<T>) -> Self {
        match result {
            Ok(_) => Self {
                ok: true,
                kind: None,
                message: legacy_report(result),
            },
            Err(e) => Self {
                ok: false,
                kind: Some(e.kind()),
                message: e.to_string(),
            },
        }
    }
}
