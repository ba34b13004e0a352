//! Umi 平台集成命令行入口（umi-ctl）。
//!
//! 职责：
//! - 将平台接口（快捷方式、管理员自启任务、电源控制、进程启动、查询）暴露为子命令
//! - 组装应用元数据：默认值 → `--config` JSON → 环境变量 → 命令行参数
//! - 默认输出旧接口文本（`[Success]` / `[Error] ...`），`--json` 输出结构化结果
//!
//! 退出码：
//! - 0：成功
//! - 1：操作失败或参数/配置错误
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use umi_core::app::{AppInfo, InstallScope};
use umi_core::shortcut::ShortcutPosition;

/// 命令行参数。
#[derive(Debug, Parser)]
#[command(name = "umi-ctl", version)]
struct Cli {
    /// 应用元数据 JSON（name / exe_path / scope）。
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    app_name: Option<String>,

    /// 应用自身 exe 路径。
    #[arg(long)]
    exe: Option<PathBuf>,

    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// 输出 JSON 而非旧接口文本。
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    User,
    Machine,
}

impl From<ScopeArg> for InstallScope {
    fn from(s: ScopeArg) -> Self {
        match s {
            ScopeArg::User => InstallScope::User,
            ScopeArg::Machine => InstallScope::Machine,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 快捷方式（desktop / startMenu / startup）。
    Shortcut {
        #[command(subcommand)]
        action: ShortcutAction,
    },
    /// 管理员自启计划任务。
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// 电源控制。
    Power {
        #[command(subcommand)]
        action: PowerAction,
    },
    /// 在新控制台中启动独立进程，不等待其结束。
    Run {
        path: PathBuf,
        /// 原样追加到命令行的参数串。
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        args: String,
    },
    /// 用系统默认程序打开文件或目录。
    Open { path: PathBuf },
    /// 推荐的渲染后端；指定 `--os-version` 时不读取系统。
    RenderBackend {
        #[arg(long)]
        os_version: Option<String>,
    },
    /// 虚拟键码转键名（十进制或 0x 十六进制）。
    KeyName {
        #[arg(value_parser = parse_key_code)]
        code: u32,
    },
}

#[derive(Debug, Subcommand)]
enum ShortcutAction {
    Create { position: ShortcutPosition },
    Delete { position: ShortcutPosition },
}

#[derive(Debug, Subcommand)]
enum TaskAction {
    Create,
    Delete,
    Status,
}

#[derive(Debug, Subcommand)]
enum PowerAction {
    Shutdown,
    Hibernate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let app = load_app_info(&cli)?;
    tracing::debug!("应用元数据: {app:?}");
    platform::dispatch(&cli, app)
}

/// 按优先级组装应用元数据。
///
/// 异常处理：
/// - `--config` 文件读取或解析失败返回错误
fn load_app_info(cli: &Cli) -> Result<AppInfo> {
    let mut app = match &cli.config {
        Some(path) => AppInfo::load(path)?,
        None => AppInfo::default(),
    }
    .with_env_overrides();
    if let Some(name) = &cli.app_name {
        app.name = name.clone();
    }
    if let Some(exe) = &cli.exe {
        app.exe_path = Some(exe.clone());
    }
    if let Some(scope) = cli.scope {
        app.scope = scope.into();
    }
    Ok(app)
}

fn parse_key_code(s: &str) -> Result<u32> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| anyhow!("无效的键码 {s}: {e}"))
}

/// 输出不会失败的查询结果。
fn emit_value<T: Serialize + Display>(json: bool, value: T) -> Result<ExitCode> {
    if json {
        println!(
            "{}",
            serde_json::json!({ "ok": true, "value": serde_json::to_value(&value)? })
        );
    } else {
        println!("{value}");
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(windows)]
mod platform {
    use super::*;
    use umi_core::error::{legacy_report, OpResult, OperationReport};
    use umi_core::render::select_rendering_backend;
    use umi_windows::api::Api;

    pub fn dispatch(cli: &Cli, app: AppInfo) -> Result<ExitCode> {
        let api = Api::new(app);
        match &cli.command {
            Commands::Shortcut { action } => match action {
                ShortcutAction::Create { position } => {
                    let result = api
                        .create_shortcut(*position)
                        .map(|p| p.display().to_string());
                    emit_result(cli.json, &result)
                }
                ShortcutAction::Delete { position } => {
                    emit_value(cli.json, api.delete_shortcut(*position))
                }
            },
            Commands::Task { action } => match action {
                TaskAction::Create => emit_result(cli.json, &api.create_admin_startup_task()),
                TaskAction::Delete => emit_result(cli.json, &api.delete_admin_startup_task()),
                TaskAction::Status => {
                    emit_value(cli.json, format!("{:?}", api.admin_startup_task_state()))
                }
            },
            Commands::Power { action } => {
                match action {
                    PowerAction::Shutdown => api.shutdown(),
                    PowerAction::Hibernate => api.hibernate(),
                }
                Ok(ExitCode::SUCCESS)
            }
            Commands::Run { path, args } => {
                api.run_new_process(path, args);
                Ok(ExitCode::SUCCESS)
            }
            Commands::Open { path } => {
                api.startfile(path);
                Ok(ExitCode::SUCCESS)
            }
            Commands::RenderBackend { os_version } => {
                let tag = match os_version {
                    Some(version) => select_rendering_backend(version).tag(),
                    None => api.get_opengl_use(),
                };
                emit_value(cli.json, tag)
            }
            Commands::KeyName { code } => emit_value(cli.json, api.get_key_name(*code)),
        }
    }

    /// 输出操作结果；失败时退出码为 1。
    fn emit_result<T: Serialize>(json: bool, result: &OpResult<T>) -> Result<ExitCode> {
        if json {
            let mut out = serde_json::to_value(OperationReport::from_result(result))?;
            if let Ok(v) = result {
                let v = serde_json::to_value(v)?;
                if !v.is_null() {
                    out["value"] = v;
                }
            }
            println!("{out}");
        } else {
            println!("{}", legacy_report(result));
        }
        Ok(if result.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        })
    }
}

/// 非 Windows 平台只提供不依赖系统的查询。
#[cfg(not(windows))]
mod platform {
    use super::*;
    use umi_core::keys::{KeyTranslator, VirtualKeyTable};
    use umi_core::render::select_rendering_backend;

    pub fn dispatch(cli: &Cli, _app: AppInfo) -> Result<ExitCode> {
        match &cli.command {
            Commands::KeyName { code } => emit_value(cli.json, VirtualKeyTable.key_name(*code)),
            Commands::RenderBackend {
                os_version: Some(version),
            } => emit_value(cli.json, select_rendering_backend(version).tag()),
            other => Err(anyhow!("该命令仅支持 Windows: {other:?}")),
        }
    }
}
