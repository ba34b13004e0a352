//! 应用元数据（显示名称、自身 exe 路径、环境范围）及其配置加载。
//!
//! 配置优先级（低 → 高）：
//! 1) 内置默认值（名称 `Umi-OCR`，exe 为当前进程路径，用户范围）
//! 2) JSON 配置文件
//! 3) 环境变量 `UMI_APP_NAME` / `UMI_APP_EXE`
//! 4) 命令行参数（由 `umi-ctl` 覆盖）
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{OpResult, PlatformError};

/// 默认应用显示名称。
pub const DEFAULT_APP_NAME: &str = "Umi-OCR";

/// 覆盖应用名称的环境变量。
pub const ENV_APP_NAME: &str = "UMI_APP_NAME";

/// 覆盖 exe 路径的环境变量。
pub const ENV_APP_EXE: &str = "UMI_APP_EXE";

/// 开始菜单/自启目录所在的环境范围。
///
/// - `User`：`%APPDATA%`，低权限要求
/// - `Machine`：`%ProgramData%`，全局，高权限要求
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallScope {
    #[default]
    User,
    Machine,
}

impl InstallScope {
    /// 对应的环境变量名。
    pub fn env_var(self) -> &'static str {
        match self {
            InstallScope::User => "APPDATA",
            InstallScope::Machine => "ProgramData",
        }
    }
}

/// 应用元数据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    #[serde(default)]
    pub exe_path: Option<PathBuf>,
    #[serde(default)]
    pub scope: InstallScope,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            exe_path: std::env::current_exe().ok(),
            scope: InstallScope::User,
        }
    }
}

impl AppInfo {
    /// 以指定名称与 exe 路径构造（用户范围）。
    pub fn new(name: impl Into<String>, exe_path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            exe_path,
            scope: InstallScope::User,
        }
    }

    /// 从 JSON 配置文件读取。
    ///
    /// 异常处理：
    /// - 文件读取失败或 JSON 解析失败返回错误
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("读取配置失败: {}", path.display()))?;
        let info: AppInfo = serde_json::from_slice(&bytes).context("解析配置 JSON 失败")?;
        Ok(info)
    }

    /// 应用 `UMI_APP_NAME` / `UMI_APP_EXE` 环境变量覆盖（空值忽略）。
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(name) = non_empty_env(ENV_APP_NAME) {
            self.name = name;
        }
        if let Some(exe) = non_empty_env(ENV_APP_EXE) {
            self.exe_path = Some(PathBuf::from(exe));
        }
        self
    }

    /// 返回存在于磁盘上的 exe 路径。
    ///
    /// 参数：
    /// - `manual` / `manual_en`：错误提示中建议用户手动完成的操作
    ///
    /// 异常处理：
    /// - 路径未设置或文件不存在时返回 [`PlatformError::ExecutableNotFound`]
    pub fn verified_exe(&self, manual: &'static str, manual_en: &'static str) -> OpResult<&Path> {
        match self.exe_path.as_deref() {
            Some(p) if p.exists() => Ok(p),
            _ => Err(PlatformError::ExecutableNotFound {
                path: self.exe_path.clone(),
                manual,
                manual_en,
            }),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
