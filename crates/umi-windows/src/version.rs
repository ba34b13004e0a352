//! 系统版本读取（基于注册表）与渲染器推荐。
//!
//! 检测逻辑：
//! - 读取 `HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion`
//! - Windows 10 起存在 `CurrentMajorVersionNumber` / `CurrentMinorVersionNumber`（DWORD）
//! - 更早的系统只有 `CurrentVersion`（SZ，如 `6.1`）
//! - 构建号取 `CurrentBuildNumber`（SZ）
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use anyhow::{Context, Result};
use tracing::warn;
use umi_core::render::{select_rendering_backend, RenderingBackend};
use winreg::enums::HKEY_LOCAL_MACHINE;
use winreg::RegKey;

const CURRENT_VERSION_KEY: &str = "SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion";

/// 读取 `major.minor.build` 形式的系统版本号，例如 `10.0.19045`、`6.1.7601`。
///
/// 异常处理：
/// - 打开键或读取值失败会返回错误。
pub fn os_version_string() -> Result<String> {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = hklm
        .open_subkey(CURRENT_VERSION_KEY)
        .context("打开 Windows NT\\CurrentVersion 注册表键失败")?;
    let build: String = key
        .get_value("CurrentBuildNumber")
        .context("读取 CurrentBuildNumber 失败")?;

    let (major, minor) = match key.get_value::<u32, _>("CurrentMajorVersionNumber") {
        Ok(major) => {
            let minor: u32 = key.get_value("CurrentMinorVersionNumber").unwrap_or(0);
            (major.to_string(), minor.to_string())
        }
        Err(_) => {
            let legacy: String = key
                .get_value("CurrentVersion")
                .context("读取 CurrentVersion 失败")?;
            match legacy.split_once('.') {
                Some((major, minor)) => (major.to_string(), minor.to_string()),
                None => (legacy, "0".to_string()),
            }
        }
    };
    Ok(format!("{major}.{minor}.{build}"))
}

/// 按当前系统版本推荐渲染后端；版本读取失败时回退到软件渲染。
pub fn rendering_backend() -> RenderingBackend {
    match os_version_string() {
        Ok(version) => select_rendering_backend(&version),
        Err(e) => {
            warn!("读取系统版本失败，使用软件渲染: {e:#}");
            RenderingBackend::SoftwareOpenGl
        }
    }
}
