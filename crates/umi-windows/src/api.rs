//! 对外接口：快捷方式、管理员自启任务、电源控制、进程启动与查询。
//!
//! 所有可失败的操作均以 [`OpResult`] 返回，不会 panic；
//! 需要旧接口文本时使用 `umi_core::error::legacy_report` 转换。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use tracing::error;
use umi_core::app::AppInfo;
use umi_core::error::{OpResult, PlatformError};
use umi_core::keys::{KeyTranslator, VirtualKeyTable};
use umi_core::shortcut::{self as core_shortcut, ShortcutPosition};
use umi_core::task::{AdminStartupTask, TaskState};

use crate::schtasks::SchTasks;
use crate::shortcut::{self as win_shortcut, ShellLinkBackend};
use crate::{power, process, version};

/// 平台操作入口。
///
/// `K` 为注入的键值翻译表，默认 [`VirtualKeyTable`]。
pub struct Api<K = VirtualKeyTable> {
    app: AppInfo,
    keys: K,
}

impl Api<VirtualKeyTable> {
    pub fn new(app: AppInfo) -> Self {
        Self {
            app,
            keys: VirtualKeyTable,
        }
    }
}

impl<K: KeyTranslator> Api<K> {
    pub fn with_key_translator(app: AppInfo, keys: K) -> Self {
        Self { app, keys }
    }

    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    /// 解析放置位置对应的目录；只查询该位置需要的系统根目录。
    pub fn shortcut_dir(&self, position: ShortcutPosition) -> anyhow::Result<PathBuf> {
        win_shortcut::shortcut_dir(self.app.scope, position)
    }

    /// 创建快捷方式，返回新建 `.lnk` 路径。
    ///
    /// 异常处理：
    /// - exe 检查优先于目录解析，保证错误分类与目录状态无关
    /// - 目录解析失败：`ShortcutCreationFailed`，此时报告中不含 lnkPath
    pub fn create_shortcut(&self, position: ShortcutPosition) -> OpResult<PathBuf> {
        let app_path = self.app.verified_exe("创建快捷方式", "creating a shortcut")?;
        let dir = self
            .shortcut_dir(position)
            .map_err(|e| PlatformError::ShortcutCreationFailed {
                detail: format!("{e:#}"),
                app_path: app_path.to_path_buf(),
                link_path: None,
            })?;
        core_shortcut::create_shortcut(&self.app, &dir, &ShellLinkBackend)
    }

    /// 删除指向本应用的快捷方式，返回删除个数。
    pub fn delete_shortcut(&self, position: ShortcutPosition) -> usize {
        match self.shortcut_dir(position) {
            Ok(dir) => core_shortcut::delete_shortcuts(&self.app, &dir, &ShellLinkBackend),
            Err(e) => {
                error!("解析快捷方式目录失败: {e:#}");
                0
            }
        }
    }

    /// 注册登录时以最高权限启动本应用的计划任务。
    ///
    /// 参数：
    /// - 无；任务名与 exe 路径取自 [`AppInfo`]
    ///
    /// 返回值：
    /// - `Ok(())`：任务已存在或已确认创建
    ///
    /// 异常处理：
    /// - exe 不存在：`ExecutableNotFound`
    /// - 用户拒绝 UAC：`ElevationFailed`
    /// - 超时内未观察到任务出现：`TaskConfirmationTimeout`
    /// - schtasks 执行失败：`CommandFailed`
    pub fn create_admin_startup_task(&self) -> OpResult {
        AdminStartupTask::new(&SchTasks).create(&self.app)
    }

    /// 删除管理员自启计划任务。
    ///
    /// 返回值：
    /// - `Ok(())`：任务本不存在或已确认删除
    ///
    /// 异常处理：
    /// - 用户拒绝 UAC：`ElevationFailed`
    /// - 超时内未观察到任务消失：`TaskConfirmationTimeout`
    /// - schtasks 执行失败：`CommandFailed`
    pub fn delete_admin_startup_task(&self) -> OpResult {
        AdminStartupTask::new(&SchTasks).delete(&self.app)
    }

    /// 查询管理员自启任务是否已注册。
    ///
    /// 返回值：
    /// - [`TaskState`]；查询本身失败时记录日志并视为不存在
    pub fn admin_startup_task_state(&self) -> TaskState {
        AdminStartupTask::new(&SchTasks).state(&self.app)
    }

    /// 立即关机。
    ///
    /// 异常处理：
    /// - 命令无法启动时只记录日志，不返回错误
    pub fn shutdown(&self) {
        power::shutdown();
    }

    /// 立即休眠。
    ///
    /// 异常处理：
    /// - 同 [`Api::shutdown`]
    pub fn hibernate(&self) {
        power::hibernate();
    }

    /// 启动独立进程，不阻塞当前进程。
    pub fn run_new_process(&self, path: &Path, args: &str) {
        process::run_detached(path, args);
    }

    /// 用系统默认程序打开文件或目录。
    pub fn startfile(&self, path: &Path) {
        process::open_with_default_app(path);
    }

    /// 推荐的渲染后端标签（`AA_UseOpenGLES` / `AA_UseSoftwareOpenGL`）。
    pub fn get_opengl_use(&self) -> &'static str {
        version::rendering_backend().tag()
    }

    /// 虚拟键码转为键名。
    ///
    /// 参数：
    /// - `key`：Windows 虚拟键码
    ///
    /// 返回值：
    /// - 小写键名（如 `"a"`、`"f1"`）；未知键码按注入的翻译表约定返回
    pub fn get_key_name(&self, key: u32) -> String {
        self.keys.key_name(key)
    }
}
