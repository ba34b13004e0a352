//! Umi 平台集成核心库（与操作系统无关的部分）。
//!
//! 功能：
//! - 应用元数据与配置加载（名称、exe 路径、环境范围）
//! - 结构化错误分类与旧接口 `[Success]` / `[Error]` 文本
//! - 快捷方式目录解析、重名编号与批量删除逻辑
//! - 管理员自启计划任务的状态流转与提权后有界轮询确认
//! - Windows 命令行转义、渲染器推荐、键名翻译表
//!
//! 系统调用本身通过 trait 注入（见 `umi-windows`），因此本库可在任意平台测试。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

pub mod app;
pub mod cmdline;
pub mod error;
pub mod keys;
pub mod render;
pub mod shortcut;
pub mod task;
pub mod wait;
