//! 渲染器选择：按系统版本推荐 OpenGL ES（硬件加速）或软件渲染。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use serde::Serialize;

/// 推荐的渲染后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderingBackend {
    /// Windows 10 及以上：ANGLE/GLES 路径。
    OpenGlEs,
    /// 更早的系统：软件渲染兜底。
    SoftwareOpenGl,
}

impl RenderingBackend {
    /// Qt 应用属性名形式的标签。
    pub fn tag(self) -> &'static str {
        match self {
            RenderingBackend::OpenGlEs => "AA_UseOpenGLES",
            RenderingBackend::SoftwareOpenGl => "AA_UseSoftwareOpenGL",
        }
    }
}

/// 根据系统版本字符串（如 `"10.0.19045"`）选择渲染后端。
///
/// 主版本号取第一个 `.` 之前的部分，不去除首尾空白；字符串不含 `.`、主版本非纯数字
/// 或小于 10 时返回软件渲染。主版本按十进制字符串比较，任意长度都不会溢出。
pub fn select_rendering_backend(os_version: &str) -> RenderingBackend {
    let Some((major, _)) = os_version.split_once('.') else {
        return RenderingBackend::SoftwareOpenGl;
    };
    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return RenderingBackend::SoftwareOpenGl;
    }
    let significant = major.trim_start_matches('0');
    // 去掉前导 0 后超过两位即 >= 100。
    let at_least_ten = significant.len() > 2
        || significant.parse::<u8>().is_ok_and(|v| v >= 10);
    if at_least_ten {
        RenderingBackend::OpenGlEs
    } else {
        RenderingBackend::SoftwareOpenGl
    }
}
