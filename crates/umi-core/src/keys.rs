//! 键值 → 键名转换（用于快捷键设置界面展示）。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

/// 键值翻译表（由上层注入，默认使用 [`VirtualKeyTable`]）。
pub trait KeyTranslator {
    fn key_name(&self, key_code: u32) -> String;
}

/// Windows 虚拟键码（VK_*）到小写键名的默认映射。
///
/// 左右修饰键（如 `VK_LSHIFT`/`VK_RSHIFT`）归并为同一个键名；未知键码输出 `key_<code>`。
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualKeyTable;

impl KeyTranslator for VirtualKeyTable {
    fn key_name(&self, key_code: u32) -> String {
        match key_code {
            // 0-9
            0x30..=0x39 => char::from(b'0' + (key_code - 0x30) as u8).to_string(),
            // A-Z
            0x41..=0x5A => char::from(b'a' + (key_code - 0x41) as u8).to_string(),
            // NUMPAD0-9
            0x60..=0x69 => format!("num{}", key_code - 0x60),
            // F1-F24
            0x70..=0x87 => format!("f{}", key_code - 0x70 + 1),
            _ => named_key(key_code)
                .map(str::to_string)
                .unwrap_or_else(|| format!("key_{key_code}")),
        }
    }
}

fn named_key(code: u32) -> Option<&'static str> {
    let name = match code {
        0x08 => "backspace",
        0x09 => "tab",
        0x0C => "clear",
        0x0D => "enter",
        0x10 | 0xA0 | 0xA1 => "shift",
        0x11 | 0xA2 | 0xA3 => "ctrl",
        0x12 | 0xA4 | 0xA5 => "alt",
        0x13 => "pause",
        0x14 => "capslock",
        0x1B => "esc",
        0x20 => "space",
        0x21 => "pageup",
        0x22 => "pagedown",
        0x23 => "end",
        0x24 => "home",
        0x25 => "left",
        0x26 => "up",
        0x27 => "right",
        0x28 => "down",
        0x2C => "printscreen",
        0x2D => "insert",
        0x2E => "delete",
        0x5B | 0x5C => "win",
        0x5D => "apps",
        0x6A => "num*",
        0x6B => "num+",
        0x6C => "separator",
        0x6D => "num-",
        0x6E => "num.",
        0x6F => "num/",
        0x90 => "numlock",
        0x91 => "scrolllock",
        0xBA => ";",
        0xBB => "=",
        0xBC => ",",
        0xBD => "-",
        0xBE => ".",
        0xBF => "/",
        0xC0 => "`",
        0xDB => "[",
        0xDC => "\\",
        0xDD => "]",
        0xDE => "'",
        _ => return None,
    };
    Some(name)
}
