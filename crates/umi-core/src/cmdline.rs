//! Windows 命令行拼接（MS C 运行库解析规则）。
//!
//! `ShellExecuteW` 只接受单个参数字符串，需要把参数数组按运行库规则转义后拼接，
//! 使子进程 `argv` 解析结果与原数组一致。
//!
//! 规则：
//! - 参数间以单个空格分隔
//! - 含空格/制表符或为空的参数整体加双引号
//! - 双引号转义为 `\"`，其前紧邻的反斜杠数量加倍
//! - 位于加引号参数末尾的反斜杠数量加倍
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

/// 将参数数组拼接为单个命令行字符串。
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    let mut out = String::new();
    for arg in args {
        let arg = arg.as_ref();
        if !out.is_empty() {
            out.push(' ');
        }
        let need_quote = arg.is_empty() || arg.contains([' ', '\t']);
        if need_quote {
            out.push('"');
        }
        let mut backslashes = 0usize;
        for c in arg.chars() {
            match c {
                '\\' => backslashes += 1,
                '"' => {
                    out.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                    out.push('"');
                    backslashes = 0;
                }
                _ => {
                    out.extend(std::iter::repeat('\\').take(backslashes));
                    backslashes = 0;
                    out.push(c);
                }
            }
        }
        let tail = if need_quote { backslashes * 2 } else { backslashes };
        out.extend(std::iter::repeat('\\').take(tail));
        if need_quote {
            out.push('"');
        }
    }
    out
}
