//! Output formatting utilities.
//! 输出格式化工具。
//!
//! Status lines go to stderr so that token listings on stdout stay
//! machine-readable.
//! 状态信息写到标准错误输出，使标准输出上的 token 列表保持可解析。

/// Print a success message in green.
/// 以绿色打印成功消息。
pub fn success(msg: &str) {
    eprintln!("\x1b[32m{msg}\x1b[0m");
}

/// Print an error message in red.
/// 以红色打印错误消息。
pub fn error(msg: &str) {
    eprintln!("\x1b[31merror:\x1b[0m {msg}");
}

/// Print an info message in blue.
/// 以蓝色打印信息消息。
pub fn info(msg: &str) {
    eprintln!("\x1b[34minfo:\x1b[0m {msg}");
}
