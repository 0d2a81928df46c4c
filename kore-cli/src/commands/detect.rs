//! The `kore-lex detect` command.
//! `kore-lex detect` 命令。

use super::read_source;
use crate::output;
use kore_lexer::kore;
use std::path::Path;

/// Decide whether a file is kore, by filename or shebang.
/// 根据文件名或 shebang 判断文件是否为 kore。
pub fn run(file: &str, verbose: bool) -> Result<(), String> {
    let path = Path::new(file);
    let source = read_source(file)?;
    let info = kore::LEXER_INFO;

    if verbose {
        output::info(&format!(
            "filename match: {}, shebang match: {}",
            info.matches_filename(path),
            (info.detect)(&source)
        ));
    }

    if info.claims(Some(path), &source) {
        output::success(&format!("{}: {}", file, info.name));
        Ok(())
    } else {
        Err(format!("{}: not a {} source", file, info.name))
    }
}
