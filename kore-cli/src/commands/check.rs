//! The `kore-lex check` command.
//! `kore-lex check` 命令。

use super::{load_table, read_source};
use crate::output;
use kore_diagnostic::emit;
use kore_lexer::error_diagnostics;

/// Report every run of characters the kore lexer cannot match.
/// 报告 kore 词法分析器无法匹配的每段字符。
pub fn run(file: &str, verbose: bool) -> Result<(), String> {
    let source = read_source(file)?;
    let table = load_table(None)?;
    let tokens = table.tokenize_all(&source);

    if verbose {
        output::info(&format!("Scanned {} tokens", tokens.len()));
    }

    let diagnostics = error_diagnostics(&tokens);
    for diag in &diagnostics {
        emit(&source, file, diag).map_err(|e| format!("cannot write diagnostic: {}", e))?;
    }

    if !diagnostics.is_empty() {
        output::error(&format!("{} lexical error(s) found", diagnostics.len()));
        return Err("lexical error".to_string());
    }

    output::success("OK - No errors found");
    Ok(())
}
