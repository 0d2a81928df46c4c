//! The `kore-lex tokens` command.
//! `kore-lex tokens` 命令。

use super::{load_table, read_source};
use crate::output;

/// Print every token of a file, one per line or as JSON.
/// 打印文件中的每个 token，逐行或以 JSON 输出。
pub fn run(file: &str, json: bool, definition: Option<&str>, verbose: bool) -> Result<(), String> {
    let source = read_source(file)?;
    let table = load_table(definition)?;
    let tokens = table.tokenize_all(&source);

    if json {
        let out = serde_json::to_string_pretty(&tokens)
            .map_err(|e| format!("cannot serialize tokens: {}", e))?;
        println!("{out}");
    } else {
        for token in &tokens {
            println!("{}\t{}\t{:?}", token.kind, token.start(), token.text);
        }
    }

    if verbose {
        output::info(&format!("{} token(s) from {} byte(s)", tokens.len(), source.len()));
    }
    Ok(())
}
