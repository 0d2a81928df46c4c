//! CLI command implementations.

pub mod check;
pub mod detect;
pub mod states;
pub mod tokens;

use kore_diagnostic::Diagnostic;
use kore_lexer::{LexerDefinition, StateTable, kore};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Read a source file.
pub fn read_source(file: &str) -> Result<String, String> {
    fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))
}

/// The kore table, or the table described by a JSON definition file.
pub fn load_table(definition: Option<&str>) -> Result<Cow<'static, StateTable>, String> {
    let Some(path) = definition else {
        return kore::lexer()
            .map(Cow::Borrowed)
            .map_err(|e| describe(&e.to_diagnostic().with_note("in the built-in kore table")));
    };

    let table = LexerDefinition::from_path(Path::new(path))
        .and_then(|def| {
            tracing::debug!(name = %def.name, states = def.states.len(), "loaded definition");
            def.build()
        })
        .map_err(|e| describe(&e.to_diagnostic()))?;
    Ok(Cow::Owned(table))
}

/// Text form of a table diagnostic: `[code] message`, then notes and help.
fn describe(diagnostic: &Diagnostic) -> String {
    let mut text = match diagnostic.code {
        Some(code) => format!("[{}] {}", code, diagnostic.message),
        None => diagnostic.message.clone(),
    };
    for note in &diagnostic.notes {
        text.push_str(&format!("\n  note: {note}"));
    }
    if let Some(help) = &diagnostic.help {
        text.push_str(&format!("\n  help: {help}"));
    }
    text
}
