//! The `kore-lex states` command.
//! `kore-lex states` 命令。

use super::load_table;

/// List states with their resolved rule counts; `verbose` adds patterns.
/// 列出各状态及其展开后的规则数；详细模式下附带模式。
pub fn run(definition: Option<&str>, verbose: bool) -> Result<(), String> {
    let table = load_table(definition)?;

    for (state, name) in table.states() {
        let marker = if state == table.root() { " (root)" } else { "" };
        println!("{}\t{}{}", name, table.rule_ids(state).len(), marker);

        if verbose {
            for rule in table.rules(state) {
                match rule.pattern() {
                    Some(pattern) => println!("    {}", pattern.as_str()),
                    None => println!("    <default>"),
                }
            }
        }
    }
    Ok(())
}
