//! Regex-driven stateful lexing for kore.
//! kore 的基于正则的有状态词法分析。
//!
//! A [`StateTable`] holds named, ordered rule lists. Scanning walks the
//! buffer, trying the active state's rules in order at the current offset
//! and emitting [`Token`]s; rules may push or pop states.
//! [`StateTable`] 保存具名的有序规则列表。扫描时在当前位置按顺序尝试
//! 活动状态的规则并产生 [`Token`]；规则可以压入或弹出状态。
//!
//! ```
//! use kore_lexer::{TokenKind, kore};
//!
//! let table = kore::lexer().expect("kore table is valid");
//! let kinds: Vec<_> = table.tokenize("import foo").map(|t| t.kind).collect();
//! assert_eq!(kinds[0], TokenKind::KeywordNamespace);
//! ```

mod definition;
mod detect;
mod error;
pub mod kore;
mod rule;
mod scanner;
mod stack;
mod table;
mod token;

pub use definition::{
    DefinitionError, ItemDefinition, LexerDefinition, RuleDefinition, StateDefinition,
    TransitionDefinition,
};
pub use detect::{LexerInfo, shebang_matches};
pub use error::ConfigError;
pub use rule::{
    Action, Emission, InvalidStackOp, Pattern, PatternError, Rule, RuleDef, StackOp, Transition,
};
pub use scanner::{MAX_ZERO_WIDTH_STEPS, Tokens, error_diagnostics};
pub use stack::StateStack;
pub use table::{RuleId, StateDef, StateTable, StateTableBuilder};
pub use token::{Token, TokenKind, UnknownTokenKind};
