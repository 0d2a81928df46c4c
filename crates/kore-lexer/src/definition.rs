//! Rule tables described in JSON files.
//!
//! ```json
//! {
//!   "name": "ini",
//!   "states": [
//!     { "name": "root", "rules": [
//!       { "pattern": ";.*$", "token": "Comment" },
//!       { "pattern": "\\[", "token": "Punctuation", "next": "section" },
//!       { "include": "whitespace" }
//!     ] },
//!     { "name": "section", "rules": [
//!       { "pattern": "[^\\]]+", "token": "Name.Namespace" },
//!       { "pattern": "\\]", "token": "Punctuation", "next": "#pop" }
//!     ] },
//!     { "name": "whitespace", "rules": [ { "pattern": "\\s+", "token": "Text" } ] }
//!   ]
//! }
//! ```
//!
//! A rule emits either `token` (the whole match) or `groups` (one kind per
//! capture group). `next` is a transition string (`#pop`, `#pop:N`,
//! `#push`, `#replace:state`, or a state name) or a list of them.

use crate::error::ConfigError;
use crate::rule::{Action, Emission, InvalidStackOp, RuleDef, StackOp, Transition};
use crate::table::{StateDef, StateTable, StateTableBuilder};
use crate::token::TokenKind;
use kore_common::Span;
use kore_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a definition file.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("cannot read lexer definition '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed lexer definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule {index} in state `{state}`: {message}")]
    InvalidRule {
        state: String,
        index: usize,
        message: String,
    },

    #[error("state `{state}`: {source}")]
    InvalidTransition {
        state: String,
        #[source]
        source: InvalidStackOp,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DefinitionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DefinitionError::Config(err) => err.code(),
            _ => ErrorCode::InvalidDefinition,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DefinitionError::Config(err) => err.to_diagnostic(),
            _ => Diagnostic::error(DiagnosticKind::Config, Span::DUMMY, self.to_string())
                .with_code(self.code()),
        }
    }
}

fn default_root() -> String {
    "root".to_owned()
}

/// A whole lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexerDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub filenames: Vec<String>,
    #[serde(default = "default_root")]
    pub root: String,
    pub states: Vec<StateDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDefinition {
    pub name: String,
    pub rules: Vec<ItemDefinition>,
}

/// One entry in a state's rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemDefinition {
    Include {
        include: String,
    },
    Default {
        default: TransitionDefinition,
    },
    Rule(RuleDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<TokenKind>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<TransitionDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_by: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionDefinition {
    One(String),
    Many(Vec<String>),
}

impl TransitionDefinition {
    fn to_transition(&self, state: &str) -> Result<Transition, DefinitionError> {
        let parse = |s: &String| {
            s.parse::<StackOp>()
                .map_err(|source| DefinitionError::InvalidTransition {
                    state: state.to_owned(),
                    source,
                })
        };
        match self {
            TransitionDefinition::One(op) => Ok(Transition::from(parse(op)?)),
            TransitionDefinition::Many(ops) => ops.iter().map(parse).collect(),
        }
    }
}

impl LexerDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let json = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Translate into a builder without compiling anything.
    pub fn to_builder(&self) -> Result<StateTableBuilder, DefinitionError> {
        let mut builder = StateTableBuilder::new();
        builder.root(self.root.clone());

        for state in &self.states {
            let mut def = StateDef::new();
            for (index, item) in state.rules.iter().enumerate() {
                match item {
                    ItemDefinition::Include { include } => {
                        def.include(include.clone());
                    }
                    ItemDefinition::Default { default } => {
                        def.default(default.to_transition(&state.name)?);
                    }
                    ItemDefinition::Rule(rule) => {
                        def.push(rule.to_rule_def(&state.name, index)?);
                    }
                }
            }
            builder.state_def(state.name.clone(), def);
        }

        Ok(builder)
    }

    /// Build a validated table.
    pub fn build(&self) -> Result<StateTable, DefinitionError> {
        Ok(self.to_builder()?.build()?)
    }
}

impl RuleDefinition {
    fn to_rule_def(&self, state: &str, index: usize) -> Result<RuleDef, DefinitionError> {
        let invalid = |message: &str| DefinitionError::InvalidRule {
            state: state.to_owned(),
            index,
            message: message.to_owned(),
        };

        let emission = match (&self.token, &self.groups) {
            (Some(kind), None) => Emission::Whole(*kind),
            (None, Some(kinds)) => Emission::Groups(kinds.clone()),
            (Some(_), Some(_)) => return Err(invalid("`token` and `groups` are exclusive")),
            (None, None) => return Err(invalid("needs `token` or `groups`")),
        };

        let action = match (&self.next, emission) {
            (Some(next), emission) => Action::Transition(emission, next.to_transition(state)?),
            (None, Emission::Whole(kind)) => Action::Emit(kind),
            (None, Emission::Groups(kinds)) => Action::EmitGroups(kinds),
        };

        let mut rule = RuleDef::new(self.pattern.clone(), action);
        if let Some(chars) = &self.not_after {
            rule.not_after(chars.clone());
        }
        if let Some(ch) = self.followed_by {
            rule.followed_by(ch);
        }
        Ok(rule)
    }
}
