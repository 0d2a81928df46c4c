//! Error codes for kore lexer diagnostics.

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Scan-time anomalies (E0001 - E0009)
    UnexpectedCharacter,

    // Rule table configuration errors (E0010 - E0099)
    UnknownState,
    IncludeCycle,
    GroupCountMismatch,
    InvalidPattern,
    MissingRoot,
    DuplicateState,
    InvalidDefinition,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "E0001",

            ErrorCode::UnknownState => "E0010",
            ErrorCode::IncludeCycle => "E0011",
            ErrorCode::GroupCountMismatch => "E0012",
            ErrorCode::InvalidPattern => "E0013",
            ErrorCode::MissingRoot => "E0014",
            ErrorCode::DuplicateState => "E0015",
            ErrorCode::InvalidDefinition => "E0016",
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "no lexer rule matches this character",
            ErrorCode::UnknownState => "reference to a lexer state that does not exist",
            ErrorCode::IncludeCycle => "lexer states include each other in a cycle",
            ErrorCode::GroupCountMismatch => {
                "rule assigns a different number of token kinds than its pattern has groups"
            }
            ErrorCode::InvalidPattern => "rule pattern is not a valid regular expression",
            ErrorCode::MissingRoot => "lexer has no root state",
            ErrorCode::DuplicateState => "lexer state is defined twice",
            ErrorCode::InvalidDefinition => "lexer definition file is malformed",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnknownState => Some("define the state or fix the spelling of the reference"),
            ErrorCode::IncludeCycle => Some("move the shared rules into a state that includes neither"),
            ErrorCode::GroupCountMismatch => {
                Some("give every capture group a token kind, or use `(?:...)` for grouping only")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
