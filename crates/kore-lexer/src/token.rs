//! Token definitions and the token category taxonomy.
//! Token 定义与 token 类别体系。
//!
//! Categories form a tree (`Name.Variable.Magic` is a `Name.Variable`, which
//! is a `Name`). The scanner treats a kind as a plain tag; the parent
//! relation exists for consumers that style output by category family.

use kore_common::Span;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! token_kinds {
    ($($variant:ident => $name:literal, parent: $parent:expr;)*) => {
        /// The lexical category of a token.
        /// token 的词法类别。
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum TokenKind {
            $($variant,)*
        }

        impl TokenKind {
            /// Every kind, parents before children.
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant,)*];

            /// The dotted category name, e.g. `"Comment.Multiline"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $name,)*
                }
            }

            /// The direct parent category, or `None` for a top-level kind.
            pub fn parent(self) -> Option<TokenKind> {
                match self {
                    $(TokenKind::$variant => $parent,)*
                }
            }
        }
    };
}

token_kinds! {
    Text => "Text", parent: None;
    Whitespace => "Text.Whitespace", parent: Some(TokenKind::Text);
    Error => "Error", parent: None;

    Comment => "Comment", parent: None;
    CommentHashbang => "Comment.Hashbang", parent: Some(TokenKind::Comment);
    CommentShebang => "Comment.Shebang", parent: Some(TokenKind::Comment);
    CommentMultiline => "Comment.Multiline", parent: Some(TokenKind::Comment);

    Keyword => "Keyword", parent: None;
    KeywordNamespace => "Keyword.Namespace", parent: Some(TokenKind::Keyword);
    KeywordDeclaration => "Keyword.Declaration", parent: Some(TokenKind::Keyword);
    KeywordConstant => "Keyword.Constant", parent: Some(TokenKind::Keyword);
    KeywordType => "Keyword.Type", parent: Some(TokenKind::Keyword);

    Name => "Name", parent: None;
    NameNamespace => "Name.Namespace", parent: Some(TokenKind::Name);
    NameFunction => "Name.Function", parent: Some(TokenKind::Name);
    NameVariable => "Name.Variable", parent: Some(TokenKind::Name);
    NameVariableMagic => "Name.Variable.Magic", parent: Some(TokenKind::NameVariable);
    NameDecorator => "Name.Decorator", parent: Some(TokenKind::Name);
    NameBuiltin => "Name.Builtin", parent: Some(TokenKind::Name);

    Number => "Number", parent: None;
    NumberBin => "Number.Bin", parent: Some(TokenKind::Number);
    NumberHex => "Number.Hex", parent: Some(TokenKind::Number);
    NumberOct => "Number.Oct", parent: Some(TokenKind::Number);
    NumberFloat => "Number.Float", parent: Some(TokenKind::Number);

    String => "String", parent: None;
    StringDoc => "String.Doc", parent: Some(TokenKind::String);
    StringSingle => "String.Single", parent: Some(TokenKind::String);
    StringChar => "String.Char", parent: Some(TokenKind::String);
    StringInterpol => "String.Interpol", parent: Some(TokenKind::String);

    Operator => "Operator", parent: None;
    Punctuation => "Punctuation", parent: None;
}

impl TokenKind {
    /// Returns true if `self` is `ancestor` or one of its descendants.
    pub fn is_subtype_of(self, ancestor: TokenKind) -> bool {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if k == ancestor {
                return true;
            }
            kind = k.parent();
        }
        false
    }

    /// The top-level category this kind belongs to.
    pub fn top_level(self) -> TokenKind {
        let mut kind = self;
        while let Some(parent) = kind.parent() {
            kind = parent;
        }
        kind
    }

    /// Returns true for whitespace and other plain text.
    pub fn is_trivia(self) -> bool {
        self.is_subtype_of(TokenKind::Text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a dotted name is not a known token kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token kind `{0}`")]
pub struct UnknownTokenKind(pub std::string::String);

impl FromStr for TokenKind {
    type Err = UnknownTokenKind;

    /// Parses the dotted name; the Pygments `Token.` prefix is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("Token.").unwrap_or(s);
        TokenKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UnknownTokenKind(s.to_owned()))
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TokenKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = std::string::String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A token: a lexeme of the source buffer tagged with its kind.
/// 一个 token：带有类别标记的源码词素。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    #[serde(serialize_with = "serialize_span")]
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Byte offset of the first character of this token.
    pub fn start(&self) -> usize {
        self.span.start.to_usize()
    }

    /// Byte offset one past the last character of this token.
    pub fn end(&self) -> usize {
        self.span.end.to_usize()
    }
}

fn serialize_span<S: Serializer>(span: &Span, serializer: S) -> Result<S::Ok, S::Error> {
    span.range().serialize(serializer)
}
