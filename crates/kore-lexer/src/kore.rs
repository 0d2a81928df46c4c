//! The kore language rule table.
//! kore 语言的规则表。

use crate::detect::{LexerInfo, shebang_matches};
use crate::error::ConfigError;
use crate::rule::{Action, Emission, Transition};
use crate::table::{StateTable, StateTableBuilder};
use crate::token::TokenKind::{self, *};
use once_cell::sync::Lazy;

/// Registration data for kore.
pub const LEXER_INFO: LexerInfo = LexerInfo {
    name: "kore",
    aliases: &["korelang", "kore-lang"],
    filenames: &["*.kore"],
    detect,
};

const IDENTIFIER: &str = r"[a-zA-Z_]\w*";

const KEYWORDS: &[&str] = &[
    "if", "else", "elseif", "match", "enum", "return", "some", "try", "type",
];

const BUILTIN_TYPES: &[&str] = &[
    "byte", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64", "bool", "str",
    "char",
];

static KORE: Lazy<Result<StateTable, ConfigError>> = Lazy::new(|| builder().build());

/// The shared kore table, built on first use.
pub fn lexer() -> Result<&'static StateTable, &'static ConfigError> {
    Lazy::force(&KORE).as_ref()
}

/// Returns true if `text` starts with a shebang that runs kore.
pub fn detect(text: &str) -> bool {
    shebang_matches(text, "kore")
}

fn emit_then(kind: TokenKind, transition: Transition) -> Action {
    Action::Transition(Emission::Whole(kind), transition)
}

/// Describe the kore states. Exposed so callers can extend or override
/// states before building their own table.
pub fn builder() -> StateTableBuilder {
    let types = BUILTIN_TYPES.join("|");
    let mut b = StateTableBuilder::new();

    b.state("root", |s| {
        s.rule(r"\A#!.+$", Action::Emit(CommentHashbang));
        s.rule(
            r"^(\s*)(#@(?:.|\n)*?@#)",
            Action::EmitGroups(vec![Text, StringDoc]),
        );
        s.include("comments");
        s.include("whitespace");
        s.rule(
            r"(import)(\s+)",
            Action::Transition(
                Emission::Groups(vec![KeywordNamespace, Text]),
                Transition::push("import"),
            ),
        );
        s.rule(
            r"\b(module)(\s+)(.+)\b",
            Action::EmitGroups(vec![KeywordNamespace, Text, NameNamespace]),
        );
        s.include("strings");
        s.include("numbers");
        s.include("types");
        s.rule(r"@\d+", Action::Emit(NameVariableMagic));
        s.include("operators");
        s.rule(r"!=|==|<<|>>|:=|[-~+/*%=<>&^|.]", Action::Emit(Operator));
        s.rule(r"[\]{}:(),;\[]", Action::Emit(Punctuation));
        s.rule(&format!(r"\b(?:{})\b", KEYWORDS.join("|")), Action::Emit(Keyword))
            .not_after(".");
        s.rule(r"(?:var|struct)\b", Action::Emit(KeywordDeclaration));
        s.rule(
            &format!(r"(func)(\s+)({IDENTIFIER})"),
            Action::EmitGroups(vec![KeywordDeclaration, Text, NameFunction]),
        );
        s.rule(&format!("@{IDENTIFIER}"), Action::Emit(NameDecorator));
        s.rule(r"(?:true|false|none|nan)\b", Action::Emit(KeywordConstant));
        s.rule(r"\b(?:map|set)\b", Action::Emit(NameBuiltin));
        s.rule(IDENTIFIER, Action::Emit(Name));
    });

    b.state("comments", |s| {
        s.rule("^#!", Action::Emit(CommentShebang));
        s.rule(
            r"#\*",
            emit_then(CommentMultiline, Transition::push("multiline-comment")),
        );
        s.rule("#.*$", Action::Emit(Comment));
    });

    b.state("multiline-comment", |s| {
        s.rule(r"(?:[^*]|\*+[^*#])+", Action::Emit(CommentMultiline));
        s.rule(r"\*#", emit_then(CommentMultiline, Transition::pop()));
        s.rule(r"\*", Action::Emit(CommentMultiline));
    });

    b.state("numbers", |s| {
        s.rule("0[bB][01][01_]+", Action::Emit(NumberBin));
        s.rule("0[xX][0-9a-fA-F][0-9a-fA-F_]+", Action::Emit(NumberHex));
        s.rule("0[oO][0-7][0-7_]+", Action::Emit(NumberOct));
        s.rule(r"[0-9][0-9_]+\.(?:[0-9]+)?", Action::Emit(NumberFloat));
        s.rule("[0-9_]+", Action::Emit(Number));
    });

    b.state("strings", |s| {
        s.rule("\"", emit_then(String, Transition::push("inner-string")));
        s.rule(
            "(')([^'])(')",
            Action::EmitGroups(vec![StringSingle, StringChar, StringSingle]),
        );
    });

    // Closing quote pops twice; the floor keeps the stack at root.
    b.state("inner-string", |s| {
        s.rule(
            r"@\{",
            emit_then(StringInterpol, Transition::push("string-interpolation")),
        );
        s.rule(r#"[^"]+"#, Action::Emit(String));
        s.rule("\"", emit_then(String, Transition::pop_n(2)));
    });

    b.state("string-interpolation", |s| {
        s.rule(r"\}", emit_then(StringInterpol, Transition::pop()));
        s.rule(r"[^}]+", Action::Emit(StringInterpol));
        s.default(Transition::pop());
    });

    b.state("import", |s| {
        s.rule(r"\.", Action::Emit(NameNamespace));
        s.rule(IDENTIFIER, Action::Emit(NameNamespace));
        s.rule(
            r"(\s*)(,)(\s*)",
            Action::EmitGroups(vec![Text, Operator, Text]),
        );
        s.default(Transition::pop());
    });

    b.state("operators", |s| {
        s.rule(r"\.\.|=>", Action::Emit(Operator));
        s.rule(
            r"\+\+|--|~|\?\?=?|\?|:|(?:<<|>>>?|==?|!=?|(?:\*\*|\|\||&&|[-<>+*%&|^/]))=?",
            Action::Emit(Operator),
        );
        s.rule(r"\\", Action::Emit(Operator)).followed_by('\n');
    });

    b.state("types", |s| {
        s.rule(&format!(r"(?:{types})\?"), Action::Emit(KeywordType));
        s.rule(&format!(r"(?:{types})(?:\[\])+"), Action::Emit(KeywordType));
        s.rule(&format!(r"\b(?:{types})\b"), Action::Emit(KeywordType));
    });

    b.state("whitespace", |s| {
        s.rule(r"\n", Action::Emit(Text));
        s.rule(r"\s+", Action::Emit(Text));
    });

    b
}
