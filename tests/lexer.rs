//! Integration tests for the kore rule table.

use kore_lexer::{StateTable, Token, TokenKind, kore, shebang_matches};

fn table() -> &'static StateTable {
    kore::lexer().expect("kore table builds")
}

fn lex(source: &str) -> Vec<(TokenKind, &str)> {
    table()
        .tokenize(source)
        .map(|t| (t.kind, t.text))
        .collect()
}

fn tokens(source: &str) -> Vec<Token<'_>> {
    table().tokenize_all(source)
}

fn kinds_of(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|(kind, _)| kind).collect()
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_line_comment() {
    assert_eq!(
        lex("# hello\n"),
        vec![(TokenKind::Comment, "# hello"), (TokenKind::Text, "\n")]
    );
}

#[test]
fn test_multiline_comment() {
    assert_eq!(
        lex("#* a #b *#"),
        vec![
            (TokenKind::CommentMultiline, "#*"),
            (TokenKind::CommentMultiline, " a #b "),
            (TokenKind::CommentMultiline, "*#"),
        ]
    );
}

#[test]
fn test_multiline_comment_spans_lines() {
    assert_eq!(
        lex("#* a\n * b **#x"),
        vec![
            (TokenKind::CommentMultiline, "#*"),
            (TokenKind::CommentMultiline, " a\n * b "),
            (TokenKind::CommentMultiline, "*"),
            (TokenKind::CommentMultiline, "*#"),
            (TokenKind::Name, "x"),
        ]
    );
}

#[test]
fn test_unterminated_multiline_comment() {
    let result = tokens("#* never closed");
    assert!(result.iter().all(|t| t.kind == TokenKind::CommentMultiline));
    assert_eq!(result.last().map(|t| t.end()), Some(15));
}

#[test]
fn test_doc_comment() {
    assert_eq!(
        lex("#@ docs\n more @#\nx"),
        vec![
            (TokenKind::StringDoc, "#@ docs\n more @#"),
            (TokenKind::Text, "\n"),
            (TokenKind::Name, "x"),
        ]
    );
}

#[test]
fn test_indented_doc_comment() {
    assert_eq!(
        lex("  #@ d @#"),
        vec![(TokenKind::Text, "  "), (TokenKind::StringDoc, "#@ d @#")]
    );
}

// ============================================================================
// Shebangs
// ============================================================================

#[test]
fn test_hashbang_first_line() {
    let source = "#!/usr/bin/env kore\nx";
    assert!(shebang_matches(source, "kore"));
    assert!(kore::detect(source));
    assert_eq!(
        lex(source),
        vec![
            (TokenKind::CommentHashbang, "#!/usr/bin/env kore"),
            (TokenKind::Text, "\n"),
            (TokenKind::Name, "x"),
        ]
    );
}

#[test]
fn test_shebang_after_first_line() {
    assert_eq!(
        lex("x\n#!y"),
        vec![
            (TokenKind::Name, "x"),
            (TokenKind::Text, "\n"),
            (TokenKind::CommentShebang, "#!"),
            (TokenKind::Name, "y"),
        ]
    );
}

// ============================================================================
// Imports and modules
// ============================================================================

#[test]
fn test_import() {
    assert_eq!(
        lex("import foo.bar"),
        vec![
            (TokenKind::KeywordNamespace, "import"),
            (TokenKind::Text, " "),
            (TokenKind::NameNamespace, "foo"),
            (TokenKind::NameNamespace, "."),
            (TokenKind::NameNamespace, "bar"),
        ]
    );
}

#[test]
fn test_import_list_pops_at_line_end() {
    assert_eq!(
        lex("import a, b\nx"),
        vec![
            (TokenKind::KeywordNamespace, "import"),
            (TokenKind::Text, " "),
            (TokenKind::NameNamespace, "a"),
            (TokenKind::Operator, ","),
            (TokenKind::Text, " "),
            (TokenKind::NameNamespace, "b"),
            (TokenKind::Text, "\n"),
            (TokenKind::Name, "x"),
        ]
    );
}

#[test]
fn test_import_needs_whitespace() {
    assert_eq!(lex("important"), vec![(TokenKind::Name, "important")]);
}

#[test]
fn test_module() {
    assert_eq!(
        lex("module foo.bar\n"),
        vec![
            (TokenKind::KeywordNamespace, "module"),
            (TokenKind::Text, " "),
            (TokenKind::NameNamespace, "foo.bar"),
            (TokenKind::Text, "\n"),
        ]
    );
}

// ============================================================================
// Keywords, names and types
// ============================================================================

#[test]
fn test_declaration() {
    assert_eq!(
        lex("var x = 10\n"),
        vec![
            (TokenKind::KeywordDeclaration, "var"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "x"),
            (TokenKind::Text, " "),
            (TokenKind::Operator, "="),
            (TokenKind::Text, " "),
            (TokenKind::Number, "10"),
            (TokenKind::Text, "\n"),
        ]
    );
}

#[test]
fn test_keywords() {
    let source = "if else elseif match enum return some try type";
    let keywords: Vec<_> = kinds_of(source)
        .into_iter()
        .filter(|k| *k != TokenKind::Text)
        .collect();
    assert_eq!(keywords, vec![TokenKind::Keyword; 9]);
}

#[test]
fn test_keyword_after_dot_is_a_name() {
    assert_eq!(
        lex("a.if"),
        vec![
            (TokenKind::Name, "a"),
            (TokenKind::Operator, "."),
            (TokenKind::Name, "if"),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_a_name() {
    assert_eq!(lex("iffy"), vec![(TokenKind::Name, "iffy")]);
}

#[test]
fn test_function_declaration() {
    assert_eq!(
        lex("func main()"),
        vec![
            (TokenKind::KeywordDeclaration, "func"),
            (TokenKind::Text, " "),
            (TokenKind::NameFunction, "main"),
            (TokenKind::Punctuation, "("),
            (TokenKind::Punctuation, ")"),
        ]
    );
}

#[test]
fn test_struct() {
    assert_eq!(
        kinds_of("struct Point"),
        vec![
            TokenKind::KeywordDeclaration,
            TokenKind::Text,
            TokenKind::Name
        ]
    );
}

#[test]
fn test_constants_and_builtins() {
    assert_eq!(
        lex("true none map"),
        vec![
            (TokenKind::KeywordConstant, "true"),
            (TokenKind::Text, " "),
            (TokenKind::KeywordConstant, "none"),
            (TokenKind::Text, " "),
            (TokenKind::NameBuiltin, "map"),
        ]
    );
}

#[test]
fn test_builtin_types() {
    assert_eq!(
        lex("i32 str? u8[][] char_count"),
        vec![
            (TokenKind::KeywordType, "i32"),
            (TokenKind::Text, " "),
            (TokenKind::KeywordType, "str?"),
            (TokenKind::Text, " "),
            (TokenKind::KeywordType, "u8[][]"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "char_count"),
        ]
    );
}

#[test]
fn test_decorators_and_magic_variables() {
    assert_eq!(
        lex("@inline @1"),
        vec![
            (TokenKind::NameDecorator, "@inline"),
            (TokenKind::Text, " "),
            (TokenKind::NameVariableMagic, "@1"),
        ]
    );
    assert!(TokenKind::NameVariableMagic.is_subtype_of(TokenKind::Name));
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_number_bases() {
    assert_eq!(
        lex("0x1F 0b101 0o17 12.5 42"),
        vec![
            (TokenKind::NumberHex, "0x1F"),
            (TokenKind::Text, " "),
            (TokenKind::NumberBin, "0b101"),
            (TokenKind::Text, " "),
            (TokenKind::NumberOct, "0o17"),
            (TokenKind::Text, " "),
            (TokenKind::NumberFloat, "12.5"),
            (TokenKind::Text, " "),
            (TokenKind::Number, "42"),
        ]
    );
}

#[test]
fn test_single_digit_float_is_split() {
    assert_eq!(
        lex("1.5"),
        vec![
            (TokenKind::Number, "1"),
            (TokenKind::Operator, "."),
            (TokenKind::Number, "5"),
        ]
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_interpolation() {
    assert_eq!(
        lex(r#""@{name} there""#),
        vec![
            (TokenKind::String, "\""),
            (TokenKind::StringInterpol, "@{"),
            (TokenKind::StringInterpol, "name"),
            (TokenKind::StringInterpol, "}"),
            (TokenKind::String, " there"),
            (TokenKind::String, "\""),
        ]
    );
}

#[test]
fn test_interpolation_mid_string_is_plain_text() {
    // The body runs to the closing quote; `@{` only opens an interpolation
    // where a body segment starts.
    assert_eq!(
        lex(r#""a @{x} b""#),
        vec![
            (TokenKind::String, "\""),
            (TokenKind::String, "a @{x} b"),
            (TokenKind::String, "\""),
        ]
    );
}

#[test]
fn test_string_returns_to_root() {
    let mut stream = table().tokenize(r#""a" x"#);
    let texts: Vec<_> = stream.by_ref().map(|t| t.text).collect();
    assert_eq!(texts, vec!["\"", "a", "\"", " ", "x"]);
    assert_eq!(stream.state_name(), "root");
    assert_eq!(stream.stack().depth(), 1);
}

#[test]
fn test_lone_at_sign_in_string() {
    assert_eq!(
        lex(r#""a@b""#),
        vec![
            (TokenKind::String, "\""),
            (TokenKind::String, "a@b"),
            (TokenKind::String, "\""),
        ]
    );
}

#[test]
fn test_char_literal() {
    assert_eq!(
        lex("'a'"),
        vec![
            (TokenKind::StringSingle, "'"),
            (TokenKind::StringChar, "a"),
            (TokenKind::StringSingle, "'"),
        ]
    );
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_operators() {
    let ops: Vec<_> = lex("a..b => c != d ?? e")
        .into_iter()
        .filter(|(kind, _)| *kind == TokenKind::Operator)
        .map(|(_, text)| text)
        .collect();
    assert_eq!(ops, vec!["..", "=>", "!=", "??"]);
}

#[test]
fn test_punctuation() {
    assert_eq!(kinds_of("{}[],;"), vec![TokenKind::Punctuation; 6]);
}

#[test]
fn test_line_continuation() {
    assert_eq!(
        lex("a \\\nb"),
        vec![
            (TokenKind::Name, "a"),
            (TokenKind::Text, " "),
            (TokenKind::Operator, "\\"),
            (TokenKind::Text, "\n"),
            (TokenKind::Name, "b"),
        ]
    );
}

#[test]
fn test_backslash_without_newline_is_an_error() {
    assert_eq!(kinds_of("\\x")[0], TokenKind::Error);
}

// ============================================================================
// Errors and invariants
// ============================================================================

#[test]
fn test_unmatched_character() {
    assert_eq!(
        lex("a ` b"),
        vec![
            (TokenKind::Name, "a"),
            (TokenKind::Text, " "),
            (TokenKind::Error, "`"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "b"),
        ]
    );
}

#[test]
fn test_unmatched_multibyte_character() {
    let result = tokens("x€y");
    assert_eq!(result[1].kind, TokenKind::Error);
    assert_eq!(result[1].text, "€");
    assert_eq!(result[2].start(), 4);
}

#[test]
fn test_empty_input() {
    assert!(lex("").is_empty());
}

#[test]
fn test_program_is_lossless() {
    let source = r#"#!/usr/bin/env kore
#@ Greets. @#
module demo
import std.io, std.fmt

#* multi
   line *#
func greet(name: str?) {
    var n = 0x1F + 12.5 # note
    if n != 0b11 { return "hi @{name}!" }
    @inline map.if
}
"#;
    let result = tokens(source);
    let joined: String = result.iter().map(|t| t.text).collect();
    assert_eq!(joined, source);

    let mut offset = 0;
    for token in &result {
        assert_eq!(token.start(), offset);
        assert!(!token.text.is_empty());
        offset = token.end();
    }
    assert!(result.iter().all(|t| t.kind != TokenKind::Error));
}

#[test]
fn test_tokens_serialize_to_json() {
    let json = serde_json::to_value(tokens("x")).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "kind": "Name", "text": "x", "span": { "start": 0, "end": 1 } }])
    );
}
