//! Pattern rules: an anchored pattern plus the action it triggers.
//! 模式规则：锚定的正则模式及其触发的动作。

use crate::token::TokenKind;
use kore_common::Symbol;
use regex_automata::meta::{self, Regex};
use regex_automata::util::captures::Captures;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input, Match};
use std::fmt;
use std::str::FromStr;

/// A single state stack operation.
///
/// `S` is the state reference: names while a table is being described,
/// interned symbols once it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOp<S = String> {
    /// Push a state on top of the stack.
    Push(S),
    /// Push the currently active state again.
    PushCurrent,
    /// Pop `n` states; the root state is never popped.
    Pop(usize),
    /// Replace the active state.
    Replace(S),
}

impl<S> StackOp<S> {
    fn target(&self) -> Option<&S> {
        match self {
            StackOp::Push(s) | StackOp::Replace(s) => Some(s),
            StackOp::PushCurrent | StackOp::Pop(_) => None,
        }
    }
}

/// Error returned for a malformed stack operation string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid state transition `{0}`")]
pub struct InvalidStackOp(pub String);

impl FromStr for StackOp {
    type Err = InvalidStackOp;

    /// Accepts `#pop`, `#pop:N`, `#push`, `#replace:state` or a plain state name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidStackOp(s.to_owned());
        match s {
            "" => Err(invalid()),
            "#pop" => Ok(StackOp::Pop(1)),
            "#push" => Ok(StackOp::PushCurrent),
            _ => {
                if let Some(n) = s.strip_prefix("#pop:") {
                    let n: usize = n.parse().map_err(|_| invalid())?;
                    if n == 0 {
                        return Err(invalid());
                    }
                    Ok(StackOp::Pop(n))
                } else if let Some(state) = s.strip_prefix("#replace:") {
                    if state.is_empty() {
                        return Err(invalid());
                    }
                    Ok(StackOp::Replace(state.to_owned()))
                } else if s.starts_with('#') {
                    Err(invalid())
                } else {
                    Ok(StackOp::Push(s.to_owned()))
                }
            }
        }
    }
}

/// An ordered list of stack operations applied after a rule fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S = String> {
    ops: Vec<StackOp<S>>,
}

impl<S> Transition<S> {
    pub fn ops(&self) -> &[StackOp<S>] {
        &self.ops
    }

    /// Append another operation.
    pub fn then(mut self, op: StackOp<S>) -> Self {
        self.ops.push(op);
        self
    }

    /// Resolve state references, failing on the first unresolved one.
    pub(crate) fn resolve<T, E>(
        &self,
        mut f: impl FnMut(&S) -> Result<T, E>,
    ) -> Result<Transition<T>, E> {
        let ops = self
            .ops
            .iter()
            .map(|op| {
                Ok(match op {
                    StackOp::Push(s) => StackOp::Push(f(s)?),
                    StackOp::Replace(s) => StackOp::Replace(f(s)?),
                    StackOp::PushCurrent => StackOp::PushCurrent,
                    StackOp::Pop(n) => StackOp::Pop(*n),
                })
            })
            .collect::<Result<_, E>>()?;
        Ok(Transition { ops })
    }

    /// States this transition may enter.
    pub fn targets(&self) -> impl Iterator<Item = &S> {
        self.ops.iter().filter_map(StackOp::target)
    }
}

impl Transition {
    pub fn push(state: impl Into<String>) -> Self {
        Self::from(StackOp::Push(state.into()))
    }

    pub fn replace(state: impl Into<String>) -> Self {
        Self::from(StackOp::Replace(state.into()))
    }

    pub fn pop() -> Self {
        Self::pop_n(1)
    }

    pub fn pop_n(n: usize) -> Self {
        Self::from(StackOp::Pop(n))
    }

    pub fn push_current() -> Self {
        Self::from(StackOp::PushCurrent)
    }
}

impl<S> From<StackOp<S>> for Transition<S> {
    fn from(op: StackOp<S>) -> Self {
        Self { ops: vec![op] }
    }
}

impl<S> FromIterator<StackOp<S>> for Transition<S> {
    fn from_iter<I: IntoIterator<Item = StackOp<S>>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

/// How a matched span becomes tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// The whole match is one token.
    Whole(TokenKind),
    /// One token per capture group, in declaration order.
    Groups(Vec<TokenKind>),
}

/// What a rule does when it fires.
/// 规则触发时执行的动作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<S = String> {
    /// The whole match becomes one token.
    Emit(TokenKind),
    /// Each participating capture group becomes one token. Empty and
    /// non-participating groups are skipped.
    EmitGroups(Vec<TokenKind>),
    /// Emit the match, then change the state stack.
    Transition(Emission, Transition<S>),
    /// Always applies, consumes nothing and only changes the state stack.
    Default(Transition<S>),
}

impl<S> Action<S> {
    /// The group kinds this action assigns, if it emits per group.
    pub fn group_kinds(&self) -> Option<&[TokenKind]> {
        match self {
            Action::EmitGroups(kinds) | Action::Transition(Emission::Groups(kinds), _) => {
                Some(kinds)
            }
            _ => None,
        }
    }

    pub fn transition(&self) -> Option<&Transition<S>> {
        match self {
            Action::Transition(_, t) | Action::Default(t) => Some(t),
            Action::Emit(_) | Action::EmitGroups(_) => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Action::Default(_))
    }

    pub(crate) fn resolve<T, E>(
        &self,
        f: impl FnMut(&S) -> Result<T, E>,
    ) -> Result<Action<T>, E> {
        Ok(match self {
            Action::Emit(kind) => Action::Emit(*kind),
            Action::EmitGroups(kinds) => Action::EmitGroups(kinds.clone()),
            Action::Transition(emission, t) => Action::Transition(emission.clone(), t.resolve(f)?),
            Action::Default(t) => Action::Default(t.resolve(f)?),
        })
    }
}

/// A compiled regular expression matched anchored at a byte offset.
///
/// Patterns compile in multi-line mode: `^` and `$` match at line
/// boundaries and `\A` only at the start of the buffer. Matching sees the
/// whole buffer, so `\b` and `^` are judged at the absolute position.
///
/// The regex engine has no lookaround; two one-character guards cover
/// what lexer tables need. Guards are checked against the match the regex
/// selects and never cause it to try a different one.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    not_after: Option<String>,
    followed_by: Option<char>,
}

/// Error returned when a pattern fails to compile.
pub type PatternError = Box<meta::BuildError>;

impl Pattern {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::builder()
            .syntax(syntax::Config::new().multi_line(true))
            .build(source)
            .map_err(Box::new)?;
        Ok(Self {
            source: source.to_owned(),
            regex,
            not_after: None,
            followed_by: None,
        })
    }

    /// Reject a match when the character before the offset is one of `chars`.
    pub fn with_not_after(mut self, chars: impl Into<String>) -> Self {
        self.not_after = Some(chars.into());
        self
    }

    /// Require the character after the match to be `ch`; it is not consumed.
    pub fn with_followed_by(mut self, ch: char) -> Self {
        self.followed_by = Some(ch);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of explicit capture groups.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    pub(crate) fn create_captures(&self) -> Captures {
        self.regex.create_captures()
    }

    fn input<'h>(haystack: &'h str, offset: usize) -> Input<'h> {
        Input::new(haystack)
            .range(offset..)
            .anchored(Anchored::Yes)
    }

    fn precondition(&self, haystack: &str, offset: usize) -> bool {
        match &self.not_after {
            Some(chars) => !haystack[..offset]
                .chars()
                .next_back()
                .is_some_and(|c| chars.contains(c)),
            None => true,
        }
    }

    fn postcondition(&self, haystack: &str, m: Match) -> bool {
        match self.followed_by {
            Some(ch) => haystack[m.end()..].starts_with(ch),
            None => true,
        }
    }

    /// Match starting exactly at `offset`.
    pub fn find_at(&self, haystack: &str, offset: usize) -> Option<Match> {
        if !self.precondition(haystack, offset) {
            return None;
        }
        self.regex
            .search(&Self::input(haystack, offset))
            .filter(|m| self.postcondition(haystack, *m))
    }

    /// Match starting exactly at `offset`, filling `caps` with group spans.
    ///
    /// `caps` must come from [`Pattern::create_captures`] on this pattern.
    pub(crate) fn captures_at(
        &self,
        haystack: &str,
        offset: usize,
        caps: &mut Captures,
    ) -> Option<Match> {
        if !self.precondition(haystack, offset) {
            return None;
        }
        self.regex
            .search_captures(&Self::input(haystack, offset), caps);
        caps.get_match()
            .filter(|m| self.postcondition(haystack, *m))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("not_after", &self.not_after)
            .field("followed_by", &self.followed_by)
            .finish()
    }
}

/// A rule as written in a state description, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub(crate) pattern: Option<String>,
    pub(crate) action: Action,
    pub(crate) not_after: Option<String>,
    pub(crate) followed_by: Option<char>,
}

impl RuleDef {
    pub fn new(pattern: impl Into<String>, action: Action) -> Self {
        let pattern = if action.is_default() {
            None
        } else {
            Some(pattern.into())
        };
        Self {
            pattern,
            action,
            not_after: None,
            followed_by: None,
        }
    }

    pub fn default(transition: Transition) -> Self {
        Self {
            pattern: None,
            action: Action::Default(transition),
            not_after: None,
            followed_by: None,
        }
    }

    /// Only match when the preceding character is not one of `chars`.
    pub fn not_after(&mut self, chars: impl Into<String>) -> &mut Self {
        self.not_after = Some(chars.into());
        self
    }

    /// Only match when the next character after the match is `ch`.
    pub fn followed_by(&mut self, ch: char) -> &mut Self {
        self.followed_by = Some(ch);
        self
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// A compiled rule owned by a [`StateTable`](crate::StateTable).
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) pattern: Option<Pattern>,
    pub(crate) action: Action<Symbol>,
}

impl Rule {
    /// `None` for `Default` rules, which never look at the input.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn action(&self) -> &Action<Symbol> {
        &self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_op_parsing() {
        assert_eq!("#pop".parse(), Ok(StackOp::Pop(1)));
        assert_eq!("#pop:2".parse(), Ok(StackOp::Pop(2)));
        assert_eq!("#push".parse(), Ok(StackOp::PushCurrent));
        assert_eq!("import".parse(), Ok(StackOp::Push("import".to_string())));
        assert_eq!(
            "#replace:body".parse(),
            Ok(StackOp::Replace("body".to_string()))
        );
        assert!("#pop:0".parse::<StackOp>().is_err());
        assert!("#pop:x".parse::<StackOp>().is_err());
        assert!("#jump".parse::<StackOp>().is_err());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let pattern = Pattern::new("b+").unwrap();
        assert!(pattern.find_at("abb", 0).is_none());
        assert_eq!(pattern.find_at("abb", 1).map(|m| m.range()), Some(1..3));
    }

    #[test]
    fn test_pattern_sees_context() {
        let word = Pattern::new(r"\bif\b").unwrap();
        assert!(word.find_at("x if", 2).is_some());
        assert!(word.find_at("xif", 1).is_none());

        let start = Pattern::new(r"\A#!").unwrap();
        assert!(start.find_at("#!x", 0).is_some());
        assert!(start.find_at("\n#!x", 1).is_none());

        let line = Pattern::new("^#").unwrap();
        assert!(line.find_at("a\n#", 2).is_some());
        assert!(line.find_at("a #", 2).is_none());
    }

    #[test]
    fn test_guards() {
        let kw = Pattern::new(r"\bif\b").unwrap().with_not_after(".");
        assert!(kw.find_at("a.if", 2).is_none());
        assert!(kw.find_at("a if", 2).is_some());

        let cont = Pattern::new(r"\\").unwrap().with_followed_by('\n');
        assert_eq!(cont.find_at("\\\nx", 0).map(|m| m.end()), Some(1));
        assert!(cont.find_at("\\x", 0).is_none());
    }

    #[test]
    fn test_group_count() {
        assert_eq!(Pattern::new("(a)(?:b)(c)").unwrap().group_count(), 2);
        assert_eq!(Pattern::new("abc").unwrap().group_count(), 0);
    }
}
