//! The scanner loop.
//! 扫描主循环。
//!
//! Scanning is a pure function of the table and the buffer. Every call to
//! [`StateTable::tokenize`] starts over at offset zero with a fresh stack.

use crate::error::ConfigError;
use crate::rule::{Action, Emission, Rule, Transition};
use crate::stack::StateStack;
use crate::table::StateTable;
use crate::token::{Token, TokenKind};
use kore_common::{Span, Symbol};
use kore_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use regex_automata::util::captures::Captures;
use std::collections::VecDeque;
use tracing::trace;

/// Upper bound on consecutive state changes without consuming input.
///
/// Past this bound the scanner stops trying rules at the current offset and
/// falls back to a one-character token, so the number of iterations stays
/// linear in the input length.
pub const MAX_ZERO_WIDTH_STEPS: usize = 32;

impl StateTable {
    /// Scan `source` starting in the root state.
    pub fn tokenize<'t, 'src>(&'t self, source: &'src str) -> Tokens<'t, 'src> {
        Tokens::new(self, source, StateStack::new(self.root()))
    }

    /// Scan `source` with `state` pushed on top of the root state.
    pub fn tokenize_from<'t, 'src>(
        &'t self,
        source: &'src str,
        state: &str,
    ) -> Result<Tokens<'t, 'src>, ConfigError> {
        let start = self
            .state(state)
            .ok_or_else(|| ConfigError::UnknownStartState(state.to_owned()))?;
        let mut stack = StateStack::new(self.root());
        if start != self.root() {
            stack.push(start);
        }
        Ok(Tokens::new(self, source, stack))
    }

    /// Scan all of `source` into a vector.
    pub fn tokenize_all<'src>(&self, source: &'src str) -> Vec<Token<'src>> {
        self.tokenize(source).collect()
    }
}

/// A lazy token stream over one buffer.
///
/// Owns its cursor, state stack and match scratch space; the table is only
/// read. Dropping the iterator early needs no cleanup.
pub struct Tokens<'t, 'src> {
    table: &'t StateTable,
    source: &'src str,
    pos: usize,
    stack: StateStack,
    pending: VecDeque<Token<'src>>,
    zero_width_steps: usize,
    captures: Vec<Option<Captures>>,
}

impl<'t, 'src> Tokens<'t, 'src> {
    fn new(table: &'t StateTable, source: &'src str, stack: StateStack) -> Self {
        Self {
            table,
            source,
            pos: 0,
            stack,
            pending: VecDeque::new(),
            zero_width_steps: 0,
            captures: vec![None; table.rule_count()],
        }
    }

    /// Byte offset of the next unscanned character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The state stack as it stands after the tokens produced so far.
    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    /// Name of the active state.
    pub fn state_name(&self) -> &'t str {
        self.table.state_name(self.stack.top())
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        let span = Span::from_usize(start, end);
        self.pending
            .push_back(Token::new(kind, &self.source[start..end], span));
    }

    /// Run one scanner iteration: either consume input or change state.
    fn step(&mut self) {
        let table = self.table;
        let state = self.stack.top();

        for &id in table.rule_ids(state) {
            let rule = table.rule(id);
            match self.try_rule(rule, id.index()) {
                Attempt::NoMatch => continue,
                Attempt::Done => return,
                Attempt::Stuck => break,
            }
        }

        self.fallback(state);
    }

    fn try_rule(&mut self, rule: &'t Rule, id: usize) -> Attempt {
        let (emission, transition) = match &rule.action {
            Action::Default(transition) => {
                return if self.zero_width(transition) {
                    Attempt::Done
                } else {
                    Attempt::Stuck
                };
            }
            Action::Emit(kind) => (EmitRef::Whole(*kind), None),
            Action::EmitGroups(kinds) => (EmitRef::Groups(kinds), None),
            Action::Transition(Emission::Whole(kind), t) => (EmitRef::Whole(*kind), Some(t)),
            Action::Transition(Emission::Groups(kinds), t) => (EmitRef::Groups(kinds), Some(t)),
        };
        let Some(pattern) = &rule.pattern else {
            return Attempt::NoMatch;
        };

        let start = self.pos;
        let end = match emission {
            EmitRef::Whole(_) => pattern.find_at(self.source, start).map(|m| m.end()),
            EmitRef::Groups(_) => {
                let caps = self.captures[id].get_or_insert_with(|| pattern.create_captures());
                pattern.captures_at(self.source, start, caps).map(|m| m.end())
            }
        };
        let Some(end) = end else {
            return Attempt::NoMatch;
        };

        if end == start {
            return match transition {
                Some(t) if self.zero_width(t) => Attempt::Done,
                _ => Attempt::NoMatch,
            };
        }

        match emission {
            EmitRef::Whole(kind) => self.push_token(kind, start, end),
            EmitRef::Groups(kinds) => self.push_groups(id, kinds, start, end),
        }
        if let Some(t) = transition {
            self.transition(t);
        }
        self.pos = end;
        self.zero_width_steps = 0;
        Attempt::Done
    }

    /// Emit one token per participating group, and `Text` for any part of
    /// the match that no group covers.
    fn push_groups(&mut self, id: usize, kinds: &[TokenKind], start: usize, end: usize) {
        let spans: Vec<(TokenKind, usize, usize)> = match &self.captures[id] {
            Some(caps) => kinds
                .iter()
                .enumerate()
                .filter_map(|(i, &kind)| caps.get_group(i + 1).map(|s| (kind, s.start, s.end)))
                .collect(),
            None => Vec::new(),
        };

        let mut cursor = start;
        for (kind, group_start, group_end) in spans {
            if group_start == group_end || group_start < cursor {
                continue;
            }
            if group_start > cursor {
                self.push_token(TokenKind::Text, cursor, group_start);
            }
            self.push_token(kind, group_start, group_end);
            cursor = group_end;
        }
        if cursor < end {
            self.push_token(TokenKind::Text, cursor, end);
        }
    }

    fn transition(&mut self, transition: &Transition<Symbol>) -> bool {
        let changed = self.stack.apply(transition);
        if changed {
            trace!(
                offset = self.pos,
                state = self.table.state_name(self.stack.top()),
                depth = self.stack.depth(),
                "state change"
            );
        }
        changed
    }

    /// Apply a transition without consuming input, within the step budget.
    fn zero_width(&mut self, transition: &Transition<Symbol>) -> bool {
        if self.zero_width_steps >= MAX_ZERO_WIDTH_STEPS {
            return false;
        }
        if self.transition(transition) {
            self.zero_width_steps += 1;
            true
        } else {
            false
        }
    }

    /// Consume one character nothing matched. An unmatched newline resets
    /// the stack to the floor state and is plain whitespace.
    fn fallback(&mut self, state: Symbol) {
        let start = self.pos;
        let Some(ch) = self.source[start..].chars().next() else {
            return;
        };
        let end = start + ch.len_utf8();

        let kind = if ch == '\n' {
            self.stack.reset();
            TokenKind::Whitespace
        } else {
            trace!(offset = start, state = self.table.state_name(state), ?ch, "no rule matched");
            TokenKind::Error
        };

        self.push_token(kind, start, end);
        self.pos = end;
        self.zero_width_steps = 0;
    }
}

enum Attempt {
    NoMatch,
    Done,
    /// A `Default` rule could not change state; later rules are unreachable.
    Stuck,
}

#[derive(Clone, Copy)]
enum EmitRef<'a> {
    Whole(TokenKind),
    Groups(&'a [TokenKind]),
}

impl<'src> Iterator for Tokens<'_, 'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.pos >= self.source.len() {
                return None;
            }
            self.step();
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_, '_> {}

/// Turn `Error` tokens into diagnostics, one per run of adjacent errors.
pub fn error_diagnostics(tokens: &[Token<'_>]) -> Vec<Diagnostic> {
    let mut runs: Vec<(Span, String)> = Vec::new();
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Error) {
        match runs.last_mut() {
            Some((span, text)) if span.is_followed_by(token.span) => {
                *span = span.merge(token.span);
                text.push_str(token.text);
            }
            _ => runs.push((token.span, token.text.to_owned())),
        }
    }

    runs.into_iter()
        .map(|(span, text)| {
            let message = if text.chars().count() == 1 {
                format!("unexpected character: {text:?}")
            } else {
                format!("unexpected characters: {text:?}")
            };
            Diagnostic::error(DiagnosticKind::Lexer, span, message)
                .with_code(ErrorCode::UnexpectedCharacter)
                .with_label(Label::new(span, "no rule matches here"))
        })
        .collect()
}
