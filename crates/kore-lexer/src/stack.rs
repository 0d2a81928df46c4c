//! The per-scan lexer state stack.
//! 每次扫描独占的词法状态栈。

use crate::rule::{StackOp, Transition};
use kore_common::Symbol;

/// A stack of active lexer states. The bottom entry is the floor and is
/// never popped; the top entry selects the rules that are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStack {
    stack: Vec<Symbol>,
}

impl StateStack {
    pub fn new(root: Symbol) -> Self {
        Self { stack: vec![root] }
    }

    /// The active state.
    pub fn top(&self) -> Symbol {
        // The floor is never removed, so the stack is never empty.
        self.stack[self.stack.len() - 1]
    }

    pub fn floor(&self) -> Symbol {
        self.stack[0]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.stack
    }

    pub fn push(&mut self, state: Symbol) {
        self.stack.push(state);
    }

    /// Pop up to `n` states, stopping at the floor.
    pub fn pop(&mut self, n: usize) {
        let keep = self.stack.len().saturating_sub(n).max(1);
        self.stack.truncate(keep);
    }

    /// Replace the active state. Replacing the floor changes the floor.
    pub fn replace(&mut self, state: Symbol) {
        let top = self.stack.len() - 1;
        self.stack[top] = state;
    }

    /// Drop everything above the floor.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
    }

    /// Apply every operation of `transition` in order.
    ///
    /// Returns true if the stack differs afterwards, including entries below
    /// an unchanged top.
    pub fn apply(&mut self, transition: &Transition<Symbol>) -> bool {
        let before = self.stack.clone();
        for op in transition.ops() {
            match *op {
                StackOp::Push(state) => self.push(state),
                StackOp::PushCurrent => self.push(self.top()),
                StackOp::Pop(n) => self.pop(n),
                StackOp::Replace(state) => self.replace(state),
            }
        }
        self.stack != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kore_common::Interner;

    fn symbols() -> (Symbol, Symbol, Symbol) {
        let mut names = Interner::new();
        (names.intern("root"), names.intern("a"), names.intern("b"))
    }

    #[test]
    fn test_pop_clamps_at_floor() {
        let (root, a, _) = symbols();
        let mut stack = StateStack::new(root);
        stack.push(a);
        stack.pop(5);
        assert_eq!(stack.as_slice(), &[root]);
        stack.pop(1);
        assert_eq!(stack.top(), root);
    }

    #[test]
    fn test_apply_reports_change() {
        let (root, a, b) = symbols();
        let mut stack = StateStack::new(root);

        assert!(stack.apply(&Transition::from(StackOp::Push(a))));
        assert!(stack.apply(&Transition::from(StackOp::Replace(b))));
        assert_eq!(stack.as_slice(), &[root, b]);
        assert!(stack.apply(&Transition::from(StackOp::PushCurrent)));
        assert_eq!(stack.as_slice(), &[root, b, b]);

        stack.reset();
        assert!(!stack.apply(&Transition::from(StackOp::Pop(1))));
    }

    #[test]
    fn test_rewrite_below_top_is_a_change() {
        let (root, a, b) = symbols();
        let mut stack = StateStack::new(root);
        stack.push(a);
        stack.push(b);

        let t: Transition<Symbol> = [StackOp::Pop(2), StackOp::Push(b), StackOp::Push(b)]
            .into_iter()
            .collect();
        assert!(stack.apply(&t));
        assert_eq!(stack.as_slice(), &[root, b, b]);
        assert!(!stack.apply(&t));
    }

    #[test]
    fn test_combined_ops() {
        let (root, a, b) = symbols();
        let mut stack = StateStack::new(root);
        stack.push(a);
        let t: Transition<Symbol> = [StackOp::Pop(1), StackOp::Push(b)].into_iter().collect();
        assert!(stack.apply(&t));
        assert_eq!(stack.as_slice(), &[root, b]);
    }
}
