//! Common utilities and data structures for the kore lexer.
//!
//! This crate provides foundational types used across the workspace:
//! - `Span`: Byte ranges of lexemes in a source buffer
//! - `Interner`: String interning for lexer state names

mod interner;
mod span;

pub use interner::{Interner, Symbol};
pub use span::{BytePos, Span};
