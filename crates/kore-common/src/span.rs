//! Source code span and position tracking.
//! 源码范围和位置跟踪。

use std::fmt;

/// A byte position in a source buffer. Pointer-sized, so any buffer that
/// fits in memory can be addressed.
/// 源码中的字节位置。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BytePos(pub usize);

impl BytePos {
    pub const ZERO: BytePos = BytePos(0);

    pub fn offset(self, offset: usize) -> BytePos {
        BytePos(self.0 + offset)
    }

    pub fn to_usize(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytePos({})", self.0)
    }
}

impl From<usize> for BytePos {
    fn from(pos: usize) -> Self {
        BytePos(pos)
    }
}

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0
    }
}

/// A half-open byte range covering one lexeme.
/// 表示一个词素所覆盖的半开字节区间。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start position. / 起始位置。
    pub start: BytePos,
    /// End position (exclusive). / 结束位置（不包含）。
    pub end: BytePos,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: BytePos::ZERO,
        end: BytePos::ZERO,
    };

    pub fn new(start: BytePos, end: BytePos) -> Self {
        Span { start, end }
    }

    pub fn from_usize(start: usize, end: usize) -> Self {
        Span {
            start: BytePos::from(start),
            end: BytePos::from(end),
        }
    }

    /// Create a span that covers both `self` and `other`.
    /// 创建一个覆盖 `self` 和 `other` 的范围。
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: std::cmp::min(self.start, other.start),
            end: std::cmp::max(self.end, other.end),
        }
    }

    /// Returns true if `other` starts exactly where this span ends.
    pub fn is_followed_by(&self, other: Span) -> bool {
        self.end == other.start
    }

    /// Returns the length of this span in bytes.
    /// 返回此范围的字节长度。
    pub fn len(&self) -> usize {
        self.end.0 - self.start.0
    }

    /// Returns true if this span has zero length.
    /// 如果此范围长度为零则返回 true。
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the byte range for this span.
    /// 返回此范围对应的字节区间。
    pub fn range(&self) -> std::ops::Range<usize> {
        usize::from(self.start)..usize::from(self.end)
    }

    /// Borrow the text this span covers in `source`.
    ///
    /// Returns `None` if the span is out of bounds or splits a character.
    pub fn slice<'src>(&self, source: &'src str) -> Option<&'src str> {
        source.get(self.range())
    }

    /// Zero-based (line, column) of the span start, counting columns in chars.
    /// 以字符计数的起始行列号（从零开始）。
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut start = usize::from(self.start).min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        let before = &source[..start];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, before[line_start..].chars().count())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}
