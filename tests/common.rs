//! Integration tests for kore-common crate.

use kore_common::{BytePos, Interner, Span};

#[test]
fn test_span_merge() {
    let a = Span::from_usize(10, 20);
    let b = Span::from_usize(15, 30);
    let merged = a.merge(b);
    assert_eq!(merged.start.0, 10);
    assert_eq!(merged.end.0, 30);
}

#[test]
fn test_span_len() {
    let span = Span::from_usize(5, 15);
    assert_eq!(span.len(), 10);
}

#[test]
fn test_span_is_empty() {
    let empty = Span::from_usize(5, 5);
    let non_empty = Span::from_usize(5, 10);
    assert!(empty.is_empty());
    assert!(!non_empty.is_empty());
}

#[test]
fn test_span_range() {
    let span = Span::from_usize(5, 15);
    assert_eq!(span.range(), 5..15);
}

#[test]
fn test_span_is_followed_by() {
    let a = Span::from_usize(0, 3);
    assert!(a.is_followed_by(Span::from_usize(3, 4)));
    assert!(!a.is_followed_by(Span::from_usize(4, 5)));
}

#[test]
fn test_span_slice() {
    let source = "héllo";
    assert_eq!(Span::from_usize(0, 3).slice(source), Some("hé"));
    assert_eq!(Span::from_usize(0, 2).slice(source), None);
    assert_eq!(Span::from_usize(4, 99).slice(source), None);
}

#[test]
fn test_span_line_col() {
    let source = "ab\ncdé\nf";
    assert_eq!(Span::from_usize(0, 1).line_col(source), (0, 0));
    assert_eq!(Span::from_usize(4, 5).line_col(source), (1, 1));
    assert_eq!(Span::from_usize(8, 9).line_col(source), (2, 0));
}

#[test]
fn test_span_debug() {
    assert_eq!(format!("{:?}", Span::from_usize(2, 7)), "2..7");
}

#[test]
fn test_byte_pos_offset() {
    let pos = BytePos(10);
    assert_eq!(pos.offset(5), BytePos(15));
    assert_eq!(pos.to_usize(), 10);
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_offsets_past_four_gib_are_kept() {
    let far = u32::MAX as usize + 7;
    let span = Span::from_usize(far, far + 3);
    assert_eq!(span.start.to_usize(), far);
    assert_eq!(span.range(), far..far + 3);
    assert_eq!(span.len(), 3);
}

#[test]
fn test_intern() {
    let mut interner = Interner::new();
    let a = interner.intern("root");
    let b = interner.intern("string");
    let c = interner.intern("root");

    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(interner.get(a), "root");
    assert_eq!(interner.get(b), "string");
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_intern_lookup_does_not_insert() {
    let mut interner = Interner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.lookup("root"), None);
    assert!(interner.is_empty());

    let sym = interner.intern("root");
    assert_eq!(interner.lookup("root"), Some(sym));
}

#[test]
fn test_intern_iter_in_order() {
    let mut interner = Interner::new();
    for name in ["root", "comments", "strings"] {
        interner.intern(name);
    }
    let names: Vec<_> = interner.iter().map(|(_, name)| name).collect();
    assert_eq!(names, vec!["root", "comments", "strings"]);

    let (sym, _) = interner.iter().nth(1).unwrap();
    assert_eq!(sym.as_u32(), 1);
    assert_eq!(sym.index(), 1);
}
