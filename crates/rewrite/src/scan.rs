//! Position primitives over a [`Buffer`]: neighbouring non-space characters,
//! bracket matching and numeric literal boundaries.

use crate::buffer::{byte_at, is_space, Buffer, Pos};
use crate::error::{Result, RewriteError};

const OPENERS: &[u8; 4] = b"({[<";
const CLOSERS: &[u8; 4] = b")}]>";

/// The last non-space byte strictly before `at`, crossing line boundaries.
#[must_use]
pub fn prev_non_space(buf: &Buffer, at: Pos) -> Option<(u8, Pos)> {
    let mut line = at.line.min(buf.len());
    let mut col = if line == at.line { at.col } else { 0 };
    loop {
        let bytes = buf.bytes(line);
        let mut i = col.min(bytes.len());
        while i > 0 {
            i -= 1;
            if !is_space(bytes[i]) {
                return Some((bytes[i], Pos::new(line, i)));
            }
        }
        if line == 0 {
            return None;
        }
        line -= 1;
        col = buf.bytes(line).len();
    }
}

/// The first non-space byte at or after `at`, crossing line boundaries.
#[must_use]
pub fn first_non_space(buf: &Buffer, at: Pos) -> Option<(u8, Pos)> {
    let mut col = at.col;
    for line in at.line..buf.len() {
        let bytes = buf.bytes(line);
        while col < bytes.len() {
            if !is_space(bytes[col]) {
                return Some((bytes[col], Pos::new(line, col)));
            }
            col += 1;
        }
        col = 0;
    }
    None
}

/// Find the bracket structurally matching the one at `at`.
///
/// Openers scan forward and closers scan backward, across lines. Handles
/// `()`, `{}`, `[]` and `<>`. Angle brackets are only meaningful around
/// template argument lists: a comparison such as `a < b` has no partner and
/// is reported as [`RewriteError::Unmatched`].
pub fn find_match(buf: &Buffer, at: Pos) -> Result<Pos> {
    let found = buf.byte(at.line, at.col);
    if let Some(kind) = OPENERS.iter().position(|&b| b == found) {
        let other = CLOSERS[kind];
        let mut depth = 0usize;
        let mut col = at.col;
        for line in at.line..buf.len() {
            let bytes = buf.bytes(line);
            while col < bytes.len() {
                if bytes[col] == found {
                    depth += 1;
                } else if bytes[col] == other {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Pos::new(line, col));
                    }
                }
                col += 1;
            }
            col = 0;
        }
        return Err(RewriteError::unmatched(found, other, at));
    }

    if let Some(kind) = CLOSERS.iter().position(|&b| b == found) {
        let other = OPENERS[kind];
        let mut depth = 0usize;
        let mut line = at.line;
        let mut end = at.col + 1;
        loop {
            let bytes = buf.bytes(line);
            let mut col = end.min(bytes.len());
            while col > 0 {
                col -= 1;
                if bytes[col] == found {
                    depth += 1;
                } else if bytes[col] == other {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Pos::new(line, col));
                    }
                }
            }
            if line == 0 {
                return Err(RewriteError::unmatched(found, other, at));
            }
            line -= 1;
            end = buf.bytes(line).len();
        }
    }

    Err(RewriteError::not_a_bracket(found, at))
}

/// Span and kind of a numeric literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericLiteral {
    /// Offset of the first character
    pub start: usize,

    /// Offset one past the last character
    pub end: usize,

    /// No fraction or exponent part
    pub is_int: bool,
}

impl NumericLiteral {
    /// Recover the literal whose last digit sits at `last`.
    ///
    /// Walks left over digits, then over any fraction and exponent parts.
    /// A leading sign is not included.
    #[must_use]
    pub fn from_last(line: &str, last: usize) -> Self {
        let s = line.as_bytes();
        let at = |i: isize| byte_at(s, i);
        // `e`/`E` only belongs to the literal when a mantissa precedes it
        let exponent = |i: isize| {
            matches!(at(i), b'e' | b'E') && (at(i - 1).is_ascii_digit() || at(i - 1) == b'.')
        };
        let mut i = last as isize;
        while at(i).is_ascii_digit() {
            i -= 1;
        }
        let is_float = at(i) == b'.'
            || matches!(at(i), b'e' | b'E')
            || (matches!(at(i - 1), b'e' | b'E') && matches!(at(i), b'+' | b'-'));
        if is_float {
            loop {
                let c = at(i);
                let signed_exponent = matches!(c, b'+' | b'-') && exponent(i - 1);
                if c.is_ascii_digit() || c == b'.' || exponent(i) || signed_exponent {
                    i -= 1;
                } else {
                    break;
                }
            }
        }
        Self {
            start: (i + 1) as usize,
            end: last + 1,
            is_int: !is_float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::new(lines.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn prev_non_space_crosses_lines() {
        let b = buf(&["a /\n", "   \n", "  x\n"]);
        assert_eq!(prev_non_space(&b, Pos::new(2, 2)), Some((b'/', Pos::new(0, 2))));
        assert_eq!(prev_non_space(&b, Pos::new(0, 0)), None);
        assert_eq!(prev_non_space(&b, Pos::new(0, 1)), Some((b'a', Pos::new(0, 0))));
    }

    #[test]
    fn first_non_space_crosses_lines() {
        let b = buf(&["dt\n", "    .value();\n"]);
        assert_eq!(first_non_space(&b, Pos::new(0, 2)), Some((b'.', Pos::new(1, 4))));
        assert_eq!(first_non_space(&b, Pos::new(1, 13)), None);
    }

    #[test]
    fn matches_same_kind_on_one_line() {
        let b = buf(&["f(a(b), (c))\n"]);
        assert_eq!(find_match(&b, Pos::new(0, 1)).unwrap(), Pos::new(0, 11));
        assert_eq!(find_match(&b, Pos::new(0, 3)).unwrap(), Pos::new(0, 5));
        assert_eq!(find_match(&b, Pos::new(0, 11)).unwrap(), Pos::new(0, 1));
        assert_eq!(find_match(&b, Pos::new(0, 10)).unwrap(), Pos::new(0, 8));
    }

    #[test]
    fn matches_across_lines() {
        let b = buf(&["units::meter_t{\n", "  double{0},\n", "  {1}}\n"]);
        assert_eq!(find_match(&b, Pos::new(0, 14)).unwrap(), Pos::new(2, 5));
        assert_eq!(find_match(&b, Pos::new(2, 5)).unwrap(), Pos::new(0, 14));
    }

    #[test]
    fn matches_angle_brackets() {
        let b = buf(&["foo<bar<T>>(x)\n"]);
        assert_eq!(find_match(&b, Pos::new(0, 3)).unwrap(), Pos::new(0, 10));
        assert_eq!(find_match(&b, Pos::new(0, 9)).unwrap(), Pos::new(0, 7));
    }

    #[test]
    fn comparison_is_not_an_angle_bracket() {
        let b = buf(&["a < b ? f(x) : g(y)\n"]);
        let err = find_match(&b, Pos::new(0, 2)).unwrap_err();
        assert!(matches!(
            err,
            RewriteError::Unmatched { bracket: '<', expected: '>', line: 0, col: 2 }
        ));
        assert!(err.is_structural());
    }

    #[test]
    fn unmatched_brackets_are_structural_errors() {
        let b = buf(&["(x\n", "y\n"]);
        let err = find_match(&b, Pos::new(0, 0)).unwrap_err();
        assert!(matches!(err, RewriteError::Unmatched { line: 0, col: 0, .. }));

        let b = buf(&["x)\n"]);
        assert!(find_match(&b, Pos::new(0, 1)).is_err());
        assert!(matches!(
            find_match(&b, Pos::new(0, 0)).unwrap_err(),
            RewriteError::NotABracket { .. }
        ));
    }

    #[test]
    fn literal_kinds() {
        assert_eq!(
            NumericLiteral::from_last("x = 10\n", 5),
            NumericLiteral { start: 4, end: 6, is_int: true }
        );
        let lit = NumericLiteral::from_last("0.5", 2);
        assert_eq!((lit.start, lit.is_int), (0, false));
        let lit = NumericLiteral::from_last("1e-9", 3);
        assert_eq!((lit.start, lit.is_int), (0, false));
        let lit = NumericLiteral::from_last("(2E5)", 3);
        assert_eq!((lit.start, lit.is_int), (1, false));
        let lit = NumericLiteral::from_last("-10", 2);
        assert_eq!((lit.start, lit.is_int), (1, true));
        let lit = NumericLiteral::from_last("x = 1.5e3", 8);
        assert_eq!((lit.start, lit.is_int), (4, false));
    }

    #[test]
    fn sign_before_float_is_not_part_of_literal() {
        let lit = NumericLiteral::from_last("time-1.5", 7);
        assert_eq!((lit.start, lit.is_int), (5, false));
    }

    #[test]
    fn literal_inside_identifier_starts_after_letters() {
        let lit = NumericLiteral::from_last("count2", 5);
        assert_eq!((lit.start, lit.is_int), (5, true));
    }
}
