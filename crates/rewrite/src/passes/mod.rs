//! Line-level rewrite passes.
//!
//! Each pass rewrites a single line (index `i`) of the buffer and is driven
//! once per line by [`Buffer::for_each_line`]. A pass may edit `lines[..=i]`
//! freely and later lines in place.

pub(crate) mod blocks;
pub(crate) mod cleanup;
pub(crate) mod conversions;
pub(crate) mod extraction;
pub(crate) mod includes;
pub(crate) mod literals;
pub(crate) mod renames;
pub(crate) mod types;
pub(crate) mod units;

use crate::buffer::{is_ident, Buffer, Pos};
use crate::context::{find_from, Context};
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::scan::find_match;

/// Which positions a type pass may rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain type spellings only (declarations such as function parameters)
    TypeOnly,

    /// Plain types and value constructions
    General,
}

/// Follows function implementation headers across lines.
///
/// A header starts at `::name(` and ends on the line holding the matching
/// `)`. Calls through a scope match too, which is harmless for type rewrites.
#[derive(Debug, Default)]
pub(crate) struct HeaderTracker {
    ends_at: Option<usize>,
}

impl HeaderTracker {
    /// Whether line `i` is part of a header; call once per line, in order
    pub fn covers(&mut self, buf: &Buffer, i: usize) -> Result<bool> {
        let line = buf.line(i);
        let mut from = 0;
        while let Some(scope) = find_from(line, "::", from) {
            let name = scope + 2;
            let mut pos = name;
            while is_ident(buf.byte(i, pos)) {
                pos += 1;
            }
            if pos != name && buf.byte(i, pos) == b'(' {
                self.ends_at = Some(find_match(buf, Pos::new(i, pos))?.line);
            }
            from = scope + 1;
        }

        match self.ends_at {
            None => Ok(false),
            Some(end) => {
                if i >= end {
                    self.ends_at = None;
                }
                Ok(true)
            }
        }
    }
}

/// Warn when the quantity type ending at `(i, end)` declares a variable that
/// is brace-initialized, since the initializer may be a bare scalar.
pub(crate) fn check_variable_initializer(ctx: &mut Context<'_>, buf: &Buffer, i: usize, end: usize) {
    let bytes = buf.bytes(i);
    if !bytes.get(end).is_some_and(u8::is_ascii_whitespace) {
        return;
    }
    let mut pos = end;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return,
    }
    while pos < bytes.len() && is_ident(bytes[pos]) {
        pos += 1;
    }
    // TODO: tell `T x(args)` declarations apart from function declarations
    // and warn on parenthesized initializers too.
    if bytes.get(pos) == Some(&b'{') {
        ctx.diagnostics.line(
            i,
            DiagnosticKind::Advisory,
            "Quantity variable could be initialized from a scalar",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;
    use crate::diagnostics::Diagnostics;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_spans_until_matching_paren() {
        let buf = Buffer::from_text(
            "void Drive::Set(\n    wpi::units::meter_t x,\n    double y) {\n  call();\n}\n",
        );
        let mut tracker = HeaderTracker::default();
        let covered: Vec<bool> = (0..buf.len()).map(|i| tracker.covers(&buf, i).unwrap()).collect();
        assert_eq!(covered, [true, true, true, false, false]);
    }

    #[test]
    fn initializer_warning() {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);

        let buf = Buffer::from_text("mp::quantity<mp::m> x{5};\n");
        check_variable_initializer(&mut ctx, &buf, 0, 19);
        let buf = Buffer::from_text("mp::quantity<mp::m> x;\n");
        check_variable_initializer(&mut ctx, &buf, 0, 19);
        let buf = Buffer::from_text("f(mp::quantity<mp::m>{5});\n");
        check_variable_initializer(&mut ctx, &buf, 0, 21);

        let rendered: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["line 1: Quantity variable could be initialized from a scalar"]);
    }
}
