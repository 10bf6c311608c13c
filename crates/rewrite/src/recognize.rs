//! Recognizers that decide whether a position already holds a unit-typed
//! value, and whether a span needs parentheses before it is multiplied.

use crate::buffer::{is_ident, is_space, Buffer, Pos};
use crate::context::Context;
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::scan::{find_match, prev_non_space};

/// Whether the value ending at `at` is a quantity of either library.
///
/// Trailing `)`/`}` groups are peeled one at a time: a group constructed or
/// called by a library name is a unit, any other construction or call is
/// not, and a bare parenthesized group sends the check one level inward.
/// Otherwise the whitespace-delimited word ending at `at` decides.
pub(crate) fn is_end_of_unit(ctx: &mut Context<'_>, buf: &Buffer, at: Pos) -> Result<bool> {
    let line = at.line;
    let mut col = at.col;
    while let closer @ (b')' | b'}') = buf.byte(line, col) {
        let mut open = find_match(buf, Pos::new(line, col))?;
        if open.col > 0 && buf.byte(open.line, open.col - 1) == b'>' {
            open = find_match(buf, Pos::new(open.line, open.col - 1))?;
        }
        let has_ident = is_ident(buf.byte_before(open.line, open.col));

        let text = buf.line(open.line);
        let bytes = text.as_bytes();
        let mut word = open.col;
        while word > 0 && !is_space(bytes[word - 1]) {
            word -= 1;
        }
        if ctx.is_library_ref(&text[word..]) {
            return Ok(true);
        }
        if closer == b'}' || has_ident {
            return Ok(false);
        }
        if col == 0 {
            return Ok(false);
        }
        col -= 1;
    }

    let text = buf.line(line);
    let bytes = text.as_bytes();
    if col >= bytes.len() {
        return Ok(false);
    }
    let stops = |b: u8| is_space(b) || b == b'(' || b == b'{';
    let mut start = col;
    while start > 0 && !stops(bytes[start]) {
        start -= 1;
    }
    while start <= col && stops(bytes[start]) {
        start += 1;
    }
    let atom = text.get(start..=col).unwrap_or("");
    let Some(first) = atom.bytes().next() else {
        return Ok(false);
    };

    if atom.starts_with(&ctx.config.new_namespace) {
        return Ok(true);
    }

    if first.is_ascii_digit() || first == b'+' || first == b'-' {
        let suffixed = ctx
            .config
            .symbols
            .all_literals()
            .any(|entry| atom.len() > entry.old.len() && atom.ends_with(&format!("_{}", entry.old)));
        if suffixed {
            return Ok(true);
        }
    }

    if ctx.config.assume_capitalized_units
        && first.is_ascii_uppercase()
        && atom.bytes().all(|b| b.is_ascii_alphabetic())
    {
        ctx.diagnostics.line(
            line,
            DiagnosticKind::Heuristic,
            format!("Assuming that {atom} is a unit template argument"),
        );
        return Ok(true);
    }

    Ok(false)
}

/// Whether the span starting at `start` is the right operand of `*` or `/`
/// whose left operand is a quantity (`1_V / 1_s`, `1_V / (1_rad / 1_s)`).
pub(crate) fn in_unit_composition(ctx: &mut Context<'_>, buf: &Buffer, start: Pos) -> Result<bool> {
    let mut prev = prev_non_space(buf, start);
    while let Some((b'(', at)) = prev {
        prev = prev_non_space(buf, at);
    }
    let Some((b'*' | b'/', operator)) = prev else {
        return Ok(false);
    };
    match prev_non_space(buf, operator) {
        Some((_, lhs)) => is_end_of_unit(ctx, buf, lhs),
        None => Ok(false),
    }
}

/// Whether `[start, end)` has a ` + ` or ` - ` outside every bracket group
pub(crate) fn has_top_level_addsub(buf: &Buffer, start: Pos, end: Pos) -> Result<bool> {
    let mut line = end.line;
    let mut pos = end.col as isize - 1;
    loop {
        if line < start.line {
            return Ok(false);
        }
        let min = if line == start.line { start.col as isize } else { 0 };
        if pos < min {
            if line == start.line {
                return Ok(false);
            }
            line -= 1;
            pos = buf.bytes(line).len() as isize - 1;
            continue;
        }

        let p = pos as usize;
        let c = buf.byte(line, p);
        if matches!(c, b')' | b'}' | b']') || (c == b'>' && buf.byte(line, p + 1) == b'(') {
            let open = find_match(buf, Pos::new(line, p))?;
            line = open.line;
            pos = open.col as isize - 1;
            continue;
        }
        if matches!(c, b'+' | b'-') && buf.byte_before(line, p) == b' ' && buf.byte(line, p + 1) == b' ' {
            return Ok(true);
        }
        pos -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;
    use crate::diagnostics::Diagnostics;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::new(lines.iter().map(|s| (*s).to_string()).collect())
    }

    fn unit_end(config: &RewriteConfig, lines: &[&str], at: Pos) -> (bool, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(config, &mut diagnostics);
        let found = is_end_of_unit(&mut ctx, &buf(lines), at).unwrap();
        (found, diagnostics.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn literal_with_known_suffix_is_a_unit() {
        let config = RewriteConfig::default();
        assert_eq!(unit_end(&config, &["x = 4.0_V / y\n"], Pos::new(0, 8)).0, true);
        assert_eq!(unit_end(&config, &["x = -10_ms\n"], Pos::new(0, 9)).0, true);
        assert_eq!(unit_end(&config, &["x = 10\n"], Pos::new(0, 5)).0, false);
    }

    #[test]
    fn new_namespace_word_is_a_unit() {
        let config = RewriteConfig::default();
        assert_eq!(unit_end(&config, &["(mp::V / y\n"], Pos::new(0, 5)).0, true);
    }

    #[test]
    fn old_construction_is_a_unit() {
        let config = RewriteConfig::default();
        let line = "wpi::units::volt_t{1} / x\n";
        assert_eq!(unit_end(&config, &[line], Pos::new(0, 20)).0, true);
    }

    #[test]
    fn other_calls_and_constructions_are_not() {
        let config = RewriteConfig::default();
        assert_eq!(unit_end(&config, &["double{0} / x\n"], Pos::new(0, 8)).0, false);
        assert_eq!(unit_end(&config, &["f(x) / y\n"], Pos::new(0, 3)).0, false);
        assert_eq!(unit_end(&config, &["mp::value(x) / y\n"], Pos::new(0, 11)).0, false);
    }

    #[test]
    fn parenthesized_group_is_peeled() {
        let config = RewriteConfig::default();
        assert_eq!(unit_end(&config, &["(2_m) / x\n"], Pos::new(0, 4)).0, true);
    }

    #[test]
    fn capitalized_identifier_is_assumed_and_reported() {
        let config = RewriteConfig::default();
        let (found, diagnostics) = unit_end(&config, &["x = (Distance / y\n"], Pos::new(0, 12));
        assert!(found);
        assert_eq!(diagnostics, ["line 1: Assuming that Distance is a unit template argument"]);

        let (found, diagnostics) =
            unit_end(&RewriteConfig::strict(), &["x = (Distance / y\n"], Pos::new(0, 12));
        assert!(!found);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn composition_requires_unit_left_operand() {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);

        let b = buf(&["1_V / (1.0\n"]);
        assert!(in_unit_composition(&mut ctx, &b, Pos::new(0, 7)).unwrap());

        let b = buf(&["x / 1.0\n"]);
        assert!(!in_unit_composition(&mut ctx, &b, Pos::new(0, 4)).unwrap());

        let b = buf(&["1.0\n"]);
        assert!(!in_unit_composition(&mut ctx, &b, Pos::new(0, 0)).unwrap());
    }

    #[test]
    fn addsub_outside_groups_only() {
        let b = buf(&["x - y\n"]);
        assert!(has_top_level_addsub(&b, Pos::new(0, 0), Pos::new(0, 5)).unwrap());

        let b = buf(&["(x + y) / 2\n"]);
        assert!(!has_top_level_addsub(&b, Pos::new(0, 0), Pos::new(0, 11)).unwrap());

        let b = buf(&["f<int>(a + b)\n"]);
        assert!(!has_top_level_addsub(&b, Pos::new(0, 0), Pos::new(0, 13)).unwrap());

        let b = buf(&["1e-9\n"]);
        assert!(!has_top_level_addsub(&b, Pos::new(0, 0), Pos::new(0, 4)).unwrap());
    }

    #[test]
    fn addsub_across_lines() {
        let b = buf(&["x - (a,\n", "  b)\n"]);
        assert!(has_top_level_addsub(&b, Pos::new(0, 0), Pos::new(1, 4)).unwrap());

        let b = buf(&["(a +\n", "  b)\n"]);
        assert!(!has_top_level_addsub(&b, Pos::new(0, 0), Pos::new(1, 4)).unwrap());
    }
}
