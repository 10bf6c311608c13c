use crate::buffer::{is_ident, Buffer, Pos};
use crate::context::{find_from, Context};
use crate::conversion::scalar_to_unit;
use crate::error::Result;
use crate::scan::NumericLiteral;
use crate::symbols::TierTable;

/// Rewrite user-defined literals (`5_m`, `-10_ms`) of one tier on line `i`.
///
/// A suffix counts only right after a digit and when no identifier character
/// follows it, and only if the digits are not the tail of an identifier.
pub(crate) fn apply(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize, table: &TierTable) -> Result<()> {
    for entry in &table.entries {
        let suffix = format!("_{}", entry.old);
        let mut from = 1;
        while let Some(start) = find_from(buf.line(i), &suffix, from) {
            from = start + 1;
            let end = start + suffix.len();
            if !buf.byte_before(i, start).is_ascii_digit() || is_ident(buf.byte(i, end)) {
                continue;
            }
            let literal = NumericLiteral::from_last(buf.line(i), start - 1);
            if is_ident(buf.byte_before(i, literal.start)) {
                continue;
            }

            buf.delete(i, start, &suffix)?;
            let mut literal_start = literal.start;
            if buf.byte_before(i, literal_start) == b'-' {
                literal_start -= 1;
            }
            scalar_to_unit(ctx, buf, Pos::new(i, literal_start), Pos::new(i, start), &entry.new)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;
    use crate::diagnostics::Diagnostics;
    use pretty_assertions::assert_eq;

    fn rewrite(text: &str) -> String {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);
        let mut buf = Buffer::from_text(text);
        for table in &config.symbols.literals {
            apply(&mut ctx, &mut buf, 0, table).unwrap();
        }
        buf.to_text()
    }

    #[test]
    fn literal_kinds() {
        assert_eq!(rewrite("0_m\n"), "0.0 * mp::m\n");
        assert_eq!(rewrite("0.5_m\n"), "0.5 * mp::m\n");
        assert_eq!(rewrite("1e-9_m\n"), "1e-9 * mp::m\n");
        assert_eq!(rewrite("0_mps\n"), "0.0 * mp::m / mp::s\n");
    }

    #[test]
    fn negative_literal_keeps_its_sign() {
        assert_eq!(rewrite("x = -10_ms;\n"), "x = -10.0 * mp::ms;\n");
    }

    #[test]
    fn composition_is_collapsed() {
        assert_eq!(rewrite("1_V / 1_s\n"), "1.0 * mp::V / mp::s\n");
        assert_eq!(rewrite("1_V / 1_mps\n"), "1.0 * mp::V / (mp::m / mp::s)\n");
    }

    #[test]
    fn divisor_is_parenthesized() {
        assert_eq!(rewrite("1 / 2_rad\n"), "1 / (2.0 * mp::rad)\n");
    }

    #[test]
    fn suffix_inside_identifier_is_ignored() {
        assert_eq!(rewrite("auto y = x2_m;\n"), "auto y = x2_m;\n");
        assert_eq!(rewrite("foo_ms(3)\n"), "foo_ms(3)\n");
        assert_eq!(rewrite("1_mph\n"), "1_mph\n");
    }

    #[test]
    fn usc_tier() {
        assert_eq!(rewrite("auto x = 1_in;\n"), "auto x = 1.0 * mp::in;\n");
        assert_eq!(rewrite("5_fps_sq\n"), "5.0 * mp::ft / mp::s2\n");
    }
}
