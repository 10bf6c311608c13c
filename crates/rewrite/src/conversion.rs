//! The two edits every unit rewrite ends in: multiplying a scalar by its unit,
//! and unwrapping a type construction into either that product or an
//! `.in(unit)` conversion.

use crate::buffer::{is_ident, Buffer, Pos};
use crate::context::Context;
use crate::error::{Result, RewriteError};
use crate::recognize::{has_top_level_addsub, in_unit_composition, is_end_of_unit};
use crate::scan::{find_match, first_non_space, prev_non_space, NumericLiteral};

const REDUNDANT_FACTOR: &str = "1.0 * ";

/// Turn the scalar in `[start, end)` into `scalar * unit`.
///
/// Parenthesizes the scalar when it has a top-level `+`/`-`, makes integer
/// literals floating point, drops the `1.0 *` of a unit composition such as
/// `1_V / 1_s`, and parenthesizes the product when it is followed by a member
/// access or divides something.
pub(crate) fn scalar_to_unit(
    ctx: &mut Context<'_>,
    buf: &mut Buffer,
    start: Pos,
    end: Pos,
    unit: &str,
) -> Result<()> {
    let (start_line, start_col) = (start.line, start.col);
    let end_line = end.line;
    let mut end_col = end.col;

    if has_top_level_addsub(buf, start, end)? {
        buf.insert(start_line, start_col, "(")?;
        if start_line == end_line {
            end_col += 1;
        }
        buf.insert(end_line, end_col, ")")?;
        end_col += 1;
    }

    if end_col > 0 && buf.byte(end_line, end_col - 1).is_ascii_digit() {
        let literal = NumericLiteral::from_last(buf.line(end_line), end_col - 1);
        if literal.is_int && !is_ident(buf.byte_before(end_line, literal.start)) {
            buf.insert(end_line, end_col, ".0")?;
            end_col += 2;
        }
    }

    let product = format!(" * {unit}");
    buf.insert(end_line, end_col, &product)?;
    let mut unit_end = end_col + product.len();

    let is_one = start_line == end_line && buf.line(start_line).get(start_col..end_col) == Some("1.0");
    if is_one && in_unit_composition(ctx, buf, start)? {
        buf.delete(end_line, start_col, REDUNDANT_FACTOR)?;
        unit_end -= REDUNDANT_FACTOR.len();
    }

    let divides = matches!(prev_non_space(buf, start), Some((b'/', _)));
    let accessed = buf.byte(end_line, unit_end) == b'.';
    let several_tokens = start_line != end_line
        || buf
            .line(start_line)
            .get(start_col..unit_end)
            .is_some_and(|span| span.contains(' '));
    if (accessed || divides) && several_tokens {
        buf.insert(start_line, start_col, "(")?;
        if start_line == end_line {
            unit_end += 1;
        }
        buf.insert(end_line, unit_end, ")")?;
    }
    Ok(())
}

/// Rewrite `type_text{value}` / `type_text(value)` found at `(line, start)`.
///
/// When the value is already a quantity (or only its scalar is used), the
/// construction becomes `value.in(unit)`; otherwise `value * unit`.
pub(crate) fn rewrite_construction(
    ctx: &mut Context<'_>,
    buf: &mut Buffer,
    line: usize,
    start: usize,
    type_text: &str,
    unit: &str,
) -> Result<()> {
    let found = buf.line(line).get(start..).unwrap_or("");
    if !found.starts_with(type_text) {
        return Err(RewriteError::stale(Pos::new(line, start), type_text, found));
    }
    let (open, close) = if buf.byte(line, start + type_text.len()) == b'{' {
        ("{", "}")
    } else {
        ("(", ")")
    };

    buf.delete(line, start, type_text)?;
    let closing = find_match(buf, Pos::new(line, start))?;
    buf.delete(line, start, open)?;
    let r_line = closing.line;
    let mut r_col = closing.col;
    if r_line == line {
        r_col -= 1;
    }
    buf.delete(r_line, r_col, close)?;

    let config = ctx.config;
    let extracted = match first_non_space(buf, Pos::new(r_line, r_col)) {
        Some((b'.', at)) => buf
            .line(at.line)
            .get(at.col..)
            .is_some_and(|rest| rest.starts_with(config.value_call.as_str())),
        _ => false,
    };
    let converts = extracted || (r_col > 0 && is_end_of_unit(ctx, buf, Pos::new(r_line, r_col - 1))?);

    if !converts {
        return scalar_to_unit(ctx, buf, Pos::new(line, start), Pos::new(r_line, r_col), unit);
    }

    let several_tokens = r_line != line
        || buf
            .line(line)
            .get(start..r_col)
            .is_some_and(|span| span.contains(' '));
    if several_tokens {
        buf.insert(line, start, "(")?;
        if r_line == line {
            r_col += 1;
        }
        buf.insert(r_line, r_col, ")")?;
        r_col += 1;
    }
    buf.insert(r_line, r_col, &format!(".in({unit})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;
    use crate::diagnostics::Diagnostics;
    use pretty_assertions::assert_eq;

    fn convert(line: &str, start: usize, end: usize, unit: &str) -> String {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);
        let mut buf = Buffer::from_text(line);
        scalar_to_unit(&mut ctx, &mut buf, Pos::new(0, start), Pos::new(0, end), unit).unwrap();
        buf.to_text()
    }

    fn construct(lines: &str, type_text: &str, unit: &str) -> String {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);
        let mut buf = Buffer::from_text(lines);
        let start = buf.line(0).find(type_text).unwrap();
        rewrite_construction(&mut ctx, &mut buf, 0, start, type_text, unit).unwrap();
        buf.to_text()
    }

    #[test]
    fn integer_literal_becomes_float() {
        assert_eq!(convert("0\n", 0, 1, "mp::m"), "0.0 * mp::m\n");
        assert_eq!(convert("0.5\n", 0, 3, "mp::m"), "0.5 * mp::m\n");
        assert_eq!(convert("x2\n", 0, 2, "mp::m"), "x2 * mp::m\n");
    }

    #[test]
    fn addsub_is_parenthesized() {
        assert_eq!(convert("x - y\n", 0, 5, "mp::m"), "(x - y) * mp::m\n");
    }

    #[test]
    fn divisor_is_parenthesized() {
        assert_eq!(convert("1 / 2\n", 4, 5, "mp::rad"), "1 / (2.0 * mp::rad)\n");
        assert_eq!(convert("1 / x\n", 4, 5, "mp::s"), "1 / (x * mp::s)\n");
    }

    #[test]
    fn composition_drops_redundant_factor() {
        assert_eq!(convert("1_V / 1\n", 6, 7, "mp::s"), "1_V / mp::s\n");
        assert_eq!(
            convert("1_V / 1\n", 6, 7, "mp::m / mp::s"),
            "1_V / (mp::m / mp::s)\n"
        );
    }

    #[test]
    fn member_access_is_parenthesized() {
        assert_eq!(convert("90.in(mp::rad)\n", 0, 2, "mp::deg"), "(90.0 * mp::deg).in(mp::rad)\n");
    }

    #[test]
    fn construction_of_scalar() {
        assert_eq!(construct("wpi::units::meter_t{0}\n", "wpi::units::meter_t", "mp::m"), "0.0 * mp::m\n");
        assert_eq!(
            construct("f(units::second_t(x + y));\n", "units::second_t", "mp::s"),
            "f((x + y) * mp::s);\n"
        );
    }

    #[test]
    fn construction_of_quantity_converts() {
        assert_eq!(
            construct("wpi::units::radian_t{90_deg}\n", "wpi::units::radian_t", "mp::rad"),
            "90_deg.in(mp::rad)\n"
        );
        assert_eq!(
            construct("wpi::units::second_t{a + b}.value()\n", "wpi::units::second_t", "mp::s"),
            "(a + b).in(mp::s).value()\n"
        );
    }

    #[test]
    fn construction_spanning_lines() {
        assert_eq!(
            construct("wpi::units::meter_t{\n  x}\n", "wpi::units::meter_t", "mp::m"),
            "\n  x * mp::m\n"
        );
    }

    #[test]
    fn construction_requires_its_type_text() {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);
        let mut buf = Buffer::from_text("meter_t{0}\n");
        let err = rewrite_construction(&mut ctx, &mut buf, 0, 0, "units::meter_t", "mp::m").unwrap_err();
        assert!(matches!(err, RewriteError::StaleCoordinate { .. }));
    }
}
