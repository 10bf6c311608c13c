use crate::buffer::{is_ident, Buffer};
use crate::context::find_from;
use crate::error::Result;
use crate::symbols::SymbolEntry;

/// Cosmetic text replacements on line `i` (`/ mp::s / mp::s` -> `/ mp::s2`).
///
/// A match directly followed by an identifier character is left alone, so
/// `/ mp::s / mp::s2` does not turn into `/ mp::s22`.
pub(crate) fn apply(buf: &mut Buffer, i: usize, simplifications: &[SymbolEntry]) -> Result<()> {
    for simplification in simplifications {
        let old = simplification.old.as_str();
        let mut from = 0;
        while let Some(start) = find_from(buf.line(i), old, from) {
            if is_ident(buf.byte(i, start + old.len())) {
                from = start + 1;
                continue;
            }
            buf.replace(i, start, old, &simplification.new)?;
            from = start + simplification.new.len();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::UnitSymbolTable;
    use pretty_assertions::assert_eq;

    fn simplify(text: &str) -> String {
        let table = UnitSymbolTable::builtin();
        let mut buf = Buffer::from_text(text);
        apply(&mut buf, 0, &table.simplifications).unwrap();
        buf.to_text()
    }

    #[test]
    fn double_division_by_seconds() {
        assert_eq!(simplify("x * mp::m / mp::s / mp::s\n"), "x * mp::m / mp::s2\n");
    }

    #[test]
    fn longer_unit_is_not_merged() {
        assert_eq!(simplify("mp::m / mp::s / mp::s2\n"), "mp::m / mp::s / mp::s2\n");
    }
}
