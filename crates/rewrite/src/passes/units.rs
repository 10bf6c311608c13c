use crate::buffer::{is_ident, Buffer};
use crate::context::Context;
use crate::error::Result;
use crate::symbols::BareUnit;

/// Replace unit objects spelled by name (`<ns>meters`) on line `i`
pub(crate) fn apply(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize, units: &[BareUnit]) -> Result<()> {
    for unit in units {
        for name in [&unit.singular, &unit.plural] {
            let mut from = 0;
            while let Some(found) = ctx.find_old(buf.line(i), from, name) {
                from = found.start + 1;
                if is_ident(buf.byte(i, found.end)) {
                    continue;
                }
                let old = buf.line(i)[found.start..found.end].to_string();
                buf.replace(i, found.start, &old, &unit.unit)?;
            }
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
        apply(&mut ctx, &mut buf, 0, &config.symbols.units).unwrap();
        buf.to_text()
    }

    #[test]
    fn singular_and_plural() {
        assert_eq!(rewrite("wpi::units::meters\n"), "mp::m\n");
        assert_eq!(rewrite("wpi::units::meter\n"), "mp::m\n");
        assert_eq!(rewrite("x.in(units::radians_per_second)\n"), "x.in(mp::rad / mp::s)\n");
    }

    #[test]
    fn type_names_are_not_units() {
        assert_eq!(rewrite("units::meter_t x;\n"), "units::meter_t x;\n");
        assert_eq!(rewrite("units::meters_per_second\n"), "units::meters_per_second\n");
    }
}
