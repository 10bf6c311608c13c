use super::{check_variable_initializer, Mode};
use crate::buffer::{is_ident, Buffer, Pos};
use crate::context::Context;
use crate::conversion::rewrite_construction;
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::scan::find_match;
use crate::symbols::TierTable;

const GENERIC: &str = "unit_t";
const TYPENAME: &str = "typename ";

/// Rewrite `<ns>{name}_t` types of one tier on line `i`.
///
/// `generic` also handles `<ns>unit_t<U>`, whose unit is the template
/// argument itself.
pub(crate) fn apply(
    ctx: &mut Context<'_>,
    buf: &mut Buffer,
    i: usize,
    table: &TierTable,
    generic: bool,
    mode: Mode,
) -> Result<()> {
    if generic {
        rewrite_generic(ctx, buf, i, mode)?;
    }
    for entry in &table.entries {
        let name = format!("{}_t", entry.old);
        let mut from = 0;
        while let Some(found) = ctx.find_old(buf.line(i), from, &name) {
            from = found.start + 1;
            if is_ident(buf.byte(i, found.end)) {
                continue;
            }
            let type_text = buf.line(i)[found.start..found.end].to_string();
            rewrite_at(ctx, buf, i, found.start, &type_text, &entry.new, mode)?;
        }
    }
    Ok(())
}

fn rewrite_generic(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize, mode: Mode) -> Result<()> {
    let mut from = 0;
    while let Some(found) = ctx.find_old(buf.line(i), from, GENERIC) {
        from = found.start + 1;
        let spelled = buf.line(i)[found.start..found.end].to_string();
        match buf.byte(i, found.end) {
            b'<' => {}
            b if is_ident(b) => continue,
            _ => {
                ctx.diagnostics.line(
                    i,
                    DiagnosticKind::Unsupported,
                    format!("{spelled} without a unit argument is not supported"),
                );
                continue;
            }
        }

        let close = find_match(buf, Pos::new(i, found.end))?;
        if close.line != i {
            ctx.diagnostics.line(
                i,
                DiagnosticKind::Unsupported,
                format!("{spelled}<...> is too complicated!"),
            );
            continue;
        }

        let line = buf.line(i);
        let argument = &line[found.end + 1..close.col];
        let unit = argument.strip_prefix(TYPENAME).unwrap_or(argument).to_string();
        let type_text = line[found.start..=close.col].to_string();
        rewrite_at(ctx, buf, i, found.start, &type_text, &unit, mode)?;
    }
    Ok(())
}

/// A plain type becomes `quantity<unit>`; a construction is unwrapped unless
/// only types may be touched.
fn rewrite_at(
    ctx: &mut Context<'_>,
    buf: &mut Buffer,
    i: usize,
    start: usize,
    type_text: &str,
    unit: &str,
    mode: Mode,
) -> Result<()> {
    let end = start + type_text.len();
    if !matches!(buf.byte(i, end), b'{' | b'(') {
        let quantity = format!("{}<{unit}>", ctx.config.quantity_template);
        buf.replace(i, start, type_text, &quantity)?;
        check_variable_initializer(ctx, buf, i, start + quantity.len());
    } else if mode == Mode::General {
        rewrite_construction(ctx, buf, i, start, type_text, unit)?;
    }
    Ok(())
}
