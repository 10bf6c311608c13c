use super::{check_variable_initializer, Mode};
use crate::buffer::{Buffer, Pos};
use crate::context::{find_from, Context};
use crate::conversion::rewrite_construction;
use crate::diagnostics::DiagnosticKind;
use crate::error::{Result, RewriteError};
use crate::scan::find_match;

/// Rewrite `decltype(1.0 * unit)` blocks on line `i`.
///
/// Literal rewriting turns `decltype(1_V / 1_mps)` into
/// `decltype(1.0 * mp::V / (mp::m / mp::s))`; as a type this becomes
/// `mp::quantity<...>`, and as a construction it is unwrapped like any other
/// unit type. A construction whose block spans two lines is joined onto one
/// line first.
pub(crate) fn apply(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize, mode: Mode) -> Result<()> {
    let config = ctx.config;
    let marker = config.block_marker.as_str();
    let Some(open_offset) = marker.find('(') else {
        return Err(RewriteError::InvalidConfig(format!(
            "block_marker {marker:?} does not open a group"
        )));
    };

    let mut from = 0;
    while let Some(start) = find_from(buf.line(i), marker, from) {
        from = start + 1;
        let unit_start = start + marker.len();
        let close = find_match(buf, Pos::new(i, start + open_offset))?;
        let after = close.col + 1;

        if !matches!(buf.byte(close.line, after), b'{' | b'(') {
            let opening = format!("{}<", config.quantity_template);
            buf.replace(i, start, marker, &opening)?;
            let (mut close_col, mut after) = (close.col, after);
            if close.line == i {
                close_col = close_col + opening.len() - marker.len();
                after = after + opening.len() - marker.len();
            }
            buf.replace(close.line, close_col, ")", ">")?;
            check_variable_initializer(ctx, buf, close.line, after);
            continue;
        }

        if mode == Mode::TypeOnly {
            continue;
        }

        let (mut close_col, mut after) = (close.col, after);
        let mut close_line = close.line;
        if close_line == i + 1 {
            let head = buf.line(i).trim_end();
            let next = buf.line(i + 1);
            let tail = next.trim_start();
            let shift = head.len() + 1;
            let indent = next.len() - tail.len();
            let joined = format!("{head} {tail}");
            close_col = close_col - indent + shift;
            after = after - indent + shift;
            buf.set_line(i + 1, joined);
            buf.remove_line(i);
            close_line = i;
        }
        if close_line != i {
            ctx.diagnostics.line(
                i,
                DiagnosticKind::Unsupported,
                format!("{}(...) type conversion is too complicated!", &marker[..open_offset]),
            );
            continue;
        }

        let line = buf.line(i);
        let type_text = line[start..after].to_string();
        let unit = line[unit_start..close_col].to_string();
        rewrite_construction(ctx, buf, i, start, &type_text, &unit)?;
    }
    Ok(())
}
