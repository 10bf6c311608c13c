use crate::buffer::{is_ident, Buffer, Pos};
use crate::context::Context;
use crate::error::{Result, RewriteError};
use crate::expr::find_expr_start;
use crate::scan::{find_match, prev_non_space};

/// Rewrite `receiver.value()` into `mp::value(receiver)` on line `i`.
///
/// A parenthesized receiver just gets the function name in front of its
/// parenthesis. Escape comments suppress the rewrite and are removed:
/// the same-line form together with the whitespace before it, the
/// next-line form as a whole line once the following line is reached.
pub(crate) fn apply(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize) -> Result<()> {
    let config = ctx.config;
    let next_line_escape = config.next_line_escape.as_str();
    let same_line_escape = config.same_line_escape.as_str();

    if buf.line(i).trim() == next_line_escape {
        return Ok(());
    }
    if i > 0 && buf.line(i - 1).trim() == next_line_escape {
        buf.remove_line(i - 1);
        return Ok(());
    }

    let line = buf.line(i);
    if let Some(index) = line.find(same_line_escape) {
        if line.matches(same_line_escape).count() != 1 {
            return Err(RewriteError::malformed(
                i,
                format!("more than one {same_line_escape:?} comment"),
            ));
        }
        let head = line[..index].trim_end();
        let tail = &line[index + same_line_escape.len()..];
        let stripped = format!("{head}{tail}");
        buf.set_line(i, stripped);
        return Ok(());
    }

    let value_call = config.value_call.as_str();
    let function = config.value_function.as_str();
    while let Some(index) = buf.line(i).find(value_call) {
        buf.delete(i, index, value_call)?;

        if let Some((b')', close)) = prev_non_space(buf, Pos::new(i, index)) {
            let open = find_match(buf, close)?;
            let before = buf.byte_before(open.line, open.col);
            // Only the byte touching the parenthesis is checked, so in
            // `foo (x).value()` the group is taken as the whole receiver.
            if !is_ident(before) && before != b'>' {
                buf.insert(open.line, open.col, function)?;
                continue;
            }
        }

        let start = find_expr_start(buf, Pos::new(i, index))?;
        buf.insert(i, index, ")")?;
        buf.insert(start.line, start.col, &format!("{function}("))?;
    }
    Ok(())
}
