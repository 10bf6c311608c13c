use crate::buffer::{is_ident, is_space, Buffer, Pos};
use crate::error::{Result, RewriteError};
use crate::scan::find_match;

/// Find where the receiver of a postfix member access begins.
///
/// `end` is the position of the `.` (one past the receiver). Walks backward
/// over identifier runs, `.`/`->`/`::` chains and matched `()`/`{}`/`[]`
/// groups, including the `<...>` of a `foo<T>(...)` call, until something
/// that cannot belong to the receiver shows up.
pub fn find_expr_start(buf: &Buffer, end: Pos) -> Result<Pos> {
    let mut line = end.line;
    let mut pos = end.col as isize - 1;
    let mut was_ident = false;
    let mut was_group = false;
    loop {
        let boundary = Pos::new(line, (pos + 1) as usize);

        let before_gap = (line, pos);
        loop {
            if pos < 0 {
                if line == 0 {
                    return Ok(boundary);
                }
                line -= 1;
                pos = buf.bytes(line).len() as isize - 1;
                continue;
            }
            if !is_space(buf.byte(line, pos as usize)) {
                break;
            }
            pos -= 1;
        }

        let gap = before_gap != (line, pos);

        let c = buf.byte(line, pos as usize);
        // An identifier only continues the receiver if it is not a separate
        // word in front of a parenthesized group (`return (a + b).value()`).
        if is_ident(c) && !was_ident && !(was_group && gap) {
            while pos >= 0 && is_ident(buf.byte(line, pos as usize)) {
                pos -= 1;
            }
            was_ident = true;
            was_group = false;
            continue;
        }
        was_ident = false;
        was_group = false;

        let before = if pos > 0 {
            buf.byte(line, pos as usize - 1)
        } else {
            0
        };
        match [before, c] {
            [b'+', b'+'] | [b'-', b'-'] => {
                return Err(RewriteError::not_implemented(
                    line,
                    "increment/decrement inside a receiver expression",
                ));
            }
            [b'-', b'>'] | [b':', b':'] => {
                pos -= 2;
                continue;
            }
            _ => {}
        }
        if c == b'.' {
            pos -= 1;
            continue;
        }
        if matches!(c, b')' | b'}' | b']') {
            let open = find_match(buf, Pos::new(line, pos as usize))?;
            line = open.line;
            pos = open.col as isize - 1;
            if pos >= 0 && buf.byte(line, pos as usize) == b'>' && buf.byte(line, open.col) == b'(' {
                let open = find_match(buf, Pos::new(line, pos as usize))?;
                line = open.line;
                pos = open.col as isize - 1;
            }
            was_group = true;
            continue;
        }
        return Ok(boundary);
    }
}
