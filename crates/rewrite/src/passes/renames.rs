use crate::buffer::{is_ident, Buffer};
use crate::context::Context;
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::symbols::Rename;

/// Apply namespace-relative renames (`<ns>math::max` -> `std::max`) to line `i`.
///
/// A rename only fires when the old name is not followed by more identifier
/// characters. Renames carrying a notice are reported once per line.
pub(crate) fn apply(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize, renames: &[Rename]) -> Result<()> {
    for rename in renames {
        let mut reported = false;
        let mut from = 0;
        while let Some(found) = ctx.find_old(buf.line(i), from, &rename.old) {
            if is_ident(buf.byte(i, found.end)) {
                from = found.start + 1;
                continue;
            }
            let old = buf.line(i)[found.start..found.end].to_string();
            buf.replace(i, found.start, &old, &rename.new)?;
            from = found.start + rename.new.len();

            if let Some(notice) = &rename.notice {
                if !reported {
                    ctx.diagnostics.line(
                        i,
                        DiagnosticKind::Advisory,
                        format!("{old} replaced with {}, {notice}", rename.new),
                    );
                    reported = true;
                }
            }
        }
    }
    Ok(())
}
