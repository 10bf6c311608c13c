use crate::buffer::{Buffer, Pos};
use crate::context::{find_from, Context};
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::expr::find_expr_start;
use crate::scan::find_match;

const TO_CALL: &str = ".to<";
const TO_DOUBLE: &str = ".to<double>()";

/// Rewrite typed conversion calls on line `i`.
///
/// `.to<double>()` is the scalar-extraction call; any other `.to<T>()`
/// becomes `static_cast<T>(receiver.value())`.
pub(crate) fn apply(ctx: &mut Context<'_>, buf: &mut Buffer, i: usize) -> Result<()> {
    let value_call = ctx.config.value_call.clone();
    if buf.line(i).contains(TO_DOUBLE) {
        let replaced = buf.line(i).replace(TO_DOUBLE, &value_call);
        buf.set_line(i, replaced);
    }

    let mut from = 0;
    while let Some(index) = find_from(buf.line(i), TO_CALL, from) {
        from = index + 1;
        let open = index + TO_CALL.len() - 1;
        let close = find_match(buf, Pos::new(i, open))?;

        let is_call = buf
            .line(close.line)
            .get(close.col + 1..)
            .is_some_and(|rest| rest.starts_with("()"));
        if !is_call {
            ctx.diagnostics
                .line(i, DiagnosticKind::Unsupported, "Unexpected non-call .to<>!");
            continue;
        }
        if close.line != i {
            ctx.diagnostics
                .line(i, DiagnosticKind::Unsupported, ".to<>() call is too complicated!");
            continue;
        }

        let scalar = buf.line(i)[open + 1..close.col].to_string();
        buf.replace(
            i,
            index,
            &format!(".to<{scalar}>()"),
            &format!("{value_call})"),
        )?;
        let start = find_expr_start(buf, Pos::new(i, index))?;
        let cast = format!("static_cast<{scalar}>(");
        buf.insert(start.line, start.col, &cast)?;
        if start.line == i {
            from += cast.len();
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

    fn rewrite(text: &str) -> (String, Vec<String>) {
        let config = RewriteConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut ctx = Context::new(&config, &mut diagnostics);
        let mut buf = Buffer::from_text(text);
        for i in 0..buf.len() {
            apply(&mut ctx, &mut buf, i).unwrap();
        }
        let rendered = diagnostics.iter().map(ToString::to_string).collect();
        (buf.to_text(), rendered)
    }

    #[test]
    fn to_double_is_value() {
        assert_eq!(rewrite("a + x.to<double>()\n").0, "a + x.value()\n");
    }

    #[test]
    fn other_scalars_are_cast() {
        assert_eq!(
            rewrite("count + x.to<uint64_t>()\n").0,
            "count + static_cast<uint64_t>(x.value())\n"
        );
        assert_eq!(
            rewrite("f(a.to<int>(), b.to<int>())\n").0,
            "f(static_cast<int>(a.value()), static_cast<int>(b.value()))\n"
        );
    }

    #[test]
    fn non_call_is_reported_and_left() {
        let (text, diagnostics) = rewrite("auto f = x.to<int>;\n");
        assert_eq!(text, "auto f = x.to<int>;\n");
        assert_eq!(diagnostics, ["line 1: Unexpected non-call .to<>!"]);
    }

    #[test]
    fn multi_line_template_argument_is_reported() {
        let (text, diagnostics) = rewrite("x.to<\n  int>()\n");
        assert_eq!(text, "x.to<\n  int>()\n");
        assert_eq!(diagnostics, ["line 1: .to<>() call is too complicated!"]);
    }
}
