use crate::buffer::{line_ending, Buffer};
use crate::config::RewriteConfig;

/// Collapse old per-dimension include lines into the single base include.
///
/// The first old include is replaced in place (keeping its line terminator);
/// later ones are deleted. `base` records where the base include went.
pub(crate) fn consolidate(config: &RewriteConfig, buf: &mut Buffer, i: usize, base: &mut Option<usize>) {
    let line = buf.line(i);
    let is_old = config
        .old_include_prefixes
        .iter()
        .any(|prefix| line.starts_with(prefix.as_str()));
    if !is_old {
        return;
    }

    if base.is_some() {
        log::debug!("Dropping include on line {}", i + 1);
        buf.remove_line(i);
    } else {
        let replacement = format!("{}{}", config.base_include, line_ending(line));
        buf.set_line(i, replacement);
        *base = Some(i);
    }
}

/// Index of the base include line, if the buffer has one
pub(crate) fn find_base(config: &RewriteConfig, buf: &Buffer) -> Option<usize> {
    buf.lines()
        .iter()
        .position(|line| line.trim_end() == config.base_include)
}
