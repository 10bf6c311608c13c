use crate::buffer::is_ident;
use crate::config::RewriteConfig;
use crate::diagnostics::Diagnostics;

/// Span of an old-namespace reference, namespace tag included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OldRef {
    pub start: usize,
    pub end: usize,
}

/// State shared by every pass while one file is rewritten
pub(crate) struct Context<'a> {
    pub config: &'a RewriteConfig,
    pub diagnostics: &'a mut Diagnostics,
    namespaces: Vec<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a RewriteConfig, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            config,
            diagnostics,
            namespaces: config.namespaces_longest_first(),
        }
    }

    /// Earliest `<old namespace>{name}` at or after `from` that starts a token.
    ///
    /// A namespace only counts when the byte before it is neither an
    /// identifier byte nor `:`, so `units::` never matches inside
    /// `wpi::units::`. On a tie the longest namespace wins.
    pub fn find_old(&self, line: &str, from: usize, name: &str) -> Option<OldRef> {
        let mut best: Option<OldRef> = None;
        for namespace in &self.namespaces {
            let mut at = from;
            while let Some(start) = find_from(line, namespace, at) {
                let end = start + namespace.len();
                let at_boundary = start == 0 || {
                    let prev = line.as_bytes()[start - 1];
                    !is_ident(prev) && prev != b':'
                };
                if at_boundary && line[end..].starts_with(name) {
                    if best.map_or(true, |b| start < b.start) {
                        best = Some(OldRef {
                            start,
                            end: end + name.len(),
                        });
                    }
                    break;
                }
                at = start + 1;
            }
        }
        best
    }

    /// Number of old-namespace references left in `line`
    pub fn count_old(&self, line: &str) -> usize {
        let mut count = 0;
        let mut from = 0;
        while let Some(found) = self.find_old(line, from, "") {
            count += 1;
            from = found.end;
        }
        count
    }

    /// Whether a whitespace-delimited word names something from either library
    pub fn is_library_ref(&self, word: &str) -> bool {
        if self.namespaces.iter().any(|ns| word.starts_with(ns)) {
            return true;
        }
        word.starts_with(&self.config.new_namespace)
            && !word.starts_with(&self.config.value_function)
    }
}

/// `haystack.find(needle)` starting at byte `from`; `None` past the end
pub(crate) fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let mut from = from;
    while from < haystack.len() && !haystack.is_char_boundary(from) {
        from += 1;
    }
    haystack.get(from..)?.find(needle).map(|i| i + from)
}
