//! Ordered rewrite pipeline for one file.
//!
//! Every stage is a full traversal of the buffer through
//! [`Buffer::for_each_line`]; stages never run backwards. Whether a stage
//! changed anything is tracked per include tier so that the secondary-tier
//! include can be added, and so that include-what-you-use advisories can be
//! given.

use crate::buffer::{line_ending, Buffer};
use crate::config::RewriteConfig;
use crate::context::Context;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{Result, RewriteError};
use crate::passes::{
    blocks, cleanup, conversions, extraction, includes, literals, renames, types, units, HeaderTracker,
    Mode,
};
use crate::symbols::Tier;
use serde::Serialize;

/// Include bookkeeping of one transformed file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IncludeState {
    /// Old includes were collapsed into the base include
    pub consolidated: bool,

    /// A base-tier stage changed the body
    pub needs_base: bool,

    /// A secondary-tier stage changed the body
    pub needs_usc: bool,

    /// The secondary-tier include line was inserted
    pub usc_added: bool,
}

/// Outcome of running the pipeline over a buffer in place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassResult {
    pub changed: bool,
    pub includes: IncludeState,
}

/// A transformed file
#[derive(Debug, Clone, Serialize)]
pub struct Transformed {
    pub lines: Vec<String>,
    pub changed: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub includes: IncludeState,
}

impl Transformed {
    /// The transformed lines joined back into one string
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Which dirty flag a stage feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Base,
    Usc,
    /// Counts as a body change without implying an include is needed
    Untracked,
}

impl From<Tier> for Scope {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Base => Self::Base,
            Tier::Usc => Self::Usc,
        }
    }
}

#[derive(Debug, Default)]
struct Tracker {
    body: bool,
    base: bool,
    usc: bool,
}

impl Tracker {
    fn stage<F>(&mut self, name: &str, scope: Scope, buf: &mut Buffer, visit: F) -> Result<()>
    where
        F: FnMut(&mut Buffer, usize) -> Result<()>,
    {
        let dirty = buf.for_each_line(visit)?;
        log::debug!("Stage {name}: {}", if dirty { "changed" } else { "unchanged" });
        self.body |= dirty;
        match scope {
            Scope::Base => self.base |= dirty,
            Scope::Usc => self.usc |= dirty,
            Scope::Untracked => {}
        }
        Ok(())
    }
}

/// Runs the rewrite pipeline with one validated configuration
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    config: RewriteConfig,
}

impl Rewriter {
    /// Create a rewriter, rejecting an invalid configuration
    pub fn new(config: RewriteConfig) -> Result<Self> {
        config.validate().map_err(RewriteError::InvalidConfig)?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Transform the lines of one file
    pub fn transform(&self, lines: Vec<String>) -> Result<Transformed> {
        let mut buf = Buffer::new(lines);
        let mut diagnostics = Diagnostics::new();
        let result = self.transform_buffer(&mut buf, &mut diagnostics)?;
        Ok(Transformed {
            lines: buf.into_lines(),
            changed: result.changed,
            diagnostics: diagnostics.into_vec(),
            includes: result.includes,
        })
    }

    /// Transform a whole file given as text
    pub fn transform_str(&self, text: &str) -> Result<Transformed> {
        self.transform(Buffer::from_text(text).into_lines())
    }

    /// Run every stage over `buf` in place.
    ///
    /// On error the buffer may be partially rewritten; callers must discard it.
    pub fn transform_buffer(&self, buf: &mut Buffer, diagnostics: &mut Diagnostics) -> Result<PassResult> {
        let config = &self.config;
        let symbols = &config.symbols;
        let mut ctx = Context::new(config, diagnostics);
        let mut tracker = Tracker::default();
        let mut state = IncludeState::default();

        let mut base_include = None;
        buf.for_each_line(|buf, i| {
            includes::consolidate(config, buf, i, &mut base_include);
            Ok(())
        })?;
        state.consolidated = base_include.is_some();

        tracker.stage("function renames", Scope::Base, buf, |buf, i| {
            renames::apply(&mut ctx, buf, i, &symbols.functions)
        })?;
        tracker.stage("concept renames", Scope::Base, buf, |buf, i| {
            renames::apply(&mut ctx, buf, i, &symbols.concepts)
        })?;
        // Before types, so that extracted values are recognized as such
        tracker.stage("conversion calls", Scope::Base, buf, |buf, i| {
            conversions::apply(&mut ctx, buf, i)
        })?;

        for (index, table) in symbols.types.iter().enumerate() {
            let mut headers = HeaderTracker::default();
            tracker.stage("parameter types", Scope::Untracked, buf, |buf, i| {
                if headers.covers(buf, i)? {
                    types::apply(&mut ctx, buf, i, table, index == 0, Mode::TypeOnly)?;
                }
                Ok(())
            })?;
        }
        for (index, table) in symbols.types.iter().enumerate() {
            tracker.stage("types", table.tier.into(), buf, |buf, i| {
                types::apply(&mut ctx, buf, i, table, index == 0, Mode::General)
            })?;
        }

        tracker.stage("bare units", Scope::Base, buf, |buf, i| {
            units::apply(&mut ctx, buf, i, &symbols.units)
        })?;
        for table in &symbols.literals {
            tracker.stage("literals", table.tier.into(), buf, |buf, i| {
                literals::apply(&mut ctx, buf, i, table)
            })?;
        }

        let mut headers = HeaderTracker::default();
        tracker.stage("parameter blocks", Scope::Untracked, buf, |buf, i| {
            if headers.covers(buf, i)? {
                blocks::apply(&mut ctx, buf, i, Mode::TypeOnly)?;
            }
            Ok(())
        })?;
        tracker.stage("blocks", Scope::Base, buf, |buf, i| {
            blocks::apply(&mut ctx, buf, i, Mode::General)
        })?;

        tracker.stage("value extraction", Scope::Base, buf, |buf, i| {
            extraction::apply(&mut ctx, buf, i)
        })?;
        tracker.stage("cleanup", Scope::Base, buf, |buf, i| {
            cleanup::apply(buf, i, &symbols.simplifications)
        })?;

        let remaining: usize = buf.lines().iter().map(|line| ctx.count_old(line)).sum();
        if remaining > 0 {
            let instances = if remaining == 1 {
                "1 instance".to_string()
            } else {
                format!("{remaining} instances")
            };
            ctx.diagnostics.note(
                DiagnosticKind::Residual,
                format!("{instances} of old units remaining that need manual updating"),
            );
        }

        state.needs_base = tracker.base;
        state.needs_usc = tracker.usc;

        if state.consolidated && tracker.usc {
            let present = buf
                .lines()
                .iter()
                .any(|line| line.trim_end() == config.usc_include);
            match includes::find_base(config, buf) {
                Some(_) if present => {}
                Some(at) => {
                    let line = format!("{}{}", config.usc_include, line_ending(buf.line(at)));
                    buf.insert_line(at, line);
                    state.usc_added = true;
                }
                None => log::warn!("Base include disappeared; not adding {}", config.usc_include),
            }
        }

        if config.check_includes {
            let needed = tracker.base || tracker.usc;
            let has_include = state.consolidated || includes::find_base(config, buf).is_some();
            if state.consolidated && !needed {
                ctx.diagnostics.note(
                    DiagnosticKind::Advisory,
                    "units headers converted but no changes made to file",
                );
            } else if needed && !has_include {
                ctx.diagnostics.note(
                    DiagnosticKind::Advisory,
                    "Changes made to file but no units includes found",
                );
            }
        }

        Ok(PassResult {
            changed: state.consolidated || tracker.body,
            includes: state,
        })
    }
}

/// Transform lines with the default configuration
pub fn transform(lines: Vec<String>) -> Result<Transformed> {
    Rewriter::default().transform(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(out: &Transformed) -> Vec<String> {
        out.diagnostics.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn unchanged_file_reports_nothing() {
        let out = Rewriter::default().transform_str("int main() { return 0; }\n").unwrap();
        assert!(!out.changed);
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.includes, IncludeState::default());
    }

    #[test]
    fn include_consolidation_alone_is_a_change() {
        let out = Rewriter::default()
            .transform_str("#include <units/length.h>\n#include <units/time.h>\nint x;\n")
            .unwrap();
        assert!(out.changed);
        assert_eq!(out.text(), "#include \"wpi/units.hpp\"\nint x;\n");
        assert!(out.includes.consolidated);
        assert!(!out.includes.needs_base);
    }

    #[test]
    fn usc_include_goes_before_base_include() {
        let out = Rewriter::default()
            .transform_str("#include <vector>\n#include <units/length.h>\n\nauto x = 1_in;\n")
            .unwrap();
        assert_eq!(
            out.text(),
            "#include <vector>\n#include \"wpi/units-usc.hpp\"\n#include \"wpi/units.hpp\"\n\nauto x = 1.0 * mp::in;\n"
        );
        assert!(out.includes.usc_added);
    }

    #[test]
    fn usc_change_without_old_includes_adds_nothing() {
        let out = Rewriter::default().transform_str("auto x = 1_in;\n").unwrap();
        assert_eq!(out.text(), "auto x = 1.0 * mp::in;\n");
        assert!(out.includes.needs_usc);
        assert!(!out.includes.usc_added);
    }

    #[test]
    fn residual_references_are_counted() {
        let out = Rewriter::default()
            .transform_str("units::foo_t a;\nwpi::units::bar b, units::baz c;\n")
            .unwrap();
        assert!(!out.changed);
        assert_eq!(
            rendered(&out),
            ["note: 3 instances of old units remaining that need manual updating"]
        );
    }

    #[test]
    fn include_advisories() {
        let config = RewriteConfig {
            check_includes: true,
            ..Default::default()
        };
        let rewriter = Rewriter::new(config).unwrap();

        let out = rewriter.transform_str("#include <units/length.h>\nint x;\n").unwrap();
        assert_eq!(
            rendered(&out),
            ["note: units headers converted but no changes made to file"]
        );

        let out = rewriter.transform_str("auto x = 1_m;\n").unwrap();
        assert_eq!(
            rendered(&out),
            ["note: Changes made to file but no units includes found"]
        );

        let out = rewriter
            .transform_str("#include \"wpi/units.hpp\"\nauto x = 1_m;\n")
            .unwrap();
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn parameter_only_changes_do_not_need_includes() {
        let out = Rewriter::default()
            .transform_str("void Drive::Set(units::meter_t x) {\n}\n")
            .unwrap();
        assert_eq!(out.text(), "void Drive::Set(mp::quantity<mp::m> x) {\n}\n");
        assert!(out.changed);
        assert!(!out.includes.needs_base);
    }

    #[test]
    fn structural_errors_abort_the_file() {
        let err = Rewriter::default().transform_str("y = x++.value();\n").unwrap_err();
        assert!(matches!(err, RewriteError::NotImplemented { line: 0, .. }));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RewriteConfig {
            new_namespace: "mp".to_string(),
            ..Default::default()
        };
        assert!(matches!(Rewriter::new(config), Err(RewriteError::InvalidConfig(_))));
    }
}
