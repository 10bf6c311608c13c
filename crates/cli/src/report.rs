use crate::driver::FileReport;
use crate::scanner::Skipped;
use serde::Serialize;
use unitshift_rewrite::selftest::CaseReport;

/// Everything one conversion run did
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub skipped: Vec<Skipped>,
    pub files: Vec<FileReport>,
    pub examined: usize,
    pub changed: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn new(dry_run: bool, skipped: Vec<Skipped>, files: Vec<FileReport>, elapsed_secs: f64) -> Self {
        Self {
            dry_run,
            examined: files.len(),
            changed: files.iter().filter(|f| f.changed).count(),
            failed: files.iter().filter(|f| f.error.is_some()).count(),
            skipped,
            files,
            elapsed_secs,
        }
    }
}

pub fn render_run(summary: &RunSummary) -> String {
    let mut out = String::new();
    if !summary.skipped.is_empty() {
        out.push_str("  Skipped paths:\n");
        for skipped in &summary.skipped {
            out.push_str(&format!("    {skipped}\n"));
        }
    }

    let noisy: Vec<&FileReport> = summary
        .files
        .iter()
        .filter(|f| f.error.is_some() || !f.diagnostics.is_empty())
        .collect();
    if !noisy.is_empty() {
        out.push_str("  Output:\n");
        for file in noisy {
            out.push_str(&format!("    {}:\n", file.path.display()));
            if let Some(error) = &file.error {
                out.push_str(&format!("      error: {error}\n"));
            }
            for diagnostic in &file.diagnostics {
                out.push_str(&format!("      {diagnostic}\n"));
            }
        }
    }

    let verb = if summary.dry_run { "would change" } else { "changed" };
    out.push_str(&format!(
        "  Finished processing {} files ({} files {verb}) in {:.2} seconds",
        summary.examined, summary.changed, summary.elapsed_secs
    ));
    out
}

pub fn render_self_test(reports: &[CaseReport]) -> String {
    let mut out = String::new();
    let failed: Vec<&CaseReport> = reports.iter().filter(|r| !r.passed).collect();
    for report in &failed {
        out.push_str(&format!("Test \"{}\" failed!\n", report.name));
        for mismatch in &report.mismatches {
            out.push_str(&format!("  {mismatch}\n"));
        }
    }
    if failed.is_empty() {
        out.push_str(&format!("All {} tests succeeded!", reports.len()));
    } else {
        out.push_str(&format!("{} of {} tests failed", failed.len(), reports.len()));
    }
    out
}
