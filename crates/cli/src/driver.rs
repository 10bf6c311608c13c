use anyhow::{Context as AnyhowContext, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use unitshift_rewrite::{Diagnostic, RewriteConfig, Rewriter};

/// What happened to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub changed: bool,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reads, transforms and writes back files
pub struct Driver {
    rewriter: Rewriter,
    /// Same rewriter without include advisories, for serialization sources
    relaxed: Rewriter,
    dry_run: bool,
}

impl Driver {
    pub fn new(config: RewriteConfig, dry_run: bool) -> Result<Self> {
        let relaxed = RewriteConfig {
            check_includes: false,
            ..config.clone()
        };
        Ok(Self {
            rewriter: Rewriter::new(config).context("Invalid rewrite configuration")?,
            relaxed: Rewriter::new(relaxed).context("Invalid rewrite configuration")?,
            dry_run,
        })
    }

    /// Process one file; failures are recorded in the report, never propagated
    pub fn process(&self, path: &Path) -> FileReport {
        match self.try_process(path) {
            Ok((changed, diagnostics)) => FileReport {
                path: path.to_path_buf(),
                changed,
                diagnostics,
                error: None,
            },
            Err(e) => {
                log::warn!("{e:#}");
                FileReport {
                    path: path.to_path_buf(),
                    changed: false,
                    diagnostics: Vec::new(),
                    error: Some(format!("{e:#}")),
                }
            }
        }
    }

    fn try_process(&self, path: &Path) -> Result<(bool, Vec<Diagnostic>)> {
        let text = fs::read_to_string(path).with_context(|| format!("Error loading {}", path.display()))?;

        let rewriter = if is_serialization_impl(path) {
            &self.relaxed
        } else {
            &self.rewriter
        };
        let out = rewriter
            .transform_str(&text)
            .with_context(|| format!("Error processing {}", path.display()))?;

        if out.changed && !self.dry_run {
            write_atomic(path, &out.text())?;
            log::debug!("Rewrote {}", path.display());
        }
        Ok((out.changed, out.diagnostics))
    }
}

/// `proto/*Proto.cpp`, `struct/*Struct.cpp` and their tests
pub fn is_serialization_impl(path: &Path) -> bool {
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("");
    let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
    match parent {
        "proto" => name.ends_with("Proto.cpp") || name.ends_with("ProtoTest.cpp"),
        "struct" => name.ends_with("Struct.cpp") || name.ends_with("StructTest.cpp"),
        _ => false,
    }
}

/// Replace `path` through a sibling temp file
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".unitshift.tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, text).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
