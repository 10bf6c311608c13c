use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which files under the given roots are converted
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extensions (without the dot) of files to convert
    pub extensions: Vec<String>,

    /// File names that are never converted
    pub skip_files: Vec<String>,

    /// Directory names that are pruned from the walk
    pub skip_dirs: Vec<String>,

    /// A file is converted only if one of these is a component of its directory
    pub source_dirs: Vec<String>,

    /// Apply the `source_dirs` check
    pub require_source_dir: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: strings(&["h", "cpp", "inc", "hpp", "c"]),
            skip_files: strings(&["units.hpp", "units-usc.hpp", "UnitsTest.cpp"]),
            skip_dirs: strings(&["generate", "java", "python", "resources", "thirdparty", "units"]),
            source_dirs: strings(&["native", "cpp", "include"]),
            require_source_dir: true,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Why a path was left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    Directory,
    File,
    NonSourceFile,
    NonSourceDirectory { files: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match self.reason {
            SkipReason::Directory => write!(f, "directory {path}"),
            SkipReason::File => write!(f, "file {path}"),
            SkipReason::NonSourceFile => write!(f, "non-C++ file {path}"),
            SkipReason::NonSourceDirectory { files: 1 } => {
                write!(f, "1 file in non-native directory {path}")
            }
            SkipReason::NonSourceDirectory { files } => {
                write!(f, "{files} files in non-native directory {path}")
            }
        }
    }
}

/// Files selected for conversion, plus everything that was passed over
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
}

/// Walks roots in file-name order and applies [`ScanOptions`]
pub struct SourceScanner {
    options: ScanOptions,
}

impl SourceScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn scan(&self, roots: &[PathBuf]) -> ScanResult {
        let mut result = ScanResult::default();
        let mut non_source: BTreeMap<PathBuf, usize> = BTreeMap::new();

        for root in roots {
            if root.is_file() {
                if let Some(reason) = self.file_skip_reason(root) {
                    result.skipped.push(Skipped {
                        path: root.clone(),
                        reason,
                    });
                } else {
                    result.files.push(root.clone());
                }
                continue;
            }

            let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();
            while let Some(entry) = entries.next() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Failed to read entry: {e}");
                        continue;
                    }
                };
                let path = entry.path();

                if entry.file_type().is_dir() {
                    if entry.depth() > 0 && self.is_skipped_dir(path) {
                        result.skipped.push(Skipped {
                            path: path.to_path_buf(),
                            reason: SkipReason::Directory,
                        });
                        entries.skip_current_dir();
                    }
                    continue;
                }
                if !entry.file_type().is_file() {
                    continue;
                }

                if self.options.require_source_dir && !self.in_source_dir(path) {
                    if let Some(parent) = path.parent() {
                        *non_source.entry(parent.to_path_buf()).or_default() += 1;
                    }
                    continue;
                }

                match self.file_skip_reason(path) {
                    Some(reason) => result.skipped.push(Skipped {
                        path: path.to_path_buf(),
                        reason,
                    }),
                    None => result.files.push(path.to_path_buf()),
                }
            }
        }

        result
            .skipped
            .extend(non_source.into_iter().map(|(path, files)| Skipped {
                path,
                reason: SkipReason::NonSourceDirectory { files },
            }));
        log::info!(
            "Found {} files to convert ({} paths skipped)",
            result.files.len(),
            result.skipped.len()
        );
        result
    }

    fn file_skip_reason(&self, path: &Path) -> Option<SkipReason> {
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        if name.starts_with('.') || self.options.skip_files.iter().any(|skip| skip == name) {
            return Some(SkipReason::File);
        }
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.options.extensions.iter().any(|candidate| candidate == ext));
        if !has_extension {
            return Some(SkipReason::NonSourceFile);
        }
        None
    }

    fn is_skipped_dir(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.options.skip_dirs.iter().any(|skip| skip == name))
    }

    fn in_source_dir(&self, path: &Path) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        parent.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.options.source_dirs.iter().any(|marker| *marker == name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "int x;\n").unwrap();
    }

    #[test]
    fn filters_files_and_prunes_directories() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "src/main/native/cpp/Drive.cpp");
        touch(root, "src/main/native/cpp/Arm.cpp");
        touch(root, "src/main/native/cpp/notes.txt");
        touch(root, "src/main/native/cpp/.hidden.cpp");
        touch(root, "src/main/native/include/units.hpp");
        touch(root, "src/main/native/thirdparty/lib.cpp");
        touch(root, "src/main/java/Drive.java");
        touch(root, "tools/gen.cpp");

        let result = SourceScanner::new(ScanOptions::default()).scan(&[root.to_path_buf()]);

        let base = root.join("src/main/native/cpp");
        assert_eq!(result.files, [base.join("Arm.cpp"), base.join("Drive.cpp")]);

        let rendered: Vec<String> = result.skipped.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                format!("directory {}", root.join("src/main/java").display()),
                format!("file {}", base.join(".hidden.cpp").display()),
                format!("non-C++ file {}", base.join("notes.txt").display()),
                format!("file {}", root.join("src/main/native/include/units.hpp").display()),
                format!("directory {}", root.join("src/main/native/thirdparty").display()),
                format!("1 file in non-native directory {}", root.join("tools").display()),
            ]
        );
    }

    #[test]
    fn source_dir_check_can_be_disabled() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "tools/gen.cpp");
        let options = ScanOptions {
            require_source_dir: false,
            ..Default::default()
        };
        let result = SourceScanner::new(options).scan(&[temp.path().to_path_buf()]);
        assert_eq!(result.files, [temp.path().join("tools/gen.cpp")]);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn file_roots_skip_the_directory_check() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "Robot.cpp");
        touch(temp.path(), "README.md");
        let roots = [temp.path().join("Robot.cpp"), temp.path().join("README.md")];
        let result = SourceScanner::new(ScanOptions::default()).scan(&roots);
        assert_eq!(result.files, [temp.path().join("Robot.cpp")]);
        assert_eq!(result.skipped[0].reason, SkipReason::NonSourceFile);
    }
}
