//! The style-processing pipeline: walk, rewrite, write, report.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::manifest::ScopeManifest;
use crate::scan::ScanOptions;
use crate::scope::scoped_class_name;
use crate::stylesheet;

/// Errors that can occur while running the [`Pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured scan root does not exist or is not a directory.
    #[error("scan root '{path}' is not a directory")]
    InvalidRoot { path: PathBuf },

    /// A module stylesheet could not be read.
    #[error("failed to read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output file or directory could not be written.
    #[error("failed to write '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Scans a tree for module stylesheets and rewrites their class selectors.
#[derive(Debug, Clone)]
pub struct Pipeline {
    root: PathBuf,
    out_dir: PathBuf,
    options: ScanOptions,
    manifest_path: Option<PathBuf>,
    dry_run: bool,
}

/// Outcome of processing a single stylesheet.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Root-relative source path with forward-slash separators; this exact
    /// string is what the fingerprints were derived from.
    pub source: String,
    /// Where the rewritten stylesheet was written, absent on dry runs.
    pub output: Option<PathBuf>,
    /// Local class name to scoped class name.
    pub classes: BTreeMap<String, String>,
}

/// Aggregate outcome of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub files: Vec<FileReport>,
    pub manifest: ScopeManifest,
    /// Where the manifest was written, absent on dry runs.
    pub manifest_path: Option<PathBuf>,
    /// Total distinct classes scoped across all files.
    pub classes_scoped: usize,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            out_dir: out_dir.into(),
            options: ScanOptions::default(),
            manifest_path: None,
            dry_run: false,
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Write the JSON manifest to `path` after processing.
    pub fn with_manifest_path(mut self, path: Option<PathBuf>) -> Self {
        self.manifest_path = path;
        self
    }

    /// Compute mappings without writing any output.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every module stylesheet under the root.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        if !self.root.is_dir() {
            return Err(PipelineError::InvalidRoot {
                path: self.root.clone(),
            });
        }

        let mut report = PipelineReport::default();

        for entry in self.options.walker(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.options.is_module_file(name) {
                continue;
            }

            let file = self.process_file(entry.path())?;
            debug!(
                source = %file.source,
                classes = file.classes.len(),
                "scoped stylesheet"
            );
            report.classes_scoped += file.classes.len();
            report
                .manifest
                .insert_file(file.source.clone(), file.classes.clone());
            report.files.push(file);
        }

        // Walk order can differ between filesystems; reports should not.
        report.files.sort_by(|a, b| a.source.cmp(&b.source));

        if !self.dry_run {
            if let Some(path) = &self.manifest_path {
                write_manifest(&report.manifest, path)?;
                report.manifest_path = Some(path.clone());
            }
        }

        info!(
            files = report.files.len(),
            classes = report.classes_scoped,
            "pipeline finished"
        );
        Ok(report)
    }

    fn process_file(&self, path: &Path) -> Result<FileReport, PipelineError> {
        let source_id = relative_id(&self.root, path);

        let text = fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let outcome =
            stylesheet::rewrite_classes(&text, |class| scoped_class_name(&source_id, class));

        let output = if self.dry_run {
            None
        } else {
            let out_path = self.out_dir.join(relative_path(&self.root, path));
            write_output(&out_path, &outcome.text)?;
            Some(out_path)
        };

        Ok(FileReport {
            source: source_id,
            output,
            classes: outcome.classes,
        })
    }
}

/// Root-relative path in forward-slash form, used as the hashing identifier
/// so fingerprints do not depend on the machine or operating system.
fn relative_id(root: &Path, path: &Path) -> String {
    relative_path(root, path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn relative_path<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn write_output(path: &Path, text: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_manifest(manifest: &ScopeManifest, path: &Path) -> Result<(), PipelineError> {
    let json = manifest
        .to_json_pretty()
        .map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, source),
        })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_root_is_reported() {
        let pipeline = Pipeline::new("/definitely/not/a/real/root", "/tmp/out");
        let err = pipeline.run().expect_err("missing root");
        assert!(matches!(err, PipelineError::InvalidRoot { .. }));
    }

    #[test]
    fn relative_id_uses_forward_slashes() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/style.module.css");
        assert_eq!(relative_id(root, path), "src/style.module.css");
    }
}
