use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::base::DocumentUri;
use crate::ide::AnalysisHost;

/// Failure that stops a workspace load altogether.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file that could not be loaded. Never fatal for the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a workspace load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Files indexed successfully.
    pub indexed: usize,
    /// Files skipped because the editor already has them open.
    pub skipped_open: usize,
    /// Files that were read but did not parse.
    pub parse_failures: Vec<PathBuf>,
    /// Files or directories that could not be read.
    pub read_failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.parse_failures.is_empty() && self.read_failures.is_empty()
    }
}

enum FileOutcome {
    Indexed,
    SkippedOpen,
    ParseFailed(PathBuf),
    ReadFailed(LoadFailure),
}

/// Loads workspace files into an [`AnalysisHost`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Lua files under `root`, honouring the host's extensions and excluded
    /// directories. Unreadable entries below the root are reported, not fatal.
    pub fn collect_files(
        &self,
        root: &Path,
        host: &AnalysisHost,
    ) -> Result<(Vec<PathBuf>, Vec<LoadFailure>), LoadError> {
        let config = host.config();
        let mut files = Vec::new();
        let mut failures = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry.file_name().to_str().is_some_and(|name| config.is_excluded_dir(name))
        });
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && config.has_lua_extension(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(error) if error.depth() == 0 => {
                    return Err(LoadError::Io {
                        path: root.to_path_buf(),
                        source: error.into(),
                    });
                }
                Err(error) => {
                    let path = error.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!(path = %path.display(), %error, "skipping unreadable entry");
                    failures.push(LoadFailure {
                        path,
                        message: error.to_string(),
                    });
                }
            }
        }
        files.sort();
        Ok((files, failures))
    }

    /// Walk `root` and index every Lua file in parallel.
    pub fn load_directory<P: AsRef<Path>>(
        &self,
        root: P,
        host: &AnalysisHost,
    ) -> Result<LoadReport, LoadError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LoadError::DirectoryNotFound(root.to_path_buf()));
        }
        let (files, read_failures) = self.collect_files(root, host)?;
        debug!(root = %root.display(), files = files.len(), "loading workspace");

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| self.load_one(path, host))
            .collect();

        let mut report = LoadReport {
            read_failures,
            ..LoadReport::default()
        };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Indexed => report.indexed += 1,
                FileOutcome::SkippedOpen => report.skipped_open += 1,
                FileOutcome::ParseFailed(path) => report.parse_failures.push(path),
                FileOutcome::ReadFailed(failure) => report.read_failures.push(failure),
            }
        }
        debug!(
            indexed = report.indexed,
            parse_failures = report.parse_failures.len(),
            read_failures = report.read_failures.len(),
            "workspace loaded"
        );
        Ok(report)
    }

    /// Index a single file. Returns false when it did not parse.
    ///
    /// A file open in the editor keeps its unsaved text and is not read.
    pub fn load_file<P: AsRef<Path>>(&self, path: P, host: &AnalysisHost) -> Result<bool, LoadError> {
        let path = path.as_ref();
        let uri = DocumentUri::from_path(path);
        if host.is_open(&uri) {
            debug!(uri = %uri, "skipping open document");
            return Ok(host.has_file(&uri));
        }
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(host.store().try_index(&uri, &text).is_ok())
    }

    fn load_one(&self, path: &Path, host: &AnalysisHost) -> FileOutcome {
        let uri = DocumentUri::from_path(path);
        if host.is_open(&uri) {
            return FileOutcome::SkippedOpen;
        }
        match std::fs::read_to_string(path) {
            Ok(text) => match host.store().try_index(&uri, &text) {
                Ok(_) => FileOutcome::Indexed,
                Err(_) => FileOutcome::ParseFailed(path.to_path_buf()),
            },
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read workspace file");
                FileOutcome::ReadFailed(LoadFailure {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                })
            }
        }
    }
}
