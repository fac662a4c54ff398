//! Document identifiers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// URI of a document known to the workspace (e.g. `file:///proj/src/a.lua`).
///
/// Cheap to clone; compared and hashed by its text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri(Arc<str>);

const FILE_SCHEME: &str = "file://";

impl DocumentUri {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` uri from a filesystem path.
    pub fn from_path(path: &Path) -> Self {
        let text = path.to_string_lossy().replace('\\', "/");
        if text.starts_with('/') {
            Self::new(format!("{FILE_SCHEME}{text}"))
        } else {
            Self::new(format!("{FILE_SCHEME}/{text}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem path for `file://` uris.
    pub fn to_path(&self) -> Option<PathBuf> {
        let rest = self.0.strip_prefix(FILE_SCHEME)?;
        // `file:///C:/x` carries a drive letter after the leading slash
        let rest = match rest.as_bytes() {
            [b'/', _, b':', ..] => &rest[1..],
            _ => rest,
        };
        Some(PathBuf::from(rest))
    }

    /// True when this uri ends with `/suffix` (or equals `suffix`).
    pub fn has_path_suffix(&self, suffix: &str) -> bool {
        let uri = self.as_str();
        uri == suffix
            || uri
                .strip_suffix(suffix)
                .is_some_and(|head| head.ends_with('/'))
    }
}

/// Candidate uri suffixes for a `require` path, most specific first.
///
/// `a.b` and `a/b` both map to `a/b.lua` and then `a/b/init.lua`.
pub fn require_path_suffixes(module_path: &str) -> Vec<String> {
    let path = module_path.trim().replace('.', "/");
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Vec::new();
    }
    vec![format!("{path}.lua"), format!("{path}/init.lua")]
}

impl fmt::Debug for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for DocumentUri {
    fn from(uri: String) -> Self {
        Self::new(uri)
    }
}

impl AsRef<str> for DocumentUri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
