//! Analysis configuration.

use std::path::Path;

use crate::hir::ExtractOptions;

/// Settings shared by the store, the router and the workspace loader.
///
/// ```
/// use lunar::project::AnalysisConfig;
///
/// let config = AnalysisConfig::default()
///     .with_index_depth(1)
///     .with_stdlib(false)
///     .with_extensions(["lua", "luau"]);
/// assert_eq!(config.index_depth, 1);
/// assert!(config.has_lua_extension(std::path::Path::new("a/b.luau")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Statements nested at most this deep are indexed (0 = chunk level).
    pub index_depth: usize,
    /// Ingest the builtin library table.
    pub include_stdlib: bool,
    /// File extensions, without the dot.
    pub extensions: Vec<String>,
    /// Directory names skipped while walking a workspace.
    pub exclude_dirs: Vec<String>,
    /// Alias inference hops per qualified query.
    pub max_alias_hops: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            index_depth: 0,
            include_stdlib: true,
            extensions: vec!["lua".to_string()],
            exclude_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                ".luarocks".to_string(),
            ],
            max_alias_hops: 4,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_depth(mut self, depth: usize) -> Self {
        self.index_depth = depth;
        self
    }

    pub fn with_stdlib(mut self, include: bool) -> Self {
        self.include_stdlib = include;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_alias_hops(mut self, hops: usize) -> Self {
        self.max_alias_hops = hops;
        self
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            index_depth: self.index_depth,
        }
    }

    pub fn has_lua_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }
}
