//! Project management: configuration, workspace loading, builtin library.

mod config;
mod stdlib;
pub mod workspace_loader;

pub use config::AnalysisConfig;
pub use stdlib::{STDLIB_URI, load_stdlib, stdlib_symbols};
pub use workspace_loader::{LoadError, LoadFailure, LoadReport, WorkspaceLoader};
