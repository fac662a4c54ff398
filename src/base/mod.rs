//! Foundation types for the lunar toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentUri`] - Document identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`], [`PositionOrdering`] - Line/column positions and
//!   node-versus-query comparison
//!
//! This module has NO dependencies on other lunar modules.

mod position;
mod span;
mod uri;

pub use position::{Position, PositionOrdering, Span};
pub use span::{LineCol, LineIndex, line_text};
pub use uri::{DocumentUri, require_path_suffixes};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
