//! Parse failure reported to the indexing layer.

use thiserror::Error;

use super::parser::{Parse, SyntaxError};
use crate::base::LineIndex;

/// The first syntax error of a failed parse, located by line and column.
///
/// Lines and columns are 0-based; `Display` shows them 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{}: {message}", .line + 1, .column + 1)]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl ParseError {
    pub fn from_syntax_error(error: &SyntaxError, line_index: &LineIndex) -> Self {
        let at = line_index.line_col(error.range.start());
        Self {
            line: at.line,
            column: at.col,
            message: error.message.clone(),
        }
    }
}

impl Parse {
    /// `Err` with the first error when the parse failed.
    pub fn check(&self, text: &str) -> Result<(), ParseError> {
        match self.errors.first() {
            None => Ok(()),
            Some(error) => Err(ParseError::from_syntax_error(
                error,
                &LineIndex::new(text),
            )),
        }
    }
}
