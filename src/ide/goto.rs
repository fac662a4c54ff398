//! Jump from a reference to the declaration(s) it names.

use smol_str::SmolStr;

use super::query::{QueryRouter, SymbolQuery};
use crate::base::{DocumentUri, Span};
use crate::hir::{SymbolKind, SymbolRecord};

/// Scheme of documents that have no file to open.
pub const BUILTIN_SCHEME: &str = "builtin:";

/// Declarations found for one cursor.
#[derive(Clone, Debug, Default)]
pub struct GotoResult {
    /// Declaration sites, best first.
    pub targets: Vec<GotoTarget>,
}

impl GotoResult {
    /// Nothing to jump to.
    pub fn empty() -> Self {
        Self::default()
    }

    /// No declaration was found.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// One declaration site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub uri: DocumentUri,
    /// Range of the declared name.
    pub range: Span,
    pub kind: SymbolKind,
    pub name: SmolStr,
}

impl From<&SymbolRecord> for GotoTarget {
    fn from(symbol: &SymbolRecord) -> Self {
        Self {
            uri: symbol.uri.clone(),
            range: symbol.range,
            kind: symbol.kind,
            name: symbol.name.clone(),
        }
    }
}

/// Find the definition(s) of the name under the query.
///
/// Builtin library symbols have nowhere to jump to and are left out.
pub fn goto_definition(router: &QueryRouter<'_>, query: &SymbolQuery) -> GotoResult {
    let Some(candidates) = router.resolve_definition_symbols(query) else {
        return GotoResult::empty();
    };
    GotoResult {
        targets: candidates
            .iter()
            .filter(|symbol| !symbol.uri.as_str().starts_with(BUILTIN_SCHEME))
            .map(GotoTarget::from)
            .collect(),
    }
}
