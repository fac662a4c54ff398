/// Position tracking for syntax nodes and symbols
///
/// Stores the source location (line/column) of declarations and queries for
/// IDE features like hover, go-to-definition, and diagnostics.
/// Zero-based `[start, end]` range of line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed, column in bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Where a node lies relative to a query span.
///
/// Read as "the query is `Before` this node", "the query is `After` this
/// node", and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionOrdering {
    /// The node starts after the query ends.
    Before,
    /// The node ends before the query starts.
    After,
    /// The node covers exactly the query span.
    Equal,
    /// The node contains or overlaps the query.
    Contains,
}

impl PositionOrdering {
    /// True for `Equal` and `Contains`: the query lies inside the node.
    pub fn is_inside(self) -> bool {
        matches!(self, Self::Equal | Self::Contains)
    }
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span from four raw coordinates.
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// An empty span at a single position.
    pub fn point(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Inclusive on both ends.
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.start.line || position.line > self.end.line {
            return false;
        }
        if position.line == self.start.line && position.column < self.start.column {
            return false;
        }
        if position.line == self.end.line && position.column > self.end.column {
            return false;
        }
        true
    }

    /// True for a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Compare this node span against a query span.
    ///
    /// Ends are exclusive. `Equal` wins over everything else; `Before`/`After`
    /// require the node to be entirely on one side of the query, otherwise the
    /// node `Contains` the query. A zero-width query touching a node edge
    /// counts as contained.
    pub fn compare(&self, query: &Span) -> PositionOrdering {
        if self == query {
            return PositionOrdering::Equal;
        }
        if query.is_empty() {
            if self.start > query.start {
                return PositionOrdering::Before;
            }
            if self.end < query.start {
                return PositionOrdering::After;
            }
            return PositionOrdering::Contains;
        }
        if self.start >= query.end {
            return PositionOrdering::Before;
        }
        if self.end <= query.start {
            return PositionOrdering::After;
        }
        PositionOrdering::Contains
    }
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
