/// Pagination state definitions for one category traversal
use std::fmt;

/// Represents the current state of a category's pagination walk
///
/// ```text
/// Fetching -> Parsed -> HasNext -> Fetching ...
///                    -> Exhausted
/// Fetching -> Failed
/// Parsed   -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalState {
    // ===== Active States =====
    /// A listing page is being fetched
    Fetching,

    /// A listing page was fetched and its items and next link extracted
    Parsed,

    /// A next-page link was found and resolved
    HasNext,

    // ===== Terminal States =====
    /// No next-page link; the category ended normally
    Exhausted,

    /// A listing fetch or parse failed; the rest of the category is abandoned
    Failed,
}

impl TraversalState {
    /// Returns true if the transition `self -> next` is part of the state machine
    pub fn can_transition_to(&self, next: TraversalState) -> bool {
        matches!(
            (self, next),
            (Self::Fetching, Self::Parsed)
                | (Self::Fetching, Self::Failed)
                | (Self::Parsed, Self::HasNext)
                | (Self::Parsed, Self::Exhausted)
                | (Self::Parsed, Self::Failed)
                | (Self::HasNext, Self::Fetching)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::HasNext => "has_next",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
