//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `TraversalState`: the pagination state machine one category walks through
//!   (fetching, parsed, has-next, exhausted, failed)

mod traversal_state;

pub use traversal_state::TraversalState;
