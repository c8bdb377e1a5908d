//! Presentation hook layer: grouped feed state for screens.
//!
//! Composes one task subscription with the sort/group engine into the
//! `{groups, loading, error, synced}` value a screen renders. The layer is
//! thin by contract: it owns no policy beyond capturing "now" once per
//! delivery and memoizing the projection for repeated identical passes.

mod feed;

pub use feed::{TaskFeed, TaskFeedState};

#[cfg(test)]
mod tests;
