//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the common [`Entry`]
//! type.  Concrete source implementations live in sub-modules (currently
//! only [`graphql`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `jsonapi.rs`).
//! 2. Define a struct and implement [`FeedSource`] for it.
//! 3. Add the `mod` declaration below and re-export your struct in the
//!    `pub use` block.
//! 4. Construct an instance in `main.rs` and hand it to `fetch::spawn`.
//!
//! The fetch worker, pagination state machine, and UI are all
//! source-agnostic.

mod entry;
pub mod graphql;
pub mod query;

// Re-export the public API of this module so callers can write
// `use crate::source::{Entry, FeedSource, GraphqlSource};`
pub use entry::{CategoryRef, Entry, ImageRef};
pub use graphql::GraphqlSource;

use anyhow::Result;

/// Trait that every feed source must implement.
///
/// The fetch worker calls these on a background thread, so implementations
/// must be [`Send`].  Errors are propagated to the controller, which
/// renders them as the no-results interface.
pub trait FeedSource: Send {
    /// Human-readable label shown in logs and the status bar.
    fn name(&self) -> &str;

    /// Fetch up to `limit` entries starting at the cumulative `offset`.
    fn fetch_entries(&self, offset: usize, limit: usize) -> Result<Vec<Entry>>;

    /// Fetch the total number of entries matching the configured filters.
    ///
    /// Called once, after the initial page, and only when lazy-load is
    /// enabled; the total exists solely to size the load-more affordance.
    fn fetch_total(&self) -> Result<usize>;
}
