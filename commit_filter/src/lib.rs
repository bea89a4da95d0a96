//! Keeps the contributor/date filter of the dashboard and the commits matching it.
//!
//! [`FilterHolder`] owns a [`FilterState`] and exposes the mutators. Every mutation that leaves
//! the filter complete asks the [`QueryCoordinator`] for exactly one new lookup. Lookups run as
//! tokio tasks and report back through a channel, results are applied in [`FilterHolder::process`]
//! only if no newer lookup was issued in the meantime.

mod coordinator;
mod error;
mod holder;
mod policy;
mod state;
pub mod utils;

pub use coordinator::{CoordinatorOptions, FetchKind, Generation, Processed, QueryCoordinator};
pub use error::FilterError;
pub use holder::{FilterHolder, FilterOptions};
pub use policy::RangePolicy;
pub use state::FilterState;
