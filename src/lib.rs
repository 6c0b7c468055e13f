// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod config;
pub mod metrics;
pub mod poll;
pub mod store;
pub mod timefmt;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::AggregatedSeries;
pub use crate::api::create_router;
pub use crate::poll::types::{AttributeKind, FetchError, Sample, SampleSource};
pub use crate::store::SeriesStore;
