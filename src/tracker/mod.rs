//! Hit ingestion and the tracking redirect.

pub mod handlers;
pub mod ingest;

pub use handlers::TrackerState;
pub use ingest::{record_click, ClickOutcome, Hit};
