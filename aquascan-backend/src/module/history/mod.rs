//! Identification history
//!
//! Capped, newest-first log of past identifications kept in a JSON file.

mod store;
pub use store::{DEFAULT_CAPACITY, HistoryError, HistoryRecorder, JsonHistoryStore};
