//! Shared AquaScan types
//!
//! Wire-level types exchanged between the backend service and its clients:
//! regulation rows, verdicts, recognition guesses and history entries.

mod types;
pub use types::*;
