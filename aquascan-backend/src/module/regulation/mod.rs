//! Fishing regulation lookup
//!
//! ## Data
//! - `RegulationTable`: zone -> ordered regulation rows (bundled JSON)
//! - `SpeciesDictionary`: scientific -> common names (bundled JSON)
//!
//! ## Main Components
//! - `resolve_candidates`: names used for matching a species
//! - `evaluate`: pure verdict for one species in one zone
//! - `RegulationStore`: shared snapshot with wholesale reload

// ============ Core Data Structures ============
mod types;
pub use types::{NOT_SPECIFIED, RegulationDataError, RegulationRecord, ZoneId};

// ============ Static Data ============
mod table;
pub use table::{RegulationTable, TableStats};

mod names;
pub use names::{CandidateNames, SpeciesDictionary, display_name, resolve_candidates};

// ============ Matching ============
mod matcher;
pub use matcher::{
    GENERAL_REGULATIONS_MESSAGE, NO_SPECIFIC_REGULATIONS_MESSAGE, PROHIBITED_MESSAGE,
    ZONE_NOT_FOUND_MESSAGE, evaluate,
};

// ============ Shared Snapshot ============
mod store;
pub use store::{RegulationData, RegulationStore};
