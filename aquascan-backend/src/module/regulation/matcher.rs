//! Regulation matcher
//!
//! Decides whether a species may be kept in a zone. Pure and synchronous:
//! the same inputs and table always give the same verdict, and every
//! negative outcome is a verdict value rather than an error.
//!
//! # Decision order
//! 1. Unknown zone -> not allowed, terminal
//! 2. Regulations whose species text contains any candidate name (case-insensitive)
//! 3. Any match with a "prohibited" catch limit -> not allowed, all matches returned
//! 4. No match -> zone's "Other species" entry if present
//! 5. No match and no catch-all -> not allowed
//! 6. Otherwise allowed with all matches

use super::names::{SpeciesDictionary, resolve_candidates};
use super::table::RegulationTable;
use super::types::ZoneId;
use aquascan_common::{Regulation, RegulationVerdict, VerdictKind};

pub const ZONE_NOT_FOUND_MESSAGE: &str =
    "Zone data not found. Regulations for this zone are unavailable.";
pub const PROHIBITED_MESSAGE: &str = "Fishing for this species is prohibited in this zone.";
pub const GENERAL_REGULATIONS_MESSAGE: &str = "This species falls under general regulations.";
pub const NO_SPECIFIC_REGULATIONS_MESSAGE: &str =
    "No specific regulations found for this species. Please contact local authorities or release the fish.";

/// Evaluate one identification against a zone's regulations.
///
/// An empty `scientific_name` is not rejected here; callers are expected to
/// stop before matching when no identification is available.
pub fn evaluate(
    scientific_name: &str,
    common_name: Option<&str>,
    zone: ZoneId,
    table: &RegulationTable,
    dictionary: &SpeciesDictionary,
) -> RegulationVerdict {
    let Some(regulations) = table.zone(zone) else {
        tracing::debug!("Zone {} not present in regulation table", zone);
        return RegulationVerdict::new(
            VerdictKind::ZoneNotFound,
            Vec::new(),
            Some(ZONE_NOT_FOUND_MESSAGE),
        );
    };

    let candidates = resolve_candidates(scientific_name, common_name, dictionary);
    let needles: Vec<String> = candidates.iter().map(str::to_lowercase).collect();

    let matched: Vec<Regulation> = regulations
        .iter()
        .filter(|regulation| {
            let species = regulation.species.to_lowercase();
            needles.iter().any(|needle| species.contains(needle.as_str()))
        })
        .cloned()
        .collect();

    tracing::debug!(
        "Zone {}: candidates {:?} matched {} regulation(s)",
        zone,
        candidates.as_slice(),
        matched.len()
    );

    if matched.iter().any(Regulation::is_prohibited) {
        return RegulationVerdict::new(VerdictKind::Prohibited, matched, Some(PROHIBITED_MESSAGE));
    }

    if matched.is_empty() {
        return match regulations.iter().find(|r| r.is_catch_all()) {
            Some(catch_all) => RegulationVerdict::new(
                VerdictKind::GeneralRegulations,
                vec![catch_all.clone()],
                Some(GENERAL_REGULATIONS_MESSAGE),
            ),
            None => RegulationVerdict::new(
                VerdictKind::NoSpecificRegulations,
                Vec::new(),
                Some(NO_SPECIFIC_REGULATIONS_MESSAGE),
            ),
        };
    }

    RegulationVerdict::new(VerdictKind::Allowed, matched, None)
}
