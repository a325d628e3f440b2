use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Species label used by a zone's catch-all regulation
pub const CATCH_ALL_SPECIES: &str = "other species";

/// Catch-limit marker for a closed fishery
pub const PROHIBITED_MARKER: &str = "prohibited";

/// One regulation row of a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// Free-text species label (common name, scientific name or "Other species")
    pub species: String,
    /// Free-text catch limit, e.g. "6 per day" or "Prohibited"
    pub catch_limit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fishing_device: Option<String>,
}

impl Regulation {
    pub fn new(species: impl Into<String>, catch_limit: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            catch_limit: catch_limit.into(),
            note: None,
            fishing_device: None,
        }
    }

    /// Catch limit mentions "prohibited" in any case
    pub fn is_prohibited(&self) -> bool {
        self.catch_limit.to_lowercase().contains(PROHIBITED_MARKER)
    }

    /// The zone's "Other species" entry (exact, case-insensitive)
    pub fn is_catch_all(&self) -> bool {
        self.species.to_lowercase() == CATCH_ALL_SPECIES
    }

    /// Leading integer of the catch limit, e.g. "6 per day" -> 6
    pub fn daily_limit(&self) -> Option<u32> {
        let digits: String = self
            .catch_limit
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// Outcome class of a regulation verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Allowed,
    Prohibited,
    GeneralRegulations,
    NoSpecificRegulations,
    ZoneNotFound,
}

impl VerdictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::Allowed => "allowed",
            VerdictKind::Prohibited => "prohibited",
            VerdictKind::GeneralRegulations => "general_regulations",
            VerdictKind::NoSpecificRegulations => "no_specific_regulations",
            VerdictKind::ZoneNotFound => "zone_not_found",
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, VerdictKind::Allowed | VerdictKind::GeneralRegulations)
    }
}

impl std::fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VerdictKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allowed" => Ok(VerdictKind::Allowed),
            "prohibited" => Ok(VerdictKind::Prohibited),
            "general_regulations" | "general" => Ok(VerdictKind::GeneralRegulations),
            "no_specific_regulations" | "no_match" => Ok(VerdictKind::NoSpecificRegulations),
            "zone_not_found" => Ok(VerdictKind::ZoneNotFound),
            _ => Err(format!("Unknown verdict kind: {}", s)),
        }
    }
}

/// Matcher output for one species in one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationVerdict {
    pub is_allowed: bool,
    pub kind: VerdictKind,
    pub matched_regulations: Vec<Regulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegulationVerdict {
    pub fn new(
        kind: VerdictKind,
        matched_regulations: Vec<Regulation>,
        message: Option<&str>,
    ) -> Self {
        Self {
            is_allowed: kind.is_allowed(),
            kind,
            matched_regulations,
            message: message.map(str::to_string),
        }
    }
}

/// One ranked guess from the recognition service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGuess {
    pub scientific_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Confidence in 0.0 - 1.0
    #[serde(default)]
    pub accuracy: f64,
}

/// One row of the identification history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub image_uri: String,
    /// Display label (common name when known)
    pub species: String,
    pub scientific_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_allowed: Option<bool>,
    pub date: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        image_uri: impl Into<String>,
        species: impl Into<String>,
        scientific_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            image_uri: image_uri.into(),
            species: species.into(),
            scientific_name: scientific_name.into(),
            zone: None,
            is_allowed: None,
            date: Utc::now(),
        }
    }

    pub fn with_verdict(mut self, zone: u32, verdict: &RegulationVerdict) -> Self {
        self.zone = Some(zone);
        self.is_allowed = Some(verdict.is_allowed);
        self
    }
}
