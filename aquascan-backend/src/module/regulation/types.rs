use aquascan_common::Regulation;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Absent-value sentinel used by the bundled data for notes and devices
pub const NOT_SPECIFIED: &str = "Not specified";

static ZONE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^zone_(\d+)$").expect("zone key pattern is valid")
});

/// Fishing zone identifier (observed 1-29, not enforced)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u32);

impl ZoneId {
    /// Parse a data-file key such as `zone_12`. Zone 0 is rejected.
    pub fn from_key(key: &str) -> Option<Self> {
        let caps = ZONE_KEY.captures(key)?;
        let number: u32 = caps.get(1)?.as_str().parse().ok()?;
        (number > 0).then_some(ZoneId(number))
    }

    pub fn key(&self) -> String {
        format!("zone_{}", self.0)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ZoneId {
    fn from(value: u32) -> Self {
        ZoneId(value)
    }
}

/// Raw regulation row as stored in the bundled JSON
#[derive(Debug, Clone, Deserialize)]
pub struct RegulationRecord {
    pub species: String,
    pub catch_limit: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub fishing_device: Option<String>,
}

impl RegulationRecord {
    pub fn into_regulation(self) -> Regulation {
        Regulation {
            species: self.species,
            catch_limit: self.catch_limit,
            note: specified(self.note),
            fishing_device: specified(self.fishing_device),
        }
    }
}

fn specified(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !v.eq_ignore_ascii_case(NOT_SPECIFIED)
    })
}

/// Failure to load the bundled regulation or dictionary data
#[derive(Debug, thiserror::Error)]
pub enum RegulationDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no valid zone_<N> entries in regulation data")]
    NoZones,
}
