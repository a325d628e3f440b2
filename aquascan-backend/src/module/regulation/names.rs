//! Name resolver - scientific name to candidate match names
//!
//! Candidates come from three places, in this order:
//! - the scientific name itself (e.g. "Sander vitreus")
//! - a common name supplied by the caller or the recognition service
//! - the bundled scientific -> common dictionary (e.g. "Walleye")

use super::types::RegulationDataError;
use std::collections::HashMap;
use std::path::Path;

/// Static scientific -> common name dictionary
#[derive(Debug, Clone, Default)]
pub struct SpeciesDictionary {
    names: HashMap<String, String>,
}

impl SpeciesDictionary {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Load from a JSON object file
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RegulationDataError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        tracing::info!("Loading species dictionary from: {}", path_str);

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RegulationDataError::Io {
                path: path_str,
                source,
            })?;

        let dictionary = Self::parse_json(&content)?;
        tracing::info!("Loaded {} species names", dictionary.len());

        Ok(dictionary)
    }

    pub fn parse_json(content: &str) -> Result<Self, RegulationDataError> {
        let names: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { names })
    }

    /// Exact-key lookup; keys are not whitespace-normalised
    pub fn common_name(&self, scientific_name: &str) -> Option<&str> {
        self.names.get(scientific_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Deduplicated, insertion-ordered candidate names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateNames(Vec<String>);

impl CandidateNames {
    /// Blank names are dropped; others are kept verbatim
    fn push(&mut self, name: &str) {
        if name.trim().is_empty() || self.0.iter().any(|n| n == name) {
            return;
        }
        self.0.push(name.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Build the candidate set `{scientific, common, dictionary[scientific]}`.
/// A missing dictionary entry is a normal case.
pub fn resolve_candidates(
    scientific_name: &str,
    common_name: Option<&str>,
    dictionary: &SpeciesDictionary,
) -> CandidateNames {
    let mut candidates = CandidateNames::default();
    candidates.push(scientific_name);
    if let Some(common) = common_name {
        candidates.push(common);
    }
    if let Some(mapped) = dictionary.common_name(scientific_name) {
        candidates.push(mapped);
    }
    candidates
}

/// Label for display: supplied common name, else dictionary name, else scientific name
pub fn display_name(
    scientific_name: &str,
    common_name: Option<&str>,
    dictionary: &SpeciesDictionary,
) -> String {
    common_name
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| dictionary.common_name(scientific_name))
        .unwrap_or(scientific_name)
        .to_string()
}
