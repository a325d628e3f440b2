//! Recognition service wire types

use aquascan_common::SpeciesGuess;
use serde::Deserialize;

/// Raw guess returned by the recognition API
#[derive(Debug, Deserialize)]
pub(crate) struct RawGuess {
    #[serde(default)]
    scientific_name: String,
    #[serde(default)]
    common_name: Option<String>,
    #[serde(default)]
    accuracy: f64,
}

/// Wrapper for the JSON response
#[derive(Debug, Deserialize)]
pub(crate) struct RecognitionResponse {
    #[serde(default)]
    results: Vec<RawGuess>,
}

impl RecognitionResponse {
    /// Guesses with a scientific name, best first
    pub(crate) fn into_ranked(self) -> Vec<SpeciesGuess> {
        let mut guesses: Vec<SpeciesGuess> = self
            .results
            .into_iter()
            .filter(|raw| !raw.scientific_name.trim().is_empty())
            .map(|raw| SpeciesGuess {
                scientific_name: raw.scientific_name.trim().to_string(),
                common_name: raw
                    .common_name
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty()),
                accuracy: raw.accuracy,
            })
            .collect();

        guesses.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
        guesses
    }
}

/// Failure talking to the recognition service
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("image is empty")]
    EmptyImage,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("recognition service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode recognition response: {0}")]
    Decode(#[from] serde_json::Error),
}
