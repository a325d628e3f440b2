//! Identification flow - photo -> species guess -> regulation verdict -> history
//!
//! Recognition and history failures are absorbed here: the caller always
//! gets an outcome, at worst "no identification".

use super::history::HistoryRecorder;
use super::recognition::RecognitionClient;
use super::regulation::{RegulationStore, ZoneId, display_name};
use aquascan_common::{HistoryEntry, RegulationVerdict, SpeciesGuess};
use serde::Serialize;
use std::sync::Arc;

pub const NO_IDENTIFICATION_MESSAGE: &str =
    "Could not identify the fish in this photo. Please try another picture.";
pub const NO_ZONE_MESSAGE: &str = "Select a fishing zone to see the regulations for this species.";

/// One photo submitted for identification
#[derive(Debug, Clone, Copy)]
pub struct IdentifyRequest<'a> {
    pub image: &'a [u8],
    pub content_type: &'a str,
    /// Where the client keeps the photo; stored in history only
    pub image_uri: &'a str,
    pub zone: Option<ZoneId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentificationOutcome {
    /// Best guess, absent when nothing usable came back
    pub guess: Option<SpeciesGuess>,
    /// Remaining guesses, best first
    pub alternatives: Vec<SpeciesGuess>,
    pub verdict: Option<RegulationVerdict>,
    pub message: Option<String>,
}

impl IdentificationOutcome {
    fn unidentified() -> Self {
        Self {
            message: Some(NO_IDENTIFICATION_MESSAGE.to_string()),
            ..Self::default()
        }
    }
}

pub struct IdentificationService {
    recognition: Arc<dyn RecognitionClient>,
    regulations: Arc<RegulationStore>,
    history: Arc<dyn HistoryRecorder>,
    min_accuracy: f64,
}

impl IdentificationService {
    pub fn new(
        recognition: Arc<dyn RecognitionClient>,
        regulations: Arc<RegulationStore>,
        history: Arc<dyn HistoryRecorder>,
        min_accuracy: f64,
    ) -> Self {
        Self {
            recognition,
            regulations,
            history,
            min_accuracy,
        }
    }

    pub async fn identify(&self, request: IdentifyRequest<'_>) -> IdentificationOutcome {
        if request.image.is_empty() {
            tracing::debug!("Empty image submitted, skipping recognition");
            return IdentificationOutcome::unidentified();
        }

        let mut guesses = match self
            .recognition
            .identify(request.image, request.content_type)
            .await
        {
            Ok(guesses) => guesses,
            Err(e) => {
                tracing::warn!("Fish recognition failed: {}", e);
                return IdentificationOutcome::unidentified();
            }
        };

        if guesses.is_empty() {
            tracing::info!("Recognition returned no species");
            return IdentificationOutcome::unidentified();
        }
        // Stable sort: equally scored guesses keep the client's order
        guesses.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
        let best = guesses.remove(0);
        if best.accuracy < self.min_accuracy {
            tracing::info!(
                "Best guess {} ({:.2}) below minimum accuracy {:.2}",
                best.scientific_name,
                best.accuracy,
                self.min_accuracy
            );
            return IdentificationOutcome::unidentified();
        }

        let data = self.regulations.snapshot().await;
        let common_name = best.common_name.as_deref();
        let verdict = request
            .zone
            .map(|zone| data.evaluate(&best.scientific_name, common_name, zone));

        tracing::info!(
            "Identified {} ({:.2}) in zone {:?}: {}",
            best.scientific_name,
            best.accuracy,
            request.zone.map(|z| z.0),
            verdict.as_ref().map_or("no zone", |v| v.kind.as_str())
        );

        let species = display_name(&best.scientific_name, common_name, &data.dictionary);
        let mut entry =
            HistoryEntry::new(request.image_uri, species, best.scientific_name.clone());
        if let (Some(zone), Some(verdict)) = (request.zone, verdict.as_ref()) {
            entry = entry.with_verdict(zone.0, verdict);
        }
        if let Err(e) = self.history.append(entry).await {
            tracing::warn!("Failed to save identification to history: {}", e);
        }

        let message = match verdict {
            Some(_) => None,
            None => Some(NO_ZONE_MESSAGE.to_string()),
        };

        IdentificationOutcome {
            guess: Some(best),
            alternatives: guesses,
            verdict,
            message,
        }
    }
}
