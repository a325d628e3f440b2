use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aquascan_common::{HistoryEntry, Regulation, RegulationVerdict};

use super::AppState;
use super::error::ApiError;
use crate::module::identify::{IdentificationOutcome, IdentifyRequest};
use crate::module::regulation::ZoneId;

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone: u32,
    pub regulations: usize,
    pub has_catch_all: bool,
}

pub async fn list_zones(State(state): State<AppState>) -> Json<Vec<ZoneSummary>> {
    let data = state.regulations.snapshot().await;
    let zones = data
        .table
        .zone_ids()
        .filter_map(|zone| {
            let regulations = data.table.zone(zone)?;
            Some(ZoneSummary {
                zone: zone.0,
                regulations: regulations.len(),
                has_catch_all: regulations.iter().any(Regulation::is_catch_all),
            })
        })
        .collect();
    Json(zones)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneDetail {
    pub zone: u32,
    pub regulations: Vec<Regulation>,
}

pub async fn get_zone(
    State(state): State<AppState>,
    Path(zone): Path<u32>,
) -> Result<Json<ZoneDetail>, ApiError> {
    let data = state.regulations.snapshot().await;
    let regulations = data
        .table
        .zone(ZoneId(zone))
        .ok_or_else(|| ApiError::NotFound(format!("zone {} has no regulation data", zone)))?;

    Ok(Json(ZoneDetail {
        zone,
        regulations: regulations.to_vec(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub scientific_name: String,
    #[serde(default)]
    pub common_name: Option<String>,
    pub zone: u32,
}

pub async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<RegulationVerdict>, ApiError> {
    // No identification, nothing to match
    if request.scientific_name.trim().is_empty() {
        return Err(ApiError::Validation("scientific_name must not be empty".to_string()));
    }

    let verdict = state
        .regulations
        .evaluate(
            &request.scientific_name,
            request.common_name.as_deref(),
            ZoneId(request.zone),
        )
        .await;
    Ok(Json(verdict))
}

#[derive(Debug, Deserialize)]
pub struct IdentifyParams {
    #[serde(default)]
    pub zone: Option<u32>,
    #[serde(default)]
    pub image_uri: Option<String>,
}

pub async fn identify(
    State(state): State<AppState>,
    Query(params): Query<IdentifyParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IdentificationOutcome>, ApiError> {
    let identifier = state.identifier.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("recognition service is not configured".to_string())
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_IMAGE_TYPE);

    let outcome = identifier
        .identify(IdentifyRequest {
            image: &body,
            content_type,
            image_uri: params.image_uri.as_deref().unwrap_or_default(),
            zone: params.zone.map(ZoneId),
        })
        .await;
    Ok(Json(outcome))
}

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.list().await)
}

pub async fn delete_history_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.history.remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("history entry {}", id)))
    }
}

pub async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub zones: usize,
    pub regulations: usize,
    pub species_names: usize,
}

pub async fn reload_data(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let data = state.regulations.reload().await?;
    let stats = data.table.stats();
    Ok(Json(ReloadResponse {
        zones: stats.zones,
        regulations: stats.regulations,
        species_names: data.dictionary.len(),
    }))
}
