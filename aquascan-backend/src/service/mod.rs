//! HTTP API for the mobile client
//!
//! - `GET  /health`
//! - `GET  /zones`, `GET /zones/{zone}`
//! - `POST /evaluate` - verdict for a known species
//! - `POST /identify?zone=N&image_uri=...` - photo body, verdict for the best guess
//! - `GET  /history`, `DELETE /history`, `DELETE /history/{id}`
//! - `POST /admin/reload` - re-read the bundled data files

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody, ErrorDetail};
pub use handlers::{EvaluateRequest, ReloadResponse, ZoneDetail, ZoneSummary};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::module::history::JsonHistoryStore;
use crate::module::identify::IdentificationService;
use crate::module::regulation::RegulationStore;

/// Largest accepted photo upload
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub regulations: Arc<RegulationStore>,
    pub history: Arc<JsonHistoryStore>,
    /// `None` when no recognition endpoint is configured
    pub identifier: Option<Arc<IdentificationService>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/zones", get(handlers::list_zones))
        .route("/zones/{zone}", get(handlers::get_zone))
        .route("/evaluate", post(handlers::evaluate))
        .route(
            "/identify",
            post(handlers::identify).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route(
            "/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route("/history/{id}", delete(handlers::delete_history_entry))
        .route("/admin/reload", post(handlers::reload_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::history::HistoryRecorder;
    use crate::module::recognition::{RecognitionClient, RecognitionError};
    use crate::module::regulation::{
        RegulationData, RegulationTable, SpeciesDictionary, ZoneId, PROHIBITED_MESSAGE,
    };
    use aquascan_common::{HistoryEntry, Regulation, RegulationVerdict, SpeciesGuess, VerdictKind};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct WalleyeRecognition;

    #[async_trait]
    impl RecognitionClient for WalleyeRecognition {
        async fn identify(
            &self,
            _image: &[u8],
            _content_type: &str,
        ) -> Result<Vec<SpeciesGuess>, RecognitionError> {
            Ok(vec![SpeciesGuess {
                scientific_name: "Sander vitreus".to_string(),
                common_name: None,
                accuracy: 0.88,
            }])
        }
    }

    async fn test_state(dir: &TempDir, with_recognition: bool) -> AppState {
        let table = RegulationTable::from_zones([
            (
                ZoneId(3),
                vec![
                    Regulation::new("Brook Trout", "10 per day"),
                    Regulation::new("Other species", "2 per day"),
                ],
            ),
            (ZoneId(5), vec![Regulation::new("Walleye", "6 per day")]),
            (ZoneId(12), vec![Regulation::new("Atlantic Salmon", "prohibited")]),
        ]);
        let dictionary = SpeciesDictionary::new(HashMap::from([
            ("Sander vitreus".to_string(), "Walleye".to_string()),
            ("Salmo salar".to_string(), "Atlantic Salmon".to_string()),
        ]));
        let regulations = Arc::new(RegulationStore::from_data(RegulationData::new(
            table, dictionary,
        )));
        let history = Arc::new(
            JsonHistoryStore::open(dir.path().join("history.json"), 50)
                .await
                .unwrap(),
        );

        let identifier = with_recognition.then(|| {
            Arc::new(IdentificationService::new(
                Arc::new(WalleyeRecognition),
                regulations.clone(),
                history.clone(),
                0.0,
            ))
        });

        AppState {
            regulations,
            history,
            identifier,
        }
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn evaluate_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = router(test_state(&dir, false).await);

        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_evaluate_prohibited() {
        let dir = TempDir::new().unwrap();
        let app = router(test_state(&dir, false).await);

        let resp = app
            .oneshot(evaluate_request(r#"{"scientific_name":"Salmo salar","zone":12}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let verdict: RegulationVerdict = body_json(resp).await;
        assert!(!verdict.is_allowed);
        assert_eq!(verdict.kind, VerdictKind::Prohibited);
        assert_eq!(verdict.message.as_deref(), Some(PROHIBITED_MESSAGE));
    }

    #[tokio::test]
    async fn test_evaluate_unknown_zone_is_a_verdict() {
        let dir = TempDir::new().unwrap();
        let app = router(test_state(&dir, false).await);

        let resp = app
            .oneshot(evaluate_request(r#"{"scientific_name":"Sander vitreus","zone":28}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let verdict: RegulationVerdict = body_json(resp).await;
        assert_eq!(verdict.kind, VerdictKind::ZoneNotFound);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let app = router(test_state(&dir, false).await);

        let resp = app
            .oneshot(evaluate_request(r#"{"scientific_name":"  ","zone":5}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_zones() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, false).await;

        let resp = router(state.clone())
            .oneshot(Request::builder().uri("/zones").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let zones: Vec<ZoneSummary> = body_json(resp).await;
        assert_eq!(zones.len(), 3);
        assert!(zones[0].has_catch_all);

        let resp = router(state.clone())
            .oneshot(Request::builder().uri("/zones/5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let detail: ZoneDetail = body_json(resp).await;
        assert_eq!(detail.regulations[0].species, "Walleye");

        let resp = router(state)
            .oneshot(Request::builder().uri("/zones/99").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_identify_without_recognition_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let app = router(test_state(&dir, false).await);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/identify?zone=5")
                    .body(Body::from(vec![1u8, 2, 3]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_identify_then_history() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, true).await;

        let resp = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/identify?zone=5&image_uri=file%3A%2F%2F%2Fphotos%2F1.jpg")
                    .header("content-type", "image/jpeg")
                    .body(Body::from(vec![0xffu8, 0xd8, 0xff]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let outcome: serde_json::Value = body_json(resp).await;
        assert_eq!(outcome["verdict"]["kind"], "allowed");
        assert_eq!(outcome["guess"]["scientific_name"], "Sander vitreus");

        let resp = router(state.clone())
            .oneshot(Request::builder().uri("/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let history: Vec<HistoryEntry> = body_json(resp).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].species, "Walleye");
        assert_eq!(history[0].image_uri, "file:///photos/1.jpg");

        let resp = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/history/{}", history[0].id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(state.history.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_history_entry() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, false).await;
        state
            .history
            .append(HistoryEntry::new("file:///a.jpg", "Walleye", "Sander vitreus"))
            .await
            .unwrap();

        let resp = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/history/{}", uuid::Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(state.history.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_reload_without_files_is_internal_error() {
        let dir = TempDir::new().unwrap();
        let app = router(test_state(&dir, false).await);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorBody = body_json(resp).await;
        assert_eq!(body.error.message, "Internal server error");
    }
}
