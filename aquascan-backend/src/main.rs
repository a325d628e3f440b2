use aquascan_backend::config;
use aquascan_backend::module::history::JsonHistoryStore;
use aquascan_backend::module::identify::IdentificationService;
use aquascan_backend::module::recognition::HttpRecognitionClient;
use aquascan_backend::module::regulation::RegulationStore;
use aquascan_backend::service::{self, AppState};

use anyhow::{Context, Result};
use std::sync::Arc;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = config::read_config(&config_path)?;

    // Initialize logging
    let _logging_guard = aquascan_backend::logging::init_logging(
        &config.log_dir,
        "aquascan-backend",
        &config.log_level,
        config.log_retention_days,
    )?;

    tracing::info!("AquaScan backend starting...");

    // Static regulation data, loaded once and swapped wholesale on reload
    let regulations = Arc::new(
        RegulationStore::load(&config.data.regulations_path, &config.data.species_names_path)
            .await
            .context("Failed to load regulation data")?,
    );

    let history = Arc::new(
        JsonHistoryStore::open(&config.history.path, config.history.capacity)
            .await
            .context("Failed to open history store")?,
    );

    let identifier = match HttpRecognitionClient::from_config(&config.recognition)? {
        Some(client) => {
            tracing::info!("Recognition service enabled");
            Some(Arc::new(IdentificationService::new(
                Arc::new(client),
                regulations.clone(),
                history.clone(),
                config.recognition.min_accuracy,
            )))
        }
        None => {
            tracing::warn!("No recognition endpoint configured, /identify is disabled");
            None
        }
    };

    let app = service::router(AppState {
        regulations,
        history,
        identifier,
    });

    let server_addr = config.server_address();
    tracing::info!("HTTP server starting on {}", server_addr);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
