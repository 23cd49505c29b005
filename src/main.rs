//! Customer Churn Analyzer - Main Entry Point
//!
//! Loads the churn model, then serves the interactive prediction page.

use anyhow::{Context, Result};
use churn_analyzer::{
    config::{AppConfig, LoggingConfig},
    metrics::{MetricsReporter, PredictionMetrics},
    web::{build_router, AppState},
    ChurnPredictor,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("churn_analyzer={}", logging.level).parse()?)
            .add_directive(format!("tower_http={}", logging.level).parse()?),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Customer Churn Analyzer");

    let metrics = Arc::new(PredictionMetrics::new());

    // Load the model once; a failure halts the page but keeps serving the message
    let state = match ChurnPredictor::load(&config.model, metrics.clone()) {
        Ok(predictor) => {
            info!(
                model = %predictor.model_name(),
                path = %config.model.path.display(),
                "Churn model ready"
            );
            AppState::ready(predictor, metrics.clone())
        }
        Err(e) => {
            error!(
                path = %e.path().display(),
                error = %e,
                "Model could not be loaded; prediction disabled"
            );
            AppState::halted(&e, metrics.clone())
        }
    };

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Churn analyzer listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server error")?;

    info!("Shutting down...");
    metrics.print_summary();

    Ok(())
}
