//! HTTP Server for the channelstats API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/upload`     | Upload an analytics export           |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |
//!
//! Each upload is analyzed on a blocking task with its own buffer; the only
//! thing shared between requests is the read-only configuration.

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, UploadResponse};
use crate::analysis::analyze_bytes;
use crate::config::AnalysisConfig;
use crate::error::{ParseError, PipelineError, ServerError, ServerResult};

type Reply = (StatusCode, Json<Value>);

#[derive(Clone)]
struct AppState {
    config: Arc<AnalysisConfig>,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Pipeline(PipelineError::Schema(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Pipeline(PipelineError::Parse(ParseError::Io(_))) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Pipeline(PipelineError::Parse(_)) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_reply(self) -> Reply {
        let message = match &self {
            // user-facing message without the layer prefix
            Self::Pipeline(e) => e.to_string(),
            other => other.to_string(),
        };
        (self.status_code(), Json(error_response(&message)))
    }
}

/// Build the router.
pub fn router(config: AnalysisConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_export))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(AppState {
            config: Arc::new(config),
        })
}

/// Start the HTTP server
pub async fn start_server(port: u16, config: AnalysisConfig) -> ServerResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 Channelstats server running on http://localhost:{}", port);
    eprintln!("   POST /api/upload - Upload analytics export (field 'file', optional 'year')");
    eprintln!("   GET  /api/logs   - SSE log stream");
    eprintln!("   GET  /health     - Health check");
    eprintln!("   Reporting year:  {}", config.reporting_year);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(format!("cannot bind {}: {}", addr, e)))?;
    axum::serve(listener, router(config))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "channelstats",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint
async fn upload_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, Reply> {
    handle_upload(state, multipart)
        .await
        .map(Json)
        .map_err(|e| {
            log_error(format!("Upload failed: {}", e));
            e.into_reply()
        })
}

async fn handle_upload(state: AppState, mut multipart: Multipart) -> ServerResult<UploadResponse> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut year: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                file_data = Some(bytes.to_vec());
            }
            "year" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                year = Some(text.trim().parse().map_err(|_| {
                    ServerError::BadRequest(format!("Invalid year: {}", text.trim()))
                })?);
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    let mut config = (*state.config).clone();
    if let Some(year) = year {
        config.reporting_year = year;
    }

    let report = tokio::task::spawn_blocking(move || analyze_bytes(&bytes, &config))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(UploadResponse::new(report, file_name))
}
