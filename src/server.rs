//! HTTP surface: `GET /` and `POST /summarize`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info, warn};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::summarize::Summarizer;
use crate::youtube::{self, TranscriptSource};
use crate::{Error, Result, SummaryResponse, VideoRequest};

/// Collaborators shared by every request
#[derive(Clone)]
pub struct AppState {
    pub transcripts: Arc<dyn TranscriptSource>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    pub fn new(transcripts: impl TranscriptSource + 'static, summarizer: impl Summarizer + 'static) -> Self {
        Self {
            transcripts: Arc::new(transcripts),
            summarizer: Arc::new(summarizer),
        }
    }
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/summarize", post(summarize))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// CORS for the browser front-end. A `*` entry opens the API to every origin
/// but then credentials cannot be allowed.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {o}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub greeting: &'static str,
    pub message: &'static str,
}

async fn root() -> Json<Greeting> {
    Json(Greeting {
        greeting: "Hello, World!",
        message: "Welcome to FastAPI!",
    })
}

async fn summarize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected /summarize body: {}", rejection.body_text());
        Error::from(rejection)
    })?;

    match summarize_video(&state, &request.url).await {
        Ok(summary) => Ok(Json(summary)),
        Err(err) => {
            warn!("Summarizing {} failed: {}", request.url, err.detail());
            Err(err)
        }
    }
}

/// parse → fetch → summarize, aborting on the first failure
pub async fn summarize_video(state: &AppState, url: &str) -> Result<SummaryResponse> {
    let video_id = crate::extract_video_id(url)?;
    info!("Summarizing video {video_id}");

    let transcript = youtube::get_transcript(state.transcripts.as_ref(), &video_id).await?;
    debug!("Transcript for {video_id} is {} chars", transcript.len());

    let summary = state
        .summarizer
        .summarize(&transcript)
        .await
        .map_err(Error::summarization)?;

    Ok(SummaryResponse { summary })
}
