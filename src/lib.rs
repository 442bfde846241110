pub mod config;
pub mod error;
pub mod server;
pub mod summarize;
pub mod youtube;

use serde::{Deserialize, Serialize};

pub use error::{Error, Result};

const SHORT_LINK_MARKER: &str = "youtu.be/";
const WATCH_PARAM_MARKER: &str = "v=";

/// A single captioned segment
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// All caption fragments joined by a single space, timing discarded
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Body of `POST /summarize`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoRequest {
    pub url: String,
}

/// Successful `POST /summarize` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Extract the video ID from a `youtu.be/ID` or `...?v=ID` URL.
///
/// The short-link form wins when both markers are present. Everything after the
/// marker up to the next `?` (short link) or `&` (watch URL) is the ID; nothing
/// else about the ID is checked.
pub fn extract_video_id(url: &str) -> Result<String> {
    if let Some((_, rest)) = url.split_once(SHORT_LINK_MARKER) {
        return Ok(rest.split('?').next().unwrap_or_default().to_string());
    }

    if let Some((_, rest)) = url.split_once(WATCH_PARAM_MARKER) {
        return Ok(rest.split('&').next().unwrap_or_default().to_string());
    }

    Err(Error::InvalidInput("Invalid YouTube URL".to_string()))
}
