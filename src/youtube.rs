use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Segment, Transcript};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Anything that can turn a video ID into an ordered list of caption fragments
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript>;
}

/// Fetch a transcript and flatten it into a single space-joined string.
///
/// Every collaborator failure becomes [`crate::Error::TranscriptFetch`].
pub async fn get_transcript(source: &dyn TranscriptSource, video_id: &str) -> crate::Result<String> {
    let transcript = source
        .fetch_transcript(video_id)
        .await
        .map_err(crate::Error::transcript_fetch)?;
    debug!(
        "Fetched {} caption segments for {video_id} (lang={})",
        transcript.segments.len(),
        transcript.language
    );
    Ok(transcript.text())
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Caption tracks published by YouTube itself, read through the InnerTube API
#[derive(Debug, Clone)]
pub struct YouTubeCaptions {
    client: reqwest::Client,
    base_url: String,
    lang: String,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            lang: lang.into(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeCaptions {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self.get_text(&watch_url).await?;
        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("{}/youtubei/v1/player?key={api_key}&prettyPrint=false", self.base_url);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let track = select_track(resp, &self.lang, video_id)?;
        debug!("Using caption track: lang={}", track.language_code);

        // Step 3: Fetch the caption XML
        let caption_xml = self.get_text(&track.base_url).await?;
        let segments = parse_caption_xml(&caption_xml)?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            language: track.language_code,
            segments,
        })
    }
}

/// Pick the requested language track, or fall back to the first available
fn select_track(resp: InnerTubePlayerResponse, lang: &str, video_id: &str) -> Result<CaptionTrack> {
    if let Some(PlayabilityStatus {
        status: Some(status),
        reason,
    }) = &resp.playability_status
    {
        if status != "OK" {
            let reason = reason.as_deref().unwrap_or("no reason given");
            bail!("video {video_id} is unplayable ({status}): {reason}");
        }
    }

    let mut tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        bail!("no captions available for video {video_id}");
    }

    let index = tracks.iter().position(|t| t.language_code == lang).unwrap_or(0);
    Ok(tracks.swap_remove(index))
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    bail!("could not extract InnerTube API key from watch page");
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.as_ref() {
                        b"start" => start = value.parse::<f64>().ok(),
                        b"dur" => dur = value.parse::<f64>().ok(),
                        _ => {}
                    }
                }
                // Some tracks omit dur on the last cue
                current = start.map(|s| (s, dur.unwrap_or(0.0)));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = current.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.trim().is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
