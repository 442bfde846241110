use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ytsum::youtube::TranscriptSource;
use ytsum::{Segment, Transcript};

#[derive(Clone, Default)]
pub struct MockTranscripts {
    pub fragments: Vec<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockTranscripts {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl TranscriptSource for MockTranscripts {
    async fn fetch_transcript(&self, video_id: &str) -> eyre::Result<Transcript> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(eyre::eyre!("{}", msg));
        }
        Ok(Transcript {
            video_id: video_id.to_string(),
            language: "en".to_string(),
            segments: self
                .fragments
                .iter()
                .map(|text| Segment {
                    text: text.clone(),
                    start: 0.0,
                    duration: 1.0,
                })
                .collect(),
        })
    }
}
