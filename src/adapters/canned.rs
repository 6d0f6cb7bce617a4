//! Mock generation provider that always answers with the same sample video.

use crate::domain::video::{AspectRatio, VideoRequest};
use crate::ports::provider::{ProviderTicket, VideoProvider};

pub const DEFAULT_PROVIDER_TAG: &str = "veo3-mock";
pub const DEFAULT_READY_AFTER_MS: u64 = 3000;
pub const SAMPLE_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CannedProvider {
    tag: String,
    ready_after_ms: u64,
    landscape_url: String,
    /// Falls back to the landscape asset when unset.
    portrait_url: Option<String>,
}

impl CannedProvider {
    pub fn new(tag: &str, ready_after_ms: u64, landscape_url: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ready_after_ms,
            landscape_url: landscape_url.to_string(),
            portrait_url: None,
        }
    }

    pub fn with_portrait_url(mut self, url: &str) -> Self {
        self.portrait_url = Some(url.to_string());
        self
    }
}

impl Default for CannedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_TAG, DEFAULT_READY_AFTER_MS, SAMPLE_VIDEO_URL)
    }
}

impl VideoProvider for CannedProvider {
    fn schedule(&self, request: &VideoRequest) -> ProviderTicket {
        let url = match (request.aspect_ratio, &self.portrait_url) {
            (AspectRatio::Portrait, Some(portrait)) => portrait.clone(),
            _ => self.landscape_url.clone(),
        };
        ProviderTicket {
            provider: self.tag.clone(),
            ready_after_ms: self.ready_after_ms,
            url,
        }
    }
}
