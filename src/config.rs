//! Configuration read from the environment (and `.env` when present).

#[cfg(feature = "server")]
use crate::adapters::canned::{
    CannedProvider, DEFAULT_PROVIDER_TAG, DEFAULT_READY_AFTER_MS, SAMPLE_VIDEO_URL,
};
#[cfg(feature = "client")]
use crate::application::controller::PollSettings;
use std::env;
#[cfg(feature = "client")]
use std::time::Duration;

fn var_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| String::from(default))
}

/// Numeric variables that fail to parse fall back to the default.
fn number_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn from_process(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Configuration for the generation server.
#[cfg(feature = "server")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    pub provider_tag: String,
    /// Time a job stays in `processing`
    pub ready_after_ms: u64,
    pub result_url: String,
    /// Served for 9:16 requests instead of `result_url` when set
    pub portrait_result_url: Option<String>,
}

#[cfg(feature = "server")]
impl ServerConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(from_process)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            addr: var_or(&lookup, "ADDR", "127.0.0.1"),
            port: var_or(&lookup, "PORT", "3000"),
            provider_tag: var_or(&lookup, "PROVIDER_TAG", DEFAULT_PROVIDER_TAG),
            ready_after_ms: number_or(&lookup, "READY_AFTER_MS", DEFAULT_READY_AFTER_MS),
            result_url: var_or(&lookup, "RESULT_URL", SAMPLE_VIDEO_URL),
            portrait_result_url: lookup("PORTRAIT_RESULT_URL").filter(|url| !url.is_empty()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    pub fn provider(&self) -> CannedProvider {
        let provider =
            CannedProvider::new(&self.provider_tag, self.ready_after_ms, &self.result_url);
        match &self.portrait_result_url {
            Some(url) => provider.with_portrait_url(url),
            None => provider,
        }
    }
}

/// Configuration for the chat client.
#[cfg(feature = "client")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll: PollSettings,
}

#[cfg(feature = "client")]
impl ClientConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(from_process)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PollSettings::default();
        let interval_ms =
            number_or(&lookup, "POLL_INTERVAL_MS", defaults.interval.as_millis() as u64);
        Self {
            api_base_url: var_or(&lookup, "API_BASE_URL", "http://127.0.0.1:3000"),
            poll: PollSettings {
                attempts: number_or(&lookup, "POLL_ATTEMPTS", defaults.attempts),
                interval: Duration::from_millis(interval_ms),
            },
        }
    }
}
