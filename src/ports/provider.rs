use crate::domain::video::VideoRequest;

/// What a provider promises for a request: where the result will be and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTicket {
    pub provider: String,
    pub ready_after_ms: u64,
    pub url: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait VideoProvider: Send + Sync {
    /// Schedule a generation. Must not block: status is derived from the ticket later.
    fn schedule(&self, request: &VideoRequest) -> ProviderTicket;
}
