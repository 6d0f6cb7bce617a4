use crate::domain::jobs::{JobPayload, StatusResponse, SubmitResponse, TokenError};
use crate::domain::video::VideoRequest;
use crate::ports::clock::Clock;
use crate::ports::provider::VideoProvider;
use tracing::{debug, info};

/// Issues job tokens and answers status checks from the token alone.
pub struct JobService<C, P> {
    clock: C,
    provider: P,
}

impl<C, P> JobService<C, P>
where
    C: Clock,
    P: VideoProvider,
{
    pub fn new(clock: C, provider: P) -> Self {
        Self { clock, provider }
    }

    pub fn submit(&self, request: &VideoRequest) -> Result<SubmitResponse, TokenError> {
        let ticket = self.provider.schedule(request);
        let payload = JobPayload::new(
            &ticket.provider,
            self.clock.now_ms(),
            ticket.ready_after_ms,
            &ticket.url,
            request,
        );
        let id = payload.encode()?;

        info!(
            provider = %ticket.provider,
            duration = %request.duration_seconds,
            aspect = %request.aspect_ratio,
            ready_after_ms = ticket.ready_after_ms,
            "Accepted generation request"
        );

        Ok(SubmitResponse::processing(id))
    }

    pub fn status(&self, id: &str) -> Result<StatusResponse, TokenError> {
        let payload = JobPayload::decode(id)?;
        let now = self.clock.now_ms();
        let state = payload.state_at(now);
        debug!(
            provider = %payload.provider,
            remaining_ms = payload.ready_at().saturating_sub(now),
            "Checked job"
        );

        Ok(StatusResponse {
            id: id.to_string(),
            state,
        })
    }
}
