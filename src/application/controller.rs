//! Client-side session driver.
//!
//! Bridges form edits and chat commands to the [`GenerationApi`] and polls a
//! job until its video is ready. Every generation takes a fresh epoch; a poll
//! loop whose epoch is no longer current stops without touching the session,
//! so the most recent generation always owns the displayed result.

use crate::domain::chat::ChatLog;
use crate::domain::command::CommandReply;
use crate::domain::video::{truncate_prompt, AspectRatio, ClipDuration, VideoRequest};
use crate::ports::generation::{ClientError, GenerationApi};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const DEFAULT_POLL_ATTEMPTS: u32 = 40;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Everything the user sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub request: VideoRequest,
    pub messages: ChatLog,
    pub job_id: Option<String>,
    pub video_url: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed(String),
    /// The attempt budget ran out while the job was still processing.
    GaveUp,
    /// A newer generation started before this one finished.
    Superseded,
}

pub struct ClientController<A> {
    api: Arc<A>,
    session: Arc<Mutex<Session>>,
    epoch: Arc<AtomicU64>,
    poll: PollSettings,
}

impl<A> Clone for ClientController<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
            epoch: self.epoch.clone(),
            poll: self.poll,
        }
    }
}

impl<A> ClientController<A>
where
    A: GenerationApi,
{
    pub fn new(api: A, poll: PollSettings) -> Self {
        Self {
            api: Arc::new(api),
            session: Arc::new(Mutex::new(Session::default())),
            epoch: Arc::new(AtomicU64::new(0)),
            poll,
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn set_prompt(&self, prompt: &str) {
        self.session.lock().await.request.prompt = truncate_prompt(prompt);
    }

    pub async fn set_duration(&self, duration: ClipDuration) {
        self.session.lock().await.request.duration_seconds = duration;
    }

    pub async fn set_aspect(&self, aspect: AspectRatio) {
        self.session.lock().await.request.aspect_ratio = aspect;
    }

    /// Send a chat command. Blank input is ignored and returns `Ok(None)`.
    ///
    /// The user message is logged before the request goes out; the reply and
    /// the parameters it carries are only adopted on success.
    pub async fn submit_chat(&self, text: &str) -> Result<Option<CommandReply>, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.session.lock().await.messages.push_user(text);

        let reply = self.api.command(text).await.inspect_err(|error| {
            warn!(%error, "Chat command failed");
        })?;

        let mut session = self.session.lock().await;
        session.messages.push_assistant(reply.reply.clone());
        session.request = reply.request();
        Ok(Some(reply))
    }

    /// Start a generation with the current parameters and wait for its video.
    pub async fn submit_generation(&self) -> Result<GenerationOutcome, ClientError> {
        let (epoch, request) = {
            let mut session = self.session.lock().await;
            if session.request.prompt.trim().is_empty() {
                return Err(ClientError::EmptyPrompt);
            }
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            session.loading = true;
            session.video_url = None;
            (epoch, session.request.clone())
        };

        let result = self.run_generation(epoch, &request).await;

        {
            let mut session = self.session.lock().await;
            if self.is_current(epoch) {
                session.loading = false;
            }
        }

        if let Err(error) = &result {
            error!(%error, epoch, "Generation failed");
        }
        result
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    async fn run_generation(
        &self,
        epoch: u64,
        request: &VideoRequest,
    ) -> Result<GenerationOutcome, ClientError> {
        let accepted = self.api.generate(request).await?;

        {
            let mut session = self.session.lock().await;
            if !self.is_current(epoch) {
                return Ok(GenerationOutcome::Superseded);
            }
            session.job_id = Some(accepted.id.clone());
            if let Some(url) = accepted.url {
                session.video_url = Some(url.clone());
                return Ok(GenerationOutcome::Completed(url));
            }
        }

        self.poll_status(epoch, &accepted.id).await
    }

    async fn poll_status(&self, epoch: u64, id: &str) -> Result<GenerationOutcome, ClientError> {
        for attempt in 1..=self.poll.attempts {
            if !self.is_current(epoch) {
                return Ok(GenerationOutcome::Superseded);
            }

            match self.api.status(id).await {
                Ok(response) => match response.state.url() {
                    Some(url) => {
                        let mut session = self.session.lock().await;
                        if !self.is_current(epoch) {
                            return Ok(GenerationOutcome::Superseded);
                        }
                        info!(attempt, %url, "Video ready");
                        session.video_url = Some(url.to_string());
                        return Ok(GenerationOutcome::Completed(url.to_string()));
                    }
                    None => debug!(attempt, "Still processing"),
                },
                // A rejected check costs an attempt, nothing more
                Err(ClientError::Status(status)) => {
                    debug!(attempt, status, "Status check rejected")
                }
                Err(error) => return Err(error),
            }

            tokio::time::sleep(self.poll.interval).await;
        }

        warn!(attempts = self.poll.attempts, "Gave up waiting for video");
        Ok(GenerationOutcome::GaveUp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatRole;
    use crate::domain::jobs::{JobState, StatusResponse, SubmitResponse};
    use crate::ports::generation::MockGenerationApi;
    use std::sync::atomic::AtomicUsize;

    const URL: &str = "https://example.com/clip.mp4";

    fn fast_poll(attempts: u32) -> PollSettings {
        PollSettings {
            attempts,
            interval: Duration::ZERO,
        }
    }

    fn processing(id: &str) -> StatusResponse {
        StatusResponse {
            id: id.to_string(),
            state: JobState::Processing,
        }
    }

    fn completed(id: &str, url: &str) -> StatusResponse {
        StatusResponse {
            id: id.to_string(),
            state: JobState::Completed {
                url: url.to_string(),
                duration_seconds: ClipDuration::default(),
                aspect_ratio: AspectRatio::Landscape,
                provider: "veo3-mock".to_string(),
            },
        }
    }

    fn accepting(api: &mut MockGenerationApi, id: &'static str) {
        api.expect_generate()
            .times(1)
            .returning(move |_| Ok(SubmitResponse::processing(id.to_string())));
    }

    #[tokio::test]
    async fn test_generation_polls_until_completed() {
        let mut api = MockGenerationApi::new();
        accepting(&mut api, "job-1");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        api.expect_status().returning(move |id| {
            assert_eq!(id, "job-1");
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(processing(id))
            } else {
                Ok(completed(id, URL))
            }
        });

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("waves").await;
        let outcome = controller.submit_generation().await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Completed(URL.to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let session = controller.snapshot().await;
        assert_eq!(session.video_url.as_deref(), Some(URL));
        assert_eq!(session.job_id.as_deref(), Some("job-1"));
        assert!(!session.loading);
    }

    #[tokio::test]
    async fn test_immediate_url_skips_polling() {
        let mut api = MockGenerationApi::new();
        api.expect_generate().times(1).returning(|_| {
            Ok(SubmitResponse {
                url: Some(URL.to_string()),
                ..SubmitResponse::processing("job-1".to_string())
            })
        });
        api.expect_status().never();

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("waves").await;
        let outcome = controller.submit_generation().await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Completed(URL.to_string()));
        assert_eq!(controller.snapshot().await.video_url.as_deref(), Some(URL));
    }

    #[tokio::test]
    async fn test_gives_up_after_attempt_budget() {
        let mut api = MockGenerationApi::new();
        accepting(&mut api, "job-1");
        api.expect_status()
            .times(3)
            .returning(|id| Ok(processing(id)));

        let controller = ClientController::new(api, fast_poll(3));
        controller.set_prompt("waves").await;
        let outcome = controller.submit_generation().await.unwrap();

        assert_eq!(outcome, GenerationOutcome::GaveUp);
        let session = controller.snapshot().await;
        assert_eq!(session.video_url, None);
        assert_eq!(session.job_id.as_deref(), Some("job-1"));
        assert!(!session.loading);
    }

    #[tokio::test]
    async fn test_rejected_status_checks_keep_polling() {
        let mut api = MockGenerationApi::new();
        accepting(&mut api, "job-1");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        api.expect_status().returning(move |id| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ClientError::Status(500))
            } else {
                Ok(completed(id, URL))
            }
        });

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("waves").await;
        let outcome = controller.submit_generation().await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Completed(URL.to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_poll() {
        let mut api = MockGenerationApi::new();
        accepting(&mut api, "job-1");
        api.expect_status()
            .times(1)
            .returning(|_| Err(ClientError::Transport("connection refused".to_string())));

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("waves").await;
        let result = controller.submit_generation().await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        let session = controller.snapshot().await;
        assert_eq!(session.video_url, None);
        assert!(!session.loading);
    }

    #[tokio::test]
    async fn test_failed_submit_leaves_no_job() {
        let mut api = MockGenerationApi::new();
        api.expect_generate()
            .times(1)
            .returning(|_| Err(ClientError::Status(400)));
        api.expect_status().never();

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("waves").await;

        assert_eq!(
            controller.submit_generation().await,
            Err(ClientError::Status(400))
        );
        let session = controller.snapshot().await;
        assert_eq!(session.job_id, None);
        assert!(!session.loading);
    }

    #[tokio::test]
    async fn test_blank_prompt_is_refused() {
        let mut api = MockGenerationApi::new();
        api.expect_generate().never();

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("   ").await;

        assert_eq!(
            controller.submit_generation().await,
            Err(ClientError::EmptyPrompt)
        );
        assert!(!controller.snapshot().await.loading);
    }

    #[tokio::test]
    async fn test_generation_sends_form_values() {
        let mut api = MockGenerationApi::new();
        api.expect_generate()
            .withf(|request| {
                request.prompt == "city at night"
                    && request.duration_seconds.seconds() == 300
                    && request.aspect_ratio == AspectRatio::Portrait
            })
            .times(1)
            .returning(|_| Ok(SubmitResponse::processing("job-1".to_string())));
        api.expect_status().returning(|id| Ok(completed(id, URL)));

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("city at night").await;
        controller
            .set_duration(ClipDuration::try_from(300).unwrap())
            .await;
        controller.set_aspect(AspectRatio::Portrait).await;

        assert!(controller.submit_generation().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_generation_supersedes_running_poll() {
        const NEW_URL: &str = "https://example.com/second.mp4";

        let mut api = MockGenerationApi::new();
        let submissions = Arc::new(AtomicUsize::new(0));
        let counter = submissions.clone();
        api.expect_generate().times(2).returning(move |_| {
            let id = if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                "job-1"
            } else {
                "job-2"
            };
            Ok(SubmitResponse::processing(id.to_string()))
        });
        api.expect_status().returning(|id| match id {
            "job-1" => Ok(processing(id)),
            _ => Ok(completed(id, NEW_URL)),
        });

        let controller = ClientController::new(api, PollSettings::default());
        controller.set_prompt("first").await;

        let background = controller.clone();
        let first = tokio::spawn(async move { background.submit_generation().await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        controller.set_prompt("second").await;
        let second = controller.submit_generation().await.unwrap();
        assert_eq!(second, GenerationOutcome::Completed(NEW_URL.to_string()));

        let first = first.await.unwrap().unwrap();
        assert_eq!(first, GenerationOutcome::Superseded);

        let session = controller.snapshot().await;
        assert_eq!(session.video_url.as_deref(), Some(NEW_URL));
        assert_eq!(session.job_id.as_deref(), Some("job-2"));
        assert!(!session.loading);
    }

    fn reply_for_forest() -> CommandReply {
        CommandReply {
            reply: "Okay. I set aspect to 9:16, duration to 180 seconds. Prompt: \"forest in rain\""
                .to_string(),
            prompt: "forest in rain".to_string(),
            duration_seconds: ClipDuration::try_from(180).unwrap(),
            aspect_ratio: AspectRatio::Portrait,
        }
    }

    #[tokio::test]
    async fn test_chat_adopts_parsed_parameters() {
        let mut api = MockGenerationApi::new();
        api.expect_command()
            .withf(|message| message == "3 minutes 9:16 forest in rain")
            .times(1)
            .returning(|_| Ok(reply_for_forest()));

        let controller = ClientController::new(api, fast_poll(40));
        let reply = controller
            .submit_chat("  3 minutes 9:16 forest in rain ")
            .await
            .unwrap();
        assert_eq!(reply, Some(reply_for_forest()));

        let session = controller.snapshot().await;
        let roles: Vec<ChatRole> = session.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
        assert_eq!(session.request.prompt, "forest in rain");
        assert_eq!(session.request.duration_seconds.seconds(), 180);
        assert_eq!(session.request.aspect_ratio, AspectRatio::Portrait);
    }

    #[tokio::test]
    async fn test_blank_chat_is_ignored() {
        let mut api = MockGenerationApi::new();
        api.expect_command().never();

        let controller = ClientController::new(api, fast_poll(40));
        assert_eq!(controller.submit_chat(" \n ").await, Ok(None));
        assert!(controller.snapshot().await.messages.is_empty());
    }

    #[tokio::test]
    async fn test_failed_chat_keeps_user_message_only() {
        let mut api = MockGenerationApi::new();
        api.expect_command()
            .times(1)
            .returning(|_| Err(ClientError::Status(502)));

        let controller = ClientController::new(api, fast_poll(40));
        controller.set_prompt("keep me").await;

        assert_eq!(
            controller.submit_chat("portrait").await,
            Err(ClientError::Status(502))
        );
        let session = controller.snapshot().await;
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.request.prompt, "keep me");
    }
}
