//! Assistant gateway — the single point of entry for all calls to the
//! external conversational assistant (OpenAI Assistants v2).
//!
//! No other module may talk to the assistant API directly. The flow per
//! prompt: create a thread carrying the prompt as the sole user message,
//! start a run, poll the run until it reaches a terminal status (hard
//! 45 s ceiling), then read the newest assistant message back.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const ASSISTANTS_BETA_HEADER: &str = "assistants=v2";

/// Delay between run status polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1500);
/// Hard ceiling on the whole assistant round trip.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(45);

/// Run statuses from which no further progress occurs.
const TERMINAL_STATUSES: [&str; 4] = ["completed", "failed", "cancelled", "expired"];
const MESSAGE_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Assistant response timed out")]
    Timeout,

    #[error("Assistant run ended with status: {0}")]
    RunFailed(String),

    #[error("Assistant returned an empty response")]
    Empty,
}

/// The seam between the recommendation pipeline and the external
/// assistant. Carried in `AppState` as `Arc<dyn RecommendationGateway>`
/// so tests can swap in a canned-text stub.
#[async_trait]
pub trait RecommendationGateway: Send + Sync {
    async fn recommendations(&self, prompt: &str) -> Result<String, AssistantError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateThreadRequest<'a> {
    messages: Vec<NewMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct NewMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct Thread {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct Run {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct MessagePage {
    data: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    text: Option<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Assistants API client. Built once at startup and shared read-only
/// across concurrent requests; carries no per-request state.
#[derive(Clone)]
pub struct AssistantClient {
    http: Client,
    api_key: Option<String>,
    assistant_id: Option<String>,
}

impl AssistantClient {
    pub fn new(api_key: Option<String>, assistant_id: Option<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            assistant_id,
        }
    }

    /// Both credentials must be present before any network call is made.
    fn credentials(&self) -> Result<(&str, &str), AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::NotConfigured("API_KEY"))?;
        let assistant_id = self
            .assistant_id
            .as_deref()
            .ok_or(AssistantError::NotConfigured("API_ASSISTANT_ID"))?;
        Ok((api_key, assistant_id))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        api_key: &str,
        url: &str,
        body: &B,
    ) -> Result<T, AssistantError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA_HEADER)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        url: &str,
    ) -> Result<T, AssistantError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA_HEADER)
            .send()
            .await?;
        decode(response).await
    }

    async fn fetch_run_status(&self, api_key: &str, url: &str) -> Result<String, AssistantError> {
        let run: Run = self.get_json(api_key, url).await?;
        Ok(run.status)
    }
}

#[async_trait]
impl RecommendationGateway for AssistantClient {
    async fn recommendations(&self, prompt: &str) -> Result<String, AssistantError> {
        let (api_key, assistant_id) = self.credentials()?;

        let thread: Thread = self
            .post_json(
                api_key,
                &format!("{OPENAI_API_BASE}/threads"),
                &CreateThreadRequest {
                    messages: vec![NewMessage {
                        role: "user",
                        content: prompt,
                    }],
                },
            )
            .await?;

        let run: Run = self
            .post_json(
                api_key,
                &format!("{OPENAI_API_BASE}/threads/{}/runs", thread.id),
                &CreateRunRequest { assistant_id },
            )
            .await?;
        debug!("Assistant run {} started on thread {}", run.id, thread.id);

        let run_url = format!("{OPENAI_API_BASE}/threads/{}/runs/{}", thread.id, run.id);
        let status = poll_run_status(
            run.status,
            || self.fetch_run_status(api_key, &run_url),
            RUN_TIMEOUT,
            POLL_INTERVAL,
        )
        .await?;

        if status != "completed" {
            return Err(AssistantError::RunFailed(status));
        }

        let messages: MessagePage = self
            .get_json(
                api_key,
                &format!(
                    "{OPENAI_API_BASE}/threads/{}/messages?order=desc&limit={MESSAGE_PAGE_SIZE}",
                    thread.id
                ),
            )
            .await?;

        let text = messages
            .data
            .iter()
            .find(|message| message.role == "assistant")
            .map(extract_message_text)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::Empty);
        }
        debug!("Assistant reply extracted ({} chars)", text.len());

        Ok(text)
    }
}

/// Waits for a run to reach a terminal status: an explicit bounded loop
/// with an elapsed-time check each iteration and a cooperative delay
/// between polls. Generic over the fetch so the schedule is testable
/// under a paused clock.
async fn poll_run_status<F, Fut>(
    initial: String,
    mut fetch: F,
    timeout: Duration,
    interval: Duration,
) -> Result<String, AssistantError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, AssistantError>>,
{
    let started = Instant::now();
    let mut status = initial;
    while !is_terminal(&status) {
        if started.elapsed() > timeout {
            return Err(AssistantError::Timeout);
        }
        tokio::time::sleep(interval).await;
        status = fetch().await?;
    }
    Ok(status)
}

fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

/// Concatenates a message's text-typed content parts in order, joined by
/// newlines, trimming surrounding whitespace.
fn extract_message_text(message: &ThreadMessage) -> String {
    message
        .content
        .iter()
        .filter(|part| part.part_type == "text")
        .filter_map(|part| part.text.as_ref())
        .map(|text| text.value.as_str())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AssistantError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        return Err(AssistantError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
