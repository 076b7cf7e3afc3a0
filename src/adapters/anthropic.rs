use crate::config::toml_config::InsightsConfig;
use crate::core::insights::build_prompt;
use crate::domain::model::{FallbackReason, InsightOutcome, Metrics};
use crate::domain::ports::InsightProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 250;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Narrative insights from the Anthropic Messages API.
///
/// Without an API key the provider never touches the network and reports
/// `FallbackReason::Disabled`.
#[derive(Clone)]
pub struct AnthropicInsights {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicInsights {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn from_config(config: &InsightsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.effective_api_key().map(str::to_string),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request(&self, api_key: &str, prompt: &str) -> InsightOutcome {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("Requesting insights from {} with model {}", url, self.model);

        let response = match self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return InsightOutcome::Unavailable(FallbackReason::Transport(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Insights API error body: {}", body);
            return InsightOutcome::Unavailable(FallbackReason::Status(status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return InsightOutcome::Unavailable(FallbackReason::Transport(e.to_string())),
        };

        let parsed: MessagesResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => return InsightOutcome::Unavailable(FallbackReason::Malformed(e.to_string())),
        };

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .filter(|text| !text.trim().is_empty());

        match text {
            Some(text) => InsightOutcome::Generated(text),
            None => InsightOutcome::Unavailable(FallbackReason::Empty),
        }
    }
}

#[async_trait]
impl InsightProvider for AnthropicInsights {
    async fn generate(&self, metrics: &Metrics) -> InsightOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return InsightOutcome::Unavailable(FallbackReason::Disabled);
        };
        self.request(api_key, &build_prompt(metrics)).await
    }
}
