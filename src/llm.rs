//! Optional LLM client: provider abstraction with a deterministic fallback.
//!
//! Stages that support an LLM path call [`LlmClient::complete`] and fall back
//! to their rule-based scorer whenever the call returns `None` (disabled,
//! missing credentials, transport error, or unparsable output). The client is
//! selected once per call from [`PipelineConfig`], never mid-pipeline, so the
//! default path stays fully deterministic.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PipelineConfig;

/// Trait object shared by stages and tests.
pub trait LlmClient: Send + Sync {
    /// Run one completion; `None` means "use the rule-based fallback".
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;

    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynLlmClient = Arc<dyn LlmClient>;

/// Factory: build a client from config. Missing credentials always yield the
/// disabled client, regardless of the enable flag.
pub fn build_client(config: &PipelineConfig) -> DynLlmClient {
    if !config.llm_active() {
        return Arc::new(DisabledClient);
    }
    let key = config.api_key.clone().unwrap_or_default();
    Arc::new(OpenAiClient::new(&config.llm_model, key))
}

/// Returns `None` always; used when the LLM path is off.
pub struct DisabledClient;

impl LlmClient for DisabledClient {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        _user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed-output client for tests.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl LlmClient for MockClient {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        _user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// OpenAI provider (Chat Completions API).
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(model: &str, api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("newsroom-pipeline/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model: model.to_string(),
        }
    }

    async fn complete_impl(&self, system: &str, user: &str) -> Option<String> {
        if self.api_key.is_empty() {
            return None;
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| warn!(error = %e, "llm call failed; falling back to rules"))
            .ok()?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "llm call rejected; falling back to rules");
            return None;
        }
        let body: Resp = resp.json().await.ok()?;
        let content = body.choices.first().map(|c| c.message.content.trim())?;
        if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        }
    }
}

impl LlmClient for OpenAiClient {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(self.complete_impl(system, user))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
