//! Environment-driven pipeline configuration.
//!
//! The config is an explicit value threaded into each stage entry point, not
//! ambient global state, so pipelines with different settings can coexist in
//! one process (e.g. tests running side by side).

pub const ENV_USE_LLM: &str = "NEWSROOM_USE_LLM";
pub const ENV_LLM_MODEL: &str = "NEWSROOM_OPENAI_MODEL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Route select stages through the LLM. Defaults to off.
    pub llm_enabled: bool,
    /// Model identifier for the LLM path.
    pub llm_model: String,
    /// Missing key forces the rule-based path regardless of `llm_enabled`.
    pub api_key: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            llm_enabled: false,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl PipelineConfig {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        let llm_enabled = std::env::var(ENV_USE_LLM)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let llm_model =
            std::env::var(ENV_LLM_MODEL).unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        let api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty());
        Self {
            llm_enabled,
            llm_model,
            api_key,
        }
    }

    /// True only when the flag is on AND credentials are present.
    pub fn llm_active(&self) -> bool {
        self.llm_enabled && self.api_key.is_some()
    }
}
