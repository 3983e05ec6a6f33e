//! Runtime configuration
//!
//! [`OpenAiConfig`] is read once at startup and never mutated afterwards. Values
//! come from the environment ([`OpenAiConfig::from_env`]) or are set explicitly
//! with the builder-style setters.

use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default limit on model/tool round trips per run
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for [`OpenAiRuntime`](crate::OpenAiRuntime)
#[derive(Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL up to and including the version segment, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub model: String,
    /// USD per million input tokens
    pub input_price_per_million: Option<f64>,
    /// USD per million output tokens
    pub output_price_per_million: Option<f64>,
    pub max_tool_rounds: usize,
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("input_price_per_million", &self.input_price_per_million)
            .field("output_price_per_million", &self.output_price_per_million)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            input_price_per_million: None,
            output_price_per_million: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenAiConfig {
    /// Create a configuration with an explicit API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().api_key(api_key)
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL` and the optional
    /// `OPENAI_INPUT_PRICE_PER_MILLION` / `OPENAI_OUTPUT_PRICE_PER_MILLION`
    ///
    /// A missing API key is not an error here; the backend rejects the call.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(lookup("OPENAI_API_KEY").unwrap_or_default());
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            config = config.base_url(base_url);
        }
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.is_empty()) {
            config = config.model(model);
        }
        config.input_price_per_million = price(&lookup, "OPENAI_INPUT_PRICE_PER_MILLION");
        config.output_price_per_million = price(&lookup, "OPENAI_OUTPUT_PRICE_PER_MILLION");
        config
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the API base URL (trailing slashes are dropped)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set per-million-token prices used to compute run cost
    pub fn prices(mut self, input_per_million: f64, output_per_million: f64) -> Self {
        self.input_price_per_million = Some(input_per_million);
        self.output_price_per_million = Some(output_per_million);
        self
    }

    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Cost in USD for the given token counts, when both prices are set
    pub fn cost(&self, input_tokens: usize, output_tokens: usize) -> Option<f64> {
        let input = self.input_price_per_million?;
        let output = self.output_price_per_million?;
        Some((input_tokens as f64 * input + output_tokens as f64 * output) / 1_000_000.0)
    }
}

/// Parse a non-negative price variable; anything else is ignored with a warning.
fn price(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let raw = lookup(key).filter(|v| !v.trim().is_empty())?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            tracing::warn!(variable = key, value = %raw, "ignoring invalid price");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tool_rounds, 8);
        assert_eq!(config.cost(100, 100), None);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("OPENAI_MODEL", ""),
        ]
        .into_iter()
        .collect();

        let config = OpenAiConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_lookup_reads_prices() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_INPUT_PRICE_PER_MILLION", "0.15"),
            ("OPENAI_OUTPUT_PRICE_PER_MILLION", " 0.6 "),
        ]
        .into_iter()
        .collect();

        let config = OpenAiConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.input_price_per_million, Some(0.15));
        assert_eq!(config.output_price_per_million, Some(0.6));

        let cost = config.cost(1_000_000, 1_000_000).unwrap();
        assert!((cost - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_from_lookup_ignores_invalid_prices() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_INPUT_PRICE_PER_MILLION", "cheap"),
            ("OPENAI_OUTPUT_PRICE_PER_MILLION", "-1"),
        ]
        .into_iter()
        .collect();

        let config = OpenAiConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.input_price_per_million, None);
        assert_eq!(config.output_price_per_million, None);
        assert_eq!(config.cost(1000, 1000), None);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let config = OpenAiConfig::from_lookup(|_| None);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_cost() {
        let config = OpenAiConfig::new("k").prices(2.0, 8.0);
        let cost = config.cost(1_000_000, 500_000).unwrap();
        assert!((cost - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", OpenAiConfig::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
