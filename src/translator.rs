//! Translator seam and DeepL-backed implementation
//!
//! The engine translates one distinct non-trivial line per call, always for
//! the fixed JA -> EN pair. [`DeepLTranslator`] is the production
//! implementation over the DeepL REST API.

use crate::error::{KashiError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Translation capability consumed by the engine (fixed JA -> EN)
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Configuration for the DeepL translator
#[derive(Debug, Clone)]
pub struct DeepLConfig {
    /// DeepL API key
    pub api_key: String,

    /// Translate endpoint
    pub api_url: String,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("KASHI_DEEPL_API_KEY").unwrap_or_default(),
            api_url: "https://api-free.deepl.com/v2/translate".to_string(),
        }
    }
}

/// DeepL-backed [`Translator`]
pub struct DeepLTranslator {
    config: DeepLConfig,
    client: reqwest::Client,
}

/// DeepL API request format
#[derive(Debug, Serialize)]
struct DeepLRequest<'a> {
    text: Vec<&'a str>,
    source_lang: &'static str,
    target_lang: &'static str,
}

/// DeepL API response format
#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl DeepLTranslator {
    /// Create a new translator with custom config
    pub fn new(config: DeepLConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(KashiError::Config(config::ConfigError::Message(
                "KASHI_DEEPL_API_KEY not set".to_string(),
            )));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create with default config (key from the environment)
    pub fn with_default() -> Result<Self> {
        Self::new(DeepLConfig::default())
    }

    /// Create from loaded [`Settings`]
    ///
    /// [`Settings`]: crate::config::Settings
    pub fn from_settings(settings: &crate::config::Settings) -> Result<Self> {
        Self::new(DeepLConfig {
            api_key: settings.deepl_api_key.clone(),
            api_url: settings.deepl_api_url.clone(),
        })
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        debug!("Calling DeepL API");

        let request = DeepLRequest {
            text: vec![text],
            source_lang: "JA",
            target_lang: "EN-US",
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.config.api_key),
            )
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(KashiError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KashiError::Translator(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: DeepLResponse = response
            .json()
            .await
            .map_err(|e| KashiError::Translator(format!("Failed to parse response: {}", e)))?;

        api_response
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| KashiError::Translator("Empty response from API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_key() {
        let result = DeepLTranslator::new(DeepLConfig {
            api_key: String::new(),
            api_url: "https://example.invalid".to_string(),
        });
        assert!(matches!(result, Err(KashiError::Config(_))));
    }

    #[test]
    fn test_request_serialization() {
        let request = DeepLRequest {
            text: vec!["朝目が覚めたら"],
            source_lang: "JA",
            target_lang: "EN-US",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["source_lang"], "JA");
        assert_eq!(json["target_lang"], "EN-US");
        assert_eq!(json["text"][0], "朝目が覚めたら");
    }
}
