//! Configuration for the kashi engine
//!
//! Settings are layered from an optional `kashi.toml` file and `KASHI_`
//! prefixed environment variables (environment wins). API keys are expected
//! to come from the environment in deployments.

use crate::error::Result;
use serde::Deserialize;

fn default_deepl_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_store_table() -> String {
    "lines".to_string()
}

fn default_kanji_data_path() -> String {
    "kanji.json".to_string()
}

/// Engine settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// DeepL API key (`KASHI_DEEPL_API_KEY`)
    #[serde(default)]
    pub deepl_api_key: String,

    /// DeepL translate endpoint
    #[serde(default = "default_deepl_api_url")]
    pub deepl_api_url: String,

    /// Base URL of the REST line store (`KASHI_STORE_URL`)
    #[serde(default)]
    pub store_url: String,

    /// API key for the REST line store (`KASHI_STORE_API_KEY`)
    #[serde(default)]
    pub store_api_key: String,

    /// Table name holding cached lines
    #[serde(default = "default_store_table")]
    pub store_table: String,

    /// Path to the static kanji metadata JSON file
    #[serde(default = "default_kanji_data_path")]
    pub kanji_data_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deepl_api_key: String::new(),
            deepl_api_url: default_deepl_api_url(),
            store_url: String::new(),
            store_api_key: String::new(),
            store_table: default_store_table(),
            kanji_data_path: default_kanji_data_path(),
        }
    }
}

impl Settings {
    /// Load settings from `kashi.toml` (optional) and the environment
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("kashi").required(false))
            .add_source(config::Environment::with_prefix("KASHI"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
