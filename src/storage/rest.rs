//! REST-backed line store
//!
//! Targets a PostgREST-style table endpoint (`GET /lines?line=eq.<text>`,
//! `POST /lines`, `DELETE /lines?line=eq.<text>`), the shape exposed by
//! Supabase among others. The `line` column is the table's primary key.

use super::LineStore;
use crate::config::Settings;
use crate::error::{KashiError, Result};
use crate::types::CachedLine;
use async_trait::async_trait;
use tracing::debug;

/// Configuration for the REST line store
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Base URL of the REST endpoint (without the table path)
    pub base_url: String,

    /// API key sent as `apikey` and bearer token
    pub api_key: String,

    /// Table holding cached lines
    pub table: String,
}

/// [`LineStore`] over a PostgREST-style HTTP table
pub struct RestLineStore {
    config: RestStoreConfig,
    client: reqwest::Client,
}

impl RestLineStore {
    /// Create a new store with custom config
    pub fn new(config: RestStoreConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(KashiError::Config(config::ConfigError::Message(
                "KASHI_STORE_URL not set".to_string(),
            )));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create from loaded [`Settings`]
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(RestStoreConfig {
            base_url: settings.store_url.clone(),
            api_key: settings.store_api_key.clone(),
            table: settings.store_table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }

    async fn check(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KashiError::Store(format!(
                "{} failed with status {}: {}",
                operation, status, error_text
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl LineStore for RestLineStore {
    async fn get_by_line(&self, line: &str) -> Result<Option<CachedLine>> {
        debug!("Line store lookup");

        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[
                ("line", format!("eq.{}", line)),
                ("select", "line,translation,tokens".to_string()),
            ])
            .send()
            .await
            .map_err(KashiError::Http)?;

        let response = Self::check(response, "select").await?;
        let mut rows: Vec<CachedLine> = response
            .json()
            .await
            .map_err(|e| KashiError::Store(format!("Failed to parse select response: {}", e)))?;

        // line is the primary key, so at most one row comes back
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn insert(&self, record: &CachedLine) -> Result<()> {
        debug!("Line store insert");

        let response = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(KashiError::Http)?;

        Self::check(response, "insert").await?;
        Ok(())
    }

    async fn delete_by_line(&self, line: &str) -> Result<()> {
        debug!("Line store delete");

        let response = self
            .authed(self.client.delete(self.table_url()))
            .query(&[("line", format!("eq.{}", line))])
            .send()
            .await
            .map_err(KashiError::Http)?;

        Self::check(response, "delete").await?;
        Ok(())
    }
}
