//! In-memory line store for tests and local runs

use super::LineStore;
use crate::error::Result;
use crate::types::CachedLine;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// [`LineStore`] backed by a process-local map.
///
/// Not persistent; useful for tests and offline experimentation.
#[derive(Debug, Default)]
pub struct MemoryLineStore {
    lines: RwLock<HashMap<String, CachedLine>>,
}

impl MemoryLineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached lines
    pub async fn len(&self) -> usize {
        self.lines.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lines.read().await.is_empty()
    }
}

#[async_trait]
impl LineStore for MemoryLineStore {
    async fn get_by_line(&self, line: &str) -> Result<Option<CachedLine>> {
        Ok(self.lines.read().await.get(line).cloned())
    }

    async fn insert(&self, record: &CachedLine) -> Result<()> {
        self.lines
            .write()
            .await
            .insert(record.line.clone(), record.clone());
        Ok(())
    }

    async fn delete_by_line(&self, line: &str) -> Result<()> {
        self.lines.write().await.remove(line);
        Ok(())
    }
}
