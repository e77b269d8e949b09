//! Line store: persistent cache of processed lines
//!
//! Records are keyed by the exact dakuten-corrected line text; that key is
//! unique across the store. The engine reads before translating, inserts
//! after processing, and deletes through the diff synchronizer. If callers
//! ever parallelize sync mutations, implementations must keep the
//! at-most-one-writer-per-key discipline for distinct line texts.

pub mod memory;
pub mod rest;

use crate::error::Result;
use crate::types::CachedLine;
use async_trait::async_trait;

pub use memory::MemoryLineStore;
pub use rest::RestLineStore;

/// Persistent line cache capability
#[async_trait]
pub trait LineStore: Send + Sync {
    /// Fetch a record by exact line text. Unknown lines yield `Ok(None)`.
    async fn get_by_line(&self, line: &str) -> Result<Option<CachedLine>>;

    /// Insert a record (line text is the uniqueness key)
    async fn insert(&self, record: &CachedLine) -> Result<()>;

    /// Delete a record by exact line text; deleting an absent line is not an
    /// error
    async fn delete_by_line(&self, line: &str) -> Result<()>;
}
