//! Volatile store for analysis results fetched later by id

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::types::AnalysisResult;

/// Process-lifetime map from opaque id to stored result.
///
/// Entries never expire and are never evicted; they disappear only when the
/// process exits.
#[derive(Default)]
pub struct ResultStore {
    results: RwLock<HashMap<String, AnalysisResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result under a fresh UUID v4 and return the id
    pub async fn put(&self, result: AnalysisResult) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let mut results = self.results.write().await;
        results.insert(id.clone(), result);
        tracing::debug!("Stored analysis result {} ({} total)", id, results.len());
        id
    }

    /// Get a stored result by id
    pub async fn get(&self, id: &str) -> Option<AnalysisResult> {
        let results = self.results.read().await;
        results.get(id).cloned()
    }
}
