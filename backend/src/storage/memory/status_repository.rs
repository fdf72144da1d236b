//! In-memory leaf-fact source.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Datelike;
use shared::{LeafStatusFact, StatusFilters};
use std::sync::Arc;
use tracing::debug;

use crate::storage::traits::StatusFetcher;

use super::connection::MemoryState;

#[derive(Clone)]
pub struct StatusRepository {
    state: Arc<MemoryState>,
}

impl StatusRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl StatusFetcher for StatusRepository {
    async fn fetch_monthly_status(
        &self,
        year: i32,
        month: u32,
        filters: &StatusFilters,
    ) -> Result<Vec<LeafStatusFact>> {
        let facts = self
            .state
            .facts
            .lock()
            .map_err(|_| anyhow!("fact store lock poisoned"))?;

        let matching: Vec<LeafStatusFact> = facts
            .iter()
            .filter(|fact| {
                fact.date.year() == year && fact.date.month() == month && filters.matches(fact)
            })
            .cloned()
            .collect();

        debug!(year, month, count = matching.len(), "monthly status fetched");
        Ok(matching)
    }
}
