//! Shared state and factory for the in-memory storage backend.

use serde::{Deserialize, Serialize};
use shared::{LeafStatusFact, ManualAdjustment, RegisterRow};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::storage::traits::Connection;

use super::register_repository::RegisterRepository;
use super::status_repository::StatusRepository;

/// A manual adjustment as stored, with its generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAdjustment {
    pub id: String,
    pub adjustment: ManualAdjustment,
}

/// State shared by every repository created from one connection.
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) rows: Mutex<HashMap<String, RegisterRow>>,
    pub(crate) facts: Mutex<Vec<LeafStatusFact>>,
    pub(crate) adjustments: Mutex<Vec<StoredAdjustment>>,
}

/// In-memory storage connection.
///
/// Clones share the same underlying state, mirroring how a real connection
/// hands out repositories over one backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    state: Arc<MemoryState>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the authoritative register rows (test/dev seeding).
    pub fn seed_rows(&self, rows: Vec<RegisterRow>) {
        let mut stored = self.state.rows.lock().unwrap();
        stored.clear();
        for row in rows {
            stored.insert(row.id.clone(), row);
        }
    }

    /// Replace the stored leaf facts (test/dev seeding).
    pub fn seed_facts(&self, facts: Vec<LeafStatusFact>) {
        *self.state.facts.lock().unwrap() = facts;
    }

    /// Inspect one authoritative row.
    pub fn row(&self, row_id: &str) -> Option<RegisterRow> {
        self.state.rows.lock().unwrap().get(row_id).cloned()
    }

    /// Stored manual adjustments, in submission order.
    pub fn adjustments(&self) -> Vec<StoredAdjustment> {
        self.state.adjustments.lock().unwrap().clone()
    }
}

impl Connection for MemoryConnection {
    type RegisterRepository = RegisterRepository;
    type StatusRepository = StatusRepository;

    fn create_register_repository(&self) -> Self::RegisterRepository {
        RegisterRepository::new(self.state.clone())
    }

    fn create_status_repository(&self) -> Self::StatusRepository {
        StatusRepository::new(self.state.clone())
    }
}
