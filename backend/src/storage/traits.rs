//! # Storage Traits
//!
//! Contracts for the two external collaborators the reconciliation core
//! depends on: the monthly status fetch and the register write path. The
//! core never talks to a transport or a database directly; it only sees
//! these traits, so any backend (REST bridge, in-memory double, ...) can
//! be plugged in without touching the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::{EntryChange, LeafStatusFact, ManualAdjustment, StatusFilters};

/// Source of leaf status facts for the calendar.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetch every observed fact for a month, optionally narrowed by
    /// branch and shift.
    ///
    /// The result is a full replacement for whatever the caller held
    /// before, never a diff to merge.
    async fn fetch_monthly_status(
        &self,
        year: i32,
        month: u32,
        filters: &StatusFilters,
    ) -> Result<Vec<LeafStatusFact>>;
}

/// Write path for the editable register.
#[async_trait]
pub trait RegisterStorage: Send + Sync {
    /// Persist a batch of staged edits atomically.
    ///
    /// Returns `Ok(false)` when the backend rejects the batch (for
    /// example because a `previous_value` no longer matches); nothing may
    /// be applied in that case. `Err` is reserved for transport failures.
    async fn batch_save_entries(&self, changes: &[EntryChange]) -> Result<bool>;

    /// Delete one register row. Returns whether the row existed.
    async fn delete_entry(&self, row_id: &str) -> Result<bool>;

    /// Record a manual adjustment. Not batched with pending edits.
    async fn create_manual_adjustment(&self, adjustment: &ManualAdjustment) -> Result<bool>;
}

/// Trait defining the interface for storage connections.
///
/// Abstracts away the concrete collaborator wiring and provides factory
/// methods for creating repositories, so domain services work with any
/// backend without knowing the implementation.
pub trait Connection: Send + Sync + Clone {
    /// The type of RegisterStorage this connection creates
    type RegisterRepository: RegisterStorage;

    /// The type of StatusFetcher this connection creates
    type StatusRepository: StatusFetcher;

    /// Create a new register repository for this connection
    fn create_register_repository(&self) -> Self::RegisterRepository;

    /// Create a new status repository for this connection
    fn create_status_repository(&self) -> Self::StatusRepository;
}
