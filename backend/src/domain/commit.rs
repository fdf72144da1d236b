//! Batch commit of staged register edits.
//!
//! The coordinator flushes an [`EditOverlayStore`] to the persistence
//! collaborator as one atomic batch: one `batch_save_entries` call per
//! commit invocation, never per-field calls. On success the overlay is
//! cleared and the caller must refresh authoritative rows from the source
//! of truth (the coordinator holds none). On any failure the overlay is
//! left exactly as it was, so the operator can retry without re-entering
//! anything: at-most-once commit, retry by resubmission, no automatic
//! retries or backoff here.

use shared::{EntryChange, ValidationError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::commands::register::ManualAdjustmentCommand;
use crate::domain::edit_overlay::EditOverlayStore;
use crate::storage::traits::{Connection, RegisterStorage};

/// Why a commit (or related register write) did not go through.
///
/// Every failure leaves the overlay untouched.
#[derive(Debug, Error)]
pub enum CommitError {
    /// A second commit was attempted while one is in flight; concurrent
    /// commits against the same overlay are not a supported state.
    #[error("a commit is already in flight for this editing session")]
    AlreadyInFlight,
    /// The overlay had no staged edits; nothing was sent.
    #[error("no staged edits to commit")]
    NothingStaged,
    /// The persistence collaborator refused the batch.
    #[error("persistence rejected the batch save")]
    Rejected,
    /// A manual adjustment failed local validation and was not submitted.
    #[error("invalid manual adjustment: {0:?}")]
    InvalidAdjustment(ValidationError),
    /// The persistence call itself failed.
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

/// Orchestrates validation, overlay flush and the persistence call for
/// one editing session.
pub struct BatchCommitCoordinator<C: Connection> {
    register_repository: C::RegisterRepository,
    commit_in_flight: Arc<AtomicBool>,
}

impl<C: Connection> BatchCommitCoordinator<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            register_repository: connection.create_register_repository(),
            commit_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a commit is currently awaiting the persistence collaborator.
    /// The UI disables the commit control while this is true.
    pub fn is_commit_in_flight(&self) -> bool {
        self.commit_in_flight.load(Ordering::SeqCst)
    }

    /// Flush every staged edit as one batch.
    ///
    /// Returns the number of committed entries; after a successful commit
    /// the caller must refresh authoritative rows. The overlay survives
    /// every error path unchanged.
    pub async fn commit(&self, overlay: &mut EditOverlayStore) -> Result<usize, CommitError> {
        if self.commit_in_flight.swap(true, Ordering::SeqCst) {
            warn!("commit attempted while another is in flight, ignored");
            return Err(CommitError::AlreadyInFlight);
        }

        let result = self.commit_guarded(overlay).await;
        self.commit_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn commit_guarded(&self, overlay: &mut EditOverlayStore) -> Result<usize, CommitError> {
        let staged = overlay.entries();
        if staged.is_empty() {
            return Err(CommitError::NothingStaged);
        }

        let changes: Vec<EntryChange> = staged
            .iter()
            .map(|entry| EntryChange {
                row_id: entry.key.row_id.clone(),
                field_id: entry.key.field_id.clone(),
                previous_value: entry.original_value,
                new_value: entry.proposed_value,
            })
            .collect();

        info!(entries = changes.len(), "committing staged edits as one batch");

        let accepted = self.register_repository.batch_save_entries(&changes).await?;
        if !accepted {
            warn!("batch save rejected by persistence, staged edits preserved");
            return Err(CommitError::Rejected);
        }

        overlay.discard_all();
        info!(
            entries = changes.len(),
            "batch commit succeeded, authoritative rows must be refreshed"
        );
        Ok(changes.len())
    }

    /// Delete a register row.
    ///
    /// Independent of the overlay and of any pending commit: the deletion
    /// goes straight to persistence and is not batched with staged edits.
    pub async fn delete_row(&self, row_id: &str) -> Result<bool, CommitError> {
        let deleted = self.register_repository.delete_entry(row_id).await?;
        if deleted {
            info!(row_id, "register row deleted");
        } else {
            warn!(row_id, "delete requested for unknown register row");
        }
        Ok(deleted)
    }

    /// Submit a manual adjustment immediately (never staged).
    pub async fn submit_manual_adjustment(
        &self,
        command: ManualAdjustmentCommand,
    ) -> Result<bool, CommitError> {
        if command.person.trim().is_empty() {
            return Err(CommitError::InvalidAdjustment(ValidationError::EmptyPerson));
        }
        if !command.amount.is_finite() || command.amount <= 0.0 {
            return Err(CommitError::InvalidAdjustment(
                ValidationError::AmountNotPositive,
            ));
        }

        let adjustment = command.into();
        let stored = self
            .register_repository
            .create_manual_adjustment(&adjustment)
            .await?;
        Ok(stored)
    }
}
