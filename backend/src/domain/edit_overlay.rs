//! Staged-edit overlay for the editable register.
//!
//! While an operator works through a register grid, every confirmed cell
//! edit is staged here instead of being written through immediately. The
//! overlay is a sparse mapping from `(row_id, field_id)` to the pending
//! edit, layered over the authoritative rows; the whole set is flushed as
//! one batch by [`crate::domain::commit::BatchCommitCoordinator`].
//!
//! One overlay belongs to exactly one editing session (one open grid). It
//! is discarded wholesale on successful commit or explicit discard, never
//! shared across sessions.

use shared::{EditEntry, EditKey, RegisterRow, RowContext};
use std::collections::HashMap;
use tracing::debug;

/// Sparse set of pending local edits keyed by register cell.
///
/// Invariant: the overlay never holds an entry whose proposed value equals
/// the authoritative one. `dirty_count() == 0` is the exact condition that
/// gates the commit control, so a no-op edit must disappear rather than be
/// stored; this is a correctness rule, not an optimization.
#[derive(Debug, Default)]
pub struct EditOverlayStore {
    entries: HashMap<EditKey, EditEntry>,
}

impl EditOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an edit for one cell.
    ///
    /// Staging a value equal to the authoritative one removes any existing
    /// entry for the key (the cell is clean again). Otherwise the entry for
    /// the key is inserted or overwritten: successive edits to the same
    /// cell do not merge, the last confirmed value wins.
    pub fn stage(
        &mut self,
        key: EditKey,
        proposed_value: f64,
        original_value: f64,
        row_context: RowContext,
    ) {
        if proposed_value == original_value {
            if self.entries.remove(&key).is_some() {
                debug!(
                    row_id = %key.row_id,
                    field_id = %key.field_id,
                    "edit returned to original value, entry removed"
                );
            }
            return;
        }

        debug!(
            row_id = %key.row_id,
            field_id = %key.field_id,
            proposed_value,
            "edit staged"
        );
        self.entries.insert(
            key.clone(),
            EditEntry {
                key,
                original_value,
                proposed_value,
                row_context,
            },
        );
    }

    /// The staged entry for a cell, if any.
    pub fn get(&self, key: &EditKey) -> Option<&EditEntry> {
        self.entries.get(key)
    }

    /// The value a cell should display: the staged proposal if one exists,
    /// the authoritative value otherwise.
    pub fn effective_value(&self, key: &EditKey, authoritative_value: f64) -> f64 {
        match self.entries.get(key) {
            Some(entry) => entry.proposed_value,
            None => authoritative_value,
        }
    }

    /// Whether a cell has a pending edit.
    pub fn is_dirty(&self, key: &EditKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of pending edits. Zero exactly when the commit control must
    /// be disabled.
    pub fn dirty_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop every staged edit.
    pub fn discard_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(discarded = self.entries.len(), "overlay discarded");
        }
        self.entries.clear();
    }

    /// All staged entries, sorted by key so the commit payload is
    /// deterministic regardless of staging order.
    pub fn entries(&self) -> Vec<EditEntry> {
        let mut entries: Vec<EditEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Sum a field across rows, using staged values where they exist.
    ///
    /// Lets footer totals reflect unsaved edits without a round trip. Rows
    /// that do not carry the field contribute 0.
    pub fn effective_total(&self, rows: &[RegisterRow], field_id: &str) -> f64 {
        rows.iter()
            .map(|row| {
                let key = EditKey::new(row.id.clone(), field_id);
                self.effective_value(&key, row.field_value(field_id).unwrap_or(0.0))
            })
            .sum()
    }
}
