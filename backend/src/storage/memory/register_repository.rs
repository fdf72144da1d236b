//! In-memory register write path.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{EntryChange, ManualAdjustment};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::traits::RegisterStorage;

use super::connection::{MemoryState, StoredAdjustment};

/// Tolerance when matching a change's `previous_value` against the
/// authoritative cell.
const STALE_EPSILON: f64 = 1e-9;

#[derive(Clone)]
pub struct RegisterRepository {
    state: Arc<MemoryState>,
}

impl RegisterRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RegisterStorage for RegisterRepository {
    /// Apply a batch atomically: the whole batch is validated first, and a
    /// single stale or unknown cell rejects everything.
    async fn batch_save_entries(&self, changes: &[EntryChange]) -> Result<bool> {
        let mut rows = self
            .state
            .rows
            .lock()
            .map_err(|_| anyhow!("register store lock poisoned"))?;

        for change in changes {
            let Some(row) = rows.get(&change.row_id) else {
                warn!(row_id = %change.row_id, "batch rejected: unknown row");
                return Ok(false);
            };
            let Some(current) = row.field_value(&change.field_id) else {
                warn!(
                    row_id = %change.row_id,
                    field_id = %change.field_id,
                    "batch rejected: unknown field"
                );
                return Ok(false);
            };
            if (current - change.previous_value).abs() > STALE_EPSILON {
                warn!(
                    row_id = %change.row_id,
                    field_id = %change.field_id,
                    current,
                    previous = change.previous_value,
                    "batch rejected: row changed underneath the edit"
                );
                return Ok(false);
            }
        }

        for change in changes {
            if let Some(row) = rows.get_mut(&change.row_id) {
                row.values
                    .insert(change.field_id.clone(), change.new_value);
            }
        }

        debug!(applied = changes.len(), "batch save applied");
        Ok(true)
    }

    async fn delete_entry(&self, row_id: &str) -> Result<bool> {
        let mut rows = self
            .state
            .rows
            .lock()
            .map_err(|_| anyhow!("register store lock poisoned"))?;
        Ok(rows.remove(row_id).is_some())
    }

    async fn create_manual_adjustment(&self, adjustment: &ManualAdjustment) -> Result<bool> {
        let mut adjustments = self
            .state
            .adjustments
            .lock()
            .map_err(|_| anyhow!("adjustment store lock poisoned"))?;
        adjustments.push(StoredAdjustment {
            id: Uuid::new_v4().to_string(),
            adjustment: adjustment.clone(),
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::connection::MemoryConnection;
    use crate::storage::traits::{Connection, RegisterStorage};
    use chrono::NaiveDate;
    use shared::{EntryChange, ManualAdjustment, RegisterRow, RowContext};
    use std::collections::BTreeMap;

    fn seeded_connection() -> MemoryConnection {
        let connection = MemoryConnection::new();
        let mut values = BTreeMap::new();
        values.insert("invoiced".to_string(), 420.0);
        values.insert("units".to_string(), 4.0);
        connection.seed_rows(vec![RegisterRow {
            id: "row-1".to_string(),
            context: RowContext {
                date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
                branch: "Centro".to_string(),
                shift: "morning".to_string(),
                person: "Lucía".to_string(),
            },
            values,
        }]);
        connection
    }

    fn change(field: &str, previous: f64, new: f64) -> EntryChange {
        EntryChange {
            row_id: "row-1".to_string(),
            field_id: field.to_string(),
            previous_value: previous,
            new_value: new,
        }
    }

    #[tokio::test]
    async fn test_batch_save_applies_all_changes() {
        let connection = seeded_connection();
        let repo = connection.create_register_repository();

        let accepted = repo
            .batch_save_entries(&[change("invoiced", 420.0, 500.0), change("units", 4.0, 5.0)])
            .await
            .unwrap();

        assert!(accepted);
        let row = connection.row("row-1").unwrap();
        assert_eq!(row.field_value("invoiced"), Some(500.0));
        assert_eq!(row.field_value("units"), Some(5.0));
    }

    #[tokio::test]
    async fn test_stale_previous_value_rejects_whole_batch() {
        let connection = seeded_connection();
        let repo = connection.create_register_repository();

        let accepted = repo
            .batch_save_entries(&[
                change("units", 4.0, 5.0),
                // Authoritative value is 420, not 400: someone else changed it
                change("invoiced", 400.0, 500.0),
            ])
            .await
            .unwrap();

        assert!(!accepted);
        // Nothing applied, including the valid first change
        let row = connection.row("row-1").unwrap();
        assert_eq!(row.field_value("units"), Some(4.0));
        assert_eq!(row.field_value("invoiced"), Some(420.0));
    }

    #[tokio::test]
    async fn test_unknown_row_rejects_batch() {
        let connection = seeded_connection();
        let repo = connection.create_register_repository();

        let accepted = repo
            .batch_save_entries(&[EntryChange {
                row_id: "missing".to_string(),
                field_id: "invoiced".to_string(),
                previous_value: 0.0,
                new_value: 1.0,
            }])
            .await
            .unwrap();

        assert!(!accepted);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let connection = seeded_connection();
        let repo = connection.create_register_repository();

        assert!(repo.delete_entry("row-1").await.unwrap());
        assert!(connection.row("row-1").is_none());
        assert!(!repo.delete_entry("row-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_manual_adjustment_is_stored_with_id() {
        let connection = seeded_connection();
        let repo = connection.create_register_repository();

        let stored = repo
            .create_manual_adjustment(&ManualAdjustment {
                date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
                branch: "Norte".to_string(),
                shift: "afternoon".to_string(),
                person: "Marta".to_string(),
                amount: 35.0,
            })
            .await
            .unwrap();

        assert!(stored);
        let adjustments = connection.adjustments();
        assert_eq!(adjustments.len(), 1);
        assert!(!adjustments[0].id.is_empty());
        assert_eq!(adjustments[0].adjustment.amount, 35.0);
    }
}
