//! # Salesdesk reconciliation core
//!
//! The operational core behind the retail operations dashboard: staging
//! register edits locally and committing them as one atomic batch, rolling
//! leaf-level computation facts up into a monthly status calendar, and the
//! deterministic commission preview formula. Everything visual, the
//! transport and the persistence engine live behind the collaborator
//! traits in [`storage::traits`].

use std::sync::Arc;

pub mod domain;
pub mod storage;

// Re-export commonly used types
pub use storage::memory::MemoryConnection;

use domain::{BatchCommitCoordinator, CalendarStatusService};

/// Main backend struct that wires the services for one dashboard session.
pub struct Backend {
    pub connection: Arc<MemoryConnection>,
    pub calendar_status_service: CalendarStatusService<MemoryConnection>,
    pub commit_coordinator: BatchCommitCoordinator<MemoryConnection>,
}

impl Backend {
    /// Create a new backend instance backed by in-memory storage.
    pub fn new() -> Self {
        let connection = Arc::new(MemoryConnection::new());

        let calendar_status_service = CalendarStatusService::new(connection.clone());
        let commit_coordinator = BatchCommitCoordinator::new(connection.clone());

        Backend {
            connection,
            calendar_status_service,
            commit_coordinator,
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::GridOptions;
    use crate::domain::commands::status::MonthlyStatusQuery;
    use crate::domain::edit_overlay::EditOverlayStore;
    use chrono::NaiveDate;
    use shared::{EditKey, LeafStatusFact, RegisterRow, RowContext};
    use std::collections::BTreeMap;

    fn context(person: &str) -> RowContext {
        RowContext {
            date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
            branch: "Centro".to_string(),
            shift: "morning".to_string(),
            person: person.to_string(),
        }
    }

    fn register_row(id: &str, person: &str, invoiced: f64, units: f64) -> RegisterRow {
        let mut values = BTreeMap::new();
        values.insert("invoiced".to_string(), invoiced);
        values.insert("units".to_string(), units);
        RegisterRow {
            id: id.to_string(),
            context: context(person),
            values,
        }
    }

    #[tokio::test]
    async fn test_edit_session_against_in_memory_backend() {
        let backend = Backend::new();
        backend.connection.seed_rows(vec![
            register_row("row-1", "Lucía", 420.0, 4.0),
            register_row("row-2", "Marta", 100.0, 1.0),
        ]);

        let mut overlay = EditOverlayStore::new();
        overlay.stage(EditKey::new("row-1", "invoiced"), 500.0, 420.0, context("Lucía"));
        overlay.stage(EditKey::new("row-1", "units"), 5.0, 4.0, context("Lucía"));
        overlay.stage(EditKey::new("row-2", "invoiced"), 90.0, 100.0, context("Marta"));

        let committed = backend
            .commit_coordinator
            .commit(&mut overlay)
            .await
            .unwrap();

        assert_eq!(committed, 3);
        assert_eq!(overlay.dirty_count(), 0);
        let row = backend.connection.row("row-1").unwrap();
        assert_eq!(row.field_value("invoiced"), Some(500.0));
        assert_eq!(row.field_value("units"), Some(5.0));
    }

    #[tokio::test]
    async fn test_calendar_month_against_in_memory_backend() {
        let backend = Backend::new();
        backend.connection.seed_facts(vec![LeafStatusFact {
            date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
            branch: "Centro".to_string(),
            shift: "morning".to_string(),
            has_sales: true,
            has_computation_done: true,
            invoiced_amount: 420.0,
            seller_count_with_sales: 2,
        }]);

        let options = GridOptions::for_today(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());
        let month = backend
            .calendar_status_service
            .load_month(MonthlyStatusQuery::for_month(2025, 6), &options)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(month.completion_percentage, 100);
    }
}
