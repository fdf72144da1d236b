use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate computation status for one calendar day.
///
/// Derived from the day's leaf facts, never set directly. The four values
/// form a classification, not a scale, so no ordering is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    /// No branch/shift reported sales for the day.
    NoData,
    /// Sales exist but no commission computation has run yet.
    Pending,
    /// Some, but not all, active shifts have been computed.
    Partial,
    /// Every active shift has been computed.
    Complete,
}

/// One observation for a single (date, branch, shift) tuple.
///
/// Produced by the status-fetch collaborator. Immutable once received;
/// a re-fetch supersedes the whole set, there is no partial merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafStatusFact {
    pub date: NaiveDate,
    pub branch: String,
    pub shift: String,
    /// Whether this branch/shift recorded any sales on this date
    pub has_sales: bool,
    /// Whether the authoritative commission computation has run for it
    pub has_computation_done: bool,
    pub invoiced_amount: f64,
    pub seller_count_with_sales: u32,
}

/// A single cell of the month grid.
///
/// Created when the grid is built; `facts` and `rollup` are attached after
/// a status fetch. Day records are immutable; recomputing the status
/// produces a new record rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Day-of-month ordinal (1-based), also set for padding days
    pub ordinal_in_month: u32,
    /// False for the padding days that square off the grid
    pub is_in_target_month: bool,
    pub is_today: bool,
    /// Non-operational day (Sunday in the source configuration)
    pub is_rest_day: bool,
    pub facts: Vec<LeafStatusFact>,
    pub rollup: DayStatus,
}

impl CalendarDay {
    /// Produce a new day record with status attached, leaving `self` untouched.
    pub fn with_status(&self, facts: Vec<LeafStatusFact>, rollup: DayStatus) -> CalendarDay {
        CalendarDay {
            facts,
            rollup,
            ..self.clone()
        }
    }
}

/// Calendar view model for one month: the padded grid plus the
/// month-level completion figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub completion_percentage: u8,
}

/// Per-branch aggregate used by calendar detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchTotals {
    pub branch: String,
    pub total_invoiced: f64,
    pub total_sellers_with_sales: u32,
    /// Active shifts whose commission computation has run
    pub completed_shift_count: u32,
    /// Shifts that recorded sales
    pub active_shift_count: u32,
}

/// Optional narrowing of a monthly status fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusFilters {
    pub branch: Option<String>,
    pub shift: Option<String>,
}

impl StatusFilters {
    /// Whether a fact passes the configured branch/shift narrowing.
    pub fn matches(&self, fact: &LeafStatusFact) -> bool {
        self.branch.as_ref().map_or(true, |b| *b == fact.branch)
            && self.shift.as_ref().map_or(true, |s| *s == fact.shift)
    }
}

/// The month the calendar is currently focused on.
///
/// Kept in memory for navigation only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusMonth {
    pub year: i32,
    pub month: u32,
}

impl Default for FocusMonth {
    fn default() -> Self {
        use chrono::Datelike;
        let now = chrono::Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }
}

/// Descriptive fields of the register row an edit belongs to.
///
/// Carried on staged edits so commit payloads and dirty-row indicators can
/// be rendered without another lookup against the authoritative rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowContext {
    pub date: NaiveDate,
    pub branch: String,
    pub shift: String,
    pub person: String,
}

/// One authoritative row of the editable register.
///
/// Editable numeric columns are keyed by field id; descriptive columns live
/// in `context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRow {
    pub id: String,
    pub context: RowContext,
    pub values: BTreeMap<String, f64>,
}

impl RegisterRow {
    /// Authoritative value of an editable column, if the row carries it.
    pub fn field_value(&self, field_id: &str) -> Option<f64> {
        self.values.get(field_id).copied()
    }
}

/// Composite identity of a staged edit: one register cell.
///
/// Two edits with the same key collapse into one; the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EditKey {
    pub row_id: String,
    pub field_id: String,
}

impl EditKey {
    pub fn new(row_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            field_id: field_id.into(),
        }
    }
}

/// A staged edit: exists only while the proposed value differs from the
/// authoritative one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEntry {
    pub key: EditKey,
    pub original_value: f64,
    pub proposed_value: f64,
    pub row_context: RowContext,
}

/// One record of the batch-save payload sent to persistence.
///
/// `previous_value` lets the collaborator detect that the row changed
/// underneath the operator and reject the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryChange {
    pub row_id: String,
    pub field_id: String,
    pub previous_value: f64,
    pub new_value: f64,
}

/// A manual register adjustment, submitted immediately on form
/// confirmation rather than staged through the edit overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    pub date: NaiveDate,
    pub branch: String,
    pub shift: String,
    pub person: String,
    pub amount: f64,
}

/// Input to the client-side commission preview formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionPreviewInput {
    pub gross_invoiced: f64,
    pub tax_rate_percent: f64,
    pub commission_rate_percent: f64,
    pub seller_count: u32,
}

impl CommissionPreviewInput {
    /// Build an input using the configured default rates.
    pub fn with_defaults(gross_invoiced: f64, seller_count: u32) -> Self {
        let config = CommissionConfig::default();
        Self {
            gross_invoiced,
            tax_rate_percent: config.tax_rate_percent,
            commission_rate_percent: config.commission_rate_percent,
            seller_count,
        }
    }
}

/// Output of the commission preview formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionPreviewOutput {
    pub net_amount: f64,
    pub total_commission: f64,
    pub per_seller_commission: f64,
}

impl CommissionPreviewOutput {
    /// The all-zero output used for degenerate inputs.
    pub fn zero() -> Self {
        Self {
            net_amount: 0.0,
            total_commission: 0.0,
            per_seller_commission: 0.0,
        }
    }
}

/// Rates applied by the commission preview.
///
/// The preview mirrors a server computation it does not own; these defaults
/// match the authoritative configuration (21% VAT, 1% commission).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub tax_rate_percent: f64,
    pub commission_rate_percent: f64,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: 21.0,
            commission_rate_percent: 1.0,
        }
    }
}

/// Validation result for a register cell or adjustment form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub cleaned_value: Option<f64>,
}

/// Specific validation errors.
///
/// Raised before an edit ever reaches the overlay; a failed input is never
/// staged and never reaches the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    EmptyValue,
    InvalidNumber(String),
    NegativeValue,
    AmountNotPositive,
    NotAnInteger,
    ValueTooLarge,
    EmptyPerson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_key_identity() {
        let a = EditKey::new("row-1", "invoiced");
        let b = EditKey::new("row-1", "invoiced");
        let c = EditKey::new("row-1", "units");

        assert_eq!(a, b);
        assert_ne!(a, c);
        // Ord sorts by row then field, giving deterministic payload order
        assert!(a < c);
    }

    #[test]
    fn test_status_filters_matching() {
        let fact = LeafStatusFact {
            date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
            branch: "Centro".to_string(),
            shift: "morning".to_string(),
            has_sales: true,
            has_computation_done: false,
            invoiced_amount: 150.0,
            seller_count_with_sales: 2,
        };

        assert!(StatusFilters::default().matches(&fact));
        assert!(StatusFilters {
            branch: Some("Centro".to_string()),
            shift: None,
        }
        .matches(&fact));
        assert!(!StatusFilters {
            branch: Some("Norte".to_string()),
            shift: None,
        }
        .matches(&fact));
        assert!(!StatusFilters {
            branch: Some("Centro".to_string()),
            shift: Some("afternoon".to_string()),
        }
        .matches(&fact));
    }

    #[test]
    fn test_commission_input_defaults() {
        let input = CommissionPreviewInput::with_defaults(1000.0, 2);
        assert_eq!(input.tax_rate_percent, 21.0);
        assert_eq!(input.commission_rate_percent, 1.0);
        assert_eq!(input.seller_count, 2);
    }

    #[test]
    fn test_calendar_day_with_status_leaves_original_untouched() {
        let day = CalendarDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
            ordinal_in_month: 13,
            is_in_target_month: true,
            is_today: false,
            is_rest_day: false,
            facts: Vec::new(),
            rollup: DayStatus::NoData,
        };

        let updated = day.with_status(Vec::new(), DayStatus::Pending);

        assert_eq!(day.rollup, DayStatus::NoData);
        assert_eq!(updated.rollup, DayStatus::Pending);
        assert_eq!(updated.date, day.date);
    }

    #[test]
    fn test_register_row_field_value() {
        let mut values = BTreeMap::new();
        values.insert("invoiced".to_string(), 420.5);
        let row = RegisterRow {
            id: "row-1".to_string(),
            context: RowContext {
                date: NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
                branch: "Centro".to_string(),
                shift: "morning".to_string(),
                person: "Lucía".to_string(),
            },
            values,
        };

        assert_eq!(row.field_value("invoiced"), Some(420.5));
        assert_eq!(row.field_value("units"), None);
    }
}
