//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are not
//! exposed over the public API; the presentation layer maps the DTOs in the
//! `shared` crate onto these internal types.

pub mod status {
    use shared::StatusFilters;

    /// Query parameters for loading one month of computation status.
    #[derive(Debug, Clone)]
    pub struct MonthlyStatusQuery {
        pub year: i32,
        pub month: u32,
        pub filters: StatusFilters,
    }

    impl MonthlyStatusQuery {
        /// Query a whole month without branch/shift narrowing.
        pub fn for_month(year: i32, month: u32) -> Self {
            Self {
                year,
                month,
                filters: StatusFilters::default(),
            }
        }
    }
}

pub mod register {
    use chrono::NaiveDate;
    use shared::ManualAdjustment;

    /// Input for a manual register adjustment, submitted immediately on
    /// form confirmation. Never staged through the edit overlay.
    #[derive(Debug, Clone)]
    pub struct ManualAdjustmentCommand {
        pub date: NaiveDate,
        pub branch: String,
        pub shift: String,
        pub person: String,
        pub amount: f64,
    }

    impl From<ManualAdjustmentCommand> for ManualAdjustment {
        fn from(command: ManualAdjustmentCommand) -> Self {
            ManualAdjustment {
                date: command.date,
                branch: command.branch,
                shift: command.shift,
                person: command.person,
                amount: command.amount,
            }
        }
    }
}
