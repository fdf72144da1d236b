//! Month-level status orchestration.
//!
//! Ties the pieces together for the calendar view: fetches the month's
//! leaf facts from the status collaborator, builds the grid, attaches the
//! rollup and computes the completion figure. Also owns the focus-month
//! navigation state for the calendar screen.
//!
//! Navigation is guarded against stale responses: every navigation bumps a
//! monotonic generation, every load snapshots it before fetching, and a
//! response whose snapshot is no longer current is discarded instead of
//! overwriting the month the user is now looking at.

use shared::{FocusMonth, StatusMonth};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::calendar::{self, build_month_grid, GridOptions};
use crate::domain::commands::status::MonthlyStatusQuery;
use crate::domain::status_rollup::{attach_to_grid, completion_percentage, group_by_date};
use crate::storage::traits::{Connection, StatusFetcher};

/// The monthly status fetch failed; the calendar must show an error state
/// rather than a silently stale or empty grid.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("monthly status fetch failed: {0}")]
    Fetch(#[from] anyhow::Error),
}

/// Calendar status service for one dashboard session.
pub struct CalendarStatusService<C: Connection> {
    status_repository: C::StatusRepository,
    /// Current focus month for calendar navigation, in memory only
    focus: Arc<Mutex<FocusMonth>>,
    /// Bumped on every navigation; stale fetch responses are discarded
    navigation_generation: Arc<AtomicU64>,
}

impl<C: Connection> CalendarStatusService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            status_repository: connection.create_status_repository(),
            focus: Arc::new(Mutex::new(FocusMonth::default())),
            navigation_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The month the calendar is currently focused on.
    pub fn focus_month(&self) -> FocusMonth {
        *self.focus.lock().unwrap()
    }

    /// Set the focus month, superseding any fetch still in flight.
    pub fn set_focus_month(&self, year: i32, month: u32) -> Result<FocusMonth, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month: {}. Must be between 1 and 12", month));
        }

        let focus = FocusMonth { year, month };
        *self.focus.lock().unwrap() = focus;
        self.navigation_generation.fetch_add(1, Ordering::SeqCst);
        Ok(focus)
    }

    /// Navigate to the previous month.
    pub fn navigate_previous_month(&self) -> FocusMonth {
        let current = self.focus_month();
        let (year, month) = calendar::previous_month(current.year, current.month);

        // previous_month always yields a valid month
        self.set_focus_month(year, month).unwrap()
    }

    /// Navigate to the next month.
    pub fn navigate_next_month(&self) -> FocusMonth {
        let current = self.focus_month();
        let (year, month) = calendar::next_month(current.year, current.month);

        // next_month always yields a valid month
        self.set_focus_month(year, month).unwrap()
    }

    /// Load one month of computation status as a calendar view model.
    ///
    /// Returns `Ok(None)` when the response was superseded by navigation
    /// while the fetch was in flight; the caller drops it and waits for
    /// the load issued by the newer navigation.
    pub async fn load_month(
        &self,
        query: MonthlyStatusQuery,
        options: &GridOptions,
    ) -> Result<Option<StatusMonth>, FetchError> {
        let generation = self.navigation_generation.load(Ordering::SeqCst);
        info!(year = query.year, month = query.month, "loading monthly status");

        let facts = self
            .status_repository
            .fetch_monthly_status(query.year, query.month, &query.filters)
            .await?;

        if self.navigation_generation.load(Ordering::SeqCst) != generation {
            debug!(
                year = query.year,
                month = query.month,
                "discarding stale status response after navigation"
            );
            return Ok(None);
        }

        let grid = build_month_grid(query.year, query.month, options);
        let days = attach_to_grid(&grid, &group_by_date(&facts));
        let completion = completion_percentage(&days);

        info!(
            year = query.year,
            month = query.month,
            facts = facts.len(),
            completion,
            "monthly status assembled"
        );

        Ok(Some(StatusMonth {
            year: query.year,
            month: query.month,
            days,
            completion_percentage: completion,
        }))
    }

    /// Load the currently focused month without extra filters.
    pub async fn load_focused_month(
        &self,
        options: &GridOptions,
    ) -> Result<Option<StatusMonth>, FetchError> {
        let focus = self.focus_month();
        self.load_month(MonthlyStatusQuery::for_month(focus.year, focus.month), options)
            .await
    }
}
