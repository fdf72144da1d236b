//! Leaf-fact rollup for the monthly status calendar.
//!
//! Each (date, branch, shift) tuple reports one [`LeafStatusFact`]; this
//! module reduces the facts of a day to a single [`DayStatus`] and attaches
//! the result to a month grid. It is a pure reducer: it performs no I/O,
//! never fails, and accepts whatever the fact-fetch collaborator produced.
//! Validation of upstream data is that collaborator's job, and keeping the
//! reducer total keeps calendar rendering robust against partially-wrong
//! input.

use shared::{BranchTotals, CalendarDay, DayStatus, LeafStatusFact};
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

/// Derive the aggregate status for one day from its facts.
///
/// Applied strictly in this order:
/// 1. no fact with sales → `NoData` (a branch/shift with no activity does
///    not count against completeness, even if a non-sales fact exists);
/// 2. sales but no computation done on any active fact → `Pending`;
/// 3. every active fact computed → `Complete`;
/// 4. otherwise → `Partial`.
pub fn rollup(facts: &[LeafStatusFact]) -> DayStatus {
    let active: Vec<&LeafStatusFact> = facts.iter().filter(|fact| fact.has_sales).collect();
    if active.is_empty() {
        return DayStatus::NoData;
    }

    let done_count = active
        .iter()
        .filter(|fact| fact.has_computation_done)
        .count();

    if done_count == 0 {
        DayStatus::Pending
    } else if done_count == active.len() {
        DayStatus::Complete
    } else {
        DayStatus::Partial
    }
}

/// Group facts by their calendar date.
pub fn group_by_date(facts: &[LeafStatusFact]) -> HashMap<NaiveDate, Vec<LeafStatusFact>> {
    let mut by_date: HashMap<NaiveDate, Vec<LeafStatusFact>> = HashMap::new();
    for fact in facts {
        by_date.entry(fact.date).or_default().push(fact.clone());
    }
    by_date
}

/// Attach fetched facts and their rollup to a month grid.
///
/// Returns a new grid; the input grid and day records are never mutated.
/// Days without facts keep an empty fact list and `NoData`.
pub fn attach_to_grid(
    grid: &[CalendarDay],
    facts_by_date: &HashMap<NaiveDate, Vec<LeafStatusFact>>,
) -> Vec<CalendarDay> {
    grid.iter()
        .map(|day| match facts_by_date.get(&day.date) {
            Some(facts) => day.with_status(facts.clone(), rollup(facts)),
            None => day.with_status(Vec::new(), DayStatus::NoData),
        })
        .collect()
}

/// Group facts by branch, sorted by branch name.
pub fn group_by_branch(facts: &[LeafStatusFact]) -> BTreeMap<String, Vec<LeafStatusFact>> {
    let mut by_branch: BTreeMap<String, Vec<LeafStatusFact>> = BTreeMap::new();
    for fact in facts {
        by_branch
            .entry(fact.branch.clone())
            .or_default()
            .push(fact.clone());
    }
    by_branch
}

/// Per-branch totals for calendar detail views, sorted by branch name.
pub fn totals_by_branch(facts: &[LeafStatusFact]) -> Vec<BranchTotals> {
    group_by_branch(facts)
        .into_iter()
        .map(|(branch, branch_facts)| {
            let mut totals = BranchTotals {
                branch,
                total_invoiced: 0.0,
                total_sellers_with_sales: 0,
                completed_shift_count: 0,
                active_shift_count: 0,
            };
            for fact in &branch_facts {
                totals.total_invoiced += fact.invoiced_amount;
                totals.total_sellers_with_sales += fact.seller_count_with_sales;
                if fact.has_sales {
                    totals.active_shift_count += 1;
                    if fact.has_computation_done {
                        totals.completed_shift_count += 1;
                    }
                }
            }
            totals
        })
        .collect()
}

/// Share of computed days among the days that have any activity, rounded
/// to a whole percentage. Days still at `NoData` are not counted, so an
/// empty or inactive month reports 0 rather than dividing by zero.
pub fn completion_percentage(days: &[CalendarDay]) -> u8 {
    let mut complete = 0u32;
    let mut in_progress = 0u32;
    for day in days {
        match day.rollup {
            DayStatus::Complete => complete += 1,
            DayStatus::Partial | DayStatus::Pending => in_progress += 1,
            DayStatus::NoData => {}
        }
    }

    let denominator = complete + in_progress;
    if denominator == 0 {
        return 0;
    }
    (f64::from(complete) / f64::from(denominator) * 100.0).round() as u8
}
