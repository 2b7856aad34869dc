//! Aggregation over the sparse allocation table.
//!
//! # Responsibility
//! - Recompute persisted per-month grand totals.
//! - Build pivot views (members by theme, themes by member) with row sums,
//!   per-group subtotals and grand totals.
//!
//! # Invariants
//! - Aggregation is read-only over `PlanDocument`.
//! - Every reported number passes through `numeric::format`.
//! - Persisted totals include orphaned rows; pivots cover master entries only.

mod pivot;
mod totals;

pub use pivot::{
    pivot, pivot_with, LoadTag, LoadThresholds, PivotGroup, PivotResult, PivotRow, SubtotalCell,
};
pub use totals::recompute_totals;
