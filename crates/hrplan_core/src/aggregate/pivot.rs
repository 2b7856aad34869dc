//! Pivot views over the allocation table.

use crate::model::{AllocationRow, Axis, Month, PlanDocument};
use crate::numeric::format;
use serde::Serialize;
use std::collections::HashMap;

/// Advisory load classification of one member subtotal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTag {
    Normal,
    /// Above the overload threshold (more than one person-month).
    Overloaded,
    /// Non-zero but below the underutilized threshold.
    Underutilized,
}

/// Bounds used to tag member subtotals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadThresholds {
    pub overload: f64,
    pub underutilized: f64,
}

impl Default for LoadThresholds {
    fn default() -> Self {
        Self {
            overload: 1.0,
            underutilized: 0.5,
        }
    }
}

impl LoadThresholds {
    pub fn classify(&self, value: f64) -> LoadTag {
        if value > self.overload {
            LoadTag::Overloaded
        } else if value > 0.0 && value < self.underutilized {
            LoadTag::Underutilized
        } else {
            LoadTag::Normal
        }
    }
}

/// One `(primary, secondary)` line of a pivot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub member: String,
    pub theme: String,
    /// Per-month values in `PivotResult::months` order; missing rows are `0`.
    pub values: Vec<f64>,
    pub sum: f64,
}

/// Subtotal cell with its advisory load tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubtotalCell {
    pub value: f64,
    pub load: LoadTag,
}

/// All lines under one primary entity plus their subtotal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotGroup {
    pub name: String,
    pub rows: Vec<PivotRow>,
    pub subtotal: Vec<SubtotalCell>,
    pub subtotal_sum: f64,
}

/// Complete pivot for one orientation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotResult {
    pub primary: Axis,
    pub months: Vec<Month>,
    pub groups: Vec<PivotGroup>,
    pub grand_total: Vec<f64>,
    pub grand_sum: f64,
    /// Rows left out because their member or theme is not in a master list.
    pub orphan_rows: usize,
}

impl PivotRow {
    /// Name on the secondary axis of `primary`.
    pub fn secondary_name(&self, primary: Axis) -> &str {
        match primary.opposite() {
            Axis::Member => &self.member,
            Axis::Theme => &self.theme,
        }
    }
}

impl PivotResult {
    pub fn secondary(&self) -> Axis {
        self.primary.opposite()
    }

    pub fn month_index(&self, month: &str) -> Option<usize> {
        self.months.iter().position(|m| m == month)
    }

    pub fn group(&self, name: &str) -> Option<&PivotGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Grand total for `month`, `0` for unknown months.
    pub fn grand_total_for(&self, month: &str) -> f64 {
        self.month_index(month)
            .map(|index| self.grand_total[index])
            .unwrap_or(0.0)
    }
}

/// Builds a pivot with the default load thresholds.
pub fn pivot(doc: &PlanDocument, primary: Axis) -> PivotResult {
    pivot_with(doc, primary, LoadThresholds::default())
}

/// Builds a pivot grouping by `primary`, iterating both master lists in order.
///
/// Load tags are assigned only when `primary` is `Axis::Member`; theme
/// subtotals are always `LoadTag::Normal`.
pub fn pivot_with(doc: &PlanDocument, primary: Axis, thresholds: LoadThresholds) -> PivotResult {
    let months = &doc.months;
    let mut index: HashMap<(&str, &str), &AllocationRow> = HashMap::with_capacity(doc.rows.len());
    for row in &doc.rows {
        index
            .entry((row.member.as_str(), row.theme.as_str()))
            .or_insert(row);
    }

    let primary_names = doc.names(primary);
    let secondary_names = doc.names(primary.opposite());
    let mut grand_raw = vec![0.0_f64; months.len()];

    let groups = primary_names
        .iter()
        .map(|&primary_name| {
            let mut subtotal_raw = vec![0.0_f64; months.len()];
            let rows = secondary_names
                .iter()
                .map(|&secondary_name| {
                    let (member, theme) = match primary {
                        Axis::Member => (primary_name, secondary_name),
                        Axis::Theme => (secondary_name, primary_name),
                    };
                    let source = index.get(&(member, theme)).copied();
                    let raw: Vec<f64> = months
                        .iter()
                        .map(|month| source.map(|row| row.value(month)).unwrap_or(0.0))
                        .collect();
                    for (slot, value) in subtotal_raw.iter_mut().zip(&raw) {
                        *slot += value;
                    }
                    PivotRow {
                        member: member.to_string(),
                        theme: theme.to_string(),
                        sum: format(raw.iter().sum()),
                        values: raw.into_iter().map(format).collect(),
                    }
                })
                .collect();

            for (slot, value) in grand_raw.iter_mut().zip(&subtotal_raw) {
                *slot += value;
            }
            let subtotal = subtotal_raw
                .iter()
                .map(|&raw| {
                    let value = format(raw);
                    let load = match primary {
                        Axis::Member => thresholds.classify(value),
                        Axis::Theme => LoadTag::Normal,
                    };
                    SubtotalCell { value, load }
                })
                .collect();

            PivotGroup {
                name: primary_name.to_string(),
                rows,
                subtotal,
                subtotal_sum: format(subtotal_raw.iter().sum()),
            }
        })
        .collect();

    PivotResult {
        primary,
        months: months.clone(),
        groups,
        grand_sum: format(grand_raw.iter().sum()),
        grand_total: grand_raw.into_iter().map(format).collect(),
        orphan_rows: doc.orphan_rows().count(),
    }
}
