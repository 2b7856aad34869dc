//! Plan document record and its mutation operations.
//!
//! # Responsibility
//! - Hold master lists (months, themes, members) and sparse allocation rows.
//! - Apply cell upserts, master edits and rename cascades in memory.
//!
//! # Invariants
//! - Mutations never fail; invalid input degrades to a logged no-op or `0`.
//! - Deleting a theme/member keeps its allocation rows (orphaned facts).
//! - Month order is fixed after decode; no mutation edits `months`.

use super::wire;
use crate::numeric::parse_lenient;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Month bucket key, e.g. `2026/4`.
pub type Month = String;

/// Per-month grand totals, ordered like `PlanDocument::months`.
pub type TotalsCache = IndexMap<Month, f64>;

/// Table column holding the member name.
pub const MEMBER_FIELD: &str = "Member";
/// Table column holding the theme name.
pub const THEME_FIELD: &str = "Theme";

/// Month list used when a document declares none.
pub const DEFAULT_MONTHS: [&str; 3] = ["2026/4", "2026/5", "2026/6"];

/// Placeholder name for newly added themes.
pub const NEW_THEME_NAME: &str = "新規テーマ";
/// Placeholder name for newly added members.
pub const NEW_MEMBER_NAME: &str = "新規メンバー";

/// Work effort that members allocate time to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub description: String,
}

impl Theme {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Person whose effort is allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub description: String,
    /// Cost per unit of allocation. Persisted as `price`; never negative.
    #[serde(
        rename = "price",
        default,
        deserialize_with = "wire::lenient_rate",
        serialize_with = "wire::number"
    )]
    pub rate: f64,
}

impl Member {
    pub fn new(name: impl Into<String>, description: impl Into<String>, rate: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rate: if rate.is_finite() { rate.max(0.0) } else { 0.0 },
        }
    }
}

/// Which name column of an allocation row an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Member,
    Theme,
}

impl Axis {
    /// The other axis.
    pub fn opposite(self) -> Self {
        match self {
            Self::Member => Self::Theme,
            Self::Theme => Self::Member,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Theme => "theme",
        }
    }
}

/// Sparse allocation fact for one `(member, theme)` pair.
///
/// Months absent from `values` read as `0`. Columns that are neither names nor
/// months are kept verbatim in `extras` so unknown data survives a save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllocationRow {
    pub member: String,
    pub theme: String,
    values: IndexMap<Month, f64>,
    extras: IndexMap<String, String>,
}

impl AllocationRow {
    pub fn new(member: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            theme: theme.into(),
            values: IndexMap::new(),
            extras: IndexMap::new(),
        }
    }

    /// Allocation for `month`, `0` when absent.
    pub fn value(&self, month: &str) -> f64 {
        self.values.get(month).copied().unwrap_or(0.0)
    }

    /// Stored allocation for `month`, `None` when the cell is empty.
    pub fn stored_value(&self, month: &str) -> Option<f64> {
        self.values.get(month).copied()
    }

    pub fn set_value(&mut self, month: impl Into<Month>, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.values.insert(month.into(), value);
    }

    pub fn extra(&self, field: &str) -> Option<&str> {
        self.extras.get(field).map(String::as_str)
    }

    pub fn set_extra(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.extras.insert(field.into(), value.into());
    }

    pub fn name(&self, axis: Axis) -> &str {
        match axis {
            Axis::Member => &self.member,
            Axis::Theme => &self.theme,
        }
    }

    fn name_mut(&mut self, axis: Axis) -> &mut String {
        match axis {
            Axis::Member => &mut self.member,
            Axis::Theme => &mut self.theme,
        }
    }

    fn absorb(&mut self, other: AllocationRow) {
        for (month, value) in other.values {
            let merged = self.value(&month) + value;
            self.values.insert(month, merged);
        }
        for (field, value) in other.extras {
            self.extras.entry(field).or_insert(value);
        }
    }
}

/// Aggregate root of one plan document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDocument {
    /// Free-form period label, display only.
    pub period: Option<String>,
    /// Ordered month buckets; defines storage and display column order.
    pub months: Vec<Month>,
    pub themes: Vec<Theme>,
    pub members: Vec<Member>,
    pub rows: Vec<AllocationRow>,
    /// Derived per-month grand totals, refreshed on encode.
    pub totals: TotalsCache,
    /// Keys under `totals` other than `results`, preserved for round trips.
    pub totals_extra: IndexMap<String, serde_yaml::Value>,
    /// Declared table column order (required fields plus preserved extras).
    pub fields: Vec<String>,
    /// Unknown top-level metadata keys, preserved for round trips.
    pub extra_metadata: IndexMap<String, serde_yaml::Value>,
}

impl Default for PlanDocument {
    fn default() -> Self {
        let months: Vec<Month> = DEFAULT_MONTHS.iter().map(|m| m.to_string()).collect();
        let fields = required_fields(&months);
        Self {
            period: None,
            months,
            themes: Vec::new(),
            members: Vec::new(),
            rows: Vec::new(),
            totals: TotalsCache::new(),
            totals_extra: IndexMap::new(),
            fields,
            extra_metadata: IndexMap::new(),
        }
    }
}

/// `["Member", "Theme", ...months]`.
pub fn required_fields(months: &[Month]) -> Vec<String> {
    let mut fields = Vec::with_capacity(months.len() + 2);
    fields.push(MEMBER_FIELD.to_string());
    fields.push(THEME_FIELD.to_string());
    fields.extend(months.iter().cloned());
    fields
}

impl PlanDocument {
    /// Returns whether `month` is one of the declared month buckets.
    pub fn has_month(&self, month: &str) -> bool {
        self.months.iter().any(|m| m == month)
    }

    /// Finds the allocation row for one `(member, theme)` pair.
    pub fn find_row(&self, member: &str, theme: &str) -> Option<&AllocationRow> {
        self.rows
            .iter()
            .find(|row| row.member == member && row.theme == theme)
    }

    /// Master-list names for `axis`, in display order.
    pub fn names(&self, axis: Axis) -> Vec<&str> {
        match axis {
            Axis::Member => self.members.iter().map(|m| m.name.as_str()).collect(),
            Axis::Theme => self.themes.iter().map(|t| t.name.as_str()).collect(),
        }
    }

    /// Rows whose member or theme is missing from the master lists.
    pub fn orphan_rows(&self) -> impl Iterator<Item = &AllocationRow> {
        self.rows.iter().filter(move |row| {
            !self.members.iter().any(|m| m.name == row.member)
                || !self.themes.iter().any(|t| t.name == row.theme)
        })
    }

    /// Sets one allocation cell, creating the row when it does not exist.
    ///
    /// `raw_value` is parsed leniently; anything non-numeric stores `0`.
    /// A freshly created row starts with every month at `0` and every extra
    /// column at `"0"`. Unknown months are rejected as a no-op.
    ///
    /// Returns `true` when the document was updated.
    pub fn upsert_cell(&mut self, member: &str, theme: &str, month: &str, raw_value: &str) -> bool {
        if !self.has_month(month) {
            warn!(
                "event=cell_upsert module=model status=noop reason=unknown_month month={}",
                month
            );
            return false;
        }
        let value = parse_lenient(raw_value);

        let index = match self
            .rows
            .iter()
            .position(|row| row.member == member && row.theme == theme)
        {
            Some(index) => index,
            None => {
                let row = self.blank_row(member, theme);
                self.rows.push(row);
                debug!(
                    "event=cell_upsert module=model status=ok row_created=true rows={}",
                    self.rows.len()
                );
                self.rows.len() - 1
            }
        };
        self.rows[index].set_value(month, value);
        true
    }

    fn blank_row(&self, member: &str, theme: &str) -> AllocationRow {
        let mut row = AllocationRow::new(member, theme);
        for field in &self.fields {
            if field == MEMBER_FIELD || field == THEME_FIELD {
                continue;
            }
            if self.has_month(field) {
                row.set_value(field.clone(), 0.0);
            } else {
                row.set_extra(field.clone(), "0");
            }
        }
        for month in &self.months {
            if row.stored_value(month).is_none() {
                row.set_value(month.clone(), 0.0);
            }
        }
        row
    }

    /// Renames a theme and rewrites every allocation row that references it.
    ///
    /// See [`PlanDocument::rename`] for collision handling.
    pub fn rename_theme(&mut self, old_name: &str, new_name: &str) -> bool {
        self.rename(Axis::Theme, old_name, new_name)
    }

    /// Renames a member and rewrites every allocation row that references it.
    pub fn rename_member(&mut self, old_name: &str, new_name: &str) -> bool {
        self.rename(Axis::Member, old_name, new_name)
    }

    /// Rename with cascade into allocation rows.
    ///
    /// - `new_name` is trimmed; empty or unchanged names are a no-op.
    /// - A rename onto a name already present in the same master list is
    ///   rejected, keeping master names unique.
    /// - Rows that collide after the rewrite (same member and theme) are
    ///   merged by summing month values into the earlier row.
    pub fn rename(&mut self, axis: Axis, old_name: &str, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == old_name {
            return false;
        }
        if self.names(axis).contains(&new_name) {
            warn!(
                "event=rename module=model status=noop axis={} reason=name_taken",
                axis.as_str()
            );
            return false;
        }

        let renamed_master = match axis {
            Axis::Theme => self
                .themes
                .iter_mut()
                .find(|t| t.name == old_name)
                .map(|t| t.name = new_name.to_string())
                .is_some(),
            Axis::Member => self
                .members
                .iter_mut()
                .find(|m| m.name == old_name)
                .map(|m| m.name = new_name.to_string())
                .is_some(),
        };

        let mut rewritten = 0usize;
        for row in &mut self.rows {
            if row.name(axis) == old_name {
                *row.name_mut(axis) = new_name.to_string();
                rewritten += 1;
            }
        }
        let merged = if rewritten > 0 {
            self.merge_pairs_involving(axis, new_name)
        } else {
            0
        };

        debug!(
            "event=rename module=model status=ok axis={} master={} rows_rewritten={} rows_merged={}",
            axis.as_str(),
            renamed_master,
            rewritten,
            merged
        );
        renamed_master || rewritten > 0
    }

    fn merge_pairs_involving(&mut self, axis: Axis, name: &str) -> usize {
        let mut kept: Vec<AllocationRow> = Vec::with_capacity(self.rows.len());
        let mut seen: HashMap<(String, String), usize> = HashMap::new();
        let mut merged = 0usize;

        for row in std::mem::take(&mut self.rows) {
            if row.name(axis) != name {
                kept.push(row);
                continue;
            }
            let key = (row.member.clone(), row.theme.clone());
            match seen.get(&key) {
                Some(&index) => {
                    kept[index].absorb(row);
                    merged += 1;
                }
                None => {
                    seen.insert(key, kept.len());
                    kept.push(row);
                }
            }
        }

        self.rows = kept;
        merged
    }

    /// Appends a theme with the default placeholder name.
    pub fn add_theme(&mut self) -> String {
        self.add_theme_named(NEW_THEME_NAME)
    }

    /// Appends a theme named `base`, suffixed with a number if already taken.
    ///
    /// Returns the name actually used. Allocation rows are untouched.
    pub fn add_theme_named(&mut self, base: &str) -> String {
        let name = unique_name(base, &self.names(Axis::Theme));
        self.themes.push(Theme::new(name.clone(), ""));
        name
    }

    /// Appends a member with the default placeholder name and rate `0`.
    pub fn add_member(&mut self) -> String {
        self.add_member_named(NEW_MEMBER_NAME)
    }

    /// Appends a member named `base`, suffixed with a number if already taken.
    pub fn add_member_named(&mut self, base: &str) -> String {
        let name = unique_name(base, &self.names(Axis::Member));
        self.members.push(Member::new(name.clone(), "", 0.0));
        name
    }

    /// Removes the theme at `index` from the master list.
    ///
    /// Allocation rows referencing it are kept as orphans.
    pub fn delete_theme(&mut self, index: usize) -> Option<Theme> {
        if index >= self.themes.len() {
            warn!(
                "event=master_delete module=model status=noop axis=theme index={} len={}",
                index,
                self.themes.len()
            );
            return None;
        }
        Some(self.themes.remove(index))
    }

    /// Removes the member at `index` from the master list.
    ///
    /// Allocation rows referencing it are kept as orphans.
    pub fn delete_member(&mut self, index: usize) -> Option<Member> {
        if index >= self.members.len() {
            warn!(
                "event=master_delete module=model status=noop axis=member index={} len={}",
                index,
                self.members.len()
            );
            return None;
        }
        Some(self.members.remove(index))
    }

    pub fn set_theme_description(&mut self, index: usize, description: &str) -> bool {
        match self.themes.get_mut(index) {
            Some(theme) => {
                theme.description = description.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_member_description(&mut self, index: usize, description: &str) -> bool {
        match self.members.get_mut(index) {
            Some(member) => {
                member.description = description.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Sets a member rate from free-form text; invalid or negative input is `0`.
    pub fn set_member_rate(&mut self, index: usize, raw_rate: &str) -> bool {
        match self.members.get_mut(index) {
            Some(member) => {
                member.rate = parse_lenient(raw_rate).max(0.0);
                true
            }
            None => false,
        }
    }
}

/// `base`, then `base 1`, `base 2`, ... until a name is not in `taken`.
pub(crate) fn unique_name(base: &str, taken: &[&str]) -> String {
    if !taken.contains(&base) {
        return base.to_string();
    }
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{base} {suffix}");
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{unique_name, AllocationRow, Axis, PlanDocument, Theme};

    fn doc_with_rows(rows: Vec<AllocationRow>) -> PlanDocument {
        PlanDocument {
            themes: vec![Theme::new("A", ""), Theme::new("B", "")],
            rows,
            ..PlanDocument::default()
        }
    }

    #[test]
    fn unique_name_appends_numbered_suffix() {
        assert_eq!(unique_name("x", &[]), "x");
        assert_eq!(unique_name("x", &["x"]), "x 1");
        assert_eq!(unique_name("x", &["x", "x 1"]), "x 2");
    }

    #[test]
    fn rename_onto_existing_master_name_is_rejected() {
        let mut doc = doc_with_rows(vec![AllocationRow::new("m", "A")]);
        assert!(!doc.rename_theme("A", "B"));
        assert_eq!(doc.rows[0].theme, "A");
        assert_eq!(doc.themes[0].name, "A");
    }

    #[test]
    fn rename_merges_colliding_orphan_rows_by_sum() {
        let mut first = AllocationRow::new("m", "A");
        first.set_value("2026/4", 0.25);
        let mut orphan = AllocationRow::new("m", "C");
        orphan.set_value("2026/4", 0.5);
        orphan.set_value("2026/5", 0.1);
        let mut doc = doc_with_rows(vec![orphan, first]);

        assert!(doc.rename_theme("A", "C"));
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].theme, "C");
        assert_eq!(doc.rows[0].value("2026/4"), 0.75);
        assert_eq!(doc.rows[0].value("2026/5"), 0.1);
    }

    #[test]
    fn axis_opposite_round_trips() {
        assert_eq!(Axis::Member.opposite(), Axis::Theme);
        assert_eq!(Axis::Theme.opposite().as_str(), "member");
    }
}
