use crate::model::{PlanDocument, TotalsCache};
use crate::numeric::format;

/// Sums every allocation row per month, in month order.
///
/// Rows referencing names missing from the master lists still count.
pub fn recompute_totals(doc: &PlanDocument) -> TotalsCache {
    doc.months
        .iter()
        .map(|month| {
            let sum: f64 = doc.rows.iter().map(|row| row.value(month)).sum();
            (month.clone(), format(sum))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::recompute_totals;
    use crate::model::{AllocationRow, PlanDocument};

    #[test]
    fn totals_cover_every_month_including_orphans() {
        let mut first = AllocationRow::new("ghost", "gone");
        first.set_value("2026/4", 0.1);
        let mut second = AllocationRow::new("田中", "AEO");
        second.set_value("2026/4", 0.2);
        second.set_value("2026/6", 1.5);
        let doc = PlanDocument {
            rows: vec![first, second],
            ..PlanDocument::default()
        };

        let totals = recompute_totals(&doc);
        let months: Vec<&str> = totals.keys().map(String::as_str).collect();
        assert_eq!(months, vec!["2026/4", "2026/5", "2026/6"]);
        assert_eq!(totals["2026/4"], 0.3);
        assert_eq!(totals["2026/5"], 0.0);
        assert_eq!(totals["2026/6"], 1.5);
    }
}
