//! Plain-text rendering of core view output.

use hrplan_core::numeric::display;
use hrplan_core::{EmbedSummary, LoadTag, MasterView, PivotResult, RenderedView};

pub fn rendered_view(view: &RenderedView) -> String {
    match view {
        RenderedView::Pivot(result) => pivot_table(result),
        RenderedView::Master(master) => master_lists(master),
        RenderedView::Source { text } => text.clone(),
    }
}

fn pivot_table(result: &PivotResult) -> String {
    let header: Vec<&str> = [result.primary.as_str(), result.secondary().as_str()]
        .into_iter()
        .chain(result.months.iter().map(String::as_str))
        .chain(std::iter::once("total"))
        .collect();
    let mut lines = vec![header.join("\t")];

    for group in &result.groups {
        for (position, row) in group.rows.iter().enumerate() {
            let label = if position == 0 { group.name.as_str() } else { "" };
            lines.push(format!(
                "{label}\t{}\t{}\t{}",
                row.secondary_name(result.primary),
                join_values(&row.values),
                display(row.sum)
            ));
        }
        let cells: Vec<String> = group
            .subtotal
            .iter()
            .map(|cell| format!("{}{}", display(cell.value), load_marker(cell.load)))
            .collect();
        lines.push(format!(
            "\tsubtotal\t{}\t{}",
            cells.join("\t"),
            display(group.subtotal_sum)
        ));
    }

    lines.push(format!(
        "total\t\t{}\t{}",
        join_values(&result.grand_total),
        display(result.grand_sum)
    ));
    if result.orphan_rows > 0 {
        lines.push(format!(
            "({} allocation rows reference deleted members or themes)",
            result.orphan_rows
        ));
    }
    to_text(lines)
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| display(*value))
        .collect::<Vec<_>>()
        .join("\t")
}

fn to_text(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn load_marker(tag: LoadTag) -> &'static str {
    match tag {
        LoadTag::Normal => "",
        LoadTag::Overloaded => "!",
        LoadTag::Underutilized => "~",
    }
}

fn master_lists(master: &MasterView) -> String {
    let mut lines = vec![
        format!("Period: {}", master.period.as_deref().unwrap_or("")),
        format!("Months: {}", master.months.join(", ")),
        String::new(),
        "Themes:".to_string(),
    ];
    lines.extend(
        master
            .themes
            .iter()
            .enumerate()
            .map(|(index, theme)| format!("  [{index}] {}\t{}", theme.name, theme.description)),
    );
    lines.push(String::new());
    lines.push("Members:".to_string());
    lines.extend(master.members.iter().enumerate().map(|(index, member)| {
        format!(
            "  [{index}] {}\t{}\t{}",
            member.name, member.description, member.rate
        )
    }));
    to_text(lines)
}

pub fn embed_summary(summary: &EmbedSummary) -> String {
    let mut lines = vec![format!("📊 {}", summary.title)];
    if let Some(period) = &summary.period {
        lines.push(format!("Period: {period}"));
    }
    lines.push(format!(
        "Members: {}  Themes: {}",
        summary.member_count, summary.theme_count
    ));
    lines.extend(
        summary
            .totals
            .iter()
            .map(|(month, total)| format!("  {month}\t{}", display(*total))),
    );
    lines.push(format!("Total: {}", display(summary.grand_total)));
    to_text(lines)
}

#[cfg(test)]
mod tests {
    use super::{embed_summary, rendered_view};
    use hrplan_core::{
        pivot, template_document, Axis, DocumentService, EmbedView, MemoryVault, RenderedView,
        Settings, TEMPLATE,
    };

    #[test]
    fn pivot_text_blanks_zero_cells() {
        let doc = template_document();
        let text = rendered_view(&RenderedView::Pivot(pivot(&doc, Axis::Member)));
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("田中\tAEOシステム EKS verup対応\t0.2\t0.2\t\t"));
        assert!(text.lines().any(|line| line.starts_with("\tsubtotal\t0.3~\t0.3~")));
    }

    #[test]
    fn embed_text_lists_monthly_totals() {
        let vault = MemoryVault::new().with_file("team.hrplan", TEMPLATE);
        let service = DocumentService::new(vault, Settings::default());
        let Some(EmbedView::Found(summary)) = service.embed("team") else {
            panic!("template should resolve");
        };
        let text = embed_summary(&summary);
        assert!(text.starts_with("📊 team\nPeriod: 2026/4-2027/3\n"));
        assert!(text.contains("  2026/4\t0.3\n"));
        assert!(text.ends_with("Total: 0.6\n"));
    }
}
