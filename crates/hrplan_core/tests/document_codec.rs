use hrplan_core::codec::encode_snapshot;
use hrplan_core::{decode, encode, template_document, TEMPLATE};

const SAMPLE: &str = "---
period: FY2026
months:
  - \"2026/4\"
  - \"2026/5\"
themes:
  - name: AEO
    description: migration
members:
  - name: 田中
    description: lead
    price: 3000
owner: planning-office
totals:
  results:
    2026/4: 99
---

\"Member\",\"Theme\",\"2026/4\",\"2026/5\",\"Note\"
\"田中\",\"AEO\",0.20,0.20,\"kick-off, phase 1\"
\"山田\",\"AEO\",,0.5
";

#[test]
fn decode_reads_metadata_rows_and_extra_columns() {
    let doc = decode(SAMPLE);

    assert_eq!(doc.period.as_deref(), Some("FY2026"));
    assert_eq!(doc.months, vec!["2026/4", "2026/5"]);
    assert_eq!(doc.themes[0].description, "migration");
    assert_eq!(doc.members[0].rate, 3000.0);
    assert_eq!(doc.fields, vec!["Member", "Theme", "2026/4", "2026/5", "Note"]);
    assert!(doc.extra_metadata.contains_key("owner"));

    assert_eq!(doc.rows.len(), 2);
    assert_eq!(doc.rows[0].value("2026/4"), 0.2);
    assert_eq!(doc.rows[0].extra("Note"), Some("kick-off, phase 1"));
    assert_eq!(doc.rows[1].stored_value("2026/4"), None);
    assert_eq!(doc.rows[1].value("2026/4"), 0.0);
    assert_eq!(doc.rows[1].extra("Note"), Some(""));
}

#[test]
fn decode_ignores_persisted_totals() {
    let doc = decode(SAMPLE);
    assert_eq!(doc.totals["2026/4"], 0.2);
    assert_eq!(doc.totals["2026/5"], 0.7);
}

#[test]
fn round_trip_is_structurally_stable() {
    for raw in [SAMPLE, TEMPLATE, "Member,Theme\nx,y\n", ""] {
        let first = decode(raw);
        let mut copy = first.clone();
        let second = decode(&encode(&mut copy));
        assert_eq!(second, first, "round trip changed document for {raw:?}");
    }
}

#[test]
fn encode_writes_front_matter_then_table() {
    let mut doc = decode(SAMPLE);
    let raw = encode(&mut doc);

    assert!(raw.starts_with("---\n"));
    let (yaml, table) = raw[4..].split_once("\n---\n").unwrap();
    assert!(yaml.contains("owner: planning-office"));
    assert!(yaml.contains("results:"));
    assert!(!yaml.contains("99"));
    assert_eq!(
        table,
        "Member,Theme,2026/4,2026/5,Note\n田中,AEO,0.2,0.2,\"kick-off, phase 1\"\n山田,AEO,,0.5,\n"
    );
}

#[test]
fn encode_refreshes_totals_but_snapshot_does_not() {
    let mut doc = decode(SAMPLE);
    doc.upsert_cell("田中", "AEO", "2026/4", "0.4");

    let snapshot = decode(&encode_snapshot(&doc));
    assert_eq!(snapshot.totals["2026/4"], 0.4);
    assert_eq!(doc.totals["2026/4"], 0.2);

    encode(&mut doc);
    assert_eq!(doc.totals["2026/4"], 0.4);
}

#[test]
fn missing_front_matter_uses_defaults_and_whole_text_as_table() {
    let doc = decode("Member,Theme,2026/4\nA,B,1\n");
    assert_eq!(doc.period, None);
    assert_eq!(doc.months, vec!["2026/4", "2026/5", "2026/6"]);
    assert!(doc.themes.is_empty());
    assert!(doc.members.is_empty());
    assert_eq!(
        doc.fields,
        vec!["Member", "Theme", "2026/4", "2026/5", "2026/6"]
    );
    assert_eq!(doc.rows[0].value("2026/4"), 1.0);
}

#[test]
fn malformed_metadata_falls_back_to_empty() {
    let doc = decode("---\nthemes: [unclosed\n---\nMember,Theme\n");
    assert_eq!(doc.months, vec!["2026/4", "2026/5", "2026/6"]);
    assert!(doc.themes.is_empty());
    assert!(doc.rows.is_empty());
}

#[test]
fn empty_table_decodes_to_no_rows_with_required_fields() {
    let doc = decode("---\nmonths: [\"2026/4\"]\n---\n");
    assert!(doc.rows.is_empty());
    assert_eq!(doc.fields, vec!["Member", "Theme", "2026/4"]);
}

#[test]
fn field_reconciliation_is_idempotent() {
    let raw = "---\nmonths: [\"2026/4\", \"2026/5\"]\n---\nTheme,2026/5,Memo\nAEO,0.1,x\n";
    let first = decode(raw);
    assert_eq!(first.fields, vec!["Theme", "2026/5", "Memo", "Member", "2026/4"]);

    let mut copy = first.clone();
    let second = decode(&encode(&mut copy));
    assert_eq!(second.fields, first.fields);
    assert_eq!(second.rows[0].member, "");
    assert_eq!(second.rows[0].value("2026/5"), 0.1);
}

#[test]
fn non_numeric_cells_coerce_to_zero_and_duplicate_months_collapse() {
    let doc = decode("---\nmonths: [\"m1\", \"m1\", \"m2\"]\n---\nMember,Theme,m1,m2\nA,B,abc,2x\n");
    assert_eq!(doc.months, vec!["m1", "m2"]);
    assert_eq!(doc.rows[0].stored_value("m1"), Some(0.0));
    assert_eq!(doc.rows[0].value("m2"), 2.0);
}

#[test]
fn template_round_trips_through_encode() {
    let mut doc = template_document();
    let raw = encode(&mut doc);
    assert!(raw.contains("price: 3000"));
    assert!(raw.contains("田中,AEOシステム EKS verup対応,0.2,0.2,0,0,0,0,0,0,0,0,0,0\n"));
    assert_eq!(decode(&raw), template_document());
}

#[test]
fn keys_beside_persisted_totals_survive_a_save() {
    let raw = "---\nmonths: [\"2026/4\"]\ntotals:\n  checked_by: ops\n  results:\n    2026/4: 5\n---\nMember,Theme,2026/4\nA,B,0.5\n";
    let mut doc = decode(raw);
    assert_eq!(doc.totals_extra.len(), 1);

    let saved = encode(&mut doc);
    assert!(saved.contains("  checked_by: ops\n"));
    assert!(saved.contains("    2026/4: 0.5\n"));
    assert_eq!(decode(&saved), doc);
}

#[test]
fn repeated_master_names_keep_the_first_entry() {
    let doc = decode(
        "---\nthemes:\n  - name: AEO\n    description: first\n  - name: AEO\n    description: second\nmembers: [{name: 田中}, {name: 田中}, {name: 山田}]\n---\n",
    );
    assert_eq!(doc.themes.len(), 1);
    assert_eq!(doc.themes[0].description, "first");
    let members: Vec<&str> = doc.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(members, vec!["田中", "山田"]);
}
