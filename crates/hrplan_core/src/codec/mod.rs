//! Plan document codec.
//!
//! # Responsibility
//! - Split a raw `.hrplan` document into YAML front matter and a CSV table.
//! - Build a consistent `PlanDocument` from those parts, and write it back.
//!
//! # Invariants
//! - `decode` never fails: malformed metadata becomes empty metadata, and an
//!   unreadable table becomes an empty table.
//! - `decode(encode(decode(raw))) == decode(raw)`.
//! - Months, theme names and member names are unique after decode; later
//!   repeats are dropped.
//! - Field reconciliation is idempotent: required fields are appended only
//!   when missing, never duplicated or reordered.
//!
//! # See also
//! - `model::plan` for the in-memory shape.

pub mod metadata;
pub mod table;

use crate::aggregate::recompute_totals;
use crate::model::plan::required_fields;
use crate::model::{
    AllocationRow, Member, Month, PlanDocument, Theme, DEFAULT_MONTHS, MEMBER_FIELD, THEME_FIELD,
};
use crate::numeric::{parse_lenient, to_cell_text};
use log::{debug, error, warn};
use metadata::{decode_metadata, encode_metadata, RawMetadata};
use std::collections::HashSet;
use table::{decode_table, encode_table, Table};

/// Front matter fence line.
pub const DELIMITER: &str = "---";

/// Splits `raw` into `(front matter, table text)`.
///
/// Front matter is present only when `raw` opens with a fence line and a
/// later line consists solely of the fence. Otherwise the whole input is
/// table text. Leading line breaks are stripped from the table text.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let rest = match raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, raw),
    };

    let mut start = 0usize;
    loop {
        let newline = rest[start..].find('\n').map(|offset| start + offset);
        let line_end = newline.unwrap_or(rest.len());
        if rest[start..line_end].trim_end_matches('\r') == DELIMITER {
            let after = newline.map(|index| &rest[index + 1..]).unwrap_or("");
            return (
                Some(&rest[..start]),
                after.trim_start_matches(['\r', '\n']),
            );
        }
        match newline {
            Some(index) => start = index + 1,
            None => return (None, raw),
        }
    }
}

/// Appends any missing required field (`Member`, `Theme`, every month).
///
/// An empty header is replaced with the required fields in canonical order.
pub fn reconcile_fields(header: Vec<String>, months: &[Month]) -> Vec<String> {
    let required = required_fields(months);
    if header.is_empty() {
        return required;
    }
    let mut fields = header;
    for field in required {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// Decodes a raw document into a plan.
///
/// Totals are recomputed from the rows; persisted totals are never trusted.
pub fn decode(raw: &str) -> PlanDocument {
    let (front_matter, table_text) = split_front_matter(raw);

    let metadata = match front_matter {
        Some(text) => decode_metadata(text).unwrap_or_else(|err| {
            warn!(
                "event=document_decode module=codec status=fallback part=metadata error={}",
                err
            );
            RawMetadata::default()
        }),
        None => RawMetadata::default(),
    };

    let months = dedup_by_name(
        metadata
            .months
            .unwrap_or_else(|| DEFAULT_MONTHS.iter().map(|m| m.to_string()).collect()),
        "months",
        |month: &Month| month.as_str(),
    );

    let table = decode_table(table_text).unwrap_or_else(|err| {
        warn!(
            "event=document_decode module=codec status=fallback part=table error={}",
            err
        );
        Table::default()
    });
    let fields = reconcile_fields(table.fields, &months);

    let rows = table
        .records
        .iter()
        .map(|record| {
            let mut row = AllocationRow::new(
                record.get(MEMBER_FIELD).cloned().unwrap_or_default(),
                record.get(THEME_FIELD).cloned().unwrap_or_default(),
            );
            for field in &fields {
                if field == MEMBER_FIELD || field == THEME_FIELD {
                    continue;
                }
                let cell = record.get(field).map(String::as_str).unwrap_or("");
                if months.contains(field) {
                    if !cell.is_empty() {
                        row.set_value(field.clone(), parse_lenient(cell));
                    }
                } else {
                    row.set_extra(field.clone(), cell);
                }
            }
            row
        })
        .collect::<Vec<_>>();

    let mut doc = PlanDocument {
        period: metadata.period,
        months,
        themes: dedup_by_name(metadata.themes.unwrap_or_default(), "themes", |theme: &Theme| {
            theme.name.as_str()
        }),
        members: dedup_by_name(metadata.members.unwrap_or_default(), "members", |member: &Member| {
            member.name.as_str()
        }),
        rows,
        totals: Default::default(),
        totals_extra: metadata.totals_extra,
        fields,
        extra_metadata: metadata.extra,
    };
    doc.totals = recompute_totals(&doc);

    debug!(
        "event=document_decode module=codec status=ok months={} themes={} members={} rows={}",
        doc.months.len(),
        doc.themes.len(),
        doc.members.len(),
        doc.rows.len()
    );
    doc
}

/// Encodes a plan into raw document text, refreshing `doc.totals` first.
pub fn encode(doc: &mut PlanDocument) -> String {
    doc.totals = recompute_totals(doc);
    encode_snapshot(doc)
}

/// Encodes a plan as-is, without touching the totals cache.
pub fn encode_snapshot(doc: &PlanDocument) -> String {
    let mut yaml = encode_metadata(doc).unwrap_or_else(|err| {
        error!(
            "event=document_encode module=codec status=error part=metadata error={}",
            err
        );
        String::from("{}\n")
    });
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }

    let records: Vec<Vec<String>> = doc
        .rows
        .iter()
        .map(|row| {
            doc.fields
                .iter()
                .map(|field| {
                    if field == MEMBER_FIELD {
                        row.member.clone()
                    } else if field == THEME_FIELD {
                        row.theme.clone()
                    } else if doc.has_month(field) {
                        row.stored_value(field).map(to_cell_text).unwrap_or_default()
                    } else {
                        row.extra(field).unwrap_or_default().to_string()
                    }
                })
                .collect()
        })
        .collect();

    let csv = encode_table(&doc.fields, &records).unwrap_or_else(|err| {
        error!(
            "event=document_encode module=codec status=error part=table error={}",
            err
        );
        String::new()
    });

    format!("{DELIMITER}\n{yaml}{DELIMITER}\n{csv}")
}

/// Keeps the first entry for each name, logging how many repeats were dropped.
fn dedup_by_name<T>(items: Vec<T>, part: &str, name: impl Fn(&T) -> &str) -> Vec<T> {
    let before = items.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    let unique: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(name(item).to_string()))
        .collect();
    if unique.len() != before {
        warn!(
            "event=document_decode module=codec status=fallback part={} dropped_duplicates={}",
            part,
            before - unique.len()
        );
    }
    unique
}
