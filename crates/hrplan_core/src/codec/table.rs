//! Delimited table (de)serialization over the `csv` crate.
//!
//! Records are plain string maps keyed by header name; typing happens in
//! `codec::decode`.

use indexmap::IndexMap;

/// One table record keyed by header field.
pub type TableRecord = IndexMap<String, String>;

/// Decoded table: header order plus records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub fields: Vec<String>,
    pub records: Vec<TableRecord>,
}

/// Parses CSV text with a header row.
///
/// Ragged records are accepted; missing trailing cells are simply absent
/// from the record map. Blank lines are skipped. When a header repeats a
/// name, the first column wins.
///
/// # Errors
/// - Returns the CSV error if the reader fails mid-stream.
pub fn decode_table(text: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let fields: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    if fields.is_empty() || (fields.len() == 1 && fields[0].is_empty()) {
        return Ok(Table::default());
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut map = TableRecord::with_capacity(fields.len());
        for (field, value) in fields.iter().zip(record.iter()) {
            map.entry(field.clone()).or_insert_with(|| value.to_string());
        }
        records.push(map);
    }

    Ok(Table { fields, records })
}

/// Serializes records under `fields`, one `\n`-terminated line per record.
///
/// Values are quoted only when necessary; absent keys write an empty cell.
///
/// # Errors
/// - Returns the CSV error if writing fails.
pub fn encode_table(fields: &[String], records: &[Vec<String>]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(fields)?;
    for record in records {
        writer.write_record(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
