use crate::error::{ReportJoinError, Result};
use crate::schema::ReportFrequency;
use crate::table::ReportTable;
use log::{debug, warn};
use std::io::Read;

const UTF8_BOM: char = '\u{feff}';

/// Parses a semicolon-delimited report: the first row holds period headers
/// (its first cell, the label column header, is ignored) and the first
/// column of every following row holds the metric label.
pub fn parse_report(text: &str, document: ReportFrequency) -> Result<ReportTable> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    read_report(text.as_bytes(), document)
}

pub fn read_report<R: Read>(reader: R, document: ReportFrequency) -> Result<ReportTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let header = records
        .next()
        .ok_or(ReportJoinError::MissingHeader { document })?
        .map_err(|source| ReportJoinError::Csv { document, source })?;

    let mut table = ReportTable::new();

    // Column position in the record -> period label, skipping unnamed columns.
    let mut columns: Vec<(usize, String)> = Vec::new();
    for (position, cell) in header.iter().enumerate().skip(1) {
        let label = cell.trim().trim_start_matches(UTF8_BOM);
        if label.is_empty() {
            debug!("{} report: skipping unnamed column #{}", document, position);
            continue;
        }
        if table.add_column(label) {
            columns.push((position, label.to_string()));
        } else {
            warn!(
                "{} report: duplicate column '{}' ignored, keeping the first one",
                document, label
            );
        }
    }

    for record in records {
        let record = record.map_err(|source| ReportJoinError::Csv { document, source })?;

        let label = record.get(0).map(str::trim).unwrap_or_default();
        if label.is_empty() {
            debug!("{} report: skipping row without label", document);
            continue;
        }
        if !table.add_row(label) {
            warn!(
                "{} report: duplicate metric '{}' ignored, keeping the first one",
                document, label
            );
            continue;
        }

        for (position, column) in &columns {
            if let Some(value) = record.get(*position).filter(|value| !value.trim().is_empty()) {
                table.set(label, column, value);
            }
        }
    }

    debug!(
        "Parsed {} report: {} metrics x {} periods",
        document,
        table.rows().len(),
        table.columns().len()
    );

    Ok(table)
}
