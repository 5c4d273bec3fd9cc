use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Insertion-ordered set of labels. Inserting a label that is already present
/// is a no-op, so the first occurrence keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the label was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.index.contains_key(&label) {
            return false;
        }
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Renames `from` to `to` in place. Does nothing and returns `false` when
    /// `from` is absent or `to` is already taken.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to || self.index.contains_key(to) {
            return false;
        }
        let Some(position) = self.index.remove(from) else {
            return false;
        };
        self.labels[position] = to.to_string();
        self.index.insert(to.to_string(), position);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// A report table: metric rows by period columns, each cell an optional
/// piece of raw text. Rows and columns keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    rows: LabelSet,
    columns: LabelSet,
    cells: HashMap<String, HashMap<String, String>>,
}

impl ReportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(rows: LabelSet, columns: LabelSet) -> Self {
        Self {
            rows,
            columns,
            cells: HashMap::new(),
        }
    }

    pub fn rows(&self) -> &LabelSet {
        &self.rows
    }

    pub fn columns(&self) -> &LabelSet {
        &self.columns
    }

    pub fn add_row(&mut self, label: impl Into<String>) -> bool {
        self.rows.insert(label)
    }

    pub fn add_column(&mut self, label: impl Into<String>) -> bool {
        self.columns.insert(label)
    }

    pub fn has_row(&self, label: &str) -> bool {
        self.rows.contains(label)
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.contains(label)
    }

    /// Stores a cell value. The row and column must already exist; values for
    /// unknown labels are ignored and `false` is returned.
    pub fn set(&mut self, row: &str, column: &str, value: impl Into<String>) -> bool {
        if !self.rows.contains(row) || !self.columns.contains(column) {
            return false;
        }
        self.cells
            .entry(row.to_string())
            .or_default()
            .insert(column.to_string(), value.into());
        true
    }

    pub fn get(&self, row: &str, column: &str) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    pub fn row_values(&self, row: &str) -> Vec<Option<&str>> {
        self.columns.iter().map(|column| self.get(row, column)).collect()
    }

    /// Relabels a column; its cells move with it.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if !self.columns.rename(from, to) {
            return false;
        }
        for cells in self.cells.values_mut() {
            if let Some(value) = cells.remove(from) {
                cells.insert(to.to_string(), value);
            }
        }
        true
    }

    /// Relabels a row; its cells move with it.
    pub fn rename_row(&mut self, from: &str, to: &str) -> bool {
        if !self.rows.rename(from, to) {
            return false;
        }
        if let Some(cells) = self.cells.remove(from) {
            self.cells.insert(to.to_string(), cells);
        }
        true
    }

    /// Rewrites every present cell in place.
    pub fn map_values<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for cells in self.cells.values_mut() {
            for value in cells.values_mut() {
                *value = f(value.as_str());
            }
        }
    }

    /// Rewrites every present cell of one row in place.
    pub fn map_row_values<F>(&mut self, row: &str, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        if let Some(cells) = self.cells.get_mut(row) {
            for value in cells.values_mut() {
                *value = f(value.as_str());
            }
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }

    pub fn to_view(&self) -> TableView {
        TableView {
            columns: self.columns.as_slice().to_vec(),
            rows: self
                .rows
                .iter()
                .map(|label| RowView {
                    label: label.to_string(),
                    values: self
                        .row_values(label)
                        .into_iter()
                        .map(|value| value.map(str::to_string))
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_view())?)
    }

    /// Tab-delimited rendering: a header row starting with an empty cell,
    /// then one line per row label. Missing cells become empty fields.
    pub fn to_tsv(&self) -> Result<String> {
        let mut writer = tsv_writer();

        write_header(&mut writer, self.columns.iter())?;
        for label in self.rows.iter() {
            write_row(&mut writer, label, self.row_values(label))?;
        }

        finish_tsv(writer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub label: String,
    pub values: Vec<Option<String>>,
}

pub(crate) fn tsv_writer() -> csv::Writer<Vec<u8>> {
    tsv_writer_from(Vec::new())
}

fn tsv_writer_from(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(buffer)
}

pub(crate) fn write_header<'a>(
    writer: &mut csv::Writer<Vec<u8>>,
    columns: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let record: Vec<&str> = std::iter::once("").chain(columns).collect();
    write_record(writer, &record)
}

pub(crate) fn write_row(
    writer: &mut csv::Writer<Vec<u8>>,
    label: &str,
    values: Vec<Option<&str>>,
) -> Result<()> {
    let record: Vec<&str> = std::iter::once(label)
        .chain(values.into_iter().map(|value| value.unwrap_or("")))
        .collect();
    write_record(writer, &record)
}

/// A record made of one empty field goes out as a blank line; the csv
/// writer would otherwise quote it as `""`.
fn write_record(writer: &mut csv::Writer<Vec<u8>>, record: &[&str]) -> Result<()> {
    if let [""] = record {
        writer.flush()?;
        let mut buffer = std::mem::replace(writer, tsv_writer())
            .into_inner()
            .map_err(|e| e.into_error())?;
        buffer.push(b'\n');
        *writer = tsv_writer_from(buffer);
        return Ok(());
    }
    writer.write_record(record).map_err(csv_to_io)?;
    Ok(())
}

pub(crate) fn finish_tsv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn csv_to_io(error: csv::Error) -> std::io::Error {
    std::io::Error::other(error)
}
