//! Stacking of two merged standards into one document.

use crate::engine::ordered_period_union;
use crate::error::Result;
use crate::table::{finish_tsv, tsv_writer, write_header, write_row, LabelSet, ReportTable};
use log::info;

#[derive(Debug, Clone, PartialEq)]
pub enum CombinedLine {
    Metric {
        label: String,
        values: Vec<Option<String>>,
    },
    Separator,
}

/// Two merged tables stacked vertically with a block of blank rows between
/// them, sharing one chronological column layout.
#[derive(Debug, Clone)]
pub struct CombinedDocument {
    columns: LabelSet,
    lines: Vec<CombinedLine>,
}

impl CombinedDocument {
    pub fn columns(&self) -> &LabelSet {
        &self.columns
    }

    pub fn lines(&self) -> &[CombinedLine] {
        &self.lines
    }

    pub fn separator_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, CombinedLine::Separator))
            .count()
    }

    pub fn metric_labels(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                CombinedLine::Metric { label, .. } => Some(label.as_str()),
                CombinedLine::Separator => None,
            })
            .collect()
    }

    /// Separator lines are written as rows with an empty label and no values.
    pub fn to_tsv(&self) -> Result<String> {
        let mut writer = tsv_writer();
        write_header(&mut writer, self.columns.iter())?;

        let blank = vec![None; self.columns.len()];
        for line in &self.lines {
            match line {
                CombinedLine::Metric { label, values } => {
                    let values = values.iter().map(|value| value.as_deref()).collect();
                    write_row(&mut writer, label, values)?;
                }
                CombinedLine::Separator => write_row(&mut writer, "", blank.clone())?,
            }
        }

        finish_tsv(writer)
    }
}

/// Stacks `first` above `second` with `separator_rows` blank rows between.
/// The column layout is rebuilt from the union of both tables' columns, so a
/// period known to only one table still lands in chronological position.
pub fn combine_standards(
    first: &ReportTable,
    second: &ReportTable,
    separator_rows: usize,
) -> CombinedDocument {
    let columns = ordered_period_union(first.columns().iter().chain(second.columns().iter()));

    let mut lines = Vec::with_capacity(first.rows().len() + separator_rows + second.rows().len());
    lines.extend(metric_lines(first, &columns));
    lines.extend(std::iter::repeat(CombinedLine::Separator).take(separator_rows));
    lines.extend(metric_lines(second, &columns));

    info!(
        "Combined {} + {} metrics over {} columns",
        first.rows().len(),
        second.rows().len(),
        columns.len()
    );

    CombinedDocument { columns, lines }
}

fn metric_lines<'a>(
    table: &'a ReportTable,
    columns: &'a LabelSet,
) -> impl Iterator<Item = CombinedLine> + 'a {
    table.rows().iter().map(move |label| CombinedLine::Metric {
        label: label.to_string(),
        values: columns
            .iter()
            .map(|column| table.get(label, column).map(str::to_string))
            .collect(),
    })
}
