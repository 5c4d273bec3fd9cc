//! Column merge of an annual and a quarterly report.
//!
//! Columns from both reports are ordered by [`sort_key`] and deduplicated;
//! a column present in both is filled from the annual report.

use crate::half_year::quarters_by_year;
use crate::metrics::merge_metric_keys;
use crate::period::{quarter_label, sort_key};
use crate::schema::ReportFrequency;
use crate::table::{LabelSet, ReportTable};
use log::{debug, info};
use std::collections::BTreeSet;

/// One output column and the report that supplies its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub label: String,
    pub source: ReportFrequency,
}

/// Sorts period labels chronologically and collapses duplicates.
///
/// The sort is stable, so labels with equal keys (unrecognised labels, or the
/// same label seen twice) keep their first-seen relative order, and a
/// duplicate keeps the position of its first occurrence.
pub fn ordered_period_union<'a, I>(labels: I) -> LabelSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut labels: Vec<&str> = labels.into_iter().collect();
    labels.sort_by_key(|label| sort_key(label));
    labels.into_iter().collect()
}

/// Q4 columns that only repeat the annual figure.
///
/// A `YYYYQ4` column is redundant when it is the only quarter reported for
/// that year and the annual report already has the `YYYY` column.
pub fn redundant_q4_columns(annual: &ReportTable, quarterly: &ReportTable) -> BTreeSet<String> {
    quarters_by_year(quarterly)
        .into_iter()
        .filter(|(year, quarters)| {
            quarters.len() == 1 && quarters.contains(&4) && annual.has_column(&year.to_string())
        })
        .map(|(year, _)| quarter_label(year, 4))
        .collect()
}

/// Chronological column layout of the merged table. The annual report wins
/// every label that both reports carry.
pub fn plan_columns(annual: &ReportTable, quarterly: &ReportTable) -> Vec<ColumnPlan> {
    let redundant = redundant_q4_columns(annual, quarterly);
    for label in &redundant {
        debug!("Dropping {}: annual column covers the same year", label);
    }

    let candidates = annual.columns().iter().chain(
        quarterly
            .columns()
            .iter()
            .filter(|label| !redundant.contains(*label)),
    );

    ordered_period_union(candidates)
        .iter()
        .map(|label| ColumnPlan {
            label: label.to_string(),
            source: if annual.has_column(label) {
                ReportFrequency::Annual
            } else {
                ReportFrequency::Quarterly
            },
        })
        .collect()
}

/// Builds the merged table from an annual and a (half-year relabelled)
/// quarterly report. Cells absent from the report owning a column stay
/// missing.
pub fn merge_tables(annual: &ReportTable, quarterly: &ReportTable) -> ReportTable {
    let rows = merge_metric_keys(annual.rows(), quarterly.rows());
    let plan = plan_columns(annual, quarterly);
    let columns: LabelSet = plan.iter().map(|column| column.label.as_str()).collect();

    let mut merged = ReportTable::with_labels(rows, columns);

    for column in &plan {
        let source = match column.source {
            ReportFrequency::Annual => annual,
            ReportFrequency::Quarterly => quarterly,
        };
        for row in source.rows().iter() {
            if let Some(value) = source.get(row, &column.label) {
                merged.set(row, &column.label, value);
            }
        }
    }

    info!(
        "Merged {} annual and {} quarterly columns into {} columns across {} metrics",
        annual.columns().len(),
        quarterly.columns().len(),
        merged.columns().len(),
        merged.rows().len()
    );

    merged
}
