//! # Financial Report Joiner
//!
//! A library for merging an annual and a quarterly financial report of the same
//! company into one chronologically ordered table.
//!
//! ## Core Concepts
//!
//! - **Period labels**: column headers such as `2022`, `2022Q3`, `2022H1` and `LTM`,
//!   classified and ordered by [`period`]
//! - **Half-year inference**: a year whose quarterly data only holds `Q2` and `Q4`
//!   is treated as half-year reporting (`H1`/`H2`)
//! - **Source precedence**: the annual report defines the metric catalogue and wins
//!   any column both reports carry; a lone `Q4` is dropped in favour of the annual column
//! - **Normalization**: numbers lose their thousands separators and decimal commas,
//!   report dates become ISO dates, and known metric synonyms get one canonical name
//! - **Dual standards**: IFRS and RAS reports are merged independently and stacked
//!   with a block of blank rows between them
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_report_joiner::*;
//!
//! let annual = ";2021;2022;LTM\nВыручка, млрд руб;1 200,5;1 350;1 400\n";
//! let quarterly = ";2022Q1;2022Q2;2022Q3;2022Q4\nВыручка, млрд руб;300;310;320;420\n";
//!
//! let tsv = join_reports(annual, quarterly).unwrap();
//! assert!(tsv.starts_with("\t2021\t2022Q1\t2022Q2\t2022Q3\t2022Q4\t2022\tLTM\n"));
//! ```

pub mod combiner;
pub mod engine;
pub mod error;
pub mod half_year;
pub mod ingestion;
pub mod metrics;
pub mod normalize;
pub mod period;
pub mod schema;
pub mod staging;
pub mod table;

#[cfg(feature = "fetch")]
pub mod fetch;

pub use combiner::{combine_standards, CombinedDocument, CombinedLine};
pub use engine::{merge_tables, ordered_period_union, plan_columns, ColumnPlan};
pub use error::{ReportJoinError, Result};
pub use half_year::infer_half_years;
pub use ingestion::{parse_report, read_report};
pub use metrics::merge_metric_keys;
pub use normalize::ValueNormalizer;
pub use period::{PeriodDescriptor, PeriodKind, PeriodRank, PeriodSortKey};
pub use schema::*;
pub use staging::StagingArea;
pub use table::{LabelSet, ReportTable, RowView, TableView};

use log::{debug, info};

/// The annual and quarterly reports of one company under one standard.
#[derive(Debug, Clone)]
pub struct ReportPair {
    pub annual: ReportTable,
    pub quarterly: ReportTable,
}

impl ReportPair {
    pub fn parse(annual: &str, quarterly: &str) -> Result<Self> {
        Ok(Self {
            annual: parse_report(annual, ReportFrequency::Annual)?,
            quarterly: parse_report(quarterly, ReportFrequency::Quarterly)?,
        })
    }
}

/// Result of a join: one merged table, or two stacked standards.
#[derive(Debug, Clone)]
pub enum JoinOutput {
    Single(ReportTable),
    Combined(CombinedDocument),
}

impl JoinOutput {
    pub fn to_tsv(&self) -> Result<String> {
        match self {
            JoinOutput::Single(table) => table.to_tsv(),
            JoinOutput::Combined(document) => document.to_tsv(),
        }
    }
}

pub struct ReportJoiner {
    config: JoinerConfig,
    normalizer: ValueNormalizer,
}

impl ReportJoiner {
    pub fn new(config: JoinerConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = ValueNormalizer::new(&config.normalizer)?;
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &JoinerConfig {
        &self.config
    }

    /// Runs the single-standard pipeline: half-year inference on the
    /// quarterly columns, column merge, then normalization.
    pub fn join(&self, annual: &ReportTable, quarterly: &ReportTable) -> ReportTable {
        debug!(
            "Joining {} annual metrics with {} quarterly metrics",
            annual.rows().len(),
            quarterly.rows().len()
        );

        let quarterly = infer_half_years(quarterly.clone());
        let merged = merge_tables(annual, &quarterly);
        self.normalizer.normalize(merged)
    }

    pub fn join_pair(&self, pair: &ReportPair) -> ReportTable {
        self.join(&pair.annual, &pair.quarterly)
    }

    pub fn join_documents(&self, annual: &str, quarterly: &str) -> Result<ReportTable> {
        let pair = ReportPair::parse(annual, quarterly)?;
        Ok(self.join_pair(&pair))
    }

    /// Merges each standard on its own and stacks `first` above `second`.
    pub fn join_dual(&self, first: &ReportPair, second: &ReportPair) -> CombinedDocument {
        let first = self.join_pair(first);
        let second = self.join_pair(second);
        combine_standards(&first, &second, self.config.separator_rows)
    }

    /// Joins one pair per standard. A single pair yields a single table; two
    /// pairs yield a combined document.
    pub fn join_standards(&self, pairs: &[ReportPair]) -> Result<JoinOutput> {
        match pairs {
            [pair] => Ok(JoinOutput::Single(self.join_pair(pair))),
            [first, second] => Ok(JoinOutput::Combined(self.join_dual(first, second))),
            _ => Err(ReportJoinError::InvalidConfig(format!(
                "Expected reports for one or two standards, got {}",
                pairs.len()
            ))),
        }
    }
}

/// Joins two semicolon-delimited reports with the built-in configuration and
/// returns the tab-delimited result.
pub fn join_reports(annual: &str, quarterly: &str) -> Result<String> {
    let joiner = ReportJoiner::new(JoinerConfig::default())?;
    let table = joiner.join_documents(annual, quarterly)?;
    info!(
        "Joined report: {} metrics x {} periods",
        table.rows().len(),
        table.columns().len()
    );
    table.to_tsv()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_processing() {
        let annual = "\
;2021;2022;LTM
Дата отчета;31.12.2021;31.12.2022;
Выручка, млрд руб;1 200,5;1 350;1 400
Чистые активы, млрд руб;10;12;
";
        let quarterly = "\
;2022Q1;2022Q2;2022Q3;2022Q4
Выручка, млрд руб;300;310;320;420
Дивиденд, руб;;;;5,5
";

        let joiner = ReportJoiner::new(JoinerConfig::default()).unwrap();
        let table = joiner.join_documents(annual, quarterly).unwrap();

        assert_eq!(
            table.columns().as_slice(),
            &["2021", "2022Q1", "2022Q2", "2022Q3", "2022Q4", "2022", "LTM"]
        );
        assert_eq!(
            table.rows().as_slice(),
            &[
                "Дата отчета",
                "Выручка, млрд руб",
                "NA, млрд руб",
                "Дивиденд, руб"
            ]
        );
        assert_eq!(table.get("Дата отчета", "2022"), Some("2022-12-31"));
        assert_eq!(table.get("Выручка, млрд руб", "2021"), Some("1200.5"));
        assert_eq!(table.get("Дивиденд, руб", "2022Q4"), Some("5.5"));
        assert_eq!(table.get("Дата отчета", "LTM"), None);
    }

    #[test]
    fn test_join_standards_rejects_bad_arity() {
        let joiner = ReportJoiner::new(JoinerConfig::default()).unwrap();
        assert!(joiner.join_standards(&[]).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = JoinerConfig {
            separator_rows: 0,
            ..JoinerConfig::default()
        };
        assert!(ReportJoiner::new(config).is_err());
    }
}
