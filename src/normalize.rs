//! Post-merge cleanup: number formatting, report dates and metric synonyms.

use crate::error::Result;
use crate::schema::NormalizerConfig;
use crate::table::ReportTable;
use chrono::NaiveDate;
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeMap;

/// Thousands separators seen in the source reports: plain, no-break and
/// narrow no-break spaces.
const SPACE_CHARS: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Post-merge cleanup of cell text and metric labels.
///
/// Built once from a [`NormalizerConfig`] and then only read, so one
/// normalizer can serve any number of merges.
#[derive(Debug, Clone)]
pub struct ValueNormalizer {
    report_date_row: Option<String>,
    renames: BTreeMap<String, String>,
    decimal_comma: Regex,
    date_prefix: Regex,
}

impl ValueNormalizer {
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        Ok(Self {
            report_date_row: config.report_date_row.clone(),
            renames: config.renames.clone(),
            decimal_comma: Regex::new(r"\d,\d")?,
            date_prefix: Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})")?,
        })
    }

    /// Strips spaces and, when the text has a digit-comma-digit sequence,
    /// turns commas into decimal points. Text without such a sequence keeps
    /// its commas.
    pub fn clean_value(&self, value: &str) -> String {
        let compact: String = value.chars().filter(|c| !SPACE_CHARS.contains(c)).collect();

        if self.decimal_comma.is_match(&compact) {
            compact.replace(',', ".")
        } else {
            compact
        }
    }

    /// Rewrites a leading `dd.mm.yyyy` date as `yyyy-mm-dd`, keeping any text
    /// after it. Anything else, including impossible dates like `31.02.2022`,
    /// passes through.
    pub fn canonicalize_date(&self, value: &str) -> String {
        let Some(captures) = self.date_prefix.captures(value) else {
            return value.to_string();
        };

        let day = captures[1].parse::<u32>().ok();
        let month = captures[2].parse::<u32>().ok();
        let year = captures[3].parse::<i32>().ok();
        let rest = &value[captures[0].len()..];

        match (year, month, day) {
            (Some(year), Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| format!("{}{}", date.format(CANONICAL_DATE_FORMAT), rest))
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        }
    }

    pub fn canonical_label<'a>(&'a self, label: &'a str) -> &'a str {
        self.renames.get(label).map(String::as_str).unwrap_or(label)
    }

    /// Applies the synonym table to row labels.
    ///
    /// Rows are never merged: a rename whose target label is already present
    /// in the table is skipped and the row keeps its original label.
    pub fn rename_metrics(&self, table: &mut ReportTable) {
        let labels: Vec<String> = table.rows().as_slice().to_vec();

        for label in &labels {
            let target = self.canonical_label(label);
            if target == label {
                continue;
            }
            if table.rename_row(label, target) {
                debug!("Renamed metric '{}' to '{}'", label, target);
            } else {
                warn!(
                    "Metric '{}' not renamed: '{}' is already present in the table",
                    label, target
                );
            }
        }
    }

    pub fn normalize(&self, mut table: ReportTable) -> ReportTable {
        table.map_values(|value| self.clean_value(value));

        match &self.report_date_row {
            Some(row) if table.has_row(row) => {
                table.map_row_values(row, |value| self.canonicalize_date(value));
            }
            Some(row) => debug!("No '{}' row, skipping date conversion", row),
            None => {}
        }

        self.rename_metrics(&mut table);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> ValueNormalizer {
        ValueNormalizer::new(&NormalizerConfig::default()).unwrap()
    }

    #[test]
    fn test_clean_decimal_comma() {
        let n = normalizer();
        assert_eq!(n.clean_value("1 234,56"), "1234.56");
        assert_eq!(n.clean_value("-0,5"), "-0.5");
        assert_eq!(n.clean_value("12\u{a0}000"), "12000");
        assert_eq!(n.clean_value("7"), "7");
    }

    #[test]
    fn test_clean_keeps_non_numeric_commas() {
        let n = normalizer();
        assert_eq!(n.clean_value("N/A, примечание"), "N/A,примечание");
        assert_eq!(n.clean_value("a,b"), "a,b");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let n = normalizer();
        for value in ["1 234,56", "N/A, x", "1, 2", "1,234,567", " ", "31.12.2022", "—"] {
            let once = n.clean_value(value);
            assert_eq!(n.clean_value(&once), once, "value {:?}", value);
        }
    }

    #[test]
    fn test_canonicalize_date() {
        let n = normalizer();
        assert_eq!(n.canonicalize_date("31.12.2022"), "2022-12-31");
        assert_eq!(n.canonicalize_date("01.04.2021 (restated)"), "2021-04-01 (restated)");
        assert_eq!(n.canonicalize_date("01.04.2021(restated)"), "2021-04-01(restated)");
        assert_eq!(n.canonicalize_date("31.02.2022"), "31.02.2022");
        assert_eq!(n.canonicalize_date("2022-12-31"), "2022-12-31");
        assert_eq!(n.canonicalize_date("as of 31.12.2022"), "as of 31.12.2022");
    }

    #[test]
    fn test_normalize_only_touches_report_date_row() {
        let mut table = ReportTable::new();
        table.add_column("2022");
        table.add_row("Дата отчета");
        table.add_row("Комментарий");
        table.set("Дата отчета", "2022", "31.12.2022");
        table.set("Комментарий", "2022", "31.12.2022");

        let table = normalizer().normalize(table);

        assert_eq!(table.get("Дата отчета", "2022"), Some("2022-12-31"));
        assert_eq!(table.get("Комментарий", "2022"), Some("31.12.2022"));
    }

    #[test]
    fn test_report_date_keeps_trailing_text() {
        let mut table = ReportTable::new();
        table.add_column("2022");
        table.add_row("Дата отчета");
        table.set("Дата отчета", "2022", "31.12.2022 (пересчитано)");

        let table = normalizer().normalize(table);

        assert_eq!(table.get("Дата отчета", "2022"), Some("2022-12-31(пересчитано)"));
    }

    #[test]
    fn test_rename_metrics() {
        let mut table = ReportTable::new();
        table.add_column("2022");
        table.add_row("Выручка, млрд руб");
        table.add_row("Чистые активы, млрд руб");
        table.set("Чистые активы, млрд руб", "2022", "5");

        let table = normalizer().normalize(table);

        assert_eq!(
            table.rows().as_slice(),
            &["Выручка, млрд руб", "NA, млрд руб"]
        );
        assert_eq!(table.get("NA, млрд руб", "2022"), Some("5"));
    }

    #[test]
    fn test_rename_collision_keeps_rows_distinct() {
        let mut table = ReportTable::new();
        table.add_column("2022");
        table.add_row("Операционный денежный поток, млрд руб");
        table.add_row("Денежный поток от операционной деятельности, млрд руб");
        table.set("Операционный денежный поток, млрд руб", "2022", "1");
        table.set("Денежный поток от операционной деятельности, млрд руб", "2022", "2");

        let table = normalizer().normalize(table);

        assert_eq!(
            table.rows().as_slice(),
            &[
                "OCF, млрд руб",
                "Денежный поток от операционной деятельности, млрд руб"
            ]
        );
        assert_eq!(table.get("OCF, млрд руб", "2022"), Some("1"));
        assert_eq!(
            table.get("Денежный поток от операционной деятельности, млрд руб", "2022"),
            Some("2")
        );
    }

    #[test]
    fn test_missing_date_row_is_not_an_error() {
        let config = NormalizerConfig {
            report_date_row: None,
            renames: BTreeMap::new(),
        };
        let mut table = ReportTable::new();
        table.add_column("2022");
        table.add_row("Дата отчета");
        table.set("Дата отчета", "2022", "31.12.2022");

        let table = ValueNormalizer::new(&config).unwrap().normalize(table);
        assert_eq!(table.get("Дата отчета", "2022"), Some("31.12.2022"));
    }
}
