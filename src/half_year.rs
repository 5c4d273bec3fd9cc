//! Detection of half-year reporting hidden in quarterly data.
//!
//! Some issuers only publish at mid-year and year end. In the quarterly feed
//! those show up as a `Q2` and a `Q4` column with nothing else for that year.
//! Such pairs are relabelled `H1`/`H2` so they order and read as half-years.

use crate::period::{half_year_label, quarter_label, PeriodDescriptor, PeriodKind};
use crate::table::ReportTable;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Quarter numbers present per year among the quarter columns of `table`.
pub fn quarters_by_year(table: &ReportTable) -> BTreeMap<i32, BTreeSet<u8>> {
    let mut quarters: BTreeMap<i32, BTreeSet<u8>> = BTreeMap::new();

    for label in table.columns().iter() {
        let descriptor = PeriodDescriptor::parse(label);
        if descriptor.kind != PeriodKind::Quarter {
            continue;
        }
        if let (Some(year), Some(quarter)) = (descriptor.year, descriptor.subperiod) {
            quarters.entry(year).or_default().insert(quarter);
        }
    }

    quarters
}

/// Years whose quarter columns are exactly `{Q2, Q4}`.
pub fn half_year_years(table: &ReportTable) -> Vec<i32> {
    let half_year_pattern: BTreeSet<u8> = [2, 4].into_iter().collect();

    quarters_by_year(table)
        .into_iter()
        .filter(|(_, quarters)| *quarters == half_year_pattern)
        .map(|(year, _)| year)
        .collect()
}

/// Relabels `YYYYQ2 -> YYYYH1` and `YYYYQ4 -> YYYYH2` for every year that
/// only reports Q2 and Q4. Cell values move with their column; all other
/// columns are left untouched.
pub fn infer_half_years(mut table: ReportTable) -> ReportTable {
    for year in half_year_years(&table) {
        for (quarter, half) in [(2, 1), (4, 2)] {
            let from = quarter_label(year, quarter);
            let to = half_year_label(year, half);
            if table.rename_column(&from, &to) {
                debug!("Treating {} as half-year period {}", from, to);
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_columns(columns: &[&str]) -> ReportTable {
        let mut table = ReportTable::new();
        table.add_row("Revenue");
        for (i, column) in columns.iter().enumerate() {
            table.add_column(*column);
            table.set("Revenue", column, i.to_string());
        }
        table
    }

    #[test]
    fn test_q2_q4_pair_becomes_half_years() {
        let table = infer_half_years(table_with_columns(&["2022Q2", "2022Q4"]));

        assert_eq!(table.columns().as_slice(), &["2022H1", "2022H2"]);
        assert_eq!(table.get("Revenue", "2022H1"), Some("0"));
        assert_eq!(table.get("Revenue", "2022H2"), Some("1"));
    }

    #[test]
    fn test_other_quarter_sets_are_untouched() {
        for columns in [
            vec!["2022Q1", "2022Q2", "2022Q4"],
            vec!["2022Q2", "2022Q3", "2022Q4"],
            vec!["2022Q2"],
            vec!["2022Q4"],
            vec!["2022Q1", "2022Q3"],
            vec!["2022Q1", "2022Q2", "2022Q3", "2022Q4"],
        ] {
            let table = infer_half_years(table_with_columns(&columns));
            assert_eq!(table.columns().as_slice(), columns.as_slice());
        }
    }

    #[test]
    fn test_inference_is_per_year() {
        let table = infer_half_years(table_with_columns(&[
            "2021Q1", "2021Q2", "2021Q3", "2021Q4", "2022Q2", "2022Q4", "LTM",
        ]));

        assert_eq!(
            table.columns().as_slice(),
            &["2021Q1", "2021Q2", "2021Q3", "2021Q4", "2022H1", "2022H2", "LTM"]
        );
    }

    #[test]
    fn test_half_year_years() {
        let table = table_with_columns(&["2020Q2", "2020Q4", "2021Q4", "2022Q2", "2022Q4"]);
        assert_eq!(half_year_years(&table), vec![2020, 2022]);
    }
}
