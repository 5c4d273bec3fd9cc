//! Classification and chronological ordering of period column labels.
//!
//! Four label shapes are recognised:
//!
//! - `YYYY` (fiscal year, `20xx` only)
//! - `YYYYQn` with `n` in `1..=4` (quarter)
//! - `YYYYHn` with `n` in `1..=2` (half-year)
//! - the literal `LTM` (last twelve months)
//!
//! Anything else is [`PeriodKind::Unknown`]. Classification never fails, and
//! unknown labels are kept in the data but sort to the front.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const LTM_LABEL: &str = "LTM";

/// Year used in the sort key of the `LTM` column so that it sorts last.
pub const LTM_SORT_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PeriodKind {
    Year,
    Quarter,
    HalfYear,
    Ltm,
    Unknown,
}

/// Position of a period inside its year.
///
/// The variant order is the chronological order used for sorting:
/// `Q1 < Q2 < H1 < Q3 < Q4 < H2 < Year`. A half-year sits right after the
/// last quarter it covers, and the annual column closes the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodRank {
    Q1,
    Q2,
    H1,
    Q3,
    Q4,
    H2,
    Year,
}

impl PeriodRank {
    /// Numeric rank within the year.
    pub fn value(self) -> f64 {
        match self {
            PeriodRank::Q1 => 0.25,
            PeriodRank::Q2 => 0.5,
            PeriodRank::H1 => 0.55,
            PeriodRank::Q3 => 0.75,
            PeriodRank::Q4 => 0.9,
            PeriodRank::H2 => 0.95,
            PeriodRank::Year => 1.0,
        }
    }

    pub fn for_quarter(quarter: u8) -> Option<Self> {
        match quarter {
            1 => Some(PeriodRank::Q1),
            2 => Some(PeriodRank::Q2),
            3 => Some(PeriodRank::Q3),
            4 => Some(PeriodRank::Q4),
            _ => None,
        }
    }

    pub fn for_half(half: u8) -> Option<Self> {
        match half {
            1 => Some(PeriodRank::H1),
            2 => Some(PeriodRank::H2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodDescriptor {
    pub kind: PeriodKind,
    pub year: Option<i32>,
    pub subperiod: Option<u8>,
}

impl PeriodDescriptor {
    pub fn parse(label: &str) -> Self {
        let bytes = label.as_bytes();

        if let Some(year) = parse_year_prefix(bytes) {
            match &bytes[4..] {
                [] => return Self::new(PeriodKind::Year, Some(year), None),
                [b'Q', n @ b'1'..=b'4'] => {
                    return Self::new(PeriodKind::Quarter, Some(year), Some(n - b'0'))
                }
                [b'H', n @ b'1'..=b'2'] => {
                    return Self::new(PeriodKind::HalfYear, Some(year), Some(n - b'0'))
                }
                _ => {}
            }
        }

        if label == LTM_LABEL {
            return Self::new(PeriodKind::Ltm, None, None);
        }

        Self::new(PeriodKind::Unknown, None, None)
    }

    fn new(kind: PeriodKind, year: Option<i32>, subperiod: Option<u8>) -> Self {
        Self {
            kind,
            year,
            subperiod,
        }
    }

    pub fn rank(&self) -> Option<PeriodRank> {
        match self.kind {
            PeriodKind::Year => Some(PeriodRank::Year),
            PeriodKind::Quarter => self.subperiod.and_then(PeriodRank::for_quarter),
            PeriodKind::HalfYear => self.subperiod.and_then(PeriodRank::for_half),
            PeriodKind::Ltm | PeriodKind::Unknown => None,
        }
    }

    pub fn sort_key(&self) -> PeriodSortKey {
        match (self.kind, self.year, self.rank()) {
            (PeriodKind::Ltm, _, _) => PeriodSortKey::new(LTM_SORT_YEAR, PeriodRank::Year.value()),
            (_, Some(year), Some(rank)) => PeriodSortKey::new(year, rank.value()),
            _ => PeriodSortKey::new(0, 0.0),
        }
    }

    pub fn is_quarter(&self) -> bool {
        self.kind == PeriodKind::Quarter
    }
}

/// Matches `20\d{2}` at the start of `bytes` and returns the year.
fn parse_year_prefix(bytes: &[u8]) -> Option<i32> {
    match bytes {
        [b'2', b'0', d1 @ b'0'..=b'9', d2 @ b'0'..=b'9', ..] => {
            Some(2000 + i32::from(d1 - b'0') * 10 + i32::from(d2 - b'0'))
        }
        _ => None,
    }
}

/// Total chronological order over period labels: by year, then by rank within
/// the year.
#[derive(Debug, Clone, Copy)]
pub struct PeriodSortKey {
    pub year: i32,
    pub rank: f64,
}

impl PeriodSortKey {
    pub fn new(year: i32, rank: f64) -> Self {
        Self { year, rank }
    }
}

impl PartialEq for PeriodSortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PeriodSortKey {}

impl PartialOrd for PeriodSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PeriodSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.rank.total_cmp(&other.rank))
    }
}

impl fmt::Display for PeriodSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.year, self.rank)
    }
}

pub fn sort_key(label: &str) -> PeriodSortKey {
    PeriodDescriptor::parse(label).sort_key()
}

pub fn quarter_label(year: i32, quarter: u8) -> String {
    format!("{}Q{}", year, quarter)
}

pub fn half_year_label(year: i32, half: u8) -> String {
    format!("{}H{}", year, half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_recognised_shapes() {
        assert_eq!(
            PeriodDescriptor::parse("2022"),
            PeriodDescriptor {
                kind: PeriodKind::Year,
                year: Some(2022),
                subperiod: None
            }
        );
        assert_eq!(
            PeriodDescriptor::parse("2021Q3"),
            PeriodDescriptor {
                kind: PeriodKind::Quarter,
                year: Some(2021),
                subperiod: Some(3)
            }
        );
        assert_eq!(
            PeriodDescriptor::parse("2019H2"),
            PeriodDescriptor {
                kind: PeriodKind::HalfYear,
                year: Some(2019),
                subperiod: Some(2)
            }
        );
        assert_eq!(PeriodDescriptor::parse("LTM").kind, PeriodKind::Ltm);
    }

    #[test]
    fn test_classify_unknown_shapes() {
        for label in [
            "", "1999", "2022Q5", "2022Q0", "2022H3", "2022q1", "ltm", " 2022", "2022 ", "20220",
            "Дата", "2022Q12", "20ab",
        ] {
            let descriptor = PeriodDescriptor::parse(label);
            assert_eq!(descriptor.kind, PeriodKind::Unknown, "label {:?}", label);
            assert_eq!(descriptor.year, None);
            assert_eq!(descriptor.subperiod, None);
            assert_eq!(descriptor.sort_key(), PeriodSortKey::new(0, 0.0));
        }
    }

    #[test]
    fn test_classification_is_stable() {
        for label in ["2022", "2022Q4", "2022H1", "LTM", "garbage"] {
            assert_eq!(PeriodDescriptor::parse(label), PeriodDescriptor::parse(label));
            assert_eq!(sort_key(label), sort_key(label));
        }
    }

    #[test]
    fn test_intra_year_order() {
        let ordered = ["2022Q1", "2022Q2", "2022H1", "2022Q3", "2022Q4", "2022H2", "2022"];
        for pair in ordered.windows(2) {
            assert!(
                sort_key(pair[0]) < sort_key(pair[1]),
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_rank_enum_order_matches_values() {
        let ranks = [
            PeriodRank::Q1,
            PeriodRank::Q2,
            PeriodRank::H1,
            PeriodRank::Q3,
            PeriodRank::Q4,
            PeriodRank::H2,
            PeriodRank::Year,
        ];
        for pair in ranks.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].value() < pair[1].value());
        }
    }

    #[test]
    fn test_year_dominates_rank() {
        assert!(sort_key("2021") < sort_key("2022Q1"));
        assert!(sort_key("2021H2") < sort_key("2022Q1"));
        assert!(sort_key("2099") < sort_key("LTM"));
        assert!(sort_key("unknown") < sort_key("2000Q1"));
    }

    #[test]
    fn test_ltm_key() {
        assert_eq!(sort_key("LTM"), PeriodSortKey::new(LTM_SORT_YEAR, 1.0));
    }

    #[test]
    fn test_label_builders() {
        assert_eq!(quarter_label(2022, 4), "2022Q4");
        assert_eq!(half_year_label(2022, 1), "2022H1");
        assert_eq!(PeriodDescriptor::parse(&half_year_label(2023, 2)).kind, PeriodKind::HalfYear);
    }
}
