use crate::error::{ReportJoinError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const DEFAULT_REPORT_DATE_ROW: &str = "Дата отчета";
pub const DEFAULT_SEPARATOR_ROWS: usize = 3;

/// Built-in metric synonyms, collapsed to short codes with the unit suffix kept.
const DEFAULT_RENAMES: &[(&str, &str)] = &[
    ("Операционный денежный поток, млрд руб", "OCF, млрд руб"),
    ("Операционный денежный поток, млн руб", "OCF, млн руб"),
    ("Операционный денежный поток, млрд $", "OCF, млрд $"),
    ("Операционный денежный поток, млн $", "OCF, млн $"),
    ("Денежный поток от операционной деятельности, млрд руб", "OCF, млрд руб"),
    ("Денежный поток от операционной деятельности, млн руб", "OCF, млн руб"),
    ("Чистые активы, млрд руб", "NA, млрд руб"),
    ("Чистые активы, млн руб", "NA, млн руб"),
    ("Чистые активы, млрд $", "NA, млрд $"),
    ("Чистые активы, млн $", "NA, млн $"),
    ("Operating cash flow", "OCF"),
    ("Cash flow from operating activities", "OCF"),
    ("Net assets", "NA"),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum AccountingStandard {
    #[schemars(description = "International Financial Reporting Standards (МСФО)")]
    Ifrs,

    #[schemars(description = "Russian Accounting Standards (РСБУ)")]
    Ras,
}

impl AccountingStandard {
    /// Code used by the report provider in document URLs.
    pub fn code(self) -> &'static str {
        match self {
            AccountingStandard::Ifrs => "MSFO",
            AccountingStandard::Ras => "RSBU",
        }
    }
}

impl fmt::Display for AccountingStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountingStandard::Ifrs => write!(f, "IFRS"),
            AccountingStandard::Ras => write!(f, "RAS"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum StandardSelector {
    Ifrs,
    Ras,
    #[schemars(description = "Merge both standards and stack IFRS above RAS")]
    Both,
}

impl StandardSelector {
    pub fn standards(self) -> Vec<AccountingStandard> {
        match self {
            StandardSelector::Ifrs => vec![AccountingStandard::Ifrs],
            StandardSelector::Ras => vec![AccountingStandard::Ras],
            StandardSelector::Both => vec![AccountingStandard::Ifrs, AccountingStandard::Ras],
        }
    }
}

impl std::str::FromStr for StandardSelector {
    type Err = ReportJoinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ifrs" | "msfo" => Ok(StandardSelector::Ifrs),
            "ras" | "rsbu" => Ok(StandardSelector::Ras),
            "both" => Ok(StandardSelector::Both),
            other => Err(ReportJoinError::InvalidConfig(format!(
                "Unknown standard '{}'. Expected one of: ifrs, ras, both",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ReportFrequency {
    Annual,
    Quarterly,
}

impl ReportFrequency {
    pub fn url_segment(self) -> &'static str {
        match self {
            ReportFrequency::Annual => "y",
            ReportFrequency::Quarterly => "q",
        }
    }
}

impl fmt::Display for ReportFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFrequency::Annual => write!(f, "annual"),
            ReportFrequency::Quarterly => write!(f, "quarterly"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct NormalizerConfig {
    #[schemars(
        description = "Label of the row holding report dates. Cells of this row formatted as dd.mm.yyyy are rewritten to yyyy-mm-dd. Omit to skip date conversion."
    )]
    pub report_date_row: Option<String>,

    #[schemars(
        description = "Metric label synonyms: original row label -> canonical row label. Labels not listed are left as they are."
    )]
    pub renames: BTreeMap<String, String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            report_date_row: Some(DEFAULT_REPORT_DATE_ROW.to_string()),
            renames: DEFAULT_RENAMES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct JoinerConfig {
    #[serde(default)]
    #[schemars(description = "Value and metric-name normalization applied to every merged table")]
    pub normalizer: NormalizerConfig,

    #[serde(default = "default_separator_rows")]
    #[schemars(
        description = "Number of blank rows placed between the two standards when both are merged into one document"
    )]
    pub separator_rows: usize,
}

fn default_separator_rows() -> usize {
    DEFAULT_SEPARATOR_ROWS
}

impl Default for JoinerConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            separator_rows: DEFAULT_SEPARATOR_ROWS,
        }
    }
}

impl JoinerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: JoinerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.separator_rows == 0 {
            return Err(ReportJoinError::InvalidConfig(
                "separator_rows must be at least 1".to_string(),
            ));
        }

        if let Some(row) = &self.normalizer.report_date_row {
            if row.trim().is_empty() {
                return Err(ReportJoinError::InvalidConfig(
                    "report_date_row must not be blank".to_string(),
                ));
            }
        }

        for (from, to) in &self.normalizer.renames {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(ReportJoinError::InvalidConfig(format!(
                    "Rename '{}' -> '{}' has a blank label",
                    from, to
                )));
            }
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(JoinerConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
