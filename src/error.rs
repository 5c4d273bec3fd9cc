use crate::schema::{AccountingStandard, ReportFrequency};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportJoinError {
    #[error("{document} report has no header row")]
    MissingHeader { document: ReportFrequency },

    #[error("CSV error in {document} report: {source}")]
    Csv {
        document: ReportFrequency,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to retrieve {standard} {frequency} report for {entity} (status {status})")]
    RetrievalFailed {
        entity: String,
        standard: AccountingStandard,
        frequency: ReportFrequency,
        status: u16,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for ReportJoinError {
    fn from(error: reqwest::Error) -> Self {
        ReportJoinError::Http(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportJoinError>;
