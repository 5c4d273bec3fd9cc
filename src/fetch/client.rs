use crate::error::{ReportJoinError, Result};
use crate::schema::{AccountingStandard, ReportFrequency};
use log::debug;
use reqwest::Client;

const DEFAULT_BASE_URL: &str = "https://smart-lab.ru/q";

/// Raw text of one standard's annual and quarterly reports.
#[derive(Debug, Clone)]
pub struct RawReports {
    pub standard: AccountingStandard,
    pub annual: String,
    pub quarterly: String,
}

#[derive(Clone)]
pub struct ReportClient {
    client: Client,
    base_url: String,
}

impl Default for ReportClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn document_url(
        &self,
        entity: &str,
        standard: AccountingStandard,
        frequency: ReportFrequency,
    ) -> String {
        format!(
            "{}/{}/f/{}/{}/download/",
            self.base_url,
            entity,
            frequency.url_segment(),
            standard.code()
        )
    }

    pub async fn fetch_document(
        &self,
        entity: &str,
        standard: AccountingStandard,
        frequency: ReportFrequency,
    ) -> Result<String> {
        let url = self.document_url(entity, standard, frequency);
        debug!("Fetching {} {} report from {}", standard, frequency, url);

        let res = self.client.get(&url).send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(ReportJoinError::RetrievalFailed {
                entity: entity.to_string(),
                standard,
                frequency,
                status: status.as_u16(),
            });
        }

        Ok(res.text().await?)
    }

    /// Fetches both reports of one standard; fails if either one fails.
    pub async fn fetch_pair(&self, entity: &str, standard: AccountingStandard) -> Result<RawReports> {
        let (annual, quarterly) = futures::try_join!(
            self.fetch_document(entity, standard, ReportFrequency::Annual),
            self.fetch_document(entity, standard, ReportFrequency::Quarterly)
        )?;

        Ok(RawReports {
            standard,
            annual,
            quarterly,
        })
    }
}
