//! Retrieval of report documents over HTTP.

pub mod client;

pub use client::*;

use crate::error::Result;
use crate::schema::{ReportFrequency, StandardSelector};
use crate::staging::StagingArea;
use crate::{ReportJoiner, ReportPair};
use log::info;

/// Downloads the reports selected by `selector`, stages them on disk, and
/// returns the joined tab-delimited document.
pub async fn fetch_and_join(
    client: &ReportClient,
    joiner: &ReportJoiner,
    entity: &str,
    selector: StandardSelector,
) -> Result<String> {
    fetch_and_join_in(StagingArea::new()?, client, joiner, entity, selector).await
}

/// Same as [`fetch_and_join`], staging into the given area.
///
/// Every download must succeed before anything is merged. The staging
/// directory is removed whether the join succeeds or not.
pub async fn fetch_and_join_in(
    staging: StagingArea,
    client: &ReportClient,
    joiner: &ReportJoiner,
    entity: &str,
    selector: StandardSelector,
) -> Result<String> {
    let downloads = futures::future::try_join_all(
        selector
            .standards()
            .into_iter()
            .map(|standard| client.fetch_pair(entity, standard)),
    )
    .await;

    let output = match downloads {
        Ok(downloads) => join_staged(&staging, joiner, &downloads),
        Err(e) => Err(e),
    };
    let cleanup = staging.close();

    let tsv = output?;
    cleanup?;

    info!("Joined {:?} reports for {}", selector, entity);
    Ok(tsv)
}

fn join_staged(
    staging: &StagingArea,
    joiner: &ReportJoiner,
    downloads: &[RawReports],
) -> Result<String> {
    let mut pairs = Vec::with_capacity(downloads.len());

    for raw in downloads {
        let annual = staging.stage(
            &staged_name(raw, ReportFrequency::Annual),
            &raw.annual,
        )?;
        let quarterly = staging.stage(
            &staged_name(raw, ReportFrequency::Quarterly),
            &raw.quarterly,
        )?;

        pairs.push(ReportPair::parse(
            &staging.read(&annual)?,
            &staging.read(&quarterly)?,
        )?);
    }

    joiner.join_standards(&pairs)?.to_tsv()
}

fn staged_name(raw: &RawReports, frequency: ReportFrequency) -> String {
    format!("{}_{}.csv", raw.standard.code(), frequency)
}
