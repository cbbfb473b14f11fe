use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use crate::fetcher::ClimateDataFetcher;
use crate::parser::{DailyDataPage, MalformedRowPolicy};
use crate::planner::FetchTarget;
use crate::sink::{RecordSink, SinkError};

#[derive(Debug, Clone, Copy)]
pub struct CrawlOptions {
    /// Maximum number of pages in flight.
    pub concurrency: usize,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            concurrency: crate::config::DEFAULT_CONCURRENCY,
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub targets: usize,
    /// Pages whose report month matched the request.
    pub pages_parsed: usize,
    /// Pages skipped because the site served a different month.
    pub pages_skipped: usize,
    pub fetch_failures: usize,
    pub records: usize,
}

impl CrawlSummary {
    pub fn completed(&self) -> usize {
        self.pages_parsed + self.pages_skipped + self.fetch_failures
    }
}

/// Fetch every target, parse each page and write its records to `sink`.
///
/// Fetch failures and month mismatches are logged and counted; only a sink
/// failure stops the crawl. `on_progress` runs after each completed target.
#[instrument(skip_all, fields(targets = targets.len(), concurrency = options.concurrency))]
pub async fn crawl<S, F>(
    targets: Vec<FetchTarget>,
    fetcher: &ClimateDataFetcher,
    options: CrawlOptions,
    sink: &mut S,
    mut on_progress: F,
) -> Result<CrawlSummary, SinkError>
where
    S: RecordSink + ?Sized,
    F: FnMut(&CrawlSummary),
{
    let mut summary = CrawlSummary {
        targets: targets.len(),
        ..Default::default()
    };
    info!("Starting crawl of {} pages", summary.targets);

    let mut pages = stream::iter(targets)
        .map(move |target| async move {
            let result = fetcher.fetch_page(&target).await;
            (target, result)
        })
        .buffer_unordered(options.concurrency.max(1));

    while let Some((target, result)) = pages.next().await {
        match result {
            Ok(html) => {
                let page = DailyDataPage::parse(&html);
                let records = page.records_for(&target, options.malformed_rows);

                if records.matched() {
                    summary.pages_parsed += 1;
                } else {
                    summary.pages_skipped += 1;
                }

                let mut emitted = 0;
                for record in records {
                    sink.write_record(&record)?;
                    emitted += 1;
                }
                summary.records += emitted;
                debug!(
                    "Emitted {} records for {} - {}/{:02}",
                    emitted, target.station_name, target.year, target.month
                );
            }
            Err(e) => {
                error!(
                    "Failed to fetch {} - {}/{:02}: {}",
                    target.station_name, target.year, target.month, e
                );
                summary.fetch_failures += 1;
            }
        }
        on_progress(&summary);
    }

    sink.flush()?;

    if summary.fetch_failures > 0 {
        warn!(
            "{} of {} pages could not be fetched",
            summary.fetch_failures, summary.targets
        );
    }
    info!(
        "Crawl finished: {} pages parsed, {} skipped, {} failed, {} records",
        summary.pages_parsed, summary.pages_skipped, summary.fetch_failures, summary.records
    );

    Ok(summary)
}
