use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::fetch_error::FetchError;
use crate::planner::FetchTarget;

/// HTTP client for Daily Data Report pages.
#[derive(Clone)]
pub struct ClimateDataFetcher {
    client: reqwest::Client,
}

impl ClimateDataFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the page for one target and return its HTML.
    #[instrument(skip(self, target), fields(url = %target.url))]
    pub async fn fetch_page(&self, target: &FetchTarget) -> Result<String, FetchError> {
        info!(
            "Retrieving data for station={}, year={}, month={}",
            target.station_name, target.year, target.month
        );

        let response = self.client.get(&target.url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if status.is_success() {
            let html = response.text().await?;
            debug!("Retrieved HTML content, size: {} bytes", html.len());
            Ok(html)
        } else if status.as_u16() == 404 {
            Err(FetchError::NotFound(target.url.clone()))
        } else if status.is_server_error() {
            Err(FetchError::ServerError {
                status: status.as_u16(),
                url: target.url.clone(),
            })
        } else {
            Err(FetchError::Status {
                status: status.as_u16(),
                url: target.url.clone(),
            })
        }
    }
}
