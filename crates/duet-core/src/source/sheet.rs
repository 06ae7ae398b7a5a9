//! Google Sheet record source
//!
//! The sheet is read through its CSV export link, so it must be shared as
//! "anyone with the link can view". No API key is involved.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::RawExpense;

use super::{parse_csv, RecordSource};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Turn a sheet link into its CSV export URL.
///
/// Accepts the usual `https://docs.google.com/spreadsheets/d/<id>/edit...`
/// links. A `gid` in the link selects that tab.
pub fn sheet_export_url(url: &str) -> Result<String> {
    let url = url.trim();
    let (_, rest) = url.split_once("/spreadsheets/d/").ok_or_else(|| {
        Error::Config(format!("Not a Google Sheets URL: {}", url))
    })?;

    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() {
        return Err(Error::Config(format!("No sheet id in URL: {}", url)));
    }

    let gid = rest
        .split(['?', '#', '&'])
        .find_map(|part| part.strip_prefix("gid="))
        .filter(|gid| !gid.is_empty() && gid.chars().all(|c| c.is_ascii_digit()));

    let mut export = format!("https://docs.google.com/spreadsheets/d/{}/export?format=csv", id);
    if let Some(gid) = gid {
        export.push_str("&gid=");
        export.push_str(gid);
    }
    Ok(export)
}

/// Rows fetched from a published Google Sheet
#[derive(Clone)]
pub struct SheetSource {
    http_client: Client,
    export_url: String,
}

impl SheetSource {
    /// Create a source for a sheet link
    pub fn new(sheet_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http_client,
            export_url: sheet_export_url(sheet_url)?,
        })
    }

    pub fn export_url(&self) -> &str {
        &self.export_url
    }
}

#[async_trait]
impl RecordSource for SheetSource {
    fn name(&self) -> &str {
        "sheet"
    }

    async fn fetch(&self) -> Result<Vec<RawExpense>> {
        debug!(url = %self.export_url, "Fetching sheet");

        let response = self.http_client.get(&self.export_url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "Sheet export returned HTTP {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        parse_csv(body.as_ref())
    }
}
