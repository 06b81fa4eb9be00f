//! Listing endpoint scraping
//!
//! Reads an HTML directory listing once and returns the trimmed text of every
//! element matching a CSS selector. The HTML is parsed synchronously after the
//! body is read, so no parsed document is held across an await point.

use crate::error::{ListingError, Result};
use scraper::{Html, Selector};
use tracing::{debug, info};

/// Rows scraped from a listing, in document order
///
/// Finite and consumed once; collect it if it needs to be walked twice.
#[derive(Debug)]
pub struct ListingRows(std::vec::IntoIter<String>);

impl Iterator for ListingRows {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for ListingRows {}

/// Reads listing endpoints over HTTP
#[derive(Clone, Debug)]
pub struct Lister {
    client: reqwest::Client,
}

impl Lister {
    /// Create a lister on top of an existing client
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch `endpoint` and return the text of every element matching `row_selector`
    ///
    /// Fails with [`ListingError::Unreachable`] or [`ListingError::HttpStatus`]
    /// when the endpoint cannot be read, and with [`ListingError::EmptyResult`]
    /// when nothing matches the selector.
    pub async fn list(&self, endpoint: &str, row_selector: &str) -> Result<ListingRows> {
        // Reject a bad selector before touching the network
        let selector = parse_selector(row_selector)?;

        debug!(endpoint, row_selector, "fetching listing");

        let response = self.client.get(endpoint).send().await.map_err(|e| {
            ListingError::Unreachable {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(|e| ListingError::Unreachable {
            endpoint: endpoint.to_string(),
            reason: format!("failed to read listing body: {}", e),
        })?;

        let rows = select_rows(&body, &selector);
        if rows.is_empty() {
            return Err(ListingError::EmptyResult {
                endpoint: endpoint.to_string(),
                selector: row_selector.to_string(),
            }
            .into());
        }

        info!(endpoint, rows = rows.len(), "listing fetched");
        Ok(ListingRows(rows.into_iter()))
    }
}

/// Compile a CSS selector, mapping failures to [`ListingError::InvalidSelector`]
pub fn parse_selector(row_selector: &str) -> Result<Selector> {
    Selector::parse(row_selector).map_err(|e| {
        ListingError::InvalidSelector {
            selector: row_selector.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Trimmed text content of every element in `html` matching `selector`
pub fn select_rows(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}
