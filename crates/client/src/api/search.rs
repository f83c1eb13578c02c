//! Page-numbered channel search with bounded parallel fetch.
//!
//! `search.modules` reports the total page count on the first response,
//! so pages 2..=N have no cursor dependency and are fetched through a
//! bounded, order-preserving stream. The join happens before returning:
//! the result is page 1 followed by the remaining pages in ascending
//! page order.

use futures::stream::{self, StreamExt, TryStreamExt};
use gantry_domain::constants::SEARCH_MODULES;
use gantry_domain::{GantryError, Result, SearchPage};
use tracing::debug;

use crate::api::client::GantryClient;
use crate::api::form::FormParams;

impl GantryClient {
    /// Fetch one page of channel search results.
    ///
    /// # Errors
    /// `GantryError::InvalidInput` when the endpoint reports an error;
    /// transport and rate-limit errors per [`GantryClient::post`].
    pub async fn search_channels_page(&self, query: &str, page: u32) -> Result<SearchPage> {
        let params = FormParams::new()
            .field("module", "channels")
            .field("query", query)
            .field("page", page);

        let payload = self.post(SEARCH_MODULES, &params).await?;
        let parsed: SearchPage = serde_json::from_value(payload)
            .map_err(|e| GantryError::Internal(format!("unparseable search page: {e}")))?;

        if !parsed.ok {
            let reason = parsed.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(GantryError::InvalidInput(format!("{SEARCH_MODULES} failed: {reason}")));
        }
        Ok(parsed)
    }

    /// Fetch every page of channel results for `query`.
    ///
    /// Page 1 establishes `page_count`; the remainder fan out across at
    /// most `search_concurrency` in-flight requests. Per-page order is
    /// preserved and pages concatenate in ascending page number.
    pub async fn search_channels(&self, query: &str) -> Result<Vec<serde_json::Value>> {
        let first = self.search_channels_page(query, 1).await?;
        let page_count = first.pagination.as_ref().map_or(1, |p| p.page_count);
        let mut items = first.items;

        if page_count > 1 {
            debug!(query, page_count, "fanning out remaining search pages");
            let remaining: Vec<SearchPage> = stream::iter(2..=page_count)
                .map(|page| self.search_channels_page(query, page))
                .buffered(self.config().search_concurrency.max(1))
                .try_collect()
                .await?;

            for page in remaining {
                items.extend(page.items);
            }
        }

        Ok(items)
    }
}
