//! Cursor-based pagination over channel history and thread replies.
//!
//! Both endpoints page with a timestamp cursor and a `has_more` flag.
//! History walks newest-to-oldest by advancing `latest` to the last
//! (oldest) message of each page; replies walk oldest-to-newest from
//! the thread root by advancing `oldest` the same way.

use gantry_domain::constants::{
    CONVERSATIONS_HISTORY, CONVERSATIONS_REPLIES, DEFAULT_PAGE_LIMIT, LATEST_SENTINEL,
};
use gantry_domain::{GantryError, HistoryPage, Message, Result};
use tracing::debug;

use crate::api::client::GantryClient;
use crate::api::form::FormParams;

/// Options for a channel history walk.
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Lower timestamp bound, exclusive unless `inclusive` is set.
    pub oldest: Option<String>,
    /// Upper timestamp bound; defaults to a far-future sentinel so the
    /// walk starts at the newest message.
    pub latest: Option<String>,
    /// Skip thread replies in the main channel stream.
    pub ignore_replies: bool,
    /// Include messages exactly on the bounds.
    pub inclusive: bool,
    /// Page size.
    pub limit: u32,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            oldest: None,
            latest: None,
            ignore_replies: true,
            inclusive: false,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl GantryClient {
    /// Fetch a single page of `conversations.history`.
    ///
    /// # Errors
    /// `GantryError::InvalidInput` when the endpoint reports an error
    /// (e.g. `channel_not_found`); transport and rate-limit errors per
    /// [`GantryClient::post`].
    pub async fn channel_history_page(
        &self,
        channel: &str,
        opts: &HistoryOptions,
    ) -> Result<HistoryPage> {
        let mut params = FormParams::new()
            .field("channel", channel)
            .field("limit", opts.limit)
            .field(
                "latest",
                opts.latest.clone().unwrap_or_else(|| LATEST_SENTINEL.to_string()),
            )
            .field("ignore_replies", opts.ignore_replies)
            .field("inclusive", opts.inclusive)
            .field("include_pin_count", false)
            .field("no_user_profile", true);
        if let Some(oldest) = &opts.oldest {
            params.set("oldest", oldest.as_str());
        }

        let payload = self.post(CONVERSATIONS_HISTORY, &params).await?;
        parse_page(CONVERSATIONS_HISTORY, payload)
    }

    /// Fetch the complete history of a channel, newest first.
    ///
    /// Pages until the server reports `has_more == false`. The result is
    /// the concatenation of all pages in request order; no
    /// de-duplication is performed.
    pub async fn fetch_channel_history(
        &self,
        channel: &str,
        opts: HistoryOptions,
    ) -> Result<Vec<Message>> {
        let mut opts = opts;
        let mut messages: Vec<Message> = Vec::new();

        loop {
            let page = self.channel_history_page(channel, &opts).await?;
            let next_cursor = page.messages.last().map(|last| last.ts.clone());
            let has_more = page.has_more;
            messages.extend(page.messages);

            debug!(channel, total = messages.len(), has_more, "history page accumulated");

            if !has_more {
                break;
            }
            match next_cursor {
                // Cursor advancement relies on the last element of each
                // page being the oldest in that page.
                Some(ts) => opts.latest = Some(ts),
                // An empty page with has_more set would loop forever on
                // the same cursor; treat it as terminal.
                None => break,
            }
        }

        Ok(messages)
    }

    /// Fetch a single page of `conversations.replies`.
    ///
    /// # Errors
    /// Same surface as [`GantryClient::channel_history_page`].
    pub async fn thread_replies_page(
        &self,
        channel: &str,
        thread_ts: &str,
        oldest: &str,
    ) -> Result<HistoryPage> {
        let params = FormParams::new()
            .field("channel", channel)
            .field("ts", thread_ts)
            .field("oldest", oldest)
            .field("limit", DEFAULT_PAGE_LIMIT);

        let payload = self.post(CONVERSATIONS_REPLIES, &params).await?;
        parse_page(CONVERSATIONS_REPLIES, payload)
    }

    /// Fetch all replies in a thread, starting from its root timestamp.
    ///
    /// The cursor is always the `ts` of the last message in the current
    /// page, as a timestamp string.
    pub async fn fetch_thread_replies(
        &self,
        channel: &str,
        thread_ts: &str,
    ) -> Result<Vec<Message>> {
        let mut oldest = thread_ts.to_string();
        let mut messages: Vec<Message> = Vec::new();

        loop {
            let page = self.thread_replies_page(channel, thread_ts, &oldest).await?;
            let next_cursor = page.messages.last().map(|last| last.ts.clone());
            let has_more = page.has_more;
            messages.extend(page.messages);

            debug!(channel, thread_ts, total = messages.len(), has_more, "replies page accumulated");

            if !has_more {
                break;
            }
            match next_cursor {
                Some(ts) => oldest = ts,
                None => break,
            }
        }

        Ok(messages)
    }
}

fn parse_page(endpoint: &str, payload: serde_json::Value) -> Result<HistoryPage> {
    let page: HistoryPage = serde_json::from_value(payload)
        .map_err(|e| GantryError::Internal(format!("unparseable {endpoint} page: {e}")))?;

    if !page.ok {
        let reason = page.error.unwrap_or_else(|| "unknown_error".to_string());
        return Err(GantryError::InvalidInput(format!("{endpoint} failed: {reason}")));
    }
    Ok(page)
}
