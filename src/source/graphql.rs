//! GraphQL feed source implementation.
//!
//! One feed endpoint serves both feed kinds: every request is a single
//! POST carrying `{query, variables}` and a bearer token, and every
//! response has the shape `{data?: {entries?: {events: [...]},
//! entryCount?}, message?}`. A top-level `message` is a server-side error
//! and short-circuits extraction; a response without `data.entries` is
//! treated as malformed.
//!
//! Extraction is kept separate from I/O ([`entries_from_response`],
//! [`total_from_response`] are pure) so tests can exercise the error
//! taxonomy on literal JSON without a network.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::query::{FeedKind, FeedVariables};
use super::{Entry, FeedSource};

/// Wire shape of every response from the feed endpoint.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub data: Option<FeedData>,
    /// Present only on server-side errors (bad token, bad query).
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedData {
    #[serde(default)]
    pub entries: Option<EntryList>,
    #[serde(default)]
    pub entry_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct EntryList {
    #[serde(default)]
    pub events: Vec<Entry>,
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a FeedVariables,
}

/// POST one GraphQL query and parse the response body.
///
/// Fails with "Token not found" when `token` is empty, before any network
/// I/O is attempted. Exactly one attempt per call; no retry, no timeout
/// beyond the client's own defaults.
pub fn fetch_graphql(
    client: &reqwest::blocking::Client,
    url: &str,
    token: &str,
    query: &str,
    variables: &FeedVariables,
) -> Result<FeedResponse> {
    if token.trim().is_empty() {
        bail!("Token not found");
    }

    let response = client
        .post(url)
        .bearer_auth(token)
        .json(&GraphqlRequest { query, variables })
        .send()
        .context("feed request failed")?;

    response
        .json::<FeedResponse>()
        .context("feed response was not valid JSON")
}

/// Extract the entry list from a parsed response.
///
/// A message-bearing response or one without `data.entries` is an error;
/// an empty `events` array is a legitimate zero-result answer.
pub fn entries_from_response(response: FeedResponse) -> Result<Vec<Entry>> {
    if let Some(message) = response.message {
        bail!("feed error: {message}");
    }
    match response.data.and_then(|data| data.entries) {
        Some(list) => Ok(list.events),
        None => bail!("feed response is missing entries"),
    }
}

/// Extract the matching-record total from a count-query response.
pub fn total_from_response(response: FeedResponse) -> Result<usize> {
    if let Some(message) = response.message {
        bail!("feed error: {message}");
    }
    response
        .data
        .and_then(|data| data.entry_count)
        .context("feed response is missing entryCount")
}

/// A bearer-token GraphQL feed source.
#[derive(Debug)]
pub struct GraphqlSource {
    url: String,
    token: String,
    kind: FeedKind,
    /// Filter variables shared by every request; pagination bounds are
    /// layered on per fetch.
    filters: FeedVariables,
    client: reqwest::blocking::Client,
}

impl GraphqlSource {
    /// Create a source bound to one endpoint and feed kind.
    ///
    /// An empty token is a configuration error and is rejected here, so
    /// the process fails before the terminal is ever touched.
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        kind: FeedKind,
        filters: FeedVariables,
    ) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            bail!("Token not found");
        }
        Ok(Self {
            url: url.into(),
            token,
            kind,
            filters,
            client: reqwest::blocking::Client::new(),
        })
    }
}

impl FeedSource for GraphqlSource {
    fn name(&self) -> &str {
        self.kind.label()
    }

    fn fetch_entries(&self, offset: usize, limit: usize) -> Result<Vec<Entry>> {
        let vars = self.filters.paged(offset, limit);
        debug!(kind = self.kind.label(), offset, limit, "fetching entries");

        let response = fetch_graphql(
            &self.client,
            &self.url,
            &self.token,
            self.kind.entries_query(),
            &vars,
        )?;
        entries_from_response(response)
    }

    fn fetch_total(&self) -> Result<usize> {
        debug!(kind = self.kind.label(), "fetching entry count");

        let response = fetch_graphql(
            &self.client,
            &self.url,
            &self.token,
            self.kind.count_query(),
            &self.filters,
        )?;
        total_from_response(response)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
