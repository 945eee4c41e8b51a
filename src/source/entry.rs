//! The record type shared by both feed kinds.
//!
//! `Entry` is one feed record as the GraphQL endpoint returns it. News
//! entries populate `date`/`date_formatted`/`summary`/`categories`; event
//! entries substitute `location`/`time_formatted`. Both kinds deserialize
//! into the same struct so the card mapping, the controller, and the UI
//! stay kind-agnostic.
//!
//! ## For contributors
//!
//! Server records are frequently partial: a draft entry may lack a
//! summary, an imported one may lack images. Every field that can be
//! absent is an `Option` or defaulted `Vec`, so deserialization never
//! fails on a sparse record; the card mapping in [`crate::card`] decides
//! what to omit.

use serde::Deserialize;

/// One image attached to an entry. Only the first image is ever rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
}

/// A category an entry is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRef {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// A single feed entry, as returned by the entries query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Server-side record id; also used in the `not` exclusion list.
    #[serde(default)]
    pub id: u64,

    /// Headline. Empty when the record has none.
    #[serde(default)]
    pub title: String,

    /// Canonical URL of the full article / event page.
    #[serde(default)]
    pub url: String,

    /// Machine-readable publication date (news).
    #[serde(default)]
    pub date: Option<String>,

    /// Human-readable form of `date`, pre-formatted by the server.
    #[serde(default)]
    pub date_formatted: Option<String>,

    /// Summary / teaser text.
    #[serde(default)]
    pub summary: Option<String>,

    /// Attached images; may be empty.
    #[serde(default)]
    pub image: Vec<ImageRef>,

    /// Categories the entry is filed under; may be empty.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,

    /// Venue (events only).
    #[serde(default)]
    pub location: Option<String>,

    /// Human-readable start time (events only).
    #[serde(default)]
    pub time_formatted: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
