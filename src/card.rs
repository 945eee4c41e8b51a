//! Display mapping: feed entries to card descriptors.
//!
//! [`render_entries`] is pure (same entries in, structurally equal cards
//! out) and knows nothing about the terminal.  [`crate::ui`] turns the
//! descriptors into widgets.  Keeping the mapping I/O-free means the
//! omission rules below are testable without a backend.
//!
//! A record is never dropped from the output; only its unrenderable
//! fields are.  A record missing every renderable field still yields an
//! (empty) card so counts stay aligned with what the server sent.

use crate::source::Entry;

/// The image part of a card.  Only the first attached image is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    pub url: String,
    pub alt_text: String,
}

/// Headline link.  Requires both a title and a url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    pub title: String,
    pub url: String,
}

/// Publication date.  Requires both the machine and the formatted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDate {
    pub date: String,
    pub formatted: String,
}

/// One rendered feed entry.  Every part is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub image: Option<CardImage>,
    pub headline: Option<CardLink>,
    pub date: Option<CardDate>,
    /// Body text from the entry summary.
    pub text: Option<String>,
    /// Venue / start-time line (events).
    pub meta: Option<String>,
    /// Category titles, rendered as an eyebrow line.
    pub categories: Vec<String>,
}

/// Map entries to cards, one per record.
pub fn render_entries(entries: &[Entry]) -> Vec<Card> {
    entries.iter().map(render_entry).collect()
}

fn render_entry(entry: &Entry) -> Card {
    let image = entry
        .image
        .first()
        .filter(|img| !img.url.is_empty())
        .map(|img| CardImage {
            url: img.url.clone(),
            alt_text: img.alt_text.clone(),
        });

    let headline = (!entry.title.is_empty() && !entry.url.is_empty()).then(|| CardLink {
        title: entry.title.clone(),
        url: entry.url.clone(),
    });

    let date = match (&entry.date, &entry.date_formatted) {
        (Some(date), Some(formatted)) if !date.is_empty() && !formatted.is_empty() => {
            Some(CardDate {
                date: date.clone(),
                formatted: formatted.clone(),
            })
        }
        _ => None,
    };

    let text = entry
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    let meta = {
        let parts: Vec<&str> = [entry.location.as_deref(), entry.time_formatted.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    };

    let categories = entry
        .categories
        .iter()
        .filter(|cat| !cat.title.is_empty())
        .map(|cat| cat.title.clone())
        .collect();

    Card {
        image,
        headline,
        date,
        text,
        meta,
        categories,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
