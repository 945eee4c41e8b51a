//! GraphQL query text and variable construction.
//!
//! The endpoint exposes two queries per feed kind: an entries query
//! (returns up to `limit` records starting at `offset`, optionally filtered
//! by category and an exclusion list) and a count query (returns the total
//! number of matching records, used only to size the load-more affordance).
//!
//! Variables that are not set are omitted from the serialized JSON rather
//! than sent as `null`; the server treats an absent filter as "no filter".

use serde::Serialize;

/// Which feed a source is bound to. News and events share the record shape
/// and the pagination mechanics; only the query text differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeedKind {
    News,
    Events,
}

impl FeedKind {
    /// Short label used in logs and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            FeedKind::News => "news",
            FeedKind::Events => "events",
        }
    }

    pub fn entries_query(self) -> &'static str {
        match self {
            FeedKind::News => NEWS_ENTRIES_QUERY,
            FeedKind::Events => EVENTS_ENTRIES_QUERY,
        }
    }

    pub fn count_query(self) -> &'static str {
        match self {
            FeedKind::News => NEWS_COUNT_QUERY,
            FeedKind::Events => EVENTS_COUNT_QUERY,
        }
    }
}

/// Variables for both the entries and count queries.
///
/// `offset` is always a cumulative item count (entries already rendered),
/// never a page index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedVariables {
    /// Earliest date to include (events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Match entries related to *any* of these categories (union mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,

    /// Match entries related to *all* of these categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_to_all: Option<Vec<String>>,

    /// Entry ids to exclude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Vec<u64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl FeedVariables {
    /// Copy of these variables with pagination bounds set.
    pub fn paged(&self, offset: usize, limit: usize) -> FeedVariables {
        FeedVariables {
            offset: Some(offset),
            limit: Some(limit),
            ..self.clone()
        }
    }
}

/// Build the filter portion of the variables.
///
/// The category list arrives as a CSV string (`"cat1,cat2"`). Union mode
/// places it under `related` (match any); otherwise it goes under
/// `relatedToAll` (match all).
pub fn build_variables(
    categories: Option<&str>,
    union: bool,
    exclude: &[u64],
    start_date: Option<&str>,
) -> FeedVariables {
    let cats = categories
        .map(split_categories)
        .filter(|list| !list.is_empty());
    let (related, related_to_all) = if union { (cats, None) } else { (None, cats) };

    FeedVariables {
        start_date: start_date.map(str::to_string),
        related,
        related_to_all,
        not: if exclude.is_empty() {
            None
        } else {
            Some(exclude.to_vec())
        },
        limit: None,
        offset: None,
    }
}

/// Split a category CSV into trimmed, non-empty identifiers.
pub fn split_categories(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Entries requested per fetch: `columns × rows` when a column count is
/// configured, else the flat row count.
pub fn page_limit(rows: usize, columns: Option<usize>) -> usize {
    match columns {
        Some(cols) => cols * rows,
        None => rows,
    }
}

// ---------------------------------------------------------------------------
// Query text
// ---------------------------------------------------------------------------

const NEWS_ENTRIES_QUERY: &str = r#"
query NewsEntries($related: [QueryArgument], $relatedToAll: [QueryArgument], $not: [QueryArgument], $limit: Int, $offset: Int) {
  entries: newsFeed(relatedTo: $related, relatedToAll: $relatedToAll, not: $not, limit: $limit, offset: $offset) {
    events: items {
      id
      title
      url
      date
      dateFormatted
      summary
      image {
        url
        altText
      }
      categories {
        title
        url
      }
    }
  }
}
"#;

const NEWS_COUNT_QUERY: &str = r#"
query NewsCount($related: [QueryArgument], $relatedToAll: [QueryArgument], $not: [QueryArgument]) {
  entryCount: newsFeedCount(relatedTo: $related, relatedToAll: $relatedToAll, not: $not)
}
"#;

const EVENTS_ENTRIES_QUERY: &str = r#"
query EventsEntries($startDate: String, $related: [QueryArgument], $relatedToAll: [QueryArgument], $not: [QueryArgument], $limit: Int, $offset: Int) {
  entries: eventsFeed(startDate: $startDate, relatedTo: $related, relatedToAll: $relatedToAll, not: $not, limit: $limit, offset: $offset) {
    events: items {
      id
      title
      url
      date
      dateFormatted
      timeFormatted
      location
      summary
      image {
        url
        altText
      }
    }
  }
}
"#;

const EVENTS_COUNT_QUERY: &str = r#"
query EventsCount($startDate: String, $related: [QueryArgument], $relatedToAll: [QueryArgument], $not: [QueryArgument]) {
  entryCount: eventsFeedCount(startDate: $startDate, relatedTo: $related, relatedToAll: $relatedToAll, not: $not)
}
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_csv_into_trimmed_identifiers() {
        assert_eq!(split_categories("cat1,cat2"), vec!["cat1", "cat2"]);
        assert_eq!(split_categories(" cat1 , cat2 "), vec!["cat1", "cat2"]);
        assert_eq!(split_categories("cat1,,cat2,"), vec!["cat1", "cat2"]);
        assert!(split_categories("").is_empty());
    }

    #[test]
    fn union_mode_places_categories_under_related() {
        let vars = build_variables(Some("cat1,cat2"), true, &[], None);
        assert_eq!(
            vars.related,
            Some(vec!["cat1".to_string(), "cat2".to_string()])
        );
        assert!(vars.related_to_all.is_none());
    }

    #[test]
    fn intersect_mode_places_categories_under_related_to_all() {
        let vars = build_variables(Some("cat1,cat2"), false, &[], None);
        assert!(vars.related.is_none());
        assert_eq!(
            vars.related_to_all,
            Some(vec!["cat1".to_string(), "cat2".to_string()])
        );
    }

    #[test]
    fn empty_category_csv_sets_neither_filter() {
        let vars = build_variables(Some(" , "), true, &[], None);
        assert!(vars.related.is_none());
        assert!(vars.related_to_all.is_none());
    }

    #[test]
    fn exclusion_list_and_start_date_carry_through() {
        let vars = build_variables(None, true, &[3, 9], Some("2026-08-06"));
        assert_eq!(vars.not, Some(vec![3, 9]));
        assert_eq!(vars.start_date.as_deref(), Some("2026-08-06"));
    }

    #[test]
    fn unset_variables_are_omitted_from_json() {
        let vars = build_variables(Some("cat1"), true, &[], None);
        let json = serde_json::to_value(&vars).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("related"));
        assert!(!obj.contains_key("relatedToAll"));
        assert!(!obj.contains_key("not"));
        assert!(!obj.contains_key("startDate"));
        assert!(!obj.contains_key("limit"));
        assert!(!obj.contains_key("offset"));
    }

    #[test]
    fn paged_sets_bounds_and_keeps_filters() {
        let base = build_variables(Some("cat1"), false, &[7], None);
        let paged = base.paged(8, 4);

        assert_eq!(paged.offset, Some(8));
        assert_eq!(paged.limit, Some(4));
        assert_eq!(paged.related_to_all, base.related_to_all);
        assert_eq!(paged.not, base.not);
        // The base is untouched.
        assert!(base.offset.is_none());
    }

    #[test]
    fn page_limit_multiplies_columns_by_rows() {
        assert_eq!(page_limit(5, Some(3)), 15);
        assert_eq!(page_limit(5, None), 5);
    }

    #[test]
    fn camel_case_keys_on_the_wire() {
        let vars = build_variables(Some("a"), false, &[1], Some("2026-01-01"));
        let json = serde_json::to_value(&vars).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("relatedToAll"));
        assert!(obj.contains_key("startDate"));
        assert!(obj.contains_key("not"));
    }
}
