//! Application state: the feed pagination controller.
//!
//! `App` owns everything the UI reads: the rendered cards, the pagination
//! cursor, the current phase, and the status-line announcement.  It is
//! mutated only by its own handlers on the main thread.
//!
//! ## Phases
//!
//! ```text
//!            start()          entries           request_more()
//!   Idle ──────────► Loading ────────► Loaded ◄──────────────► LoadingMore
//!                       │                │  ▲                        │
//!                       │ zero entries   │  └── entries (more left) ─┘
//!                       ▼                ▼
//!                     Empty          Exhausted   (offset >= total)
//!
//!   any Loading ──error──► Failed
//! ```
//!
//! `Empty`, `Failed`, and `Exhausted` are terminal for this run; only
//! restarting the program re-fetches.
//!
//! Invariants maintained here:
//!
//! * `offset` only increases, by exactly the number of entries each
//!   successful fetch returned.
//! * `total_entries` is `None` until the count query resolves and is never
//!   decreased afterwards.
//! * The load-more affordance is visible iff lazy-load is enabled, the
//!   total is known, `offset < total`, and the phase is `Loaded`.
//!
//! The load-more guard is the phase itself: [`App::request_more`] checks
//! and advances the phase synchronously, so a double invocation (keyboard
//! or programmatic) while a fetch is in flight is a no-op rather than a
//! second overlapping fetch.

use crate::card::{self, Card};
use crate::fetch::FetchCmd;
use crate::source::Entry;

/// Fixed user-facing text for the empty and error interfaces.
pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// Where the controller sits between fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, nothing requested yet.
    Idle,
    /// Initial fetch in flight.
    Loading,
    /// Entries on screen; more may be available.
    Loaded,
    /// A load-more fetch in flight; existing cards stay on screen.
    LoadingMore,
    /// Every matching entry has been rendered.
    Exhausted,
    /// The initial fetch returned zero entries.
    Empty,
    /// A fetch failed; the no-results interface is shown.
    Failed,
}

pub struct App {
    pub phase: Phase,
    cards: Vec<Card>,
    /// Cumulative count of entries already rendered; the pagination cursor.
    offset: usize,
    /// Total matching records, once the count query has resolved.
    total_entries: Option<usize>,
    lazy_load: bool,
    /// Grid column count; also bounds row scrolling.
    pub columns: usize,
    /// Status-line text; the equivalent of a polite live region.
    pub announcement: String,
    /// First visible card row.
    pub scroll: usize,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new(lazy_load: bool, columns: usize) -> Self {
        Self {
            phase: Phase::Idle,
            cards: Vec::new(),
            offset: 0,
            total_entries: None,
            lazy_load,
            columns: columns.max(1),
            announcement: String::new(),
            scroll: 0,
            quit: false,
        }
    }

    /// Begin the initial load.  Returns the command for the fetch worker.
    pub fn start(&mut self) -> FetchCmd {
        self.phase = Phase::Loading;
        self.announcement = "Loading entries".to_string();
        FetchCmd::Initial
    }

    // -- fetch-completion handlers -------------------------------------------

    /// A fetch resolved with entries.  Maps them to cards, appends, and
    /// advances the cursor by exactly the fetched count.
    pub fn on_entries(&mut self, entries: Vec<Entry>) {
        let fetched = entries.len();
        match self.phase {
            Phase::Loading => {
                if fetched == 0 {
                    self.phase = Phase::Empty;
                    self.announcement = NO_RESULTS_MESSAGE.to_string();
                    return;
                }
                self.append(&entries);
                self.phase = if self.exhausted() { Phase::Exhausted } else { Phase::Loaded };
                self.announce_count();
            }
            Phase::LoadingMore => {
                // A load-more that returns nothing means the server ran dry
                // ahead of the advertised total; stop offering more.
                self.append(&entries);
                self.phase = if fetched == 0 || self.exhausted() {
                    Phase::Exhausted
                } else {
                    Phase::Loaded
                };
                self.announce_count();
            }
            // A reply landing after a terminal state (e.g. a fetch that was
            // in flight when the run failed) is dropped.
            _ => {}
        }
    }

    /// The count query resolved.  The total is never decreased, and a
    /// late-arriving total never overwrites a no-results announcement.
    pub fn on_total(&mut self, total: usize) {
        self.total_entries = Some(self.total_entries.map_or(total, |t| t.max(total)));

        if self.phase == Phase::Loaded && self.exhausted() {
            self.phase = Phase::Exhausted;
        }
        if matches!(self.phase, Phase::Loaded | Phase::Exhausted) {
            self.announce_count();
        }
    }

    /// A fetch failed.  Terminal for this run: the no-results interface
    /// replaces any rendered cards and nothing is retried.
    pub fn on_error(&mut self) {
        if matches!(self.phase, Phase::Loading | Phase::LoadingMore) {
            self.phase = Phase::Failed;
            self.cards.clear();
            self.scroll = 0;
            self.announcement = NO_RESULTS_MESSAGE.to_string();
        }
    }

    // -- load more -----------------------------------------------------------

    /// The load-more affordance is offered only while it can act.
    pub fn show_more_visible(&self) -> bool {
        self.lazy_load
            && self.phase == Phase::Loaded
            && self.total_entries.is_some_and(|total| self.offset < total)
    }

    /// Ask for the next page.  The phase check and transition are both
    /// synchronous, so a second call before the fetch resolves returns
    /// `None` instead of issuing an overlapping request.
    pub fn request_more(&mut self) -> Option<FetchCmd> {
        if !self.show_more_visible() {
            return None;
        }
        self.phase = Phase::LoadingMore;
        Some(FetchCmd::More { offset: self.offset })
    }

    // -- accessors -----------------------------------------------------------

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_entries(&self) -> Option<usize> {
        self.total_entries
    }

    /// Number of card rows at the current column count.
    pub fn row_count(&self) -> usize {
        self.cards.len().div_ceil(self.columns)
    }

    // -- navigation ----------------------------------------------------------

    pub fn scroll_down(&mut self) {
        let max = self.row_count().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_bottom(&mut self) {
        self.scroll = self.row_count().saturating_sub(1);
    }

    // -- internals -----------------------------------------------------------

    fn append(&mut self, entries: &[Entry]) {
        self.cards.extend(card::render_entries(entries));
        self.offset += entries.len();
    }

    fn exhausted(&self) -> bool {
        self.total_entries.is_some_and(|total| self.offset >= total)
    }

    fn announce_count(&mut self) {
        self.announcement = match (self.lazy_load, self.total_entries) {
            (true, Some(total)) => {
                format!("Showing {} of {} entries", self.cards.len(), total)
            }
            _ => format!("Showing {} entries", self.cards.len()),
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand: n minimal-but-renderable entries.
    fn make_entries(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry {
                id: i as u64,
                title: format!("Entry {i}"),
                url: format!("https://example.edu/{i}"),
                ..Entry::default()
            })
            .collect()
    }

    // -- construction and start ----------------------------------------------

    #[test]
    fn new_app_starts_idle_and_empty() {
        let app = App::new(true, 2);
        assert_eq!(app.phase, Phase::Idle);
        assert!(app.cards().is_empty());
        assert_eq!(app.offset(), 0);
        assert!(app.total_entries().is_none());
        assert!(!app.show_more_visible());
    }

    #[test]
    fn start_moves_to_loading_and_yields_the_initial_command() {
        let mut app = App::new(true, 2);
        assert!(matches!(app.start(), FetchCmd::Initial));
        assert_eq!(app.phase, Phase::Loading);
    }

    // -- scenario: zero results ----------------------------------------------

    #[test]
    fn zero_initial_entries_is_the_no_results_state() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(Vec::new());

        assert_eq!(app.phase, Phase::Empty);
        assert_eq!(app.announcement, NO_RESULTS_MESSAGE);
        assert!(!app.show_more_visible());
    }

    #[test]
    fn late_total_never_overwrites_the_no_results_announcement() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(Vec::new());
        // The worker still runs the count query after an empty page.
        app.on_total(0);

        assert_eq!(app.phase, Phase::Empty);
        assert_eq!(app.announcement, NO_RESULTS_MESSAGE);
        assert!(!app.show_more_visible());
    }

    // -- scenario: paging through ten entries --------------------------------

    #[test]
    fn paging_advances_offset_by_exactly_the_fetched_counts() {
        let mut app = App::new(true, 2);
        app.start();

        app.on_entries(make_entries(4));
        assert_eq!(app.phase, Phase::Loaded);
        assert_eq!(app.offset(), 4);
        // Total unknown yet: count-free announcement, no affordance.
        assert_eq!(app.announcement, "Showing 4 entries");
        assert!(!app.show_more_visible());

        app.on_total(10);
        assert_eq!(app.announcement, "Showing 4 of 10 entries");
        assert!(app.show_more_visible());

        match app.request_more() {
            Some(FetchCmd::More { offset }) => assert_eq!(offset, 4),
            _ => panic!("expected a load-more command"),
        }
        assert_eq!(app.phase, Phase::LoadingMore);

        app.on_entries(make_entries(4));
        assert_eq!(app.offset(), 8);
        assert_eq!(app.announcement, "Showing 8 of 10 entries");
        assert!(app.show_more_visible());

        match app.request_more() {
            Some(FetchCmd::More { offset }) => assert_eq!(offset, 8),
            _ => panic!("expected a load-more command"),
        }

        app.on_entries(make_entries(2));
        assert_eq!(app.offset(), 10);
        assert_eq!(app.phase, Phase::Exhausted);
        assert_eq!(app.announcement, "Showing 10 of 10 entries");
        assert!(!app.show_more_visible());
        assert!(app.request_more().is_none());
    }

    #[test]
    fn request_more_while_loading_is_a_no_op() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(10);

        assert!(app.request_more().is_some());
        // The phase guard blocks a second request until the reply lands.
        assert!(app.request_more().is_none());
        assert!(app.request_more().is_none());

        app.on_entries(make_entries(4));
        assert_eq!(app.offset(), 8, "only one fetch may advance the cursor");
    }

    #[test]
    fn affordance_needs_lazy_load_enabled() {
        let mut app = App::new(false, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(10);

        assert!(!app.show_more_visible());
        assert!(app.request_more().is_none());
        // Lazy-load disabled: the announcement carries no total.
        assert_eq!(app.announcement, "Showing 4 entries");
    }

    #[test]
    fn total_covering_the_first_page_exhausts_immediately() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(4);

        assert_eq!(app.phase, Phase::Exhausted);
        assert!(!app.show_more_visible());
        assert_eq!(app.announcement, "Showing 4 of 4 entries");
    }

    #[test]
    fn total_is_never_decreased() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(10);
        app.on_total(3);

        assert_eq!(app.total_entries(), Some(10));
    }

    #[test]
    fn empty_load_more_page_exhausts_the_feed() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(10);

        app.request_more().unwrap();
        app.on_entries(Vec::new());

        assert_eq!(app.phase, Phase::Exhausted);
        assert_eq!(app.offset(), 4);
        assert!(!app.show_more_visible());
    }

    // -- scenario: fetch failure ---------------------------------------------

    #[test]
    fn initial_failure_renders_the_no_results_state() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_error();

        assert_eq!(app.phase, Phase::Failed);
        assert!(app.cards().is_empty());
        assert_eq!(app.announcement, NO_RESULTS_MESSAGE);
        assert!(!app.show_more_visible());
    }

    #[test]
    fn load_more_failure_is_terminal() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(10);
        app.request_more().unwrap();
        app.on_error();

        assert_eq!(app.phase, Phase::Failed);
        assert!(app.cards().is_empty());
        assert!(app.request_more().is_none());
    }

    #[test]
    fn replies_after_a_terminal_state_are_dropped() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_error();
        app.on_entries(make_entries(4));

        assert_eq!(app.phase, Phase::Failed);
        assert!(app.cards().is_empty());
        assert_eq!(app.offset(), 0);
    }

    #[test]
    fn error_outside_a_loading_phase_is_ignored() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(4));
        app.on_total(10);

        app.on_error();
        assert_eq!(app.phase, Phase::Loaded, "no fetch in flight, nothing to fail");
        assert_eq!(app.cards().len(), 4);
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn scroll_clamps_to_the_row_range() {
        let mut app = App::new(true, 2);
        app.start();
        app.on_entries(make_entries(5));
        // 5 cards in 2 columns: 3 rows.
        assert_eq!(app.row_count(), 3);

        app.scroll_down();
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.scroll, 2, "clamped to the last row");

        app.scroll_up();
        assert_eq!(app.scroll, 1);

        app.scroll_top();
        assert_eq!(app.scroll, 0);
        app.scroll_up();
        assert_eq!(app.scroll, 0);

        app.scroll_bottom();
        assert_eq!(app.scroll, 2);
    }

    #[test]
    fn scroll_on_empty_feed_is_a_no_op() {
        let mut app = App::new(true, 2);
        app.scroll_down();
        app.scroll_bottom();
        assert_eq!(app.scroll, 0);
    }
}
