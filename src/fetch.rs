//! Background feed fetching.
//!
//! Runs on a dedicated thread, executing fetch commands from the UI thread
//! and sending results back over an [`mpsc`] channel.  Unlike a polling
//! reader, pagination is user-driven: the worker sits idle until the
//! controller asks for a page.
//!
//! ## For contributors
//!
//! The worker is intentionally simple: one command in, one or two messages
//! out, no queueing.  The controller's phase guard ensures at most one
//! command is in flight, so there is never a backlog to manage.  If a
//! second feed panel is ever needed, spawn a second worker rather than
//! multiplexing commands here.

use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::source::{Entry, FeedSource};

/// Commands sent from the UI thread to the fetch worker.
pub enum FetchCmd {
    /// Load the first page; follow with the count query when the load-more
    /// affordance needs sizing.
    Initial,
    /// Load the next page starting at the cumulative `offset`.
    More { offset: usize },
}

/// Messages sent from the fetch worker back to the UI thread.
pub enum FetchMsg {
    /// A successful entries fetch returned these records.
    Entries(Vec<Entry>),
    /// The count query resolved the total number of matching records.
    Total(usize),
    /// An entries fetch failed with this description.
    Failed(String),
}

/// Spawn the background fetch worker.
///
/// `limit` is the page size sent with every entries query.  `want_total`
/// controls whether a successful initial page is followed by the count
/// query (skipped when lazy-load is disabled, since the total is only
/// used to size the load-more affordance).
///
/// The thread runs until either channel end is dropped: when the main
/// loop exits, the next send or receive fails and the worker silently
/// stops (there is no explicit shutdown signal).
pub fn spawn(
    source: Box<dyn FeedSource>,
    limit: usize,
    want_total: bool,
) -> (mpsc::Sender<FetchCmd>, mpsc::Receiver<FetchMsg>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<FetchCmd>();
    let (msg_tx, msg_rx) = mpsc::channel::<FetchMsg>();

    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let (offset, initial) = match cmd {
                FetchCmd::Initial => (0, true),
                FetchCmd::More { offset } => (offset, false),
            };

            debug!(source = source.name(), offset, limit, "fetch command");

            let msg = match source.fetch_entries(offset, limit) {
                Ok(entries) => FetchMsg::Entries(entries),
                Err(e) => FetchMsg::Failed(format!("{}: {e}", source.name())),
            };
            let fetched_ok = matches!(msg, FetchMsg::Entries(_));

            // If the receiver is gone the main thread has exited.
            if msg_tx.send(msg).is_err() {
                return;
            }

            if initial && fetched_ok && want_total {
                match source.fetch_total() {
                    Ok(total) => {
                        if msg_tx.send(FetchMsg::Total(total)).is_err() {
                            return;
                        }
                    }
                    // A failed count never fails the feed: entries stay
                    // rendered and the affordance simply never appears.
                    Err(e) => warn!(
                        source = source.name(),
                        error = %e,
                        "count query failed; load-more stays hidden"
                    ),
                }
            }
        }
    });

    (cmd_tx, msg_rx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted in-memory source recording the offsets it was asked for.
    struct FakeSource {
        entries: Result<Vec<Entry>>,
        total: Result<usize>,
        offsets: Arc<Mutex<Vec<usize>>>,
    }

    impl FakeSource {
        fn with_entries(count: usize) -> Self {
            let entries = (0..count)
                .map(|i| Entry {
                    id: i as u64,
                    title: format!("Entry {i}"),
                    url: format!("https://example.edu/{i}"),
                    ..Entry::default()
                })
                .collect();
            Self {
                entries: Ok(entries),
                total: Ok(10),
                offsets: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FeedSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        fn fetch_entries(&self, offset: usize, _limit: usize) -> Result<Vec<Entry>> {
            self.offsets.lock().unwrap().push(offset);
            match &self.entries {
                Ok(entries) => Ok(entries.clone()),
                Err(e) => Err(anyhow!("{e}")),
            }
        }

        fn fetch_total(&self) -> Result<usize> {
            match &self.total {
                Ok(total) => Ok(*total),
                Err(e) => Err(anyhow!("{e}")),
            }
        }
    }

    fn recv(rx: &mpsc::Receiver<FetchMsg>) -> FetchMsg {
        rx.recv_timeout(Duration::from_secs(2)).expect("worker reply")
    }

    #[test]
    fn initial_command_yields_entries_then_total() {
        let (tx, rx) = spawn(Box::new(FakeSource::with_entries(4)), 4, true);
        tx.send(FetchCmd::Initial).unwrap();

        match recv(&rx) {
            FetchMsg::Entries(entries) => assert_eq!(entries.len(), 4),
            _ => panic!("expected entries first"),
        }
        match recv(&rx) {
            FetchMsg::Total(total) => assert_eq!(total, 10),
            _ => panic!("expected total second"),
        }
    }

    #[test]
    fn count_query_is_skipped_when_total_is_not_wanted() {
        let (tx, rx) = spawn(Box::new(FakeSource::with_entries(2)), 2, false);
        tx.send(FetchCmd::Initial).unwrap();

        assert!(matches!(recv(&rx), FetchMsg::Entries(_)));
        assert!(
            rx.recv_timeout(Duration::from_millis(200)).is_err(),
            "no total message should follow"
        );
    }

    #[test]
    fn more_command_passes_the_cumulative_offset_through() {
        let source = FakeSource::with_entries(3);
        let offsets = source.offsets.clone();

        let (tx, rx) = spawn(Box::new(source), 3, true);
        tx.send(FetchCmd::More { offset: 8 }).unwrap();
        assert!(matches!(recv(&rx), FetchMsg::Entries(_)));

        assert_eq!(*offsets.lock().unwrap(), vec![8]);
    }

    #[test]
    fn more_command_never_triggers_the_count_query() {
        let (tx, rx) = spawn(Box::new(FakeSource::with_entries(3)), 3, true);
        tx.send(FetchCmd::More { offset: 4 }).unwrap();

        assert!(matches!(recv(&rx), FetchMsg::Entries(_)));
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn fetch_failure_is_reported_with_the_source_name() {
        let source = FakeSource {
            entries: Err(anyhow!("boom")),
            total: Ok(10),
            offsets: Arc::new(Mutex::new(Vec::new())),
        };

        let (tx, rx) = spawn(Box::new(source), 4, true);
        tx.send(FetchCmd::Initial).unwrap();

        match recv(&rx) {
            FetchMsg::Failed(message) => {
                assert!(message.contains("fake"));
                assert!(message.contains("boom"));
            }
            _ => panic!("expected a failure message"),
        }
        // No total follows a failed initial fetch.
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn count_failure_is_swallowed_after_a_good_page() {
        let source = FakeSource {
            entries: Ok(vec![Entry::default()]),
            total: Err(anyhow!("count broke")),
            offsets: Arc::new(Mutex::new(Vec::new())),
        };

        let (tx, rx) = spawn(Box::new(source), 1, true);
        tx.send(FetchCmd::Initial).unwrap();

        assert!(matches!(recv(&rx), FetchMsg::Entries(_)));
        assert!(
            rx.recv_timeout(Duration::from_millis(200)).is_err(),
            "count failure must not surface as a message"
        );
    }
}
