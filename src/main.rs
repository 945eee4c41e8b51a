//! campusfeed — browse a university's news and events feeds in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//!               FetchCmd   ┌──────────┐  FetchMsg   ┌──────────┐  draw()  ┌──────────┐
//!             ┌──────────► │ fetch.rs │ ──────────► │  app.rs  │ ───────► │  ui.rs   │
//!             │  (channel) │ (thread) │  (channel)  │ (state)  │          │ (render) │
//!             │            └──────────┘             └──────────┘          └──────────┘
//!             │                                          ▲
//!             │                                          │ handle_key_event()
//!             │                                     ┌──────────┐
//!             └──────────────────────────────────── │ input.rs │
//!                                                   └──────────┘
//! ```
//!
//! * **`source/`** — the `FeedSource` trait and the GraphQL implementation.
//! * **`fetch`** — spawns a background thread that executes fetch commands.
//! * **`app`** — owns all application state: the pagination state machine,
//!   the rendered cards, and the status announcement.
//! * **`card`** — pure mapping from feed entries to card descriptors.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations (and, for the
//!   load-more key, to fetch commands).
//! * **`config`** — CLI flags resolved once into a typed struct.
//! * **`main`** — wires everything together: parse config, set up the
//!   terminal, and run the event loop.

mod app;
mod card;
mod config;
mod fetch;
mod input;
mod source;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Cli, FeedConfig};
use fetch::FetchMsg;
use source::GraphqlSource;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.  Without this, a panic inside the event loop would leave
/// raw mode enabled and the alternate screen active.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Route tracing output to the file named by `CAMPUSFEED_LOG`.
///
/// Stdout belongs to the TUI, so logging is opt-in via the environment;
/// filtering follows the usual `RUST_LOG` conventions.
fn init_tracing() -> Result<()> {
    if let Ok(path) = std::env::var("CAMPUSFEED_LOG") {
        let file =
            File::create(&path).with_context(|| format!("cannot open log file {path}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    install_panic_hook();
    init_tracing()?;

    // -- resolve configuration -----------------------------------------------
    let config = FeedConfig::from_cli(Cli::parse())?;

    // A missing token aborts here, before the terminal is ever touched.
    let source = GraphqlSource::new(
        config.url.as_str(),
        config.token.as_str(),
        config.kind,
        config.variables.clone(),
    )?;

    // -- start the fetch worker ----------------------------------------------
    let (cmd_tx, msg_rx) = fetch::spawn(Box::new(source), config.page_limit(), config.lazy_load);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.lazy_load, config.grid_columns());
    cmd_tx
        .send(app.start())
        .map_err(|_| anyhow!("fetch worker exited before the initial load"))?;

    let ctx = ui::UiContext {
        theme: config.theme,
        site_url: &config.site_url,
        feed_label: config.kind.label(),
    };

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the fetch worker.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process fetch messages
        while let Ok(msg) = msg_rx.try_recv() {
            match msg {
                FetchMsg::Entries(entries) => app.on_entries(entries),
                FetchMsg::Total(total) => app.on_total(total),
                FetchMsg::Failed(message) => {
                    warn!(%message, "fetch failed");
                    app.on_error();
                }
            }
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&mut app, &ctx, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = input::handle_key_event(&mut app, key) {
                    // The worker only dies with the process; if it is gone,
                    // show the error interface rather than hanging.
                    if cmd_tx.send(cmd).is_err() {
                        app.on_error();
                    }
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
