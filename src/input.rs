//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in [`crate::ui`].
//! 4. Update the keybindings table in `README.md`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::fetch::FetchCmd;

/// Process a single key event, updating app state accordingly.
///
/// Returns a fetch command when the key triggered one: only the load-more
/// key can, and only when the controller's guard lets it through.  Only
/// key-press events are handled (ignoring release / repeat) so each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<FetchCmd> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit = true;
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.scroll_top();
            None
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.scroll_bottom();
            None
        }
        KeyCode::Char('m') | KeyCode::Enter => app.request_more(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
