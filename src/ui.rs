//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  The UI is a pure function of the
//! controller's phase: a loading indicator, the no-results interface, or
//! the card grid, plus a one-line status bar that doubles as the progress
//! announcer ("Showing N of M entries").
//!
//! ## For contributors
//!
//! * The layout is a two-row split: the phase-dependent content area on
//!   top and a one-line status bar at the bottom.
//! * Cards are drawn in a grid of [`App::columns`] columns, scrolled by
//!   whole rows; the `list` display variant is simply a one-column grid.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Phase, NO_RESULTS_MESSAGE};
use crate::card::Card;
use crate::config::Theme;

/// Terminal rows each card occupies in the grid.
const CARD_HEIGHT: u16 = 6;

/// Per-frame display inputs that live outside the controller.
pub struct UiContext<'a> {
    pub theme: Theme,
    /// Canonical site linked from the no-results interface.
    pub site_url: &'a str,
    /// Feed label for the frame title ("news" / "events").
    pub feed_label: &'a str,
}

struct Palette {
    fg: Color,
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            fg: Color::White,
            accent: Color::Cyan,
            dim: Color::DarkGray,
        },
        Theme::Light => Palette {
            fg: Color::Black,
            accent: Color::Blue,
            dim: Color::Gray,
        },
    }
}

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, ctx: &UiContext, frame: &mut Frame) {
    let [content_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match app.phase {
        Phase::Idle | Phase::Loading => draw_loading(ctx, frame, content_area),
        Phase::Empty | Phase::Failed => draw_no_results(ctx, frame, content_area),
        Phase::Loaded | Phase::LoadingMore | Phase::Exhausted => {
            draw_card_grid(app, ctx, frame, content_area)
        }
    }

    draw_status_bar(app, frame, status_area);
}

fn frame_block(ctx: &UiContext) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", ctx.feed_label))
        .borders(Borders::ALL)
}

/// Centered indicator while the initial fetch is in flight.
fn draw_loading(ctx: &UiContext, frame: &mut Frame, area: Rect) {
    let colors = palette(ctx.theme);
    let indicator = Paragraph::new(Line::from(Span::styled(
        "Loading entries",
        Style::default().fg(colors.dim),
    )))
    .alignment(Alignment::Center)
    .block(frame_block(ctx));

    frame.render_widget(indicator, area);
}

/// The shared empty / error interface: a fixed message and a way back to
/// the canonical site.  Zero results and a failed fetch look identical on
/// purpose.
fn draw_no_results(ctx: &UiContext, frame: &mut Frame, area: Rect) {
    let colors = palette(ctx.theme);
    let body = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            NO_RESULTS_MESSAGE,
            Style::default().fg(colors.fg).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("View the latest at {}", ctx.site_url),
            Style::default().fg(colors.accent),
        )),
    ])
    .alignment(Alignment::Center)
    .block(frame_block(ctx));

    frame.render_widget(body, area);
}

/// Render the scrollable card grid, with a trailing indicator while a
/// load-more fetch is in flight.
fn draw_card_grid(app: &mut App, ctx: &UiContext, frame: &mut Frame, area: Rect) {
    let colors = palette(ctx.theme);

    let block = frame_block(ctx);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (grid_area, footer_area) = if app.phase == Phase::LoadingMore {
        let [grid, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        (grid, Some(footer))
    } else {
        (inner, None)
    };

    let visible_rows = (grid_area.height / CARD_HEIGHT).max(1) as usize;
    let columns = app.columns;
    let cards = app.cards();

    for (row_idx, row_cards) in cards
        .chunks(columns)
        .skip(app.scroll)
        .take(visible_rows)
        .enumerate()
    {
        let y = grid_area.y + (row_idx as u16) * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(grid_area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let row_area = Rect::new(grid_area.x, y, grid_area.width, height);
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);

        for (card, cell) in row_cards.iter().zip(cells.iter()) {
            let body = Paragraph::new(card_lines(card, &colors)).wrap(Wrap { trim: true });
            frame.render_widget(body, *cell);
        }
    }

    if let Some(footer) = footer_area {
        let indicator = Paragraph::new(Span::styled(
            "Loading more entries",
            Style::default().fg(colors.dim),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(indicator, footer);
    }
}

/// Lines for one card.  Parts the mapping omitted simply do not appear;
/// an entirely empty card still occupies its grid cell.
fn card_lines(card: &Card, colors: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if !card.categories.is_empty() {
        lines.push(Line::from(Span::styled(
            card.categories.join(", "),
            Style::default().fg(colors.accent),
        )));
    }

    if let Some(headline) = &card.headline {
        lines.push(Line::from(Span::styled(
            headline.title.clone(),
            Style::default().fg(colors.fg).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(date) = &card.date {
        lines.push(Line::from(Span::styled(
            date.formatted.clone(),
            Style::default().fg(colors.dim),
        )));
    }

    if let Some(meta) = &card.meta {
        lines.push(Line::from(Span::styled(
            meta.clone(),
            Style::default().fg(colors.accent),
        )));
    }

    if let Some(image) = &card.image {
        let label = if image.alt_text.is_empty() {
            "[image]".to_string()
        } else {
            format!("[{}]", image.alt_text)
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(colors.dim).add_modifier(Modifier::DIM),
        )));
    }

    if let Some(text) = &card.text {
        lines.push(Line::from(Span::styled(
            text.clone(),
            Style::default().fg(colors.fg),
        )));
    }

    lines
}

/// Render the bottom status bar: the live announcement, the card count,
/// and key help (the load-more hint appears only while it would work).
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            app.announcement.clone(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} cards", app.cards().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll"),
    ];
    if app.show_more_visible() {
        spans.push(Span::styled(
            "  m: load more",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
