//! Shared UI components (status bar, help modal, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::search::PageView;

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState, view: &PageView<'_>) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::Help => "HELP",
    };
    let loading = if app.loading { "  loading…" } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}  matches:{}  page:{}/{}  ?: help{loading}",
        app.users.len(),
        view.filtered,
        view.page,
        view.total_pages.max(1),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal from the active keymap plus the fixed search/form keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let bound: [(&str, KeyAction); 12] = [
        ("Search", KeyAction::StartSearch),
        ("Clear search", KeyAction::ClearSearch),
        ("Add user", KeyAction::AddUser),
        ("Edit selected user", KeyAction::EditSelection),
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Previous page", KeyAction::PrevPage),
        ("Next page", KeyAction::NextPage),
        ("First page", KeyAction::FirstPage),
        ("Last page", KeyAction::LastPage),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ];
    let fixed: [(&str, &str); 5] = [
        ("Apply search", "Enter"),
        ("Cancel search", "Esc"),
        ("Next / previous field", "Tab, Down / BackTab, Up"),
        ("Press button", "Enter"),
        ("Close form", "Esc"),
    ];

    let col1_w = bound
        .iter()
        .map(|(l, _)| l.len())
        .chain(fixed.iter().map(|(l, _)| l.len()))
        .max()
        .unwrap_or(0);
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", label, width = col1_w)),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
    };

    let mut lines: Vec<Line> = vec![heading("Table:")];
    for (label, action) in bound {
        let keys = app.keymap.keys_for(action);
        if !keys.is_empty() {
            lines.push(row(label, keys.join(", ")));
        }
    }
    lines.push(Line::raw(""));
    lines.push(heading("Search box and form:"));
    for (label, keys) in fixed {
        lines.push(row(label, keys.to_string()));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
