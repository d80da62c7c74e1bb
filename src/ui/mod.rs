pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let view = app.page_view();

    let searching = app.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.header_fg)
    };
    let cursor = if searching { "_" } else { "" };
    let placeholder = app.search_query.is_empty() && !searching;
    let query = if placeholder {
        Span::styled("Search by name, username, or email", Style::default().fg(app.theme.muted))
    } else {
        Span::styled(format!("{}{}", app.search_query, cursor), search_style)
    };
    let header = Paragraph::new(Line::from(vec![Span::raw(" / "), query]))
        .block(
            Block::default()
                .title(Span::styled(
                    " User Management ",
                    Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD),
                ))
                .title_bottom(Line::from(format!(" {} ", app.endpoint)).right_aligned())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    users::render_users_table(f, root[1], app, &view);
    users::render_pager(f, root[2], app, &view);
    components::render_status_bar(f, root[3], app, &view);

    let area = f.area();
    match app.input_mode {
        InputMode::Form => users::render_user_form(f, area, app),
        InputMode::Help => components::render_help_modal(f, area, app),
        InputMode::Normal | InputMode::Search => {}
    }
}
