use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};

use crate::app::AppState;
use crate::app::form::FormFocus;
use crate::search::PageView;

/// Text of the single row shown when nothing matches.
pub const EMPTY_PLACEHOLDER: &str = "No users found";

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState, view: &PageView<'_>) {
    let header = Row::new(vec!["ID", "USERNAME", "NAME", "EMAIL"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );
    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(45),
    ];
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let mut state = TableState::default();
    let rows: Vec<Row> = if view.rows.is_empty() {
        vec![Row::new(vec![Cell::from(""), Cell::from(EMPTY_PLACEHOLDER)])
            .style(Style::default().fg(app.theme.muted))]
    } else {
        state.select(Some(app.selected_row.min(view.rows.len() - 1)));
        view.rows
            .iter()
            .map(|u| {
                Row::new(vec![
                    Cell::from(u.id.to_string()),
                    Cell::from(u.username()),
                    Cell::from(u.name.clone()),
                    Cell::from(u.email.clone()),
                ])
                .style(Style::default().fg(app.theme.text))
            })
            .collect()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    f.render_stateful_widget(table, area, &mut state);
}

/// Page indicator; left blank when everything fits on one page.
pub fn render_pager(f: &mut Frame, area: Rect, app: &AppState, view: &PageView<'_>) {
    if !view.show_pager() {
        return;
    }
    let prev = if view.page > 1 { "◀ " } else { "  " };
    let next = if view.page < view.total_pages { " ▶" } else { "  " };
    let line = Line::from(vec![
        Span::styled(prev, Style::default().fg(app.theme.accent)),
        Span::styled(
            format!("Page {} / {}", view.page, view.total_pages),
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(next, Style::default().fg(app.theme.accent)),
    ])
    .centered();
    f.render_widget(Paragraph::new(line), area);
}

pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState) {
    let (Some(draft), Some(focus)) = (app.form.draft(), app.form.focus()) else {
        return;
    };
    let (title, confirm) = if app.form.is_edit() {
        ("Edit User", "Update")
    } else {
        ("Add New User", "Submit")
    };

    let width = 60u16.min(area.width.saturating_sub(4)).max(40);
    let rect = crate::ui::components::centered_rect(width, 10, area);

    let marker = |which: FormFocus| if which == focus { "▶" } else { " " };
    let field_style = |which: FormFocus| {
        if which == focus {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        }
    };
    let button = |which: FormFocus, label: &str| {
        let text = if which == focus { format!("[{label}]") } else { format!(" {label} ") };
        Span::styled(text, field_style(which))
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} Name:     ", marker(FormFocus::Name))),
            Span::styled(draft.name.clone(), field_style(FormFocus::Name)),
        ]),
        Line::from(vec![
            Span::raw("  Username: "),
            Span::styled(draft.username().to_string(), Style::default().fg(app.theme.muted)),
        ]),
        Line::from(vec![
            Span::raw(format!("{} Email:    ", marker(FormFocus::Email))),
            Span::styled(draft.email.clone(), field_style(FormFocus::Email)),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            button(FormFocus::Cancel, "Cancel"),
            Span::raw("    "),
            button(FormFocus::Submit, confirm),
        ]),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
