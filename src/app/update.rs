use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::trace;

use crate::app::form::FormFocus;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::error::FetchError;
use crate::source::FetchResult;
use crate::ui;

/// Whether the loop should keep running after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Draw, poll for keys, and pick up the fetch result once it arrives.
///
/// Returning drops `pending`, so a fetch still in flight is discarded.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    mut pending: Option<oneshot::Receiver<FetchResult>>,
) -> Result<()> {
    app.loading = pending.is_some();
    loop {
        poll_fetch(app, &mut pending);

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Hand a finished fetch to the app without blocking.
///
/// A sender dropped without a result counts as a failed fetch. `pending` is
/// cleared once anything has been delivered.
pub fn poll_fetch(app: &mut AppState, pending: &mut Option<oneshot::Receiver<FetchResult>>) {
    let Some(rx) = pending.as_mut() else {
        return;
    };
    let result = match rx.try_recv() {
        Ok(result) => result,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Closed) => Err(FetchError::Cancelled),
    };
    app.load_users(result);
    *pending = None;
}

/// Route one key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    trace!(?key, mode = ?app.input_mode, "key");
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Form => handle_form_key(app, key.code),
        InputMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.input_mode = InputMode::Normal;
            }
        }
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => app.input_mode = InputMode::Help,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::ClearSearch => app.clear_search(),
        KeyAction::AddUser => app.open_add_form(),
        KeyAction::EditSelection => app.open_edit_form(),
        KeyAction::MoveUp => app.move_up(),
        KeyAction::MoveDown => app.move_down(),
        KeyAction::PrevPage => app.prev_page(),
        KeyAction::NextPage => app.next_page(),
        KeyAction::FirstPage => app.go_to_page(1),
        KeyAction::LastPage => {
            let last = app.total_pages();
            app.go_to_page(last);
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, code: KeyCode) {
    let Some(focus) = app.form.focus() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Down => app.form.set_focus(focus.next()),
        KeyCode::BackTab | KeyCode::Up => app.form.set_focus(focus.prev()),
        KeyCode::Left | KeyCode::Right if focus.field().is_none() => {
            let other = if focus == FormFocus::Cancel { FormFocus::Submit } else { FormFocus::Cancel };
            app.form.set_focus(other);
        }
        KeyCode::Enter => match focus {
            FormFocus::Cancel => app.cancel_form(),
            FormFocus::Submit => {
                app.submit_form();
            }
            FormFocus::Name => app.form.set_focus(FormFocus::Email),
            FormFocus::Email => app.form.set_focus(FormFocus::Submit),
        },
        KeyCode::Backspace => {
            if let (Some(field), Some(draft)) = (focus.field(), app.form.draft_mut()) {
                draft.pop_char(field);
            }
        }
        KeyCode::Char(c) => {
            if let (Some(field), Some(draft)) = (focus.field(), app.form.draft_mut()) {
                draft.push_char(field, c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRecord;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn search_mode_edits_query_live() {
        let mut app = AppState::default().with_users(vec![
            UserRecord::new(1, "Ann", "a@x.com"),
            UserRecord::new(2, "Bob", "b@x.com"),
        ]);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "bo");
        assert_eq!(app.page_view().rows.len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search_query, "bo");
        press(&mut app, KeyCode::Char('c'));
        assert!(app.search_query.is_empty());
    }

    #[test]
    fn q_in_form_is_text_not_quit() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Continue);
        assert_eq!(app.form.draft().unwrap().name, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }

    #[test]
    fn form_keys_move_focus_and_submit() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Bo");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "bo@x.com");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus(), Some(FormFocus::Cancel));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.focus(), Some(FormFocus::Submit));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users.records()[0].email, "bo@x.com");
    }

    #[test]
    fn enter_through_the_form_submits() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Bo");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "bo@x.com");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.focus(), Some(FormFocus::Submit));
        press(&mut app, KeyCode::Enter);
        assert!(!app.form.is_open());
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users.records()[0].name, "Bo");
    }

    #[test]
    fn fetch_result_is_loaded_once_it_arrives() {
        let (tx, rx) = oneshot::channel();
        let mut pending = Some(rx);
        let mut app = AppState::default();
        app.loading = true;
        poll_fetch(&mut app, &mut pending);
        assert!(app.loading);
        assert!(pending.is_some());

        let _ = tx.send(Ok(vec![UserRecord::new(1, "Ann", "a@x.com")]));
        poll_fetch(&mut app, &mut pending);
        assert!(!app.loading);
        assert!(pending.is_none());
        assert_eq!(app.users.len(), 1);
    }

    #[test]
    fn dropped_fetch_sender_clears_loading() {
        let (tx, rx) = oneshot::channel::<FetchResult>();
        let mut pending = Some(rx);
        let mut app = AppState::default();
        app.loading = true;
        drop(tx);
        poll_fetch(&mut app, &mut pending);
        assert!(!app.loading);
        assert!(app.users.is_empty());
        assert!(pending.is_none());
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = AppState::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, InputMode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
