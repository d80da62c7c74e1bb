// Integration tests for user-dashboard

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use user_dashboard::app::form::{DraftField, SubmitOutcome};
use user_dashboard::app::update::{Flow, handle_key};
use user_dashboard::app::{AppState, InputMode};
use user_dashboard::model::{UserId, UserRecord};
use user_dashboard::source::UsersSource;
use user_dashboard::FetchError;

fn press(app: &mut AppState, code: KeyCode) -> Flow {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn numbered_users(n: i64) -> Vec<UserRecord> {
    (1..=n)
        .map(|i| UserRecord::new(i, format!("user{i}"), format!("user{i}@example.com")))
        .collect()
}

fn screen_text(app: &AppState) -> String {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal
        .draw(|f| user_dashboard::ui::render(f, app))
        .expect("draw");
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().expect("client")
}

/// Serve exactly one HTTP response on a random local port and return its URL.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.expect("accept");
        let mut buf = [0u8; 4096];
        let _ = sock.read(&mut buf).await;
        let resp = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = sock.write_all(resp.as_bytes()).await;
        let _ = sock.shutdown().await;
    });
    format!("http://{addr}/api/v1/users")
}

// Scenario 1: search narrows the table, and a miss shows the placeholder row
#[test]
fn search_hit_and_miss() {
    let mut app = AppState::default().with_users(vec![UserRecord::new(1, "Ann", "a@x.com")]);

    app.set_search("an");
    let view = app.page_view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, UserId::Number(1));

    app.set_search("zz");
    assert!(app.page_view().rows.is_empty());
    assert!(screen_text(&app).contains("No users found"));
}

// Scenario 2: 25 records, page 3 holds records 21..=25
#[test]
fn third_page_of_twenty_five() {
    let mut app = AppState::default().with_users(numbered_users(25));
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    let view = app.page_view();
    assert_eq!(view.page, 3);
    assert_eq!(view.total_pages, 3);
    let ids: Vec<UserId> = view.rows.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, (21..=25).map(UserId::Number).collect::<Vec<_>>());

    // past the end stays on the last page
    press(&mut app, KeyCode::Right);
    assert_eq!(app.current_page, 3);
    assert!(screen_text(&app).contains("Page 3 / 3"));
}

#[test]
fn pager_hidden_for_a_single_page() {
    let app = AppState::default().with_users(numbered_users(10));
    let text = screen_text(&app);
    assert!(!text.contains("Page 1 / 1"));
    assert!(text.contains("user10"));
}

// Scenario 3: adding a user prepends it with a generated id
#[test]
fn add_user_prepends_with_generated_id() {
    let mut app = AppState::default().with_users(numbered_users(3));
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(!app.form.is_edit());
    type_text(&mut app, "Bo");
    assert_eq!(app.form.draft().expect("draft").username(), "Bo");

    let outcome = app.submit_form();
    let Some(SubmitOutcome::Created(id)) = outcome else {
        panic!("expected a created user");
    };
    assert_eq!(app.users.len(), 4);
    let first = &app.users.records()[0];
    assert_eq!(first.id, id);
    assert_eq!(first.username(), format!("Bo{id}"));
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn reopening_add_form_discards_previous_draft() {
    let mut app = AppState::default();
    press(&mut app, KeyCode::Char('n'));
    type_text(&mut app, "Half");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.users.len(), 0);
    press(&mut app, KeyCode::Char('n'));
    assert!(app.form.draft().expect("draft").is_empty());
}

// Scenario 4: editing keeps exactly one record with the id
#[test]
fn edit_replaces_by_id() {
    let mut app = AppState::default().with_users(numbered_users(10));
    for _ in 0..6 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    assert!(app.form.is_edit());
    {
        let draft = app.form.draft_mut().expect("draft");
        assert_eq!(draft.username(), "user77");
        draft.set_field(DraftField::Email, "seven@new.example");
    }
    assert_eq!(app.submit_form(), Some(SubmitOutcome::Updated(UserId::Number(7))));

    let sevens: Vec<&UserRecord> = app
        .users
        .records()
        .iter()
        .filter(|r| r.id == UserId::Number(7))
        .collect();
    assert_eq!(sevens.len(), 1);
    assert_eq!(sevens[0].email, "seven@new.example");
    assert_eq!(sevens[0].name, "user7");
    assert_eq!(app.users.len(), 10);
}

#[test]
fn edit_form_renders_derived_username() {
    let mut app = AppState::default().with_users(vec![UserRecord::new(7, "Ann", "a@x.com")]);
    press(&mut app, KeyCode::Char('e'));
    let text = screen_text(&app);
    assert!(text.contains("Edit User"));
    assert!(text.contains("Ann7"));
    assert!(text.contains("Update"));
}

// Scenario 5: a failing fetch leaves the set empty and the UI intact
#[tokio::test]
async fn fetch_network_error_leaves_set_empty() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let source = UsersSource::with_client(test_client(), &format!("http://{addr}/users")).expect("source");
    let result = source.fetch_users().await;
    assert!(matches!(result, Err(FetchError::Request { .. })));

    let mut app = AppState::default();
    app.loading = true;
    app.load_users(result);
    assert!(!app.loading);
    assert!(app.users.is_empty());
    assert!(screen_text(&app).contains("No users found"));
}

#[tokio::test]
async fn fetch_http_error_status_is_a_failure() {
    let url = serve_once("500 Internal Server Error", "{}").await;
    let source = UsersSource::with_client(test_client(), &url).expect("source");
    let result = source.fetch_users().await;
    assert!(matches!(result, Err(FetchError::Status { .. })));
}

#[tokio::test]
async fn spawned_fetch_delivers_validated_records() {
    let url = serve_once(
        "200 OK",
        r#"[{"id":1,"name":"Ann","email":"a@x.com"},{"id":2,"name":"NoEmail"},{"id":3,"name":"Cy","email":"c@x.com"}]"#,
    )
    .await;
    let source = UsersSource::with_client(test_client(), &url).expect("source");
    let rx = source.spawn_fetch();
    let result = rx.await.expect("fetch task finished");

    let mut app = AppState::default();
    app.load_users(result);
    let names: Vec<&str> = app.users.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Cy"]);
}

#[test]
fn quit_key_ends_the_loop() {
    let mut app = AppState::default();
    assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
}
