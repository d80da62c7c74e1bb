//! Application state types and entry glue.
//!
//! `AppState` owns the working set and all view state for one run of the
//! screen. The operations below are what key handling calls into; rendering
//! only reads.
//!
pub mod form;
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use tracing::{error, info};

use crate::model::{UserRecord, WorkingSet};
use crate::search::{self, PageView};
use crate::source::FetchResult;
use form::{FormState, SubmitOutcome};
use keymap::Keymap;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub accent: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

const THEME_KEYS: [&str; 11] = [
    "text",
    "muted",
    "title",
    "accent",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "highlight_bg",
];

impl Theme {
    /// Catppuccin Mocha with an emerald accent for the title bar and buttons.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            accent: Color::Rgb(0x34, 0xd3, 0x99),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        match key {
            "text" => Some(&mut self.text),
            "muted" => Some(&mut self.muted),
            "title" => Some(&mut self.title),
            "accent" => Some(&mut self.accent),
            "border" => Some(&mut self.border),
            "header_bg" => Some(&mut self.header_bg),
            "header_fg" => Some(&mut self.header_fg),
            "status_bg" => Some(&mut self.status_bg),
            "status_fg" => Some(&mut self.status_fg),
            "highlight_fg" => Some(&mut self.highlight_fg),
            "highlight_bg" => Some(&mut self.highlight_bg),
            _ => None,
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(color), Some(slot)) = (parse_color(val), theme.slot(key.trim())) {
                *slot = color;
            }
        }
        theme
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let mut copy = *self;
        for key in THEME_KEYS {
            if let Some(c) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(*c));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load from `path`; if missing, write the default theme there and return it.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Reset => "reset".to_string(),
        // Named colors get a best-effort hex approximation
        Color::Black => "#000000".to_string(),
        Color::Red => "#FF0000".to_string(),
        Color::Green => "#00FF00".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::Blue => "#0000FF".to_string(),
        Color::Magenta => "#FF00FF".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::LightRed => "#FF6666".to_string(),
        Color::LightGreen => "#66FF66".to_string(),
        Color::LightYellow => "#FFFF66".to_string(),
        Color::LightBlue => "#6666FF".to_string(),
        Color::LightMagenta => "#FF66FF".to_string(),
        Color::LightCyan => "#66FFFF".to_string(),
        Color::White => "#FFFFFF".to_string(),
        Color::Indexed(i) => format!("index:{}", i),
    }
}

pub struct AppState {
    pub users: WorkingSet,
    pub search_query: String,
    /// 1-based page into the filtered sequence.
    pub current_page: usize,
    /// Row index within the current page.
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub form: FormState,
    /// True until the users fetch has resolved one way or the other.
    pub loading: bool,
    pub endpoint: String,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        Self {
            users: WorkingSet::new(),
            search_query: String::new(),
            current_page: 1,
            selected_row: 0,
            input_mode: InputMode::Normal,
            form: FormState::Closed,
            loading: false,
            endpoint: String::new(),
            theme,
            keymap,
        }
    }

    /// Seed the working set directly, bypassing the fetch.
    pub fn with_users(mut self, users: Vec<UserRecord>) -> Self {
        self.users = WorkingSet::from_records(users);
        self
    }

    /// Records to draw this frame.
    pub fn page_view(&self) -> PageView<'_> {
        search::page_view(self.users.records(), &self.search_query, self.current_page)
    }

    /// The record under the row cursor, if any.
    pub fn selected_record(&self) -> Option<&UserRecord> {
        self.page_view().rows.get(self.selected_row).copied()
    }

    /// Take in the fetch result. Failures are logged and leave the set empty.
    pub fn load_users(&mut self, result: FetchResult) {
        self.loading = false;
        match result {
            Ok(records) => {
                info!(count = records.len(), "working set loaded");
                self.users.replace_all(records);
                self.current_page = 1;
                self.selected_row = 0;
            }
            Err(e) => error!(error = %e, "failed to load users"),
        }
        self.clamp_cursor();
    }

    /// Pull the page and row back inside the current filtered view.
    ///
    /// Called after the working set changes, since an edit can move a record
    /// out of the search results and shrink the page count.
    fn clamp_cursor(&mut self) {
        let view = self.page_view();
        let (page, rows) = (view.page, view.rows.len());
        self.current_page = page;
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.on_search_changed();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.on_search_changed();
    }

    pub fn pop_search_char(&mut self) {
        if self.search_query.pop().is_some() {
            self.on_search_changed();
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    // A new query can shrink the page count; restart from the top.
    fn on_search_changed(&mut self) {
        self.current_page = 1;
        self.selected_row = 0;
    }

    pub fn total_pages(&self) -> usize {
        self.page_view().total_pages
    }

    /// Jump to `page`, clamped to the pages that exist.
    pub fn go_to_page(&mut self, page: usize) {
        let clamped = search::clamp_page(page, self.total_pages());
        if clamped != self.current_page {
            self.current_page = clamped;
            self.selected_row = 0;
        }
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let rows = self.page_view().rows.len();
        if self.selected_row + 1 < rows {
            self.selected_row += 1;
        }
    }

    pub fn open_add_form(&mut self) {
        self.form = FormState::open_add();
        self.input_mode = InputMode::Form;
    }

    /// Open the edit form on the selected row. Does nothing on an empty page.
    pub fn open_edit_form(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let form = FormState::open_edit(record);
        self.form = form;
        self.input_mode = InputMode::Form;
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_form(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.form.submit(&mut self.users);
        self.input_mode = InputMode::Normal;
        self.clamp_cursor();
        outcome
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
