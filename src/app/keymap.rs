//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings only apply in normal mode. Search input and the form modal handle
//! their keys directly, since every printable character is text there.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Focus the search box.
    StartSearch,
    /// Empty the search box.
    ClearSearch,
    /// Open the form to add a user.
    AddUser,
    /// Open the form to edit the selected row.
    EditSelection,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Ignore this key (used for keys that shouldn't trigger anything).
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 13] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::ClearSearch,
    KeyAction::AddUser,
    KeyAction::EditSelection,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PrevPage,
    KeyAction::NextPage,
    KeyAction::FirstPage,
    KeyAction::LastPage,
    KeyAction::Ignore,
];

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    ///
    /// Arrow keys and vim-style hjkl navigate; `/` searches, `n` adds, `e` or
    /// Enter edits the selected row.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('c')), KeyAction::ClearSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::AddUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);

        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);

        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't exist.
    ///
    /// A missing file is written out with the defaults so it can be customised.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file should use the format: `<Action> = <KeySpec>` or the legacy
    /// `<KeySpec> = <Action>` format. The method starts from defaults and overrides
    /// with user-specified bindings.
    ///
    /// # Returns
    ///
    /// `Some(keymap)` if the file exists and is readable; `None` otherwise.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse keymap text on top of the defaults. Unrecognised lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            // Preferred format: Action = KeySpec
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    /// Write the current keymap to a configuration file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Up, Down, Left, Right, PageUp, PageDown, Home, End, /, ?\n");
        let names: Vec<&str> = ALL_ACTIONS.iter().map(|a| format_action(*a)).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut all = self.all_bindings();
        all.sort_by_key(|((m, c), a)| (format_action(*a), Self::format_key(*m, *c)));
        for ((mods, code), action) in all {
            let _ = writeln!(
                &mut buf,
                "{} = {}",
                format_action(action),
                Self::format_key(mods, code)
            );
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its corresponding action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Return a snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key (modifiers + code) into a human-readable spec like "Ctrl+c".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS
        .iter()
        .copied()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::ClearSearch => "ClearSearch",
        KeyAction::AddUser => "AddUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::FirstPage => "FirstPage",
        KeyAction::LastPage => "LastPage",
        KeyAction::Ignore => "Ignore",
    }
}
