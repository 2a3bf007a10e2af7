//! Key binding definitions.
//!
//! Maps raw crossterm key events onto the small set of navigation keys the
//! selection controls understand.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key as seen by list navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Move the highlight forward.
    Next,
    /// Move the highlight backward.
    Prev,
    /// Commit the highlighted row.
    Confirm,
    /// Close without committing.
    Cancel,
    /// Tab or Shift+Tab.
    Tab,
    /// Backspace.
    Erase,
    /// Clear the whole query (Ctrl+U).
    ClearQuery,
    /// A printable character.
    Char(char),
}

/// Key binding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Whether vim-style bindings are enabled.
    pub vim_mode: bool,
}

impl KeyBindings {
    /// Create new key bindings.
    pub fn new(vim_mode: bool) -> Self {
        Self { vim_mode }
    }

    /// Classify a key event for list navigation.
    ///
    /// Arrow keys and Ctrl+N/Ctrl+P always navigate. With vim mode on,
    /// Ctrl+J/Ctrl+K do too. Plain letters are always text, since the
    /// controls that use this have a search input.
    pub fn nav_key(&self, key: &KeyEvent) -> Option<NavKey> {
        match (key.code, key.modifiers) {
            (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => Some(NavKey::Next),
            (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => Some(NavKey::Prev),
            (KeyCode::Char('j'), KeyModifiers::CONTROL) if self.vim_mode => Some(NavKey::Next),
            (KeyCode::Char('k'), KeyModifiers::CONTROL) if self.vim_mode => Some(NavKey::Prev),
            (KeyCode::Enter, _) => Some(NavKey::Confirm),
            (KeyCode::Esc, _) => Some(NavKey::Cancel),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Some(NavKey::Tab),
            (KeyCode::Backspace, _) => Some(NavKey::Erase),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(NavKey::ClearQuery),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(NavKey::Char(c)),
            _ => None,
        }
    }

    /// Check whether a key moves down in a plain (non-text) list.
    pub fn is_down(&self, key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Down)
            || (self.vim_mode && key.code == KeyCode::Char('j') && key.modifiers == KeyModifiers::NONE)
    }

    /// Check whether a key moves up in a plain (non-text) list.
    pub fn is_up(&self, key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Up)
            || (self.vim_mode && key.code == KeyCode::Char('k') && key.modifiers == KeyModifiers::NONE)
    }

    /// Check whether a key moves into/expands in a plain list.
    pub fn is_right(&self, key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Right)
            || (self.vim_mode && key.code == KeyCode::Char('l') && key.modifiers == KeyModifiers::NONE)
    }

    /// Check whether a key moves out of/collapses in a plain list.
    pub fn is_left(&self, key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Left)
            || (self.vim_mode && key.code == KeyCode::Char('h') && key.modifiers == KeyModifiers::NONE)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Which kind of control has focus, for the hint bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// A closed combobox or select.
    Trigger,
    /// A closed tag input.
    TagInput,
    /// Any control with its panel open.
    Panel,
    /// The tree view.
    Tree,
}

/// Short key hints for a context.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Trigger => "[Enter/↓] open  [Del] clear  [Tab] next  [^Q] quit",
        KeyContext::TagInput => "[type] search  [Bksp] remove last  [Tab] next  [^Q] quit",
        KeyContext::Panel => "[↑/↓] move  [Enter] select  [Esc] cancel  [^U] clear search",
        KeyContext::Tree => "[↑/↓] move  [←/→] collapse/expand  [Space] select  [Tab] next",
    }
}
