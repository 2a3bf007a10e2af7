//! Keyboard navigation over a filtered option list.
//!
//! The panel is either closed or open with a highlighted row and a query.
//! Both live inside [`PanelState::Open`], so a highlight can never exist
//! while the panel is closed.
//!
//! The navigator interprets keys. Opening is only *requested* (the owner
//! may refuse, e.g. when disabled) and is applied with [`Navigator::open`].

use crossterm::event::KeyEvent;

use crate::events::{KeyBindings, NavKey};

/// Open/closed state of a selection panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    /// The panel is hidden.
    #[default]
    Closed,
    /// The panel is shown.
    Open {
        /// Index of the highlighted visible row.
        highlighted: usize,
        /// Current search text.
        query: String,
    },
}

/// Where the highlight starts when the panel opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// The first visible row.
    First,
    /// The last visible row.
    Last,
}

/// What a key press meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Open the panel with the given seed.
    Open(Seed),
    /// Open the panel and type this character into the query.
    OpenTyping(char),
    /// The highlight moved.
    Highlight(usize),
    /// Commit the row at this visible index.
    Commit(usize),
    /// The query changed.
    QueryChanged,
    /// Backspace on an empty query.
    RemoveLast,
    /// Escape closed the panel.
    Cancel,
    /// Tab closed the panel.
    Dismiss,
    /// The key means nothing here.
    Ignored,
}

/// Tracks the panel state and the highlighted row.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: PanelState,
    type_to_open: bool,
}

impl Navigator {
    /// Create a closed navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Let printable characters open the panel while it is closed.
    pub fn set_type_to_open(&mut self, enabled: bool) {
        self.type_to_open = enabled;
    }

    /// Get the panel state.
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Check if the panel is open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    /// Open the panel over `len` visible rows.
    pub fn open(&mut self, seed: Seed, len: usize) {
        let highlighted = match seed {
            Seed::First => 0,
            Seed::Last => len.saturating_sub(1),
        };
        self.state = PanelState::Open {
            highlighted,
            query: String::new(),
        };
    }

    /// Close the panel, dropping the query and the highlight.
    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    /// Current query (empty while closed).
    pub fn query(&self) -> &str {
        match &self.state {
            PanelState::Open { query, .. } => query,
            PanelState::Closed => "",
        }
    }

    /// Highlighted row (None while closed).
    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            PanelState::Open { highlighted, .. } => Some(highlighted),
            PanelState::Closed => None,
        }
    }

    /// Replace the query. Resets the highlight to the first row.
    pub fn set_query(&mut self, text: impl Into<String>) {
        if let PanelState::Open { highlighted, query } = &mut self.state {
            *query = text.into();
            *highlighted = 0;
        }
    }

    /// Append a character to the query.
    pub fn push_char(&mut self, c: char) {
        if let PanelState::Open { highlighted, query } = &mut self.state {
            query.push(c);
            *highlighted = 0;
        }
    }

    /// Remove the last query character. Returns false if the query was empty.
    pub fn pop_char(&mut self) -> bool {
        if let PanelState::Open { highlighted, query } = &mut self.state {
            if query.pop().is_some() {
                *highlighted = 0;
                return true;
            }
        }
        false
    }

    /// Advance the highlight, wrapping past the end.
    pub fn move_next(&mut self, len: usize) {
        if let PanelState::Open { highlighted, .. } = &mut self.state {
            *highlighted = if len == 0 { 0 } else { (*highlighted + 1) % len };
        }
    }

    /// Retreat the highlight, wrapping before the start.
    pub fn move_prev(&mut self, len: usize) {
        if let PanelState::Open { highlighted, .. } = &mut self.state {
            *highlighted = match (*highlighted).min(len) {
                _ if len == 0 => 0,
                0 => len - 1,
                h => h - 1,
            };
        }
    }

    /// Pull the highlight back inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        if let PanelState::Open { highlighted, .. } = &mut self.state {
            *highlighted = (*highlighted).min(len.saturating_sub(1));
        }
    }

    /// Interpret a key against a list of `len` visible rows.
    pub fn handle_key(&mut self, key: KeyEvent, len: usize, bindings: &KeyBindings) -> NavAction {
        let Some(nav_key) = bindings.nav_key(&key) else {
            return NavAction::Ignored;
        };

        if !self.is_open() {
            return match nav_key {
                NavKey::Next | NavKey::Confirm => NavAction::Open(Seed::First),
                NavKey::Prev => NavAction::Open(Seed::Last),
                NavKey::Erase => NavAction::RemoveLast,
                NavKey::Char(c) if self.type_to_open => NavAction::OpenTyping(c),
                _ => NavAction::Ignored,
            };
        }

        match nav_key {
            NavKey::Next => {
                self.move_next(len);
                NavAction::Highlight(self.highlighted().unwrap_or(0))
            }
            NavKey::Prev => {
                self.move_prev(len);
                NavAction::Highlight(self.highlighted().unwrap_or(0))
            }
            NavKey::Confirm => match self.highlighted() {
                Some(h) if len > 0 => NavAction::Commit(h.min(len - 1)),
                _ => NavAction::Ignored,
            },
            NavKey::Cancel => {
                self.close();
                NavAction::Cancel
            }
            NavKey::Tab => {
                self.close();
                NavAction::Dismiss
            }
            NavKey::Erase => {
                if self.pop_char() {
                    NavAction::QueryChanged
                } else {
                    NavAction::RemoveLast
                }
            }
            NavKey::ClearQuery => {
                if self.query().is_empty() {
                    NavAction::Ignored
                } else {
                    self.set_query("");
                    NavAction::QueryChanged
                }
            }
            NavKey::Char(c) => {
                self.push_char(c);
                NavAction::QueryChanged
            }
        }
    }
}
