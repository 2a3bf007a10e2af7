//! Single-value select with a search box in its panel.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::navigator::Seed;
use super::option::{find_option, MatchFn, SelectOption};
use super::picker::{Marker, Outcome, Picker};
use super::pointer::PointerListeners;
use super::popover::PopoverFocus;
use super::selection::{SelectionMode, SelectionValue};
use crate::events::KeyBindings;
use crate::ui::theme::theme;

/// Action resulting from select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectAction {
    /// The selected value changed.
    Change(Option<String>),
    /// Escape closed the panel.
    Cancel,
    /// Tab closed the panel.
    Dismiss,
}

fn to_action(outcome: Outcome) -> SelectAction {
    match outcome {
        Outcome::Changed(value) | Outcome::Created { value, .. } => {
            SelectAction::Change(value.as_slice().first().cloned())
        }
        Outcome::Cancelled => SelectAction::Cancel,
        Outcome::Dismissed => SelectAction::Dismiss,
    }
}

/// Searchable single select.
#[derive(Debug)]
pub struct SearchableSelect {
    picker: Picker,
    label: String,
    placeholder: String,
}

impl SearchableSelect {
    /// Create a select with no options.
    pub fn new(label: impl Into<String>, listeners: &PointerListeners) -> Self {
        let mut picker = Picker::new(SelectionMode::Single, listeners);
        picker.marker = Marker::Check;
        Self {
            picker,
            label: label.into(),
            placeholder: "Select...".to_string(),
        }
    }

    /// Replace the options. The highlight is kept in range.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.picker.set_options(options);
    }

    /// Supply the owner's value. `None` returns to uncontrolled.
    pub fn set_value(&mut self, value: Option<String>) {
        self.picker
            .set_value(value.map(|v| SelectionValue::Single(Some(v))));
    }

    /// The effective selected value.
    pub fn value(&self) -> Option<&str> {
        self.picker.selection.values().first().map(String::as_str)
    }

    /// Label of the selected option, if it still exists.
    pub fn selected_label(&self) -> Option<&str> {
        self.value()
            .and_then(|v| find_option(&self.picker.options, v))
            .map(|o| o.label.as_str())
    }

    /// Set the text shown when nothing is selected.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Set the search input placeholder.
    pub fn set_search_placeholder(&mut self, placeholder: impl Into<String>) {
        self.picker.search_placeholder = placeholder.into();
    }

    /// Set the text shown when no option matches.
    pub fn set_empty_text(&mut self, text: impl Into<String>) {
        self.picker.empty_text = text.into();
    }

    /// Disable all interaction. Closes the panel.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.picker.set_disabled(disabled);
    }

    /// Replace the option matcher.
    pub fn set_matcher(&mut self, matcher: MatchFn) {
        self.picker.set_matcher(matcher);
    }

    /// Set the key bindings.
    pub fn set_key_bindings(&mut self, bindings: KeyBindings) {
        self.picker.bindings = bindings;
    }

    /// Set how many rows the panel shows before scrolling.
    pub fn set_max_visible(&mut self, rows: usize) {
        self.picker.max_visible = rows;
    }

    /// Check if the panel is open.
    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    /// The current search text.
    pub fn query(&self) -> &str {
        self.picker.nav.query()
    }

    /// Where keyboard focus sits.
    pub fn focus(&self) -> PopoverFocus {
        self.picker.focus()
    }

    /// Options matching the current search text.
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        self.picker.visible_options()
    }

    /// Open the panel. Returns false if disabled.
    pub fn open(&mut self) -> bool {
        self.picker.open(Seed::First)
    }

    /// Close the panel, keeping the value.
    pub fn close(&mut self) {
        self.picker.close();
    }

    /// Select a value as if it had been picked from the list.
    pub fn select(&mut self, value: &str) -> Option<SelectAction> {
        if self.picker.disabled {
            return None;
        }
        self.picker.select_value(value).map(to_action)
    }

    /// Clear the value.
    pub fn clear(&mut self) -> Option<SelectAction> {
        self.picker.clear().map(to_action)
    }

    /// Close the panel if an outside click dismissed it since the last poll.
    pub fn poll_dismissal(&mut self) -> bool {
        self.picker.poll_dismissal()
    }

    /// Check if `position` is on the trigger or the open panel.
    pub fn contains(&self, position: Position) -> bool {
        self.picker.popover.trigger().contains(position) || self.picker.panel_contains(position)
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<SelectAction> {
        self.picker.handle_key(key).map(to_action)
    }

    /// Handle mouse input.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<SelectAction> {
        if self.picker.disabled || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let position = Position::new(mouse.column, mouse.row);
        if let Some(outcome) = self.picker.click_row(position) {
            return outcome.map(to_action);
        }
        if self.picker.popover.trigger().contains(position) {
            if self.is_open() {
                self.close();
            } else {
                self.open();
            }
        }
        None
    }

    /// Render the trigger.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        self.picker.popover.set_trigger(area);

        let border_style = if self.picker.disabled {
            Style::default().fg(t.disabled)
        } else if focused || self.is_open() {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.border)
        };
        let title_style = if focused {
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.fg)
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let (text, style) = match self.selected_label() {
            Some(label) if self.picker.disabled => (label.to_string(), Style::default().fg(t.disabled)),
            Some(label) => (label.to_string(), Style::default().fg(t.input_fg)),
            None => (self.placeholder.clone(), Style::default().fg(t.input_placeholder)),
        };
        let indicator = if self.is_open() { " ▲" } else { " ▼" };
        let line = Line::from(vec![
            Span::styled(text, style),
            Span::styled(indicator, Style::default().fg(t.muted)),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    /// Render the panel, if open.
    pub fn render_panel(&mut self, frame: &mut Frame, screen: Rect) {
        self.picker.render_panel(frame, screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn statuses(listeners: &PointerListeners) -> SearchableSelect {
        let mut select = SearchableSelect::new("Status", listeners);
        select.set_options(vec![
            SelectOption::new("todo", "To Do"),
            SelectOption::new("doing", "In Progress"),
            SelectOption::new("done", "Done"),
        ]);
        select
    }

    #[test]
    fn test_search_and_select() {
        let listeners = PointerListeners::new();
        let mut select = statuses(&listeners);

        select.handle_input(key(KeyCode::Enter));
        assert!(select.is_open());
        for c in "prog".chars() {
            select.handle_input(key(KeyCode::Char(c)));
        }
        assert_eq!(select.visible_options().len(), 1);

        let action = select.handle_input(key(KeyCode::Enter));
        assert_eq!(action, Some(SelectAction::Change(Some("doing".into()))));
        assert_eq!(select.value(), Some("doing"));
        assert_eq!(select.selected_label(), Some("In Progress"));
        assert!(!select.is_open());
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let listeners = PointerListeners::new();
        let mut select = statuses(&listeners);
        select.select("todo");
        assert_eq!(select.select("todo"), None);
    }

    #[test]
    fn test_controlled_value() {
        let listeners = PointerListeners::new();
        let mut select = statuses(&listeners);
        select.set_value(Some("done".into()));
        assert_eq!(select.value(), Some("done"));

        assert_eq!(select.select("todo"), Some(SelectAction::Change(Some("todo".into()))));
        assert_eq!(select.value(), Some("done"));

        select.set_value(None);
        assert_eq!(select.value(), Some("todo"));
    }

    #[test]
    fn test_clear_reports_none() {
        let listeners = PointerListeners::new();
        let mut select = statuses(&listeners);
        select.select("todo");
        assert_eq!(select.clear(), Some(SelectAction::Change(None)));
        assert_eq!(select.value(), None);
    }

    #[test]
    fn test_two_open_selects_dismiss_independently() {
        let listeners = PointerListeners::new();
        let mut left = statuses(&listeners);
        let mut right = statuses(&listeners);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        left.open();
        right.open();
        assert_eq!(listeners.len(), 2);
        terminal
            .draw(|frame| {
                let screen = frame.area();
                left.render(frame, Rect::new(0, 0, 30, 3), false);
                right.render(frame, Rect::new(40, 0, 30, 3), false);
                left.render_panel(frame, screen);
                right.render_panel(frame, screen);
            })
            .unwrap();

        // A click inside the right panel is outside the left control only.
        listeners.dispatch(&MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 45,
            row: 5,
            modifiers: KeyModifiers::NONE,
        });
        assert!(left.poll_dismissal());
        assert!(!right.poll_dismissal());
        assert!(!left.is_open());
        assert!(right.is_open());
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn test_render_shows_label_and_search_cursor() {
        let listeners = PointerListeners::new();
        let mut select = statuses(&listeners);
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        select.select("done");
        select.open();

        terminal
            .draw(|frame| {
                let screen = frame.area();
                select.render(frame, Rect::new(0, 0, 30, 3), true);
                select.render_panel(frame, screen);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let trigger: String = (0..30).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert!(trigger.contains("Done"));
        let search: String = (0..30).map(|x| buffer[(x, 4)].symbol().to_string()).collect();
        assert!(search.contains("Search..."));
        assert_eq!(select.focus(), PopoverFocus::Panel);
    }

    #[test]
    fn test_selected_row_has_checkmark() {
        let listeners = PointerListeners::new();
        let mut select = statuses(&listeners);
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        select.select("done");
        select.open();

        terminal
            .draw(|frame| {
                let screen = frame.area();
                select.render(frame, Rect::new(0, 0, 30, 3), true);
                select.render_panel(frame, screen);
            })
            .unwrap();

        // Border at row 3, search line at row 4, options below.
        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (5..8)
            .map(|y| {
                let line: String = (0..30).map(|x| buffer[(x, y)].symbol().to_string()).collect();
                line.trim_start_matches('│').to_string()
            })
            .collect();
        assert!(rows[0].starts_with("  To Do"));
        assert!(rows[1].starts_with("  In Progress"));
        assert!(rows[2].starts_with("✓ Done"));
        assert_eq!(rows.iter().filter(|row| row.contains('✓')).count(), 1);
    }
}
