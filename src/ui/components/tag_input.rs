//! Tag input: committed values as chips, with the search text inline.
//!
//! Typing while the panel is closed opens it. Options already chosen are
//! hidden from the list, and with creation enabled the trimmed text can be
//! committed as a brand new tag.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::chips::{layout_chips, render_chips, ChipRow};
use super::navigator::Seed;
use super::option::{find_option, MatchFn, SelectOption};
use super::picker::{Marker, Outcome, Picker};
use super::pointer::PointerListeners;
use super::popover::PopoverFocus;
use super::selection::{SelectionMode, SelectionValue};
use crate::events::KeyBindings;
use crate::ui::theme::theme;

/// Action resulting from tag input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagInputAction {
    /// The tag list changed.
    Change(Vec<String>),
    /// A new tag was created from the typed text and appended.
    Create {
        /// The new tag.
        tag: String,
        /// All tags after the append.
        tags: Vec<String>,
    },
    /// Escape closed the panel.
    Cancel,
    /// Tab closed the panel.
    Dismiss,
}

impl From<Outcome> for TagInputAction {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Changed(value) => TagInputAction::Change(value.as_slice().to_vec()),
            Outcome::Created { tag, value } => TagInputAction::Create {
                tag,
                tags: value.as_slice().to_vec(),
            },
            Outcome::Cancelled => TagInputAction::Cancel,
            Outcome::Dismissed => TagInputAction::Dismiss,
        }
    }
}

/// Multi-value tag input.
#[derive(Debug)]
pub struct TagInput {
    picker: Picker,
    label: String,
    placeholder: String,
    chips: ChipRow,
}

impl TagInput {
    /// Create a tag input with creation disabled.
    pub fn new(label: impl Into<String>, listeners: &PointerListeners) -> Self {
        let mut picker = Picker::new(SelectionMode::Multiple, listeners);
        picker.marker = Marker::None;
        picker.hide_selected = true;
        picker.backspace_removes = true;
        picker.search_in_panel = false;
        picker.nav.set_type_to_open(true);
        Self {
            picker,
            label: label.into(),
            placeholder: "Add tags...".to_string(),
            chips: ChipRow::default(),
        }
    }

    /// Replace the suggestions.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.picker.set_options(options);
    }

    /// Allow committing text that matches no option as a new tag.
    pub fn set_allow_create(&mut self, allow: bool) {
        self.picker.allow_create = allow;
    }

    /// Supply the owner's tags. `None` returns to uncontrolled.
    pub fn set_value(&mut self, tags: Option<Vec<String>>) {
        self.picker.set_value(tags.map(SelectionValue::Multiple));
    }

    /// The effective tags, in the order they were added.
    pub fn tags(&self) -> &[String] {
        self.picker.selection.values()
    }

    /// Set the text shown when there are no tags and no text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Set the text shown when no suggestion matches.
    pub fn set_empty_text(&mut self, text: impl Into<String>) {
        self.picker.empty_text = text.into();
    }

    /// Disable all interaction. Closes the panel.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.picker.set_disabled(disabled);
    }

    /// Replace the suggestion matcher.
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

    /// Check if the suggestion panel is open.
    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    /// The text typed so far.
    pub fn query(&self) -> &str {
        self.picker.nav.query()
    }

    /// Where keyboard focus sits.
    pub fn focus(&self) -> PopoverFocus {
        self.picker.focus()
    }

    /// Options still available for the current text.
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        self.picker.visible_options()
    }

    /// The tag the current text would create, if any.
    pub fn create_candidate(&self) -> Option<String> {
        self.picker.create_candidate()
    }

    /// Open the suggestion panel. Returns false if disabled.
    pub fn open(&mut self) -> bool {
        self.picker.open(Seed::First)
    }

    /// Close the panel, keeping the tags.
    pub fn close(&mut self) {
        self.picker.close();
    }

    /// Add a tag, or remove it if already present.
    pub fn toggle(&mut self, value: &str) -> Option<TagInputAction> {
        if self.picker.disabled {
            return None;
        }
        self.picker.select_value(value).map(TagInputAction::from)
    }

    /// Remove a tag.
    pub fn remove(&mut self, value: &str) -> Option<TagInputAction> {
        self.picker.deselect(value).map(TagInputAction::from)
    }

    /// Remove every tag.
    pub fn clear(&mut self) -> Option<TagInputAction> {
        self.picker.clear().map(TagInputAction::from)
    }

    /// Close the panel if an outside click dismissed it since the last poll.
    pub fn poll_dismissal(&mut self) -> bool {
        self.picker.poll_dismissal()
    }

    /// Check if `position` is on the input or the open panel.
    pub fn contains(&self, position: Position) -> bool {
        self.picker.popover.trigger().contains(position) || self.picker.panel_contains(position)
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<TagInputAction> {
        self.picker.handle_key(key).map(TagInputAction::from)
    }

    /// Handle mouse input.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<TagInputAction> {
        if self.picker.disabled || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let position = Position::new(mouse.column, mouse.row);
        if let Some(outcome) = self.picker.click_row(position) {
            return outcome.map(TagInputAction::from);
        }
        if let Some(value) = self.chips.close_hit(position).map(|slot| slot.value.clone()) {
            return self.remove(&value);
        }
        if self.picker.popover.trigger().contains(position) && !self.is_open() {
            self.open();
        }
        None
    }

    /// Render the chips and the inline text input.
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
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.is_empty() {
            self.chips = ChipRow::default();
            return;
        }

        // Created tags have no option; show the raw value.
        let chips: Vec<(String, String)> = self
            .tags()
            .iter()
            .map(|tag| {
                let label = find_option(&self.picker.options, tag)
                    .map(|o| o.label.clone())
                    .unwrap_or_else(|| tag.clone());
                (tag.clone(), label)
            })
            .collect();
        let row = Rect::new(inner.x, inner.y, inner.width, 1);
        self.chips = layout_chips(row, &chips);
        render_chips(frame, &self.chips, row);

        let text_x = if self.chips.hidden > 0 {
            // Leave room for the "+N" marker.
            self.chips.end_x + format!("+{} ", self.chips.hidden).len() as u16
        } else {
            self.chips.end_x
        };
        if text_x >= inner.right() {
            return;
        }
        let text_area = Rect::new(text_x, inner.y, inner.right() - text_x, 1);

        let query = self.picker.nav.query();
        if query.is_empty() {
            if chips.is_empty() {
                frame.render_widget(
                    Paragraph::new(self.placeholder.clone()).style(Style::default().fg(t.input_placeholder)),
                    text_area,
                );
            }
        } else {
            frame.render_widget(
                Paragraph::new(query.to_string()).style(Style::default().fg(t.input_fg)),
                text_area,
            );
        }

        if focused && !self.picker.disabled {
            let cursor_x = text_area.x + Span::raw(query).width() as u16;
            if cursor_x < text_area.right() {
                frame.set_cursor_position(Position::new(cursor_x, text_area.y));
            }
        }
    }

    /// Render the suggestion panel, if open.
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

    fn type_text(input: &mut TagInput, text: &str) {
        for c in text.chars() {
            input.handle_input(key(KeyCode::Char(c)));
        }
    }

    fn labels(listeners: &PointerListeners) -> TagInput {
        let mut input = TagInput::new("Labels", listeners);
        input.set_options(vec![
            SelectOption::new("bug", "bug"),
            SelectOption::new("feature", "feature"),
        ]);
        input
    }

    #[test]
    fn test_typing_opens_panel() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        type_text(&mut input, "fe");
        assert!(input.is_open());
        assert_eq!(input.query(), "fe");
        assert_eq!(input.visible_options().len(), 1);
    }

    #[test]
    fn test_create_tag() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        input.set_allow_create(true);
        type_text(&mut input, "urgent");
        assert_eq!(input.create_candidate(), Some("urgent".to_string()));

        let action = input.handle_input(key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(TagInputAction::Create {
                tag: "urgent".into(),
                tags: vec!["urgent".into()],
            })
        );
        assert_eq!(input.tags(), ["urgent".to_string()]);
        assert_eq!(input.query(), "");
        assert!(input.is_open());
    }

    #[test]
    fn test_no_create_row_for_existing_label() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        input.set_allow_create(true);
        type_text(&mut input, "BUG");
        assert_eq!(input.create_candidate(), None);
    }

    #[test]
    fn test_selected_options_are_hidden() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        input.toggle("bug");
        input.open();
        let visible: Vec<&str> = input.visible_options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(visible, vec!["feature"]);
    }

    #[test]
    fn test_owner_value_keeps_highlight_in_range() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        input.set_options(vec![
            SelectOption::new("bug", "bug"),
            SelectOption::new("feature", "feature"),
            SelectOption::new("docs", "docs"),
        ]);
        input.set_value(Some(Vec::new()));
        input.open();
        input.handle_input(key(KeyCode::Up));
        assert_eq!(input.picker.nav.highlighted(), Some(2));

        // The owner selects "docs", which hides its row.
        input.set_value(Some(vec!["docs".into()]));
        assert_eq!(input.visible_options().len(), 2);
        assert_eq!(input.picker.nav.highlighted(), Some(1));

        input.handle_input(key(KeyCode::Down));
        assert_eq!(input.picker.nav.highlighted(), Some(0));
    }

    #[test]
    fn test_backspace_removes_last_tag() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        input.toggle("bug");
        input.toggle("feature");

        let action = input.handle_input(key(KeyCode::Backspace));
        assert_eq!(action, Some(TagInputAction::Change(vec!["bug".into()])));

        // With text typed, backspace edits the text instead.
        type_text(&mut input, "x");
        assert_eq!(input.handle_input(key(KeyCode::Backspace)), None);
        assert_eq!(input.tags(), ["bug".to_string()]);
    }

    #[test]
    fn test_escape_keeps_tags() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        input.toggle("bug");
        type_text(&mut input, "fea");
        assert_eq!(input.handle_input(key(KeyCode::Esc)), Some(TagInputAction::Cancel));
        assert_eq!(input.query(), "");
        assert_eq!(input.tags(), ["bug".to_string()]);
    }

    #[test]
    fn test_render_created_chip_shows_raw_value() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        input.set_value(Some(vec!["bug".into(), "urgent".into()]));

        terminal
            .draw(|frame| input.render(frame, Rect::new(0, 0, 40, 3), true))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..40).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("bug"));
        assert!(row.contains("urgent"));
    }

    #[test]
    fn test_chip_click_removes_tag() {
        let listeners = PointerListeners::new();
        let mut input = labels(&listeners);
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        input.toggle("bug");
        input.toggle("feature");
        terminal
            .draw(|frame| input.render(frame, Rect::new(0, 0, 40, 3), false))
            .unwrap();

        // " bug × " starts at column 1, so its close control is at 1 + 3 + 2.
        let action = input.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 6,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(action, Some(TagInputAction::Change(vec!["feature".into()])));
        assert!(!input.is_open());
    }
}
