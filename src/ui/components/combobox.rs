//! Combobox: a trigger plus a searchable option panel.
//!
//! Single mode shows the selected label on the trigger. Multi mode shows a
//! row of removable chips. The optional clear control empties the
//! selection without opening the panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
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
use super::popover::{Align, Placement, PopoverFocus};
use super::selection::{SelectionMode, SelectionValue};
use crate::events::KeyBindings;
use crate::ui::theme::theme;

/// Glyph for the clear control.
const CLEAR_GLYPH: &str = "×";

/// Action resulting from combobox input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboboxAction {
    /// The committed selection changed.
    Change(SelectionValue),
    /// Escape closed the panel.
    Cancel,
    /// Tab closed the panel.
    Dismiss,
}

impl ComboboxAction {
    fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Changed(value) | Outcome::Created { value, .. } => ComboboxAction::Change(value),
            Outcome::Cancelled => ComboboxAction::Cancel,
            Outcome::Dismissed => ComboboxAction::Dismiss,
        }
    }
}

/// Combobox component.
#[derive(Debug)]
pub struct Combobox {
    picker: Picker,
    /// Label drawn in the trigger's border.
    label: String,
    /// Text shown when nothing is selected.
    placeholder: String,
    /// Whether the clear control is shown.
    clearable: bool,
    chips: ChipRow,
    clear_area: Option<Rect>,
}

impl Combobox {
    /// Create a single-select combobox.
    pub fn new(label: impl Into<String>, listeners: &PointerListeners) -> Self {
        Self {
            picker: Picker::new(SelectionMode::Single, listeners),
            label: label.into(),
            placeholder: "Select...".to_string(),
            clearable: false,
            chips: ChipRow::default(),
            clear_area: None,
        }
    }

    /// Set the available options.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.picker.set_options(options);
    }

    /// Get the available options.
    pub fn options(&self) -> &[SelectOption] {
        &self.picker.options
    }

    /// Switch between single and multi select.
    pub fn set_multiple(&mut self, multiple: bool) {
        let mode = if multiple {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        };
        self.picker.selection.set_mode(mode);
        self.picker.marker = if multiple { Marker::Checkbox } else { Marker::Check };
    }

    /// Check if multi select is on.
    pub fn is_multiple(&self) -> bool {
        self.picker.selection.mode() == SelectionMode::Multiple
    }

    /// Supply the owner's value (`None` returns to uncontrolled).
    pub fn set_value(&mut self, value: Option<SelectionValue>) {
        self.picker.set_value(value);
    }

    /// The effective selection.
    pub fn value(&self) -> &SelectionValue {
        self.picker.selection.value()
    }

    /// Set the placeholder text.
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

    /// Show or hide the clear control.
    pub fn set_clearable(&mut self, clearable: bool) {
        self.clearable = clearable;
    }

    /// Disable all interaction.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.picker.set_disabled(disabled);
    }

    /// Check if the combobox is disabled.
    pub fn is_disabled(&self) -> bool {
        self.picker.disabled
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

    /// Set the panel placement.
    pub fn set_placement(&mut self, placement: Placement, align: Align) {
        self.picker.popover.set_placement(placement);
        self.picker.popover.set_align(align);
    }

    /// Check if the panel is open.
    pub fn is_open(&self) -> bool {
        self.picker.is_open()
    }

    /// Current search text.
    pub fn query(&self) -> &str {
        self.picker.nav.query()
    }

    /// Highlighted row, while open.
    pub fn highlighted(&self) -> Option<usize> {
        self.picker.nav.highlighted()
    }

    /// Where keyboard focus sits inside the control.
    pub fn focus(&self) -> PopoverFocus {
        self.picker.focus()
    }

    /// Options visible for the current query.
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        self.picker.visible_options()
    }

    /// Open the panel.
    pub fn open(&mut self) -> bool {
        self.picker.open(Seed::First)
    }

    /// Close the panel without committing.
    pub fn close(&mut self) {
        self.picker.close();
    }

    /// Commit a value as if it had been chosen from the panel.
    pub fn select(&mut self, value: &str) -> Option<ComboboxAction> {
        if self.picker.disabled {
            return None;
        }
        self.picker.select_value(value).map(ComboboxAction::from_outcome)
    }

    /// Remove a value.
    pub fn deselect(&mut self, value: &str) -> Option<ComboboxAction> {
        self.picker.deselect(value).map(ComboboxAction::from_outcome)
    }

    /// Empty the selection. Never opens the panel.
    pub fn clear(&mut self) -> Option<ComboboxAction> {
        self.picker.clear().map(ComboboxAction::from_outcome)
    }

    /// Close the panel if an outside click dismissed it.
    pub fn poll_dismissal(&mut self) -> bool {
        self.picker.poll_dismissal()
    }

    /// Check whether `position` is on the trigger or the open panel.
    pub fn contains(&self, position: Position) -> bool {
        self.picker.popover.trigger().contains(position) || self.picker.panel_contains(position)
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the parent.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ComboboxAction> {
        if self.picker.disabled {
            return None;
        }
        if !self.is_open() && self.clearable && (key.code, key.modifiers) == (KeyCode::Delete, KeyModifiers::NONE) {
            return self.clear();
        }
        self.picker.handle_key(key).map(ComboboxAction::from_outcome)
    }

    /// Handle mouse input.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<ComboboxAction> {
        if self.picker.disabled || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let position = Position::new(mouse.column, mouse.row);

        if let Some(outcome) = self.picker.click_row(position) {
            return outcome.map(ComboboxAction::from_outcome);
        }
        // Chip and clear controls sit on the trigger but must not toggle it.
        if let Some(value) = self.chips.close_hit(position).map(|slot| slot.value.clone()) {
            return self.deselect(&value);
        }
        if self.clear_area.is_some_and(|area| area.contains(position)) {
            return self.clear();
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

        let (border_style, title_style) = if self.picker.disabled {
            (Style::default().fg(t.disabled), Style::default().fg(t.disabled))
        } else if focused || self.is_open() {
            (
                Style::default().fg(t.border_focused),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default().fg(t.border), Style::default().fg(t.fg))
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.chips = ChipRow::default();
        self.clear_area = None;
        if inner.is_empty() {
            return;
        }

        // Indicator (and clear control) on the right edge.
        let indicator = if self.is_open() { "▲" } else { "▼" };
        let show_clear = self.clearable && !self.value().is_empty() && !self.picker.disabled;
        let controls_width: u16 = if show_clear { 4 } else { 2 };
        let content = Rect::new(inner.x, inner.y, inner.width.saturating_sub(controls_width), 1);
        let controls_x = inner.right().saturating_sub(controls_width);

        if show_clear {
            let clear = Rect::new(controls_x, inner.y, 1, 1);
            frame.render_widget(Span::styled(CLEAR_GLYPH, Style::default().fg(t.muted)), clear);
            self.clear_area = Some(clear);
        }
        frame.render_widget(
            Span::styled(indicator, Style::default().fg(t.muted)),
            Rect::new(inner.right().saturating_sub(1), inner.y, 1, 1),
        );

        if self.is_multiple() {
            let chips: Vec<(String, String)> = self
                .value()
                .as_slice()
                .iter()
                .filter_map(|v| find_option(&self.picker.options, v).map(|o| (v.clone(), o.label.clone())))
                .collect();
            if !chips.is_empty() {
                self.chips = layout_chips(content, &chips);
                render_chips(frame, &self.chips, content);
                return;
            }
        } else if let Some(option) = self
            .value()
            .as_slice()
            .first()
            .and_then(|v| find_option(&self.picker.options, v))
        {
            let style = if self.picker.disabled {
                Style::default().fg(t.disabled)
            } else {
                Style::default().fg(t.input_fg)
            };
            frame.render_widget(Paragraph::new(option.label.clone()).style(style), content);
            return;
        }

        frame.render_widget(
            Paragraph::new(self.placeholder.clone()).style(Style::default().fg(t.input_placeholder)),
            content,
        );
    }

    /// Render the panel on top of everything else, if open.
    pub fn render_panel(&mut self, frame: &mut Frame, screen: Rect) {
        self.picker.render_panel(frame, screen);
    }

    /// Get the label of this combobox.
    pub fn label(&self) -> &str {
        &self.label
    }
}
