//! Shared core of the searchable selection controls.
//!
//! [`Picker`] connects the option filter, the selection, the navigator and
//! the popover. `Combobox`, `SearchableSelect` and `TagInput` wrap it and
//! only differ in how the trigger is drawn and how outcomes are reported.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::debug;

use super::navigator::{NavAction, Navigator, Seed};
use super::option::{filter_indices, matches_label, MatchFn, SelectOption};
use super::pointer::PointerListeners;
use super::popover::{Popover, PopoverFocus};
use super::selection::{Selection, SelectionMode, SelectionValue};
use crate::events::KeyBindings;
use crate::ui::theme::theme;

/// Default number of rows shown before the list scrolls.
pub const DEFAULT_MAX_VISIBLE: usize = 8;

/// A row of the open panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Row {
    /// An option, by index into the option list.
    Option(usize),
    /// The "create" affordance for the trimmed query.
    Create(String),
}

/// How committed rows are marked in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    /// A checkmark on selected rows.
    Check,
    /// A checkbox on every row.
    Checkbox,
    /// Nothing.
    None,
}

/// What a picker interaction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The committed selection changed.
    Changed(SelectionValue),
    /// A new value was created from the query and committed.
    Created {
        /// The created value.
        tag: String,
        /// The selection after the commit.
        value: SelectionValue,
    },
    /// Escape closed the panel.
    Cancelled,
    /// Tab closed the panel.
    Dismissed,
}

#[derive(Debug)]
pub(crate) struct Picker {
    pub(crate) options: Vec<SelectOption>,
    pub(crate) selection: Selection,
    pub(crate) nav: Navigator,
    pub(crate) popover: Popover,
    pub(crate) matcher: MatchFn,
    pub(crate) bindings: KeyBindings,
    pub(crate) disabled: bool,
    /// Hide committed options from the list.
    pub(crate) hide_selected: bool,
    /// Offer to create a value from unmatched text.
    pub(crate) allow_create: bool,
    /// Backspace on an empty query removes the last value.
    pub(crate) backspace_removes: bool,
    /// Draw the search input at the top of the panel.
    pub(crate) search_in_panel: bool,
    pub(crate) marker: Marker,
    pub(crate) max_visible: usize,
    pub(crate) search_placeholder: String,
    pub(crate) empty_text: String,
    row_regions: Vec<(Rect, usize)>,
}

impl Picker {
    pub(crate) fn new(mode: SelectionMode, listeners: &PointerListeners) -> Self {
        Self {
            options: Vec::new(),
            selection: Selection::new(mode),
            nav: Navigator::new(),
            popover: Popover::new(listeners),
            matcher: matches_label,
            bindings: KeyBindings::default(),
            disabled: false,
            hide_selected: false,
            allow_create: false,
            backspace_removes: false,
            search_in_panel: true,
            marker: Marker::Check,
            max_visible: DEFAULT_MAX_VISIBLE,
            search_placeholder: "Search...".to_string(),
            empty_text: "No results found.".to_string(),
            row_regions: Vec::new(),
        }
    }

    pub(crate) fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
        self.clamp_highlight();
    }

    /// Supply the owner's value. The visible rows may change with it.
    pub(crate) fn set_value(&mut self, value: Option<SelectionValue>) {
        self.selection.set_controlled(value);
        self.clamp_highlight();
    }

    pub(crate) fn set_matcher(&mut self, matcher: MatchFn) {
        self.matcher = matcher;
        self.clamp_highlight();
    }

    /// Keep the highlight inside the current rows.
    fn clamp_highlight(&mut self) {
        let len = self.visible_rows().len();
        self.nav.clamp(len);
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close();
        }
        self.popover.set_disabled(disabled);
    }

    /// Rows of the panel for the current query.
    pub(crate) fn visible_rows(&self) -> Vec<Row> {
        let mut rows: Vec<Row> = filter_indices(&self.options, self.nav.query(), self.matcher)
            .into_iter()
            .filter(|&i| !(self.hide_selected && self.selection.contains(&self.options[i].value)))
            .map(Row::Option)
            .collect();
        if let Some(tag) = self.create_candidate() {
            rows.push(Row::Create(tag));
        }
        rows
    }

    /// Options visible for the current query.
    pub(crate) fn visible_options(&self) -> Vec<&SelectOption> {
        self.visible_rows()
            .into_iter()
            .filter_map(|row| match row {
                Row::Option(i) => Some(&self.options[i]),
                Row::Create(_) => None,
            })
            .collect()
    }

    /// The trimmed query, if it can become a new value.
    pub(crate) fn create_candidate(&self) -> Option<String> {
        if !self.allow_create {
            return None;
        }
        let text = self.nav.query().trim();
        if text.is_empty() || self.selection.contains(text) {
            return None;
        }
        let lower = text.to_lowercase();
        let exists = self
            .options
            .iter()
            .any(|o| o.label.to_lowercase() == lower || o.value.to_lowercase() == lower);
        (!exists).then(|| text.to_string())
    }

    pub(crate) fn is_open(&self) -> bool {
        self.nav.is_open()
    }

    pub(crate) fn focus(&self) -> PopoverFocus {
        self.popover.focus()
    }

    /// Open the panel. Returns false if the control refuses.
    pub(crate) fn open(&mut self, seed: Seed) -> bool {
        if self.disabled || !self.popover.open() {
            return false;
        }
        let len = self.visible_rows().len();
        self.nav.open(seed, len);
        debug!(rows = len, "Selection panel opened");
        true
    }

    /// Close the panel. Selection is left alone.
    pub(crate) fn close(&mut self) {
        if self.nav.is_open() {
            debug!("Selection panel closed");
        }
        self.nav.close();
        self.popover.close();
        self.row_regions.clear();
    }

    /// Close the panel if an outside click dismissed it.
    pub(crate) fn poll_dismissal(&mut self) -> bool {
        if self.popover.take_outside_dismissal() {
            self.close();
            return true;
        }
        false
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        if self.disabled {
            return None;
        }
        self.clamp_highlight();
        let rows = self.visible_rows();
        match self.nav.handle_key(key, rows.len(), &self.bindings) {
            NavAction::Open(seed) => {
                self.open(seed);
                None
            }
            NavAction::OpenTyping(c) => {
                if self.open(Seed::First) {
                    self.nav.push_char(c);
                }
                None
            }
            NavAction::Commit(index) => rows.get(index).cloned().and_then(|row| self.commit(row)),
            NavAction::Cancel => {
                self.close();
                Some(Outcome::Cancelled)
            }
            NavAction::Dismiss => {
                self.close();
                Some(Outcome::Dismissed)
            }
            NavAction::RemoveLast if self.backspace_removes => {
                self.selection.remove_last().map(Outcome::Changed)
            }
            NavAction::Highlight(_)
            | NavAction::QueryChanged
            | NavAction::RemoveLast
            | NavAction::Ignored => None,
        }
    }

    /// Commit a panel row.
    pub(crate) fn commit(&mut self, row: Row) -> Option<Outcome> {
        let (value, created) = match row {
            Row::Option(index) => {
                let option = self.options.get(index)?;
                if option.disabled {
                    return None;
                }
                (option.value.clone(), false)
            }
            Row::Create(tag) => (tag, true),
        };

        let outcome = self.selection.select(&value);
        debug!(value = %value, changed = outcome.changed.is_some(), "Selection committed");
        if outcome.close_panel {
            self.close();
        } else {
            self.nav.set_query("");
        }

        let changed = outcome.changed?;
        Some(if created {
            Outcome::Created {
                tag: value,
                value: changed,
            }
        } else {
            Outcome::Changed(changed)
        })
    }

    /// Commit a value by id, as if its row had been chosen.
    pub(crate) fn select_value(&mut self, value: &str) -> Option<Outcome> {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => self.commit(Row::Option(index)),
            None => {
                let outcome = self.selection.select(value);
                if outcome.close_panel {
                    self.close();
                }
                outcome.changed.map(Outcome::Changed)
            }
        }
    }

    pub(crate) fn deselect(&mut self, value: &str) -> Option<Outcome> {
        if self.disabled {
            return None;
        }
        self.selection.deselect(value).map(Outcome::Changed)
    }

    pub(crate) fn clear(&mut self) -> Option<Outcome> {
        if self.disabled {
            return None;
        }
        self.selection.clear().map(Outcome::Changed)
    }

    /// Commit the panel row under `position`, if any.
    pub(crate) fn click_row(&mut self, position: Position) -> Option<Option<Outcome>> {
        let &(_, index) = self
            .row_regions
            .iter()
            .find(|(rect, _)| rect.contains(position))?;
        let row = self.visible_rows().get(index).cloned()?;
        Some(self.commit(row))
    }

    /// Check whether `position` falls in the open panel.
    pub(crate) fn panel_contains(&self, position: Position) -> bool {
        self.popover.panel().is_some_and(|panel| panel.contains(position))
    }

    /// Draw the open panel. Call after the trigger has been drawn.
    pub(crate) fn render_panel(&mut self, frame: &mut Frame, screen: Rect) {
        self.row_regions.clear();
        if !self.nav.is_open() {
            return;
        }
        self.clamp_highlight();
        let t = theme();
        let rows = self.visible_rows();

        let list_height = rows.len().clamp(1, self.max_visible.max(1)) as u16;
        let search_height = u16::from(self.search_in_panel);
        let area = self.popover.layout(screen, list_height + search_height + 2);
        let inner = self.popover.render_frame(frame, area);
        if inner.is_empty() {
            return;
        }

        let mut list_area = inner;
        if self.search_in_panel {
            let search_area = Rect::new(inner.x, inner.y, inner.width, 1);
            let query = self.nav.query();
            let line = if query.is_empty() {
                Line::from(vec![
                    Span::styled("/ ", Style::default().fg(t.accent)),
                    Span::styled(self.search_placeholder.clone(), Style::default().fg(t.input_placeholder)),
                ])
            } else {
                Line::from(vec![
                    Span::styled("/ ", Style::default().fg(t.accent)),
                    Span::styled(query.to_string(), Style::default().fg(t.input_fg)),
                ])
            };
            frame.render_widget(Paragraph::new(line), search_area);

            if self.popover.focus() == PopoverFocus::Panel {
                let cursor_x = search_area.x + 2 + Span::raw(query).width() as u16;
                if cursor_x < search_area.right() {
                    frame.set_cursor_position(Position::new(cursor_x, search_area.y));
                }
            }
            list_area = Rect::new(inner.x, inner.y + 1, inner.width, inner.height.saturating_sub(1));
        }

        if rows.is_empty() {
            let empty = Paragraph::new(self.empty_text.clone()).style(Style::default().fg(t.muted));
            frame.render_widget(empty, list_area);
            return;
        }

        let items: Vec<ListItem> = rows.iter().map(|row| self.row_item(row)).collect();
        let list = List::new(items)
            .style(Style::default().bg(t.bg).fg(t.fg))
            .highlight_style(
                Style::default()
                    .fg(t.highlight_fg)
                    .bg(t.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        state.select(self.nav.highlighted());
        frame.render_stateful_widget(list, list_area, &mut state);

        let offset = state.offset();
        for line in 0..list_area.height as usize {
            let index = offset + line;
            if index >= rows.len() {
                break;
            }
            let rect = Rect::new(list_area.x, list_area.y + line as u16, list_area.width, 1);
            self.row_regions.push((rect, index));
        }
    }

    fn row_item(&self, row: &Row) -> ListItem<'static> {
        let t = theme();
        match row {
            Row::Option(index) => {
                let option = &self.options[*index];
                let selected = self.selection.contains(&option.value);
                let marker = match (self.marker, selected) {
                    (Marker::Check, true) => "✓ ",
                    (Marker::Check, false) => "  ",
                    (Marker::Checkbox, true) => "[x] ",
                    (Marker::Checkbox, false) => "[ ] ",
                    (Marker::None, _) => "",
                };

                let label_style = if option.disabled {
                    Style::default().fg(t.disabled)
                } else if selected {
                    Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(t.fg)
                };

                let mut spans = vec![Span::styled(marker, label_style)];
                if let Some(icon) = &option.icon {
                    spans.push(Span::styled(format!("{} ", icon), label_style));
                }
                spans.push(Span::styled(option.label.clone(), label_style));
                if let Some(description) = &option.description {
                    spans.push(Span::styled(format!("  {}", description), Style::default().fg(t.muted)));
                }
                ListItem::new(Line::from(spans))
            }
            Row::Create(tag) => ListItem::new(Line::from(vec![
                Span::styled("+ Create ", Style::default().fg(t.accent)),
                Span::styled(format!("\"{}\"", tag), Style::default().fg(t.fg).add_modifier(Modifier::BOLD)),
            ])),
        }
    }
}
