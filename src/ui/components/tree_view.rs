//! Hierarchical list with expandable nodes and single or multi selection.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use tracing::debug;

use super::selection::{Selection, SelectionMode, SelectionValue};
use crate::events::KeyBindings;
use crate::ui::theme::theme;

/// Width of one indentation level, which is also the expander width.
const INDENT: u16 = 2;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Unique identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Optional glyph drawn before the label.
    pub icon: Option<String>,
    /// Disabled nodes cannot be selected.
    pub disabled: bool,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            disabled: false,
            children: Vec::new(),
        }
    }

    /// Set the glyph drawn before the label.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Mark the node as not selectable.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the child nodes.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Check if the node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Action resulting from tree input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    /// The selected ids changed.
    Change(Vec<String>),
    /// A node was expanded.
    Expand(String),
    /// A node was collapsed.
    Collapse(String),
}

/// A node as it appears in the flattened, visible list.
#[derive(Debug, Clone, Copy)]
struct VisibleNode<'a> {
    node: &'a TreeNode,
    depth: u16,
    parent: Option<usize>,
}

/// Tree view component.
#[derive(Debug)]
pub struct TreeView {
    title: String,
    nodes: Vec<TreeNode>,
    expanded: HashSet<String>,
    selection: Selection,
    multi_select: bool,
    cursor: usize,
    disabled: bool,
    bindings: KeyBindings,
    list_state: ListState,
    /// Row areas from the last render, with the row index and depth.
    row_regions: Vec<(Rect, usize, u16)>,
}

impl TreeView {
    /// Create an empty single-select tree.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: Vec::new(),
            expanded: HashSet::new(),
            selection: Selection::new(SelectionMode::Multiple),
            multi_select: false,
            cursor: 0,
            disabled: false,
            bindings: KeyBindings::default(),
            list_state: ListState::default(),
            row_regions: Vec::new(),
        }
    }

    /// Replace the nodes. The cursor is kept in range.
    pub fn set_nodes(&mut self, nodes: Vec<TreeNode>) {
        self.nodes = nodes;
        self.cursor = self.cursor.min(self.visible().len().saturating_sub(1));
    }

    /// Allow more than one selected node.
    pub fn set_multi_select(&mut self, multi_select: bool) {
        self.multi_select = multi_select;
    }

    /// Disable selection and expansion.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Set the key bindings.
    pub fn set_key_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Supply the owner's selection. `None` returns to uncontrolled.
    pub fn set_value(&mut self, ids: Option<Vec<String>>) {
        self.selection.set_controlled(ids.map(SelectionValue::Multiple));
    }

    /// The effective selected ids.
    pub fn value(&self) -> &[String] {
        self.selection.values()
    }

    /// Check if a node is in the effective selection.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Check if a node is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Id of the node under the cursor.
    pub fn cursor_id(&self) -> Option<&str> {
        self.visible().get(self.cursor).map(|v| v.node.id.as_str())
    }

    /// Ids of the visible rows, top to bottom.
    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible().iter().map(|v| v.node.id.as_str()).collect()
    }

    fn find(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.iter().find_map(|node| node.find(id))
    }

    fn visible(&self) -> Vec<VisibleNode<'_>> {
        fn walk<'a>(
            nodes: &'a [TreeNode],
            depth: u16,
            parent: Option<usize>,
            expanded: &HashSet<String>,
            out: &mut Vec<VisibleNode<'a>>,
        ) {
            for node in nodes {
                let index = out.len();
                out.push(VisibleNode { node, depth, parent });
                if expanded.contains(&node.id) {
                    walk(&node.children, depth + 1, Some(index), expanded, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, 0, None, &self.expanded, &mut out);
        out
    }

    /// Toggle a node's selection.
    ///
    /// In single mode the selection becomes exactly `[id]`; toggling the
    /// only selected node again changes nothing.
    pub fn toggle(&mut self, id: &str) -> Option<TreeAction> {
        if self.disabled || self.find(id).map_or(true, |node| node.disabled) {
            return None;
        }
        let changed = if self.multi_select {
            self.selection.select(id).changed
        } else if matches!(self.selection.values(), [only] if only == id) {
            None
        } else {
            self.selection.replace(SelectionValue::Multiple(vec![id.to_string()]))
        };
        debug!(node = id, changed = changed.is_some(), "Tree selection toggled");
        changed.map(|value| TreeAction::Change(value.as_slice().to_vec()))
    }

    /// Expand a node with children.
    pub fn expand(&mut self, id: &str) -> Option<TreeAction> {
        if !self.find(id).is_some_and(TreeNode::has_children) {
            return None;
        }
        self.expanded
            .insert(id.to_string())
            .then(|| TreeAction::Expand(id.to_string()))
    }

    /// Collapse a node.
    pub fn collapse(&mut self, id: &str) -> Option<TreeAction> {
        let cursor_id = self.cursor_id().map(str::to_string);
        if !self.expanded.remove(id) {
            return None;
        }
        // The cursor follows its node, or lands on the collapsed node if its
        // row was hidden.
        let visible = self.visible();
        let find = |target: &str| visible.iter().position(|v| v.node.id == target);
        let cursor = cursor_id
            .as_deref()
            .and_then(find)
            .or_else(|| find(id))
            .unwrap_or(self.cursor.min(visible.len().saturating_sub(1)));
        self.cursor = cursor;
        Some(TreeAction::Collapse(id.to_string()))
    }

    /// Expand a collapsed node or collapse an expanded one.
    pub fn toggle_expanded(&mut self, id: &str) -> Option<TreeAction> {
        if self.is_expanded(id) {
            self.collapse(id)
        } else {
            self.expand(id)
        }
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<TreeAction> {
        if self.disabled {
            return None;
        }
        let (id, has_children, parent, len) = {
            let visible = self.visible();
            let current = visible.get(self.cursor)?;
            (
                current.node.id.clone(),
                current.node.has_children(),
                current.parent,
                visible.len(),
            )
        };

        if self.bindings.is_down(&key) {
            self.cursor = (self.cursor + 1).min(len - 1);
            return None;
        }
        if self.bindings.is_up(&key) {
            self.cursor = self.cursor.saturating_sub(1);
            return None;
        }
        if self.bindings.is_right(&key) {
            if !has_children {
                return None;
            }
            if self.is_expanded(&id) {
                self.cursor += 1;
                return None;
            }
            return self.expand(&id);
        }
        if self.bindings.is_left(&key) {
            if self.is_expanded(&id) {
                return self.collapse(&id);
            }
            if let Some(parent) = parent {
                self.cursor = parent;
            }
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Home, _) => {
                self.cursor = 0;
                None
            }
            (KeyCode::End, _) => {
                self.cursor = len - 1;
                None
            }
            (KeyCode::Enter, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => self.toggle(&id),
            _ => None,
        }
    }

    /// Handle mouse input.
    ///
    /// A click on the expander glyph expands or collapses; anywhere else on
    /// the row toggles selection.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<TreeAction> {
        if self.disabled || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let position = Position::new(mouse.column, mouse.row);
        let &(rect, index, depth) = self
            .row_regions
            .iter()
            .find(|(rect, _, _)| rect.contains(position))?;
        let node = self.visible().get(index).map(|v| (v.node.id.clone(), v.node.has_children()));
        let (id, has_children) = node?;

        self.cursor = index;
        let expander_x = rect.x + depth * INDENT;
        if has_children && (expander_x..expander_x + INDENT).contains(&position.x) {
            self.toggle_expanded(&id)
        } else {
            self.toggle(&id)
        }
    }

    /// Check whether `position` is inside the last rendered area.
    pub fn contains(&self, position: Position) -> bool {
        self.row_regions.iter().any(|(rect, _, _)| rect.contains(position))
    }

    /// Render the tree.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        let border_style = if self.disabled {
            Style::default().fg(t.disabled)
        } else if focused {
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
            .title(Span::styled(format!(" {} ", self.title), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);

        let visible = self.visible();
        let items: Vec<ListItem> = visible.iter().map(|v| self.row_item(v)).collect();
        let depths: Vec<u16> = visible.iter().map(|v| v.depth).collect();
        let list = List::new(items).block(block).highlight_style(if focused {
            Style::default().fg(t.highlight_fg).bg(t.highlight_bg)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        });

        self.list_state
            .select((!depths.is_empty()).then_some(self.cursor));
        frame.render_stateful_widget(list, area, &mut self.list_state);

        self.row_regions.clear();
        let offset = self.list_state.offset();
        for line in 0..inner.height as usize {
            let index = offset + line;
            let Some(&depth) = depths.get(index) else {
                break;
            };
            let rect = Rect::new(inner.x, inner.y + line as u16, inner.width, 1);
            self.row_regions.push((rect, index, depth));
        }
    }

    fn row_item(&self, visible: &VisibleNode<'_>) -> ListItem<'static> {
        let t = theme();
        let node = visible.node;
        let selected = self.selection.contains(&node.id);

        let expander = if !node.has_children() {
            "  "
        } else if self.is_expanded(&node.id) {
            "▾ "
        } else {
            "▸ "
        };
        let style = if node.disabled {
            Style::default().fg(t.disabled)
        } else if selected {
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.fg)
        };

        let mut spans = vec![
            Span::raw(" ".repeat((visible.depth * INDENT) as usize)),
            Span::styled(expander, Style::default().fg(t.muted)),
        ];
        if self.multi_select {
            spans.push(Span::styled(if selected { "[x] " } else { "[ ] " }, style));
        } else {
            spans.push(Span::styled(if selected { "✓ " } else { "  " }, style));
        }
        if let Some(icon) = &node.icon {
            spans.push(Span::styled(format!("{} ", icon), style));
        }
        spans.push(Span::styled(node.label.clone(), style));
        ListItem::new(Line::from(spans))
    }
}
