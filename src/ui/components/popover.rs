//! Floating panel anchored to a trigger area.
//!
//! The popover owns the outside-click listener while it is open and works
//! out where the panel goes. It draws nothing itself beyond the panel
//! frame; the owning control fills the inside.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear},
    Frame,
};
use tracing::trace;

use super::pointer::{ListenerGuard, PointerListeners};
use crate::ui::theme::theme;

/// Vertical placement of the panel relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Below when it fits, otherwise wherever there is more room.
    #[default]
    Auto,
    /// Always below.
    Below,
    /// Always above.
    Above,
}

/// Horizontal alignment of the panel relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left edges line up.
    #[default]
    Start,
    /// Right edges line up.
    End,
}

/// Which part of the control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopoverFocus {
    /// The trigger.
    #[default]
    Trigger,
    /// The panel's search input.
    Panel,
}

/// Popover host.
#[derive(Debug)]
pub struct Popover {
    listeners: PointerListeners,
    listener: Option<ListenerGuard>,
    placement: Placement,
    align: Align,
    width: Option<u16>,
    disabled: bool,
    focus: PopoverFocus,
    trigger: Rect,
    panel: Option<Rect>,
}

impl Popover {
    /// Create a closed popover that registers with `listeners` when opened.
    pub fn new(listeners: &PointerListeners) -> Self {
        Self {
            listeners: listeners.clone(),
            listener: None,
            placement: Placement::default(),
            align: Align::default(),
            width: None,
            disabled: false,
            focus: PopoverFocus::default(),
            trigger: Rect::default(),
            panel: None,
        }
    }

    /// Set the vertical placement.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Set the horizontal alignment.
    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    /// Use a fixed panel width instead of the trigger's width.
    pub fn set_width(&mut self, width: Option<u16>) {
        self.width = width;
    }

    /// Disable the popover. Disabling an open popover closes it.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close();
        }
    }

    /// Check if the popover is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Check if the popover is open.
    pub fn is_open(&self) -> bool {
        self.listener.is_some()
    }

    /// Which part of the control has focus.
    pub fn focus(&self) -> PopoverFocus {
        self.focus
    }

    /// Open the popover. Returns false when disabled.
    pub fn open(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        // Release any previous registration before taking a new one.
        self.listener = None;
        self.listener = Some(self.listeners.listen());
        self.panel = None;
        self.focus = PopoverFocus::Panel;
        self.sync_regions();
        true
    }

    /// Close the popover and hand focus back to the trigger.
    ///
    /// Closing an already closed popover does nothing.
    pub fn close(&mut self) {
        if let Some(guard) = self.listener.take() {
            trace!(listener = guard.id(), "Popover closed");
        }
        self.panel = None;
        self.focus = PopoverFocus::Trigger;
    }

    /// Record the trigger area. Call on every render.
    pub fn set_trigger(&mut self, area: Rect) {
        self.trigger = area;
        self.sync_regions();
    }

    /// Get the trigger area from the last render.
    pub fn trigger(&self) -> Rect {
        self.trigger
    }

    /// Get the panel area from the last layout, if open.
    pub fn panel(&self) -> Option<Rect> {
        self.panel
    }

    /// Place the panel on `screen` for a panel of `height` rows.
    pub fn layout(&mut self, screen: Rect, height: u16) -> Rect {
        let area = panel_area(
            self.trigger,
            screen,
            height,
            self.width,
            self.placement,
            self.align,
        );
        self.panel = Some(area);
        self.sync_regions();
        area
    }

    /// Whether an outside click dismissed the popover since the last call.
    pub fn take_outside_dismissal(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|guard| guard.take_dismissed())
    }

    /// Clear the panel area and draw its frame. Returns the inner area.
    pub fn render_frame(&self, frame: &mut Frame, area: Rect) -> Rect {
        let t = theme();
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused))
            .style(Style::default().bg(t.bg).fg(t.fg));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }

    fn sync_regions(&self) {
        let Some(guard) = &self.listener else {
            return;
        };
        let regions: Vec<Rect> = [Some(self.trigger), self.panel]
            .into_iter()
            .flatten()
            .filter(|r| !r.is_empty())
            .collect();
        guard.set_regions(&regions);
    }
}

/// Compute the panel rectangle for a trigger.
///
/// The panel never overlaps the trigger and is clipped to `screen`.
pub fn panel_area(
    trigger: Rect,
    screen: Rect,
    height: u16,
    width: Option<u16>,
    placement: Placement,
    align: Align,
) -> Rect {
    let width = width.unwrap_or(trigger.width).min(screen.width);
    let x = match align {
        Align::Start => trigger.x,
        Align::End => trigger.right().saturating_sub(width),
    };
    let x = x.min(screen.right().saturating_sub(width)).max(screen.x);

    let space_below = screen.bottom().saturating_sub(trigger.bottom());
    let space_above = trigger.y.saturating_sub(screen.y);

    let below = match placement {
        Placement::Below => true,
        Placement::Above => false,
        Placement::Auto => space_below >= height || space_below >= space_above,
    };

    if below {
        Rect::new(x, trigger.bottom(), width, height.min(space_below))
    } else {
        let h = height.min(space_above);
        Rect::new(x, trigger.y - h, width, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_open_close_registers_and_releases() {
        let listeners = PointerListeners::new();
        let mut popover = Popover::new(&listeners);

        assert!(popover.open());
        assert!(popover.is_open());
        assert_eq!(popover.focus(), PopoverFocus::Panel);
        assert_eq!(listeners.len(), 1);

        popover.close();
        assert!(!popover.is_open());
        assert_eq!(popover.focus(), PopoverFocus::Trigger);
        assert!(listeners.is_empty());

        // Idempotent teardown.
        popover.close();
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_reopen_does_not_double_register() {
        let listeners = PointerListeners::new();
        let mut popover = Popover::new(&listeners);
        for _ in 0..5 {
            popover.open();
            popover.open();
            assert_eq!(listeners.len(), 1);
            popover.close();
        }
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_drop_releases_listener() {
        let listeners = PointerListeners::new();
        {
            let mut popover = Popover::new(&listeners);
            popover.open();
            assert_eq!(listeners.len(), 1);
        }
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_disabled_refuses_to_open() {
        let listeners = PointerListeners::new();
        let mut popover = Popover::new(&listeners);
        popover.set_disabled(true);
        assert!(!popover.open());
        assert!(!popover.is_open());
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_disabling_closes() {
        let listeners = PointerListeners::new();
        let mut popover = Popover::new(&listeners);
        popover.open();
        popover.set_disabled(true);
        assert!(!popover.is_open());
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_outside_click_dismissal() {
        let listeners = PointerListeners::new();
        let mut popover = Popover::new(&listeners);
        popover.set_trigger(Rect::new(0, 0, 20, 3));
        popover.open();
        popover.layout(Rect::new(0, 0, 80, 24), 6);

        // Inside the trigger and inside the panel.
        listeners.dispatch(&click(1, 1));
        listeners.dispatch(&click(1, 4));
        assert!(!popover.take_outside_dismissal());

        listeners.dispatch(&click(60, 10));
        assert!(popover.take_outside_dismissal());
    }

    #[test]
    fn test_closed_popover_never_reports_dismissal() {
        let listeners = PointerListeners::new();
        let popover = Popover::new(&listeners);
        listeners.dispatch(&click(60, 10));
        assert!(!popover.take_outside_dismissal());
    }

    #[test]
    fn test_panel_below_when_room() {
        let screen = Rect::new(0, 0, 80, 24);
        let trigger = Rect::new(5, 2, 30, 3);
        let area = panel_area(trigger, screen, 8, None, Placement::Auto, Align::Start);
        assert_eq!(area, Rect::new(5, 5, 30, 8));
    }

    #[test]
    fn test_panel_flips_above_near_bottom() {
        let screen = Rect::new(0, 0, 80, 24);
        let trigger = Rect::new(5, 19, 30, 3);
        let area = panel_area(trigger, screen, 8, None, Placement::Auto, Align::Start);
        assert_eq!(area, Rect::new(5, 11, 30, 8));
    }

    #[test]
    fn test_forced_placement_is_clipped() {
        let screen = Rect::new(0, 0, 80, 24);
        let trigger = Rect::new(0, 19, 30, 3);
        let area = panel_area(trigger, screen, 8, None, Placement::Below, Align::Start);
        assert_eq!(area, Rect::new(0, 22, 30, 2));
    }

    #[test]
    fn test_end_alignment_and_fixed_width() {
        let screen = Rect::new(0, 0, 80, 24);
        let trigger = Rect::new(40, 0, 30, 3);
        let area = panel_area(trigger, screen, 5, Some(20), Placement::Below, Align::End);
        assert_eq!(area, Rect::new(50, 3, 20, 5));
    }

    #[test]
    fn test_panel_kept_on_screen() {
        let screen = Rect::new(0, 0, 40, 24);
        let trigger = Rect::new(30, 0, 10, 3);
        let area = panel_area(trigger, screen, 5, Some(25), Placement::Below, Align::Start);
        assert_eq!(area.right(), 40);
        assert_eq!(area.width, 25);
    }
}
