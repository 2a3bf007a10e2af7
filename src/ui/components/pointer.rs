//! Screen-wide pointer listeners used for outside-click dismissal.
//!
//! Every open popover holds a [`ListenerGuard`] registered with the shared
//! [`PointerListeners`]. The app feeds mouse events to
//! [`PointerListeners::dispatch`]. A press outside all of a listener's
//! regions marks that listener dismissed, and the popover picks this up on
//! its next poll. Dropping the guard removes the listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::trace;

/// Identifier of a registered listener.
pub type ListenerId = u64;

#[derive(Debug)]
struct Entry {
    id: ListenerId,
    regions: Vec<Rect>,
    dismissed: bool,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: ListenerId,
    entries: Vec<Entry>,
}

/// Shared registry of outside-click listeners.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PointerListeners {
    registry: Rc<RefCell<Registry>>,
}

impl PointerListeners {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the guard is dropped.
    pub fn listen(&self) -> ListenerGuard {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            regions: Vec::new(),
            dismissed: false,
        });
        trace!(listener = id, active = registry.entries.len(), "Pointer listener installed");

        ListenerGuard {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver a mouse event.
    ///
    /// Only button presses count. Returns how many listeners were dismissed.
    pub fn dispatch(&self, event: &MouseEvent) -> usize {
        if !matches!(event.kind, MouseEventKind::Down(_)) {
            return 0;
        }
        let position = Position::new(event.column, event.row);

        let mut registry = self.registry.borrow_mut();
        let mut dismissed = 0;
        for entry in registry.entries.iter_mut() {
            if !entry.regions.iter().any(|region| region.contains(position)) {
                entry.dismissed = true;
                dismissed += 1;
            }
        }
        dismissed
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Check if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration handle for one listener. Dropping it unregisters.
#[derive(Debug)]
pub struct ListenerGuard {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl ListenerGuard {
    /// Get the listener id.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Set the regions that count as "inside" for this listener.
    pub fn set_regions(&self, regions: &[Rect]) {
        self.with_entry(|entry| entry.regions = regions.to_vec());
    }

    /// Return and reset the dismissed flag.
    pub fn take_dismissed(&self) -> bool {
        self.with_entry(|entry| std::mem::take(&mut entry.dismissed))
            .unwrap_or(false)
    }

    fn with_entry<R>(&self, f: impl FnOnce(&mut Entry) -> R) -> Option<R> {
        let registry = self.registry.upgrade()?;
        let mut registry = registry.borrow_mut();
        registry.entries.iter_mut().find(|e| e.id == self.id).map(f)
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.borrow_mut();
            registry.entries.retain(|e| e.id != self.id);
            trace!(listener = self.id, active = registry.entries.len(), "Pointer listener removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton};

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_guard_drop_unregisters() {
        let listeners = PointerListeners::new();
        let guard = listeners.listen();
        assert_eq!(listeners.len(), 1);
        drop(guard);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let listeners = PointerListeners::new();
        let a = listeners.listen();
        let b = listeners.listen();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_click_inside_region_does_not_dismiss() {
        let listeners = PointerListeners::new();
        let guard = listeners.listen();
        guard.set_regions(&[Rect::new(0, 0, 10, 3)]);

        assert_eq!(listeners.dispatch(&click(5, 1)), 0);
        assert!(!guard.take_dismissed());
    }

    #[test]
    fn test_click_outside_dismisses_once() {
        let listeners = PointerListeners::new();
        let guard = listeners.listen();
        guard.set_regions(&[Rect::new(0, 0, 10, 3), Rect::new(0, 3, 10, 5)]);

        assert_eq!(listeners.dispatch(&click(20, 20)), 1);
        assert!(guard.take_dismissed());
        assert!(!guard.take_dismissed());
    }

    #[test]
    fn test_listeners_are_independent() {
        let listeners = PointerListeners::new();
        let a = listeners.listen();
        let b = listeners.listen();
        a.set_regions(&[Rect::new(0, 0, 10, 3)]);
        b.set_regions(&[Rect::new(20, 0, 10, 3)]);

        listeners.dispatch(&click(2, 1));
        assert!(!a.take_dismissed());
        assert!(b.take_dismissed());
    }

    #[test]
    fn test_non_press_events_are_ignored() {
        let listeners = PointerListeners::new();
        let guard = listeners.listen();
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..click(50, 50)
        };
        assert_eq!(listeners.dispatch(&moved), 0);
        assert!(!guard.take_dismissed());
    }

    #[test]
    fn test_guard_outliving_registry() {
        let listeners = PointerListeners::new();
        let guard = listeners.listen();
        drop(listeners);
        assert!(!guard.take_dismissed());
        guard.set_regions(&[]);
        drop(guard);
    }
}
