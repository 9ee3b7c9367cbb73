//! Event routing from host input to document elements
//!
//! Turns host-level input (pointer moved over a node, node activated, key
//! pressed) into `DomEvent`s carrying their propagation paths, the way a
//! browser would deliver them.
//!
//! # Architecture
//!
//! ```text
//! Host input (pointer over node, click, key)
//!     ↓
//! EventRouter (hover path tracking, focus)
//!     ↓
//! DomEvent { kind, target, path }
//!     ↓
//! Carousel::handle_event
//! ```
//!
//! # Example
//!
//! ```
//! use carousel_core::{event_types, EventKind};
//! use carousel_dom::{el, Document, EventRouter};
//!
//! let mut doc = Document::new();
//! let button = doc.append(doc.root(), el("a").attr("data-gotoslide", "next"));
//!
//! let mut router = EventRouter::new();
//! let events = router.on_activate(&doc, button, event_types::CLICK);
//!
//! let click = events.last().unwrap();
//! assert_eq!(click.kind, EventKind::named("click"));
//! assert_eq!(click.path.as_slice(), &[button, doc.root()]);
//! ```

use carousel_core::{DomEvent, EventKind, EventPath, KeyCode};

use crate::document::{Document, NodeId};

/// Callback for routed events
pub type EventCallback = Box<dyn FnMut(&DomEvent<NodeId>)>;

/// Routes host input events to document elements
///
/// Maintains state for:
/// - The hovered path (for enter/leave detection)
/// - Focused element (for keyboard events)
pub struct EventRouter {
    /// Hovered node and its ancestors, leaf first
    hovered: Vec<NodeId>,

    /// Currently focused element (receives keyboard events)
    focused: Option<NodeId>,

    /// Callback observing every routed event
    event_callback: Option<EventCallback>,
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRouter {
    /// Create a new event router
    pub fn new() -> Self {
        Self {
            hovered: Vec::new(),
            focused: None,
            event_callback: None,
        }
    }

    /// Set a callback that observes every routed event
    pub fn set_event_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&DomEvent<NodeId>) + 'static,
    {
        self.event_callback = Some(Box::new(callback));
    }

    /// Get the currently focused element
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Get the hovered node and its ancestors, leaf first
    pub fn hovered(&self) -> &[NodeId] {
        &self.hovered
    }

    /// Propagation path for `node`: the node, then each ancestor
    pub fn path_of(doc: &Document, node: NodeId) -> EventPath<NodeId> {
        doc.ancestors_inclusive(node).into_iter().collect()
    }

    /// Set focus to an element (or None to clear focus)
    pub fn set_focus(&mut self, doc: &Document, node: Option<NodeId>) -> Vec<DomEvent<NodeId>> {
        let mut events = Vec::new();
        if self.focused == node {
            return events;
        }

        if let Some(old) = self.focused.take() {
            if doc.get(old).is_some() {
                events.push(self.emit(DomEvent::with_path(
                    EventKind::Blur,
                    old,
                    Self::path_of(doc, old),
                )));
            }
        }

        if let Some(new) = node.filter(|n| doc.get(*n).is_some()) {
            events.push(self.emit(DomEvent::with_path(
                EventKind::Focus,
                new,
                Self::path_of(doc, new),
            )));
            self.focused = Some(new);
        }

        events
    }

    // =========================================================================
    // Pointer Events
    // =========================================================================

    /// Handle the pointer moving over `target` (None = over nothing)
    ///
    /// Emits POINTER_LEAVE for nodes no longer under the pointer (innermost
    /// first), then POINTER_ENTER for newly covered nodes (outermost first).
    pub fn on_pointer_move(
        &mut self,
        doc: &Document,
        target: Option<NodeId>,
    ) -> Vec<DomEvent<NodeId>> {
        let current = target
            .map(|t| doc.ancestors_inclusive(t))
            .unwrap_or_default();

        let mut events = Vec::new();

        let previous = std::mem::take(&mut self.hovered);
        for (i, node) in previous.iter().enumerate() {
            if !current.contains(node) {
                let event =
                    DomEvent::with_path(EventKind::PointerLeave, *node, previous[i..].iter().copied());
                events.push(self.emit(event));
            }
        }

        for (i, node) in current.iter().enumerate().rev() {
            if !previous.contains(node) {
                let event =
                    DomEvent::with_path(EventKind::PointerEnter, *node, current[i..].iter().copied());
                events.push(self.emit(event));
            }
        }

        self.hovered = current;
        events
    }

    /// Handle the pointer leaving the host surface
    ///
    /// Emits POINTER_LEAVE to all currently hovered elements.
    pub fn on_pointer_leave_window(&mut self) -> Vec<DomEvent<NodeId>> {
        let previous = std::mem::take(&mut self.hovered);
        let mut events = Vec::with_capacity(previous.len());
        for i in 0..previous.len() {
            let event = DomEvent::with_path(
                EventKind::PointerLeave,
                previous[i],
                previous[i..].iter().copied(),
            );
            events.push(self.emit(event));
        }
        events
    }

    /// Handle an activation (`click`, `tap`, ...) on `target`
    ///
    /// Moves focus to the target first, so the returned list ends with
    /// the named event. Stale targets produce no events.
    pub fn on_activate(
        &mut self,
        doc: &Document,
        target: NodeId,
        name: &str,
    ) -> Vec<DomEvent<NodeId>> {
        if doc.get(target).is_none() {
            tracing::debug!(?target, "activation on a removed node ignored");
            return Vec::new();
        }

        let mut events = self.set_focus(doc, Some(target));
        let event = DomEvent::with_path(EventKind::named(name), target, Self::path_of(doc, target));
        events.push(self.emit(event));
        events
    }

    // =========================================================================
    // Keyboard Events
    // =========================================================================

    /// Handle key press
    ///
    /// Delivered to the focused element, or the document root when nothing
    /// (or a removed node) holds focus.
    pub fn on_key_down(&mut self, doc: &Document, key: KeyCode) -> DomEvent<NodeId> {
        let target = self
            .focused
            .filter(|n| doc.get(*n).is_some())
            .unwrap_or_else(|| doc.root());
        let event = DomEvent::with_path(EventKind::KeyDown(key), target, Self::path_of(doc, target));
        self.emit(event)
    }

    /// Pass an event through the callback and hand it back
    fn emit(&mut self, event: DomEvent<NodeId>) -> DomEvent<NodeId> {
        if let Some(ref mut callback) = self.event_callback {
            callback(&event);
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::el;
    use carousel_core::{event_types, Dom};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// root > container > viewport > item
    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let container = doc.append(doc.root(), el("div").id("c"));
        let viewport = doc.append(container, el("div").class("carousel"));
        let item = doc.append(viewport, el("li").class("carousel-item"));
        (doc, container, viewport, item)
    }

    #[test]
    fn test_hover_enter_leave_order() {
        let (doc, container, viewport, item) = tree();

        let events: Rc<RefCell<Vec<(NodeId, EventKind)>>> = Rc::new(RefCell::new(Vec::new()));
        let events_clone = Rc::clone(&events);

        let mut router = EventRouter::new();
        router.set_event_callback(move |event| {
            events_clone
                .borrow_mut()
                .push((event.target, event.kind.clone()));
        });

        router.on_pointer_move(&doc, Some(item));
        {
            let captured = events.borrow();
            let entered: Vec<NodeId> = captured.iter().map(|(n, _)| *n).collect();
            assert_eq!(entered, vec![doc.root(), container, viewport, item]);
            assert!(captured.iter().all(|(_, k)| *k == EventKind::PointerEnter));
        }

        events.borrow_mut().clear();
        router.on_pointer_move(&doc, Some(container));
        {
            let captured = events.borrow();
            assert_eq!(
                *captured,
                vec![
                    (item, EventKind::PointerLeave),
                    (viewport, EventKind::PointerLeave),
                ]
            );
        }

        events.borrow_mut().clear();
        router.on_pointer_move(&doc, Some(container));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_leave_window() {
        let (doc, container, _viewport, item) = tree();
        let mut router = EventRouter::new();
        router.on_pointer_move(&doc, Some(item));

        let events = router.on_pointer_leave_window();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].target, item);
        assert!(events
            .iter()
            .any(|e| e.target == container && e.kind == EventKind::PointerLeave));
        assert!(router.hovered().is_empty());
    }

    #[test]
    fn test_activate_focuses_and_bubbles() {
        let (doc, container, viewport, item) = tree();
        let mut router = EventRouter::new();

        let events = router.on_activate(&doc, item, event_types::CLICK);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Focus);

        let click = &events[1];
        assert_eq!(click.kind.name(), Some("click"));
        assert_eq!(click.path.as_slice(), &[item, viewport, container, doc.root()]);
        assert_eq!(router.focused(), Some(item));

        // Second activation keeps focus, emits no focus events
        let events = router.on_activate(&doc, item, event_types::CLICK);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_focus_blur() {
        let (doc, container, _viewport, item) = tree();
        let mut router = EventRouter::new();

        router.set_focus(&doc, Some(item));
        let events = router.set_focus(&doc, Some(container));
        assert_eq!(events[0].kind, EventKind::Blur);
        assert_eq!(events[0].target, item);
        assert_eq!(events[1].kind, EventKind::Focus);
        assert_eq!(events[1].target, container);
    }

    #[test]
    fn test_key_down_targets() {
        let (mut doc, _container, viewport, item) = tree();
        let mut router = EventRouter::new();

        let event = router.on_key_down(&doc, KeyCode::ArrowRight);
        assert_eq!(event.target, doc.root());

        router.set_focus(&doc, Some(item));
        let event = router.on_key_down(&doc, KeyCode::ArrowLeft);
        assert_eq!(event.target, item);
        assert!(event.passes_through(viewport));

        // Focused node removed: falls back to the root
        doc.remove(item);
        let event = router.on_key_down(&doc, KeyCode::ArrowLeft);
        assert_eq!(event.target, doc.root());
    }

    #[test]
    fn test_activate_removed_node() {
        let (mut doc, _container, _viewport, item) = tree();
        doc.remove(item);

        let mut router = EventRouter::new();
        assert!(router.on_activate(&doc, item, event_types::TAP).is_empty());
    }
}
