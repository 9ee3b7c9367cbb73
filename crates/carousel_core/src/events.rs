//! Host-agnostic interaction events
//!
//! Hosts translate their native input (browser events, a test router, a
//! scripted scenario) into `DomEvent`s. Each event carries its propagation
//! path so handlers can do delegation without touching the document.

use smallvec::SmallVec;

/// Well-known activation event names
pub mod event_types {
    /// Pointer click
    pub const CLICK: &str = "click";
    /// Touch tap, normalized by the host
    pub const TAP: &str = "tap";
}

/// Keyboard keys the carousel distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Space,
    Other(u32),
}

impl KeyCode {
    /// Map a legacy numeric `keyCode` (37 = left, 39 = right, ...)
    pub fn from_legacy(code: u32) -> Self {
        match code {
            13 => KeyCode::Enter,
            27 => KeyCode::Escape,
            32 => KeyCode::Space,
            37 => KeyCode::ArrowLeft,
            38 => KeyCode::ArrowUp,
            39 => KeyCode::ArrowRight,
            40 => KeyCode::ArrowDown,
            other => KeyCode::Other(other),
        }
    }

    /// Parse a key name as used by scripts and configs (`"left"`, `"ArrowRight"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Some(KeyCode::ArrowLeft),
            "right" | "arrowright" => Some(KeyCode::ArrowRight),
            "up" | "arrowup" => Some(KeyCode::ArrowUp),
            "down" | "arrowdown" => Some(KeyCode::ArrowDown),
            "enter" | "return" => Some(KeyCode::Enter),
            "escape" | "esc" => Some(KeyCode::Escape),
            "space" => Some(KeyCode::Space),
            _ => None,
        }
    }
}

/// What happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A named activation event (`click`, `tap`, or a host-specific name)
    Named(String),
    /// Pointer entered the target
    PointerEnter,
    /// Pointer left the target
    PointerLeave,
    /// Key pressed; delivered to the focused element or the root
    KeyDown(KeyCode),
    /// Target received focus
    Focus,
    /// Target lost focus
    Blur,
}

impl EventKind {
    /// Build a named activation event
    pub fn named(name: impl Into<String>) -> Self {
        EventKind::Named(name.into())
    }

    /// The activation name, if this is a named event
    pub fn name(&self) -> Option<&str> {
        match self {
            EventKind::Named(name) => Some(name),
            _ => None,
        }
    }
}

/// Propagation path from the target up to the document root
pub type EventPath<N> = SmallVec<[N; 8]>;

/// An event delivered to a node, with its bubbling path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomEvent<N> {
    /// The event kind
    pub kind: EventKind,
    /// The node the event was dispatched to
    pub target: N,
    /// Target first, then each ancestor up to the root
    pub path: EventPath<N>,
}

impl<N: Copy + PartialEq> DomEvent<N> {
    /// Create an event whose path is just the target
    pub fn new(kind: EventKind, target: N) -> Self {
        let mut path = EventPath::new();
        path.push(target);
        Self { kind, target, path }
    }

    /// Create an event with an explicit propagation path
    pub fn with_path(kind: EventKind, target: N, path: impl IntoIterator<Item = N>) -> Self {
        Self {
            kind,
            target,
            path: path.into_iter().collect(),
        }
    }

    /// Check whether the event bubbles through `node`
    pub fn passes_through(&self, node: N) -> bool {
        self.path.contains(&node)
    }

    /// Nodes from the target up to (but excluding) `boundary`
    ///
    /// Returns `None` when `boundary` is not on the path.
    pub fn path_within(&self, boundary: N) -> Option<&[N]> {
        let end = self.path.iter().position(|n| *n == boundary)?;
        Some(&self.path[..end])
    }
}
