//! Carousel DOM
//!
//! A headless document for driving carousels outside a browser:
//!
//! - **Document**: Slotmap-backed element tree with classes, attributes,
//!   inline styles and an ID registry
//! - **Selectors**: CSS selector parsing (compound, descendant, child,
//!   attribute and list selectors) built on nom
//! - **Event routing**: Hover tracking, focus, activation and key events
//!   with browser-like propagation paths
//!
//! `Document` implements [`carousel_core::Dom`], so a widget written against
//! the trait runs unchanged in tests and in the CLI.
//!
//! # Example
//!
//! ```
//! use carousel_core::Dom;
//! use carousel_dom::{el, Document};
//!
//! let mut doc = Document::new();
//! let container = doc.append(
//!     doc.root(),
//!     el("div").id("gallery").child(el("ul").class("carousel-list")),
//! );
//!
//! assert_eq!(doc.get_element_by_id("gallery"), Some(container));
//! assert!(doc.query(container, "div > ul.carousel-list").unwrap().is_some());
//! ```

pub mod document;
pub mod event_router;
pub mod selector;

pub use document::{el, Document, Element, ElementBuilder, NodeId};
pub use event_router::{EventCallback, EventRouter};
pub use selector::{MatchTree, Selector, SelectorError};
