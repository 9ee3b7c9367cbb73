//! Carousel Core
//!
//! Foundational primitives shared by the carousel widget and its hosts:
//!
//! - **Dom**: The element-query / style / class collaborator the widget drives
//! - **Events**: Host-agnostic interaction events with propagation paths
//! - **Timers**: Repeating-interval access used for auto-advance
//! - **Parsing**: Base-10 integer prefix parsing for attribute and style values
//!
//! # Example
//!
//! ```rust
//! use carousel_core::parse::{parse_int, parse_px};
//!
//! assert_eq!(parse_int("3"), Some(3));
//! assert_eq!(parse_int("12abc"), Some(12));
//! assert_eq!(parse_px("320px"), Some(320));
//! assert_eq!(parse_int("next"), None);
//! ```

pub mod dom;
pub mod error;
pub mod events;
pub mod parse;
pub mod timer;

pub use dom::Dom;
pub use error::{CarouselError, Result};
pub use events::{event_types, DomEvent, EventKind, EventPath, KeyCode};
pub use parse::{parse_int, parse_px};
pub use timer::{NoTimers, TimerAccess, TimerId};
