//! Carousel Widget
//!
//! A horizontally sliding carousel. The widget shifts the list element's
//! `left` offset and leaves the animation to CSS transitions.
//!
//! # Features
//!
//! - **Geometry**: Slide distance and overscroll cap derived from measured widths
//! - **Pagination**: Prev/next disabling and current-page highlighting
//! - **Navigation**: Delegated clicks, viewport clicks, and arrow keys
//! - **Auto-advance**: Interval-driven, paused while the pointer is over it
//! - **Dynamic slides**: Add and remove slides with page link re-sync
//! - **Template**: Markup generator for the in-memory document (`document` feature)
//!
//! # Example
//!
//! ```
//! use carousel_core::NoTimers;
//! use carousel_dom::Document;
//! use carousel_widget::{template, Carousel, CarouselConfig, Markup, SlideLayout};
//!
//! let mut doc = Document::new();
//! let container = template::mount(&mut doc, "gallery", &SlideLayout::default(), &Markup::default());
//!
//! let config = CarouselConfig::new(container).continuous(true);
//! let mut carousel = Carousel::init(doc, config, NoTimers).unwrap();
//!
//! carousel.goto(4);
//! assert_eq!(carousel.snapshot().offset_px, 1200);
//! ```

pub mod carousel;
pub mod config;
pub mod geometry;
pub mod pagination;
pub mod target;

#[cfg(any(test, feature = "document"))]
pub mod template;

pub use carousel::{Carousel, CarouselSnapshot, EventOutcome};
pub use config::{CarouselConfig, KeyScope, Markup, DEFAULT_AUTOMOVE_MS};
pub use geometry::{Measurements, Track};
pub use pagination::{Boundary, Pagination};
pub use target::Where;

#[cfg(any(test, feature = "document"))]
pub use template::SlideLayout;
