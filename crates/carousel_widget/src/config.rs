//! Carousel configuration
//!
//! Everything except the container handle is plain data and round-trips
//! through serde, so hosts can keep carousel settings in TOML or JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interval used by `init_automove` when no period is supplied
pub const DEFAULT_AUTOMOVE_MS: u64 = 4000;

fn default_event_type() -> String {
    carousel_core::event_types::CLICK.to_string()
}

fn default_true() -> bool {
    true
}

/// Where arrow keys are listened for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScope {
    /// Only while focus or the pointer is inside the container
    #[default]
    Container,
    /// Anywhere on the page
    Document,
}

/// Class and attribute names the carousel looks for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markup {
    /// Visible window; activating it advances to the next slide
    pub viewport: String,
    /// Element whose `left` is shifted
    pub list: String,
    /// One per slide
    pub item: String,
    /// Root for delegated navigation clicks
    pub nav: String,
    /// Holds prev/next controls and page links
    pub pagination: String,
    /// One per slide inside the pagination
    pub page: String,
    /// Attribute carrying `prev`, `next` or a slide index
    pub marker: String,
    pub disabled_class: String,
    pub current_class: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            viewport: "carousel".to_string(),
            list: "carousel-list".to_string(),
            item: "carousel-item".to_string(),
            nav: "carousel-nav".to_string(),
            pagination: "carousel-pagination".to_string(),
            page: "carousel-page".to_string(),
            marker: "data-gotoslide".to_string(),
            disabled_class: "disable".to_string(),
            current_class: "current".to_string(),
        }
    }
}

impl Markup {
    /// Class selector for one of the configured class names
    pub fn class_selector(class: &str) -> String {
        format!(".{}", class)
    }

    /// Selector for any element carrying the marker attribute
    pub fn marker_selector(&self) -> String {
        format!("[{}]", self.marker)
    }

    /// Selector for elements whose marker equals `value`
    pub fn marker_value_selector(&self, value: &str) -> String {
        format!("[{}=\"{}\"]", self.marker, value)
    }
}

/// Configuration for a carousel instance
///
/// `N` is the host's element handle type. The container is never
/// serialized; hosts fill it in after loading the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(serialize = "", deserialize = ""))]
pub struct CarouselConfig<N> {
    /// Element holding the carousel markup
    #[serde(skip)]
    pub container: Option<N>,

    /// Activation event the carousel reacts to
    #[serde(default = "default_event_type")]
    pub event_type: String,

    /// Auto-advance period in milliseconds (0 or absent disables it)
    pub automove: Option<u64>,

    /// Wrap around at either end
    pub continuous: bool,

    /// Maintain prev/next and page link state
    #[serde(default = "default_true")]
    pub pagination: bool,

    /// Arrow-key navigation
    pub key_nav: bool,

    pub key_scope: KeyScope,

    /// Slide shown after init
    pub initial_index: i64,

    pub markup: Markup,
}

impl<N> Default for CarouselConfig<N> {
    fn default() -> Self {
        Self {
            container: None,
            event_type: default_event_type(),
            automove: None,
            continuous: false,
            pagination: true,
            key_nav: false,
            key_scope: KeyScope::default(),
            initial_index: 0,
            markup: Markup::default(),
        }
    }
}

impl<N> CarouselConfig<N> {
    /// Configuration with defaults for the given container
    pub fn new(container: N) -> Self {
        Self {
            container: Some(container),
            ..Default::default()
        }
    }

    /// Swap the container handle, keeping every other setting
    pub fn with_container<M>(self, container: M) -> CarouselConfig<M> {
        CarouselConfig {
            container: Some(container),
            event_type: self.event_type,
            automove: self.automove,
            continuous: self.continuous,
            pagination: self.pagination,
            key_nav: self.key_nav,
            key_scope: self.key_scope,
            initial_index: self.initial_index,
            markup: self.markup,
        }
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn automove(mut self, interval_ms: u64) -> Self {
        self.automove = Some(interval_ms);
        self
    }

    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn pagination(mut self, pagination: bool) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn key_nav(mut self, key_nav: bool) -> Self {
        self.key_nav = key_nav;
        self
    }

    pub fn key_scope(mut self, key_scope: KeyScope) -> Self {
        self.key_scope = key_scope;
        self
    }

    pub fn initial_index(mut self, index: i64) -> Self {
        self.initial_index = index;
        self
    }

    pub fn markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    /// Configured auto-advance period, if enabled
    pub fn automove_interval(&self) -> Option<Duration> {
        self.automove
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
