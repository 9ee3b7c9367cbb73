//! The carousel component
//!
//! Owns the position state and drives a [`Dom`] implementation: measures
//! the slides once, then turns navigation requests into a `left` offset on
//! the list element plus class updates on the pagination controls.

use carousel_core::{
    parse_px, CarouselError, Dom, DomEvent, EventKind, KeyCode, Result, TimerAccess, TimerId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{CarouselConfig, KeyScope, Markup, DEFAULT_AUTOMOVE_MS};
use crate::geometry::{Measurements, Track};
use crate::pagination::{Boundary, Pagination};
use crate::target::{self, Where};

/// What `handle_event` did with an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The carousel reacted to the event
    pub handled: bool,
    /// The host should suppress the event's default action
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };

    pub const CONSUMED: Self = Self {
        handled: true,
        prevent_default: true,
    };
}

/// Serializable view of the carousel state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselSnapshot {
    pub current: usize,
    pub slide_count: usize,
    pub offset_px: i64,
    pub move_distance_px: i64,
    pub max_offset_px: Option<i64>,
    pub automove_running: bool,
    /// `None` when pagination is off or the control is absent
    pub prev_disabled: Option<bool>,
    pub next_disabled: Option<bool>,
}

/// Elements resolved inside the container
#[derive(Clone, Debug)]
struct Elements<N> {
    viewport: N,
    list: N,
    slides: Vec<N>,
    nav: Option<N>,
    pagination: Option<Pagination<N>>,
}

impl<N: Copy + Eq> Elements<N> {
    fn resolve<D: Dom<Node = N>>(dom: &D, container: N, config: &CarouselConfig<N>) -> Result<Self> {
        let markup = &config.markup;
        let required = |role: &'static str, class: &str| -> Result<N> {
            let selector = Markup::class_selector(class);
            dom.query(container, &selector)?
                .ok_or(CarouselError::MissingElement { role, selector })
        };

        let viewport = required("viewport", &markup.viewport)?;
        let list = required("list", &markup.list)?;
        let slides = dom.query_all(container, &Markup::class_selector(&markup.item))?;
        let nav = dom.query(container, &Markup::class_selector(&markup.nav))?;

        let pagination = if config.pagination {
            match dom.query(container, &Markup::class_selector(&markup.pagination))? {
                Some(root) => Some(Pagination::resolve(dom, root, markup)?),
                None => {
                    debug!("pagination enabled but no pagination root found");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            viewport,
            list,
            slides,
            nav,
            pagination,
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct State {
    current: usize,
    slide_count: usize,
    offset: i64,
    reached_cap: bool,
    timer: Option<TimerId>,
    hovered: bool,
}

/// A horizontally sliding carousel bound to one container
///
/// # Example
///
/// ```
/// use carousel_core::NoTimers;
/// use carousel_dom::Document;
/// use carousel_widget::{template, Carousel, CarouselConfig, Markup, SlideLayout, Where};
///
/// let mut doc = Document::new();
/// let container = template::mount(&mut doc, "c", &SlideLayout::default(), &Markup::default());
///
/// let mut carousel = Carousel::init(doc, CarouselConfig::new(container), NoTimers).unwrap();
/// carousel.process_where(Where::Next, false);
///
/// assert_eq!(carousel.current(), 1);
/// assert_eq!(carousel.offset(), 300);
/// ```
pub struct Carousel<D: Dom> {
    dom: D,
    config: CarouselConfig<D::Node>,
    container: D::Node,
    elements: Elements<D::Node>,
    track: Track,
    state: State,
    timers: Box<dyn TimerAccess>,
    /// Detached copy of a page link, used once every page has been removed
    page_template: Option<D::Node>,
}

fn capture_page_template<D: Dom>(dom: &mut D, container: D::Node, markup: &Markup) -> Result<Option<D::Node>> {
    let first = dom.query(container, &Markup::class_selector(&markup.page))?;
    Ok(first.and_then(|page| dom.clone_node(page)))
}

/// The child of `root` on the path down to `node`
fn child_of_root<D: Dom>(dom: &D, root: D::Node, node: D::Node) -> Option<D::Node> {
    let mut current = node;
    loop {
        let parent = dom.parent(current)?;
        if parent == root {
            return Some(current);
        }
        current = parent;
    }
}

impl<D: Dom> Carousel<D> {
    /// Bind a carousel to `config.container` and show the initial slide
    pub fn init(
        mut dom: D,
        config: CarouselConfig<D::Node>,
        timers: impl TimerAccess + 'static,
    ) -> Result<Self> {
        let Some(container) = config.container else {
            error!("Please specify a carousel container");
            return Err(CarouselError::MissingContainer);
        };

        let elements = Elements::resolve(&dom, container, &config)?;
        let page_template = if config.pagination {
            capture_page_template(&mut dom, container, &config.markup)?
        } else {
            None
        };
        let state = State {
            slide_count: elements.slides.len(),
            ..Default::default()
        };

        let mut carousel = Self {
            dom,
            config,
            container,
            elements,
            track: Track::default(),
            state,
            timers: Box::new(timers),
            page_template,
        };
        carousel.measure();

        info!(
            slides = carousel.state.slide_count,
            move_distance = carousel.track.move_distance,
            max_offset = ?carousel.track.max_offset,
            "carousel initialized"
        );

        carousel.goto(carousel.config.initial_index);
        if carousel.config.automove_interval().is_some() {
            carousel.init_automove(carousel.config.automove);
        }

        Ok(carousel)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn current(&self) -> usize {
        self.state.current
    }

    pub fn slide_count(&self) -> usize {
        self.state.slide_count
    }

    /// Last applied (possibly capped) offset in pixels
    pub fn offset(&self) -> i64 {
        self.state.offset
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn config(&self) -> &CarouselConfig<D::Node> {
        &self.config
    }

    pub fn container(&self) -> D::Node {
        self.container
    }

    pub fn slides(&self) -> &[D::Node] {
        &self.elements.slides
    }

    /// Handle of the running auto-advance interval
    pub fn timer(&self) -> Option<TimerId> {
        self.state.timer
    }

    pub fn is_automove_running(&self) -> bool {
        self.state
            .timer
            .is_some_and(|id| self.timers.is_active(id))
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable document access; call `refresh` after structural edits
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        let markup = &self.config.markup;
        let control_state = |control: Option<D::Node>| {
            control.map(|n| self.dom.has_class(n, &markup.disabled_class))
        };
        let pagination = self.elements.pagination.as_ref();

        CarouselSnapshot {
            current: self.state.current,
            slide_count: self.state.slide_count,
            offset_px: self.state.offset,
            move_distance_px: self.track.move_distance,
            max_offset_px: self.track.max_offset,
            automove_running: self.is_automove_running(),
            prev_disabled: control_state(pagination.and_then(|p| p.prev)),
            next_disabled: control_state(pagination.and_then(|p| p.next)),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show slide `index`, clamped into the slide range
    pub fn goto(&mut self, index: i64) {
        let count = self.state.slide_count;
        let clamped = if count == 0 {
            0
        } else {
            index.clamp(0, count as i64 - 1) as usize
        };
        if clamped as i64 != index {
            debug!(requested = index, clamped, "slide index clamped into range");
        }

        let (offset, reached_cap) = self.track.offset_for(clamped);
        self.state.current = clamped;
        self.state.offset = offset;
        self.state.reached_cap = reached_cap;

        self.dom
            .set_style(self.elements.list, "left", &format!("{}px", -offset));
        debug!(current = clamped, offset, reached_cap, "carousel moved");

        if self.config.pagination {
            self.update_prev_next();
        }
    }

    /// Resolve a navigation request and move there
    ///
    /// Returns the new current index.
    pub fn process_where(&mut self, target: Where, continuous: bool) -> usize {
        let index = target::resolve(
            target,
            self.state.current,
            self.state.slide_count,
            continuous,
        );
        self.goto(index);
        self.state.current
    }

    /// Parse a marker value and navigate to it
    pub fn process_marker(&mut self, marker: &str, continuous: bool) -> Result<usize> {
        let target: Where = marker.parse()?;
        Ok(self.process_where(target, continuous))
    }

    fn update_prev_next(&mut self) {
        let Some(pagination) = &self.elements.pagination else {
            return;
        };
        let boundary = Boundary::compute(
            self.state.current,
            self.state.slide_count,
            self.config.continuous,
            self.state.reached_cap,
        );
        pagination.apply_boundary(&mut self.dom, &self.config.markup, boundary);
        pagination.highlight(&mut self.dom, &self.config.markup, self.state.current);
    }

    // =========================================================================
    // Auto-advance
    // =========================================================================

    /// Start advancing every `interval_ms` (4000 when `None` or 0)
    ///
    /// A running interval is cancelled first.
    pub fn init_automove(&mut self, interval_ms: Option<u64>) {
        self.stop_automove();

        let ms = interval_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_AUTOMOVE_MS);
        self.state.timer = self
            .timers
            .set_interval(std::time::Duration::from_millis(ms));

        match self.state.timer {
            Some(id) => debug!(interval_ms = ms, timer = id.to_raw(), "automove started"),
            None => warn!("timer backend unavailable, automove not started"),
        }
    }

    /// Cancel the auto-advance interval, returns true if one was running
    pub fn stop_automove(&mut self) -> bool {
        match self.state.timer.take() {
            Some(id) => {
                self.timers.clear_interval(id);
                debug!(timer = id.to_raw(), "automove stopped");
                true
            }
            None => false,
        }
    }

    /// Deliver a fired interval; advances when it belongs to this carousel
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.state.timer != Some(id) {
            return false;
        }
        self.process_where(Where::Next, self.config.continuous);
        true
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// React to an interaction event routed by the host
    pub fn handle_event(&mut self, event: &DomEvent<D::Node>) -> EventOutcome {
        match &event.kind {
            EventKind::Named(name) if *name == self.config.event_type => {
                self.handle_activation(event)
            }
            EventKind::PointerEnter if event.target == self.container => {
                self.state.hovered = true;
                if self.config.automove_interval().is_none() {
                    return EventOutcome::IGNORED;
                }
                self.stop_automove();
                EventOutcome::HANDLED
            }
            EventKind::PointerLeave if event.target == self.container => {
                self.state.hovered = false;
                if self.config.automove_interval().is_none() {
                    return EventOutcome::IGNORED;
                }
                if self.state.timer.is_none() {
                    self.init_automove(self.config.automove);
                }
                EventOutcome::HANDLED
            }
            EventKind::KeyDown(key) => self.handle_key(*key, event),
            _ => EventOutcome::IGNORED,
        }
    }

    fn handle_activation(&mut self, event: &DomEvent<D::Node>) -> EventOutcome {
        let continuous = self.config.continuous;

        // Delegated nav click: nearest marker-bearing node under the nav root
        let marker = self.elements.nav.and_then(|nav| {
            event
                .path_within(nav)?
                .iter()
                .find_map(|n| self.dom.attr(*n, &self.config.markup.marker))
        });
        if let Some(value) = marker {
            return match value.parse::<Where>() {
                Ok(target) => {
                    self.process_where(target, continuous);
                    EventOutcome::CONSUMED
                }
                Err(err) => {
                    warn!(%err, "ignoring navigation event");
                    EventOutcome {
                        handled: false,
                        prevent_default: true,
                    }
                }
            };
        }

        if event.passes_through(self.elements.viewport) {
            self.process_where(Where::Next, continuous);
            return EventOutcome::CONSUMED;
        }

        EventOutcome::IGNORED
    }

    fn handle_key(&mut self, key: KeyCode, event: &DomEvent<D::Node>) -> EventOutcome {
        if !self.config.key_nav {
            return EventOutcome::IGNORED;
        }
        let target = match key {
            KeyCode::ArrowLeft => Where::Prev,
            KeyCode::ArrowRight => Where::Next,
            _ => return EventOutcome::IGNORED,
        };
        let in_scope = match self.config.key_scope {
            KeyScope::Document => true,
            KeyScope::Container => self.state.hovered || event.passes_through(self.container),
        };
        if !in_scope {
            return EventOutcome::IGNORED;
        }

        self.process_where(target, self.config.continuous);
        EventOutcome::HANDLED
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Re-resolve elements and re-measure geometry
    pub fn refresh(&mut self) -> Result<()> {
        self.elements = Elements::resolve(&self.dom, self.container, &self.config)?;
        self.state.slide_count = self.elements.slides.len();
        self.measure();
        Ok(())
    }

    fn measure(&mut self) {
        let px = |node: D::Node, property: &str| {
            self.dom
                .computed_style(node, property)
                .and_then(|v| parse_px(&v))
                .unwrap_or(0)
        };
        let first = self.elements.slides.first().copied();
        let measurements = Measurements {
            slide_width: first.map_or(0, |n| px(n, "width")),
            slide_margin_right: first.map_or(0, |n| px(n, "margin-right")),
            viewport_width: px(self.elements.viewport, "width"),
            list_padding_right: px(self.elements.list, "padding-right"),
            slide_count: self.state.slide_count,
        };
        self.track = Track::from_geometry(&measurements);
    }

    /// Append detached slide nodes to the list
    ///
    /// With pagination on, each new slide also gets a page link cloned from
    /// the last page, or from the page captured at init when none are left.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = D::Node>) -> Result<&mut Self> {
        let items: Vec<D::Node> = items.into_iter().collect();
        if items.is_empty() {
            return Ok(self);
        }

        for item in &items {
            self.dom.append_child(self.elements.list, *item);
            self.state.slide_count += 1;
            if self.config.pagination {
                self.add_page()?;
            }
        }

        self.refresh()?;
        info!(
            added = items.len(),
            slides = self.state.slide_count,
            "slides added"
        );
        self.goto(self.state.current as i64);
        Ok(self)
    }

    fn add_page(&mut self) -> Result<()> {
        let markup = &self.config.markup;
        let pages = self
            .dom
            .query_all(self.container, &Markup::class_selector(&markup.page))?;

        let copy = if let Some(last) = pages.last().copied() {
            let Some(copy) = self.dom.clone_node(last) else {
                return Ok(());
            };
            self.dom.insert_after(last, copy);
            copy
        } else {
            let (Some(pagination), Some(template)) = (&self.elements.pagination, self.page_template)
            else {
                warn!("no page element to clone for the new slide");
                return Ok(());
            };
            let Some(copy) = self.dom.clone_node(template) else {
                return Ok(());
            };
            // Keep the page between the prev and next controls
            let root = pagination.root;
            let anchor = pagination
                .prev
                .and_then(|prev| child_of_root(&self.dom, root, prev));
            match anchor {
                Some(prev) => self.dom.insert_after(prev, copy),
                None => self.dom.append_child(root, copy),
            }
            copy
        };
        self.dom.remove_class(copy, &markup.current_class);

        let count = self.state.slide_count;
        for link in self.dom.query_all(copy, &markup.marker_selector())? {
            self.dom
                .set_attr(link, &markup.marker, &(count - 1).to_string());
            self.dom.set_text(link, &count.to_string());
            self.dom.remove_class(link, &markup.current_class);
        }
        Ok(())
    }

    /// Remove the slides (and page links) at the given positions
    ///
    /// Positions refer to the slide order before removal. Duplicates
    /// collapse and out-of-range positions are skipped. Removing slides
    /// before the current one shifts `current` down so the same slide stays
    /// in view; removing the current slide shows its successor.
    pub fn remove_items(&mut self, indices: &[usize]) -> Result<&mut Self> {
        if indices.is_empty() {
            return Ok(self);
        }

        let mut positions = indices.to_vec();
        positions.sort_unstable();
        positions.dedup();

        let slides = self.elements.slides.clone();
        let pages = if self.config.pagination {
            self.dom.query_all(
                self.container,
                &Markup::class_selector(&self.config.markup.page),
            )?
        } else {
            Vec::new()
        };

        let mut removed = 0usize;
        let mut removed_before_current = 0usize;
        for position in positions {
            let Some(slide) = slides.get(position).copied() else {
                warn!(position, slides = slides.len(), "ignoring out-of-range slide removal");
                continue;
            };
            self.dom.remove(slide);
            if let Some(page) = pages.get(position).copied() {
                self.dom.remove(page);
            }
            removed += 1;
            if position < self.state.current {
                removed_before_current += 1;
            }
        }
        if removed == 0 {
            return Ok(self);
        }

        // The shown slide stays put unless it was removed itself
        let current = (self.state.current - removed_before_current) as i64;
        self.refresh()?;
        if self.config.pagination {
            self.renumber_pages()?;
        }
        info!(removed, slides = self.state.slide_count, "slides removed");

        self.goto(current);
        Ok(self)
    }

    fn renumber_pages(&mut self) -> Result<()> {
        let markup = &self.config.markup;
        let pages = self
            .dom
            .query_all(self.container, &Markup::class_selector(&markup.page))?;
        for (i, page) in pages.into_iter().enumerate() {
            for link in self.dom.query_all(page, &markup.marker_selector())? {
                self.dom.set_attr(link, &markup.marker, &i.to_string());
                self.dom.set_text(link, &(i + 1).to_string());
            }
        }
        Ok(())
    }
}

impl<D: Dom> Drop for Carousel<D> {
    fn drop(&mut self) {
        self.stop_automove();
        if let Some(template) = self.page_template.take() {
            self.dom.remove(template);
        }
    }
}
