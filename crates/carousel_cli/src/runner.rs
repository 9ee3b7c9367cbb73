//! Scenario execution
//!
//! Builds the scenario markup in an in-memory document, binds a carousel to
//! it, and feeds steps through the event router and the virtual clock.

use anyhow::{anyhow, Context, Result};
use carousel_core::Dom;
use carousel_dom::{Document, EventRouter, NodeId};
use carousel_timer::TimerScheduler;
use carousel_widget::{template, Carousel, CarouselSnapshot, Where};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Scenario;
use crate::script::Step;

/// One line of run output
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    #[serde(flatten)]
    pub snapshot: CarouselSnapshot,
}

impl StepReport {
    /// Human-readable single line
    pub fn to_line(&self) -> String {
        let s = &self.snapshot;
        let control = |state: Option<bool>| match state {
            Some(true) => "off",
            Some(false) => "on",
            None => "-",
        };
        format!(
            "{:<12} current={} slides={} left={}px prev={} next={}{}",
            self.step,
            s.current,
            s.slide_count,
            -s.offset_px,
            control(s.prev_disabled),
            control(s.next_disabled),
            if s.automove_running { " auto" } else { "" }
        )
    }
}

/// Drives one carousel through scripted steps
pub struct Runner {
    // Declared before the scheduler so the carousel cancels its timer first
    carousel: Carousel<Document>,
    router: EventRouter,
    scheduler: TimerScheduler,
    scenario: Scenario,
    added: usize,
}

impl Runner {
    /// Build the markup and initialize the carousel
    pub fn new(scenario: Scenario) -> Result<Self> {
        let scheduler = TimerScheduler::new();
        let mut doc = Document::new();
        let markup = scenario.carousel.markup.clone();
        let container = template::mount(&mut doc, &scenario.name, &scenario.layout, &markup);

        let config = scenario.carousel.clone().with_container(container);
        let carousel = Carousel::init(doc, config, scheduler.handle())
            .with_context(|| format!("Failed to initialize carousel `{}`", scenario.name))?;

        info!(
            "Loaded scenario {} ({} slides, {} steps)",
            scenario.name,
            carousel.slide_count(),
            scenario.steps.len()
        );

        Ok(Self {
            carousel,
            router: EventRouter::new(),
            scheduler,
            scenario,
            added: 0,
        })
    }

    pub fn carousel(&self) -> &Carousel<Document> {
        &self.carousel
    }

    /// Report the current state under `label`
    pub fn snapshot_report(&self, label: &str) -> StepReport {
        StepReport {
            step: label.to_string(),
            snapshot: self.carousel.snapshot(),
        }
    }

    /// Render the current document as HTML
    pub fn html(&self) -> String {
        let doc = self.carousel.dom();
        doc.outer_html(self.carousel.container())
    }

    /// Apply one step and report the resulting state
    pub fn apply(&mut self, step: &Step) -> Result<StepReport> {
        debug!(%step, "applying step");
        let continuous = self.carousel.config().continuous;

        match step {
            Step::Next => {
                self.carousel.process_where(Where::Next, continuous);
            }
            Step::Prev => {
                self.carousel.process_where(Where::Prev, continuous);
            }
            Step::Goto(index) => self.carousel.goto(*index),
            Step::Click(marker) => {
                let target = self.find_marker(marker)?;
                self.activate(target);
            }
            Step::TapBody => {
                let target = self.body_target()?;
                self.activate(target);
            }
            Step::Key(key) => {
                let event = self.router.on_key_down(self.carousel.dom(), *key);
                self.carousel.handle_event(&event);
            }
            Step::Hover => {
                let container = self.carousel.container();
                self.pointer_to(Some(container));
            }
            Step::Leave => self.pointer_to(None),
            Step::Wait(ms) => {
                for id in self.scheduler.advance(Duration::from_millis(*ms)) {
                    self.carousel.on_timer(id.into());
                }
            }
            Step::Add(count) => self.add_slides(*count)?,
            Step::Remove(indices) => {
                self.carousel.remove_items(indices)?;
            }
        }

        Ok(self.snapshot_report(&step.to_string()))
    }

    /// Apply every step of the scenario
    pub fn run(&mut self) -> Result<Vec<StepReport>> {
        let steps = self.scenario.steps()?;
        steps.iter().map(|step| self.apply(step)).collect()
    }

    fn find_marker(&self, marker: &str) -> Result<NodeId> {
        let markup = &self.carousel.config().markup;
        let selector = format!(
            ".{} {}",
            markup.nav,
            markup.marker_value_selector(marker)
        );
        self.carousel
            .dom()
            .query(self.carousel.container(), &selector)?
            .ok_or_else(|| anyhow!("no navigation link with marker `{}`", marker))
    }

    fn body_target(&self) -> Result<NodeId> {
        let slides = self.carousel.slides();
        if let Some(slide) = slides.get(self.carousel.current()) {
            return Ok(*slide);
        }
        let viewport = format!(".{}", self.carousel.config().markup.viewport);
        self.carousel
            .dom()
            .query(self.carousel.container(), &viewport)?
            .ok_or_else(|| anyhow!("carousel has no viewport"))
    }

    fn activate(&mut self, target: NodeId) {
        let event_type = self.carousel.config().event_type.clone();
        let events = self
            .router
            .on_activate(self.carousel.dom(), target, &event_type);
        for event in &events {
            self.carousel.handle_event(event);
        }
    }

    fn pointer_to(&mut self, target: Option<NodeId>) {
        let events = self.router.on_pointer_move(self.carousel.dom(), target);
        for event in &events {
            self.carousel.handle_event(event);
        }
    }

    fn add_slides(&mut self, count: usize) -> Result<()> {
        let markup = self.carousel.config().markup.clone();
        let layout = self.scenario.layout.clone();
        let base = self.scenario.layout.slides + self.added;

        let doc = self.carousel.dom_mut();
        let items: Vec<NodeId> = (0..count)
            .map(|i| doc.create(template::slide(&markup, &layout, format!("Slide {}", base + i + 1))))
            .collect();

        self.carousel.add_items(items)?;
        self.added += count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(toml: &str) -> Runner {
        Runner::new(Scenario::parse(toml).unwrap()).unwrap()
    }

    #[test]
    fn test_demo_runs() {
        let mut runner = Runner::new(Scenario::demo().unwrap()).unwrap();
        let reports = runner.run().unwrap();
        assert_eq!(reports.len(), runner.scenario.steps.len());

        // "add 2" on 5 slides
        let add = reports.iter().find(|r| r.step == "add 2").unwrap();
        assert_eq!(add.snapshot.slide_count, 7);

        // "remove 0 1" takes two slides and two positions off current
        let remove = reports.iter().find(|r| r.step == "remove 0 1").unwrap();
        assert_eq!(remove.snapshot.slide_count, 5);
        assert_eq!(remove.snapshot.current, 4);
    }

    #[test]
    fn test_click_and_keys() {
        let mut runner = runner(
            r#"
            [carousel]
            key_nav = true

            [layout]
            slides = 4
            "#,
        );

        let report = runner.apply(&Step::Click("2".into())).unwrap();
        assert_eq!(report.snapshot.current, 2);

        // Focus moved into the nav by the click, so keys reach the carousel
        let report = runner.apply(&Step::Key(carousel_core::KeyCode::ArrowRight)).unwrap();
        assert_eq!(report.snapshot.current, 3);
        assert_eq!(report.snapshot.next_disabled, Some(true));

        assert!(runner.apply(&Step::Click("9".into())).is_err());
    }

    #[test]
    fn test_hover_pauses_automove() {
        let mut runner = runner(
            r#"
            [carousel]
            automove = 500
            "#,
        );

        let report = runner.apply(&Step::Wait(1000)).unwrap();
        assert_eq!(report.snapshot.current, 2);
        assert!(report.snapshot.automove_running);

        runner.apply(&Step::Hover).unwrap();
        let report = runner.apply(&Step::Wait(1000)).unwrap();
        assert_eq!(report.snapshot.current, 2);
        assert!(!report.snapshot.automove_running);

        runner.apply(&Step::Leave).unwrap();
        let report = runner.apply(&Step::Wait(500)).unwrap();
        assert_eq!(report.snapshot.current, 3);
    }

    #[test]
    fn test_tap_body_advances() {
        let mut runner = runner("");
        let report = runner.apply(&Step::TapBody).unwrap();
        assert_eq!(report.snapshot.current, 1);
    }

    #[test]
    fn test_report_line() {
        let mut runner = runner("");
        let report = runner.apply(&Step::Goto(2)).unwrap();
        assert_eq!(
            report.to_line(),
            "goto 2       current=2 slides=5 left=-600px prev=on next=on"
        );

        let report = runner.apply(&Step::Goto(0)).unwrap();
        assert_eq!(
            report.to_line(),
            "goto 0       current=0 slides=5 left=0px prev=off next=on"
        );

        let report = runner.apply(&Step::Goto(2)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["step"], "goto 2");
        assert_eq!(json["offset_px"], 600);
    }

    #[test]
    fn test_html_dump() {
        let runner = runner("[layout]\nslides = 1");
        let html = runner.html();
        assert!(html.starts_with("<div id=\"carousel\">"));
        assert!(html.contains("class=\"carousel-item\""));
    }
}
