//! Scenario file handling
//!
//! A scenario is a TOML file with three parts:
//! - `[carousel]` - carousel configuration (container is generated)
//! - `[layout]` - slide count and pixel geometry of the generated markup
//! - `steps` - the script to run, one command per entry

use anyhow::{Context, Result};
use carousel_dom::NodeId;
use carousel_widget::{CarouselConfig, SlideLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::script::Step;

/// Built-in scenario used by `carousel demo`
pub const DEMO_SCENARIO: &str = r#"
name = "demo"
steps = [
    "next",
    "next",
    "click 4",
    "next",
    "prev",
    "tap-body",
    "key right",
    "hover",
    "wait 3000",
    "leave",
    "wait 1000",
    "add 2",
    "goto 6",
    "remove 0 1",
    "click prev",
]

[carousel]
automove = 1000
key_nav = true

[layout]
slides = 5
slide_width = 100
slide_margin_right = 10
viewport_width = 300
list_padding_right = 10
"#;

fn default_name() -> String {
    "carousel".to_string()
}

/// A scripted carousel run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    /// Used as the container ID
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub carousel: CarouselConfig<NodeId>,
    #[serde(default)]
    pub layout: SlideLayout,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            steps: Vec::new(),
            carousel: CarouselConfig::default(),
            layout: SlideLayout::default(),
        }
    }
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse a scenario from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        Ok(scenario)
    }

    /// The built-in demo scenario
    pub fn demo() -> Result<Self> {
        Self::parse(DEMO_SCENARIO).context("Failed to parse built-in demo scenario")
    }

    /// Parse every step, reporting the first invalid one
    pub fn steps(&self) -> Result<Vec<Step>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, line)| {
                line.parse::<Step>()
                    .with_context(|| format!("Invalid step {} `{}`", i + 1, line))
            })
            .collect()
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scenario")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_parses() {
        let scenario = Scenario::demo().unwrap();
        assert_eq!(scenario.name, "demo");
        assert_eq!(scenario.carousel.automove, Some(1000));
        assert!(scenario.carousel.key_nav);
        assert!(scenario.carousel.pagination);
        assert_eq!(scenario.layout.slide_width, 100);
        assert_eq!(scenario.steps().unwrap().len(), scenario.steps.len());
    }

    #[test]
    fn test_empty_scenario_uses_defaults() {
        let scenario = Scenario::parse("").unwrap();
        assert_eq!(scenario.name, "carousel");
        assert_eq!(scenario.layout, SlideLayout::default());
        assert_eq!(scenario.carousel.event_type, "click");
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn test_invalid_step_reported() {
        let scenario = Scenario::parse(r#"steps = ["next", "jump 3"]"#).unwrap();
        let err = scenario.steps().unwrap_err();
        assert!(err.to_string().contains("Invalid step 2"));
    }

    #[test]
    fn test_toml_round_trip() {
        let scenario = Scenario::demo().unwrap();
        let text = scenario.to_toml().unwrap();
        let parsed = Scenario::parse(&text).unwrap();
        assert_eq!(parsed.steps, scenario.steps);
        assert_eq!(parsed.carousel, scenario.carousel);
    }
}
