//! Scenario step commands

use anyhow::{anyhow, bail, Context, Result};
use carousel_core::KeyCode;
use std::fmt;
use std::str::FromStr;

/// One scripted interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `next`: navigate forward through `process_where`
    Next,
    /// `prev`: navigate back through `process_where`
    Prev,
    /// `goto N`
    Goto(i64),
    /// `click MARKER`: activate the nav link carrying this marker value
    Click(String),
    /// `tap-body`: activate the current slide
    TapBody,
    /// `key left|right`
    Key(KeyCode),
    /// `hover`: move the pointer over the container
    Hover,
    /// `leave`: move the pointer off the container
    Leave,
    /// `wait MS`: advance the timer clock
    Wait(u64),
    /// `add N`: append N generated slides
    Add(usize),
    /// `remove I...`: remove slides by position
    Remove(Vec<usize>),
}

fn arg<'a>(parts: &mut impl Iterator<Item = &'a str>, command: &str) -> Result<&'a str> {
    parts
        .next()
        .ok_or_else(|| anyhow!("`{}` needs an argument", command))
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let command = parts.next().ok_or_else(|| anyhow!("empty step"))?;

        let step = match command {
            "next" => Step::Next,
            "prev" => Step::Prev,
            "goto" => {
                let value = arg(&mut parts, command)?;
                Step::Goto(value.parse().with_context(|| format!("bad index `{}`", value))?)
            }
            "click" => Step::Click(arg(&mut parts, command)?.to_string()),
            "tap-body" => Step::TapBody,
            "key" => {
                let name = arg(&mut parts, command)?;
                match KeyCode::from_name(name) {
                    Some(key @ (KeyCode::ArrowLeft | KeyCode::ArrowRight)) => Step::Key(key),
                    _ => bail!("unsupported key `{}` (use left or right)", name),
                }
            }
            "hover" => Step::Hover,
            "leave" => Step::Leave,
            "wait" => {
                let value = arg(&mut parts, command)?;
                Step::Wait(value.parse().with_context(|| format!("bad duration `{}`", value))?)
            }
            "add" => {
                let value = arg(&mut parts, command)?;
                Step::Add(value.parse().with_context(|| format!("bad count `{}`", value))?)
            }
            "remove" => {
                let indices = parts
                    .by_ref()
                    .map(|value| {
                        value
                            .parse()
                            .with_context(|| format!("bad position `{}`", value))
                    })
                    .collect::<Result<Vec<usize>>>()?;
                if indices.is_empty() {
                    bail!("`remove` needs at least one position");
                }
                Step::Remove(indices)
            }
            other => bail!("unknown command `{}`", other),
        };

        if let Some(extra) = parts.next() {
            bail!("unexpected argument `{}`", extra);
        }
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Next => f.write_str("next"),
            Step::Prev => f.write_str("prev"),
            Step::Goto(i) => write!(f, "goto {}", i),
            Step::Click(marker) => write!(f, "click {}", marker),
            Step::TapBody => f.write_str("tap-body"),
            Step::Key(KeyCode::ArrowLeft) => f.write_str("key left"),
            Step::Key(KeyCode::ArrowRight) => f.write_str("key right"),
            Step::Key(other) => write!(f, "key {:?}", other),
            Step::Hover => f.write_str("hover"),
            Step::Leave => f.write_str("leave"),
            Step::Wait(ms) => write!(f, "wait {}", ms),
            Step::Add(n) => write!(f, "add {}", n),
            Step::Remove(indices) => {
                f.write_str("remove")?;
                for i in indices {
                    write!(f, " {}", i)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("next".parse::<Step>().unwrap(), Step::Next);
        assert_eq!("goto -2".parse::<Step>().unwrap(), Step::Goto(-2));
        assert_eq!("click prev".parse::<Step>().unwrap(), Step::Click("prev".into()));
        assert_eq!("key Left".parse::<Step>().unwrap(), Step::Key(KeyCode::ArrowLeft));
        assert_eq!("wait 250".parse::<Step>().unwrap(), Step::Wait(250));
        assert_eq!(
            "remove 3 1 3".parse::<Step>().unwrap(),
            Step::Remove(vec![3, 1, 3])
        );
        assert_eq!("  tap-body  ".parse::<Step>().unwrap(), Step::TapBody);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Step>().is_err());
        assert!("goto".parse::<Step>().is_err());
        assert!("goto x".parse::<Step>().is_err());
        assert!("key up".parse::<Step>().is_err());
        assert!("remove".parse::<Step>().is_err());
        assert!("next 2".parse::<Step>().is_err());
        assert!("fly".parse::<Step>().is_err());
    }

    #[test]
    fn test_display_reparses() {
        for line in ["prev", "goto 3", "click 2", "key right", "add 1", "remove 0 4"] {
            let step: Step = line.parse().unwrap();
            assert_eq!(step.to_string(), line);
        }
    }
}
