//! Navigation targets
//!
//! Clicks, keys and the auto-advance timer all resolve to a `Where` before
//! the carousel moves.

use std::fmt;
use std::str::FromStr;

use carousel_core::{parse_int, CarouselError};

/// A navigation request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Where {
    /// One slide back
    Prev,
    /// One slide forward
    Next,
    /// A specific slide (clamped into range on use)
    Index(i64),
}

impl FromStr for Where {
    type Err = CarouselError;

    /// Parse a marker value: `prev`, `next`, or a leading base-10 integer
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Where::Prev),
            "next" => Ok(Where::Next),
            other => parse_int(other)
                .map(Where::Index)
                .ok_or_else(|| CarouselError::InvalidTarget(other.to_string())),
        }
    }
}

impl From<i64> for Where {
    fn from(index: i64) -> Self {
        Where::Index(index)
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Where::Prev => f.write_str("prev"),
            Where::Next => f.write_str("next"),
            Where::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Resolve a request against the current position
///
/// Returns the index to navigate to. Out-of-range `Index` values pass
/// through untouched; `goto` clamps them.
pub fn resolve(target: Where, current: usize, slide_count: usize, continuous: bool) -> i64 {
    let current = current as i64;
    let count = slide_count as i64;
    match target {
        Where::Prev if current >= 1 => current - 1,
        Where::Prev if continuous => count - 1,
        Where::Next if current + 1 < count => current + 1,
        Where::Next if continuous => 0,
        Where::Prev | Where::Next => current,
        Where::Index(i) => i,
    }
}
