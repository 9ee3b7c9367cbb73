//! Pagination controls
//!
//! Prev/next enablement and the "current page" highlight, both derived from
//! the carousel position after every move.

use carousel_core::{Dom, Result};

use crate::config::Markup;

/// Which of the prev/next controls are disabled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Boundary {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl Boundary {
    /// Compute control state for a position
    ///
    /// Wrapping carousels keep both controls live, except that a reached
    /// overscroll cap always disables next.
    pub fn compute(current: usize, slide_count: usize, continuous: bool, reached_cap: bool) -> Self {
        let mut boundary = if continuous {
            Boundary::default()
        } else if slide_count <= 1 {
            Boundary {
                prev_disabled: true,
                next_disabled: true,
            }
        } else {
            Boundary {
                prev_disabled: current == 0,
                next_disabled: current + 1 >= slide_count,
            }
        };
        if reached_cap {
            boundary.next_disabled = true;
        }
        boundary
    }
}

/// Resolved pagination elements
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination<N> {
    /// Pagination root
    pub root: N,
    pub prev: Option<N>,
    pub next: Option<N>,
    /// Every marker-bearing element inside the root, prev/next included
    pub links: Vec<N>,
}

impl<N: Copy + Eq> Pagination<N> {
    /// Look up the controls inside `root`
    pub fn resolve<D: Dom<Node = N>>(dom: &D, root: N, markup: &Markup) -> Result<Self> {
        Ok(Self {
            root,
            prev: dom.query(root, &markup.marker_value_selector("prev"))?,
            next: dom.query(root, &markup.marker_value_selector("next"))?,
            links: dom.query_all(root, &markup.marker_selector())?,
        })
    }

    /// Toggle the disabled class on prev/next
    pub fn apply_boundary<D: Dom<Node = N>>(&self, dom: &mut D, markup: &Markup, boundary: Boundary) {
        for (control, disabled) in [
            (self.prev, boundary.prev_disabled),
            (self.next, boundary.next_disabled),
        ] {
            if let Some(node) = control {
                if disabled {
                    dom.add_class(node, &markup.disabled_class);
                } else {
                    dom.remove_class(node, &markup.disabled_class);
                }
            }
        }
    }

    /// Move the current class to the links whose marker is `current`
    pub fn highlight<D: Dom<Node = N>>(&self, dom: &mut D, markup: &Markup, current: usize) {
        let wanted = current.to_string();
        for link in &self.links {
            dom.remove_class(*link, &markup.current_class);
        }
        for link in &self.links {
            if dom.attr(*link, &markup.marker).as_deref() == Some(wanted.as_str()) {
                dom.add_class(*link, &markup.current_class);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_edges() {
        assert_eq!(
            Boundary::compute(0, 4, false, false),
            Boundary { prev_disabled: true, next_disabled: false }
        );
        assert_eq!(
            Boundary::compute(3, 4, false, false),
            Boundary { prev_disabled: false, next_disabled: true }
        );
        assert_eq!(Boundary::compute(2, 4, false, false), Boundary::default());
    }

    #[test]
    fn test_single_slide_disables_both() {
        assert_eq!(
            Boundary::compute(0, 1, false, false),
            Boundary { prev_disabled: true, next_disabled: true }
        );
        assert_eq!(
            Boundary::compute(0, 0, false, false),
            Boundary { prev_disabled: true, next_disabled: true }
        );
    }

    #[test]
    fn test_continuous_enables_both() {
        assert_eq!(Boundary::compute(0, 4, true, false), Boundary::default());
        assert_eq!(Boundary::compute(3, 4, true, false), Boundary::default());
    }

    #[test]
    fn test_cap_forces_next_disabled() {
        let boundary = Boundary::compute(2, 5, false, true);
        assert!(boundary.next_disabled);
        assert!(!boundary.prev_disabled);

        assert!(Boundary::compute(2, 5, true, true).next_disabled);
    }
}
