//! Track geometry
//!
//! Derives how far the list moves per slide and how far it may move in
//! total from a handful of measured pixel values.

use serde::{Deserialize, Serialize};

/// Measured pixel values the track is derived from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Measurements {
    /// `width` of the first slide
    pub slide_width: i64,
    /// `margin-right` of the first slide
    pub slide_margin_right: i64,
    /// `width` of the viewport
    pub viewport_width: i64,
    /// `padding-right` of the list
    pub list_padding_right: i64,
    /// Number of slides in the list
    pub slide_count: usize,
}

/// Derived movement limits for the list element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Pixels per slide
    pub move_distance: i64,
    /// Largest allowed shift when several slides fit in the viewport
    pub max_offset: Option<i64>,
}

impl Track {
    /// Compute the track from measurements
    ///
    /// A cap only exists when one slide is narrower than the viewport;
    /// it never goes below zero.
    pub fn from_geometry(m: &Measurements) -> Self {
        let move_distance = m.slide_width.saturating_add(m.slide_margin_right);
        let max_offset = (move_distance < m.viewport_width).then(|| {
            move_distance
                .saturating_mul(m.slide_count as i64)
                .saturating_add(m.list_padding_right)
                .saturating_sub(m.viewport_width)
                .max(0)
        });
        Self {
            move_distance,
            max_offset,
        }
    }

    /// Offset for `index`, capped, and whether the cap was reached
    pub fn offset_for(&self, index: usize) -> (i64, bool) {
        let raw = self.move_distance.saturating_mul(index as i64);
        match self.max_offset {
            Some(max) if raw >= max => (max, true),
            _ => (raw, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(slide: i64, margin: i64, viewport: i64, count: usize) -> Measurements {
        Measurements {
            slide_width: slide,
            slide_margin_right: margin,
            viewport_width: viewport,
            list_padding_right: 0,
            slide_count: count,
        }
    }

    #[test]
    fn test_full_width_slides_have_no_cap() {
        let track = Track::from_geometry(&measurements(300, 0, 300, 5));
        assert_eq!(track.move_distance, 300);
        assert_eq!(track.max_offset, None);
        assert_eq!(track.offset_for(4), (1200, false));
    }

    #[test]
    fn test_cap_with_several_visible() {
        // 110px per slide, 5 slides, 300px window: 550 - 300
        let track = Track::from_geometry(&measurements(100, 10, 300, 5));
        assert_eq!(track.move_distance, 110);
        assert_eq!(track.max_offset, Some(250));

        assert_eq!(track.offset_for(1), (110, false));
        assert_eq!(track.offset_for(3), (250, true));
        assert_eq!(track.offset_for(4), (250, true));
    }

    #[test]
    fn test_padding_extends_cap() {
        let m = Measurements {
            list_padding_right: 20,
            ..measurements(100, 0, 250, 4)
        };
        assert_eq!(Track::from_geometry(&m).max_offset, Some(170));
    }

    #[test]
    fn test_cap_floors_at_zero() {
        // Everything fits: the list never moves and next is capped at 0
        let track = Track::from_geometry(&measurements(100, 0, 400, 2));
        assert_eq!(track.max_offset, Some(0));
        assert_eq!(track.offset_for(0), (0, true));
        assert_eq!(track.offset_for(1), (0, true));
    }

    #[test]
    fn test_missing_styles_measure_zero() {
        let track = Track::from_geometry(&Measurements::default());
        assert_eq!(track, Track { move_distance: 0, max_offset: None });
        assert_eq!(track.offset_for(3), (0, false));
    }
}
