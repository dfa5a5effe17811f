//! Grid snapping and bounds clamping for position/size edits.
//!
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// Default spacing between grid lines, in page units.
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// Round `value` to the nearest multiple of `grid_size` when `enabled`.
///
/// A grid size that is not a positive finite number disables snapping.
#[must_use]
pub fn snap(value: f64, grid_size: f64, enabled: bool) -> f64 {
    if !enabled || !(grid_size.is_finite() && grid_size > 0.0) {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Floor a value at zero.
#[must_use]
pub fn clamp_non_negative(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Grid state driven by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    /// Spacing between grid lines.
    pub size: f64,
    /// Whether position/size proposals snap to the grid.
    pub snap_to_grid: bool,
    /// Whether the host draws the grid.
    pub show_grid: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            snap_to_grid: false,
            show_grid: false,
        }
    }
}

impl GridSettings {
    /// Normalize a proposed position.
    #[must_use]
    pub fn normalize_position(&self, value: f64) -> f64 {
        snap(value, self.size, self.snap_to_grid)
    }

    /// Normalize a proposed size: snapped, then floored at zero.
    #[must_use]
    pub fn normalize_size(&self, value: f64) -> f64 {
        clamp_non_negative(snap(value, self.size, self.snap_to_grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_nearest_multiple() {
        assert!((snap(13.0, 10.0, true) - 10.0).abs() < f64::EPSILON);
        assert!((snap(15.0, 10.0, true) - 20.0).abs() < f64::EPSILON);
        assert!((snap(-13.0, 10.0, true) + 10.0).abs() < f64::EPSILON);
        assert!((snap(7.4, 2.5, true) - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_disabled_is_identity() {
        assert!((snap(13.37, 10.0, false) - 13.37).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_ignores_degenerate_grid() {
        assert!((snap(13.0, 0.0, true) - 13.0).abs() < f64::EPSILON);
        assert!((snap(13.0, -5.0, true) - 13.0).abs() < f64::EPSILON);
        assert!((snap(13.0, f64::NAN, true) - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert!(clamp_non_negative(-4.0).abs() < f64::EPSILON);
        assert!((clamp_non_negative(4.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_size_normalization_clamps_after_snap() {
        let grid = GridSettings {
            size: 10.0,
            snap_to_grid: true,
            show_grid: true,
        };
        assert!(grid.normalize_size(-12.0).abs() < f64::EPSILON);
        assert!((grid.normalize_size(26.0) - 30.0).abs() < f64::EPSILON);
        assert!((grid.normalize_position(-12.0) + 10.0).abs() < f64::EPSILON);
    }
}
