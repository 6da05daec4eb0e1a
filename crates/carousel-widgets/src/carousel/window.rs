//! Index arithmetic for the carousel window.
//!
//! Everything here is a pure function of a [`CarouselConfiguration`] and the
//! scroll container's offset/viewport. The widget recomputes the
//! configuration on every pass; nothing in this module caches it.
//!
//! Cell `i` occupies `[padding + i * stride, padding + i * stride + width)`
//! on the scroll axis, where `stride = width + padding`.

use std::fmt;
use std::ops::Range;

use carousel_core::geometry::{Rect, Size};

/// Smallest snap target. Some hosts treat a target of exactly zero as
/// "no adjustment", so snapping to the first page lands one unit in.
pub const MIN_SNAP_OFFSET: f32 = 1.0;

/// Geometry and caching parameters supplied by the data source for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfiguration {
    /// Total number of items.
    pub cell_count: usize,
    /// Size of every cell.
    pub cell_size: Size,
    /// Gap before the first cell, between cells, and after the last cell.
    pub padding: f32,
    /// Extra cells kept materialized around the viewport, split before/after.
    pub cache_size: usize,
}

impl CarouselConfiguration {
    #[must_use]
    pub const fn new(cell_count: usize, cell_size: Size, padding: f32, cache_size: usize) -> Self {
        Self {
            cell_count,
            cell_size,
            padding,
            cache_size,
        }
    }

    /// Distance between the left edges of two neighbouring cells.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> f32 {
        self.cell_size.width + self.padding
    }

    /// Check that the geometry can be used for index arithmetic.
    pub fn validate(&self) -> Result<(), CarouselConfigError> {
        let size = self.cell_size;
        if !size.is_finite() || size.width < 0.0 || size.height < 0.0 {
            return Err(CarouselConfigError::InvalidCellSize { size });
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(CarouselConfigError::InvalidPadding {
                padding: self.padding,
            });
        }
        let stride = self.stride();
        if stride <= 0.0 {
            return Err(CarouselConfigError::NonPositiveStride { stride });
        }
        Ok(())
    }

    /// Total scrollable content size. Height follows the viewport.
    #[must_use]
    pub fn content_size(&self, viewport_height: f32) -> Size {
        Size::new(
            self.cell_count as f32 * self.stride() + self.padding,
            viewport_height,
        )
    }

    /// Frame for the cell at `index`, vertically centered in the viewport.
    #[must_use]
    pub fn item_frame(&self, index: usize, viewport_height: f32) -> Rect {
        let x = self.padding + index as f32 * (self.padding + self.cell_size.width);
        let y = viewport_height / 2.0 - self.cell_size.height / 2.0;
        Rect::new(x, y, self.cell_size.width, self.cell_size.height)
    }

    /// Item index considered "on screen" for a content offset.
    ///
    /// The divisor is `2 * padding + width`, not the stride; a host that
    /// snaps with [`snap_offset`](Self::snap_offset) and then reads the index
    /// back sees this formula, so it must not be "corrected" independently.
    #[must_use]
    pub fn index_for_offset(&self, offset_x: f32) -> usize {
        let divisor = 2.0 * self.padding + self.cell_size.width;
        if !(divisor > 0.0) {
            return 0;
        }
        let raw = ((offset_x + self.padding + self.cell_size.width / 2.0) / divisor).floor();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            raw as usize
        }
    }

    /// Content offset that centers cell `index` in a viewport of the given width.
    ///
    /// Targets at or below zero are lifted to [`MIN_SNAP_OFFSET`].
    #[must_use]
    pub fn snap_offset(&self, index: usize, viewport_width: f32) -> f32 {
        let mut x = index as f32 * (self.padding + self.cell_size.width);
        x -= (viewport_width - self.cell_size.width) / 2.0 + self.padding;
        if x <= 0.0 { MIN_SNAP_OFFSET } else { x }
    }
}

/// Geometry that cannot drive the window computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselConfigError {
    /// `cell_size.width + padding` is zero or negative.
    NonPositiveStride { stride: f32 },
    /// Cell size is negative, NaN, or infinite.
    InvalidCellSize { size: Size },
    /// Padding is negative, NaN, or infinite.
    InvalidPadding { padding: f32 },
}

impl fmt::Display for CarouselConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveStride { stride } => {
                write!(f, "cell width + padding must be > 0 (got {stride})")
            }
            Self::InvalidCellSize { size } => write!(
                f,
                "cell size must be finite and non-negative (got {}x{})",
                size.width, size.height
            ),
            Self::InvalidPadding { padding } => {
                write!(f, "padding must be finite and >= 0 (got {padding})")
            }
        }
    }
}

impl std::error::Error for CarouselConfigError {}

/// Half-open range `[start, end)` of item indices that must be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselWindow {
    pub start: usize,
    pub end: usize,
}

impl CarouselWindow {
    /// Compute the window for a content offset and viewport width.
    ///
    /// `start` is clamped to `>= 0`, `end` to `<= cell_count`, and `start`
    /// never exceeds `end`. The configuration must have passed
    /// [`CarouselConfiguration::validate`].
    #[must_use]
    pub fn compute(config: &CarouselConfiguration, offset_x: f32, viewport_width: f32) -> Self {
        let stride = config.stride();
        let half_cache = i64::try_from(config.cache_size / 2).unwrap_or(i64::MAX);
        let count = i64::try_from(config.cell_count).unwrap_or(i64::MAX);

        // `as` saturates and maps NaN to zero.
        let first = (offset_x / stride).floor() as i64;
        let last = ((offset_x + viewport_width) / stride).floor() as i64;

        let end = last.saturating_add(half_cache).min(count).max(0);
        let start = first.saturating_sub(half_cache).max(0).min(end);

        Self {
            start: start as usize,
            end: end as usize,
        }
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Index ranges outside the window, below `upper`.
    ///
    /// `trailing_gap` skips that many indices past `end` before the trailing
    /// range begins (`0` covers everything outside the window).
    #[must_use]
    pub fn outside(&self, upper: usize, trailing_gap: usize) -> [Range<usize>; 2] {
        let leading = 0..self.start.min(upper);
        let trailing_start = self.end.saturating_add(trailing_gap);
        let trailing = trailing_start..upper.max(trailing_start);
        [leading, trailing]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CarouselConfiguration {
        CarouselConfiguration::new(20, Size::new(100.0, 50.0), 10.0, 2)
    }

    #[test]
    fn window_matches_worked_example() {
        // floor(500/110) - 1 = 3; floor(800/110) + 1 = 8
        let window = CarouselWindow::compute(&sample(), 500.0, 300.0);
        assert_eq!(window, CarouselWindow { start: 3, end: 8 });
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn window_clamps_at_start() {
        let window = CarouselWindow::compute(&sample(), 0.0, 300.0);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 3);
    }

    #[test]
    fn window_clamps_at_cell_count() {
        let window = CarouselWindow::compute(&sample(), 2000.0, 300.0);
        assert_eq!(window.end, 20);
        assert_eq!(window.start, 17);
    }

    #[test]
    fn window_past_content_is_empty_and_well_formed() {
        let window = CarouselWindow::compute(&sample(), 10_000.0, 300.0);
        assert!(window.is_empty());
        assert!(window.start <= window.end);
        assert_eq!(window.end, 20);
    }

    #[test]
    fn window_with_negative_offset() {
        // Rubber-banding past the leading edge.
        let window = CarouselWindow::compute(&sample(), -50.0, 300.0);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 3);
    }

    #[test]
    fn window_for_empty_carousel() {
        let config = CarouselConfiguration::new(0, Size::new(100.0, 50.0), 10.0, 4);
        let window = CarouselWindow::compute(&config, 500.0, 300.0);
        assert!(window.is_empty());
        assert_eq!(window.range(), 0..0);
    }

    #[test]
    fn odd_cache_size_rounds_down_per_side() {
        let config = CarouselConfiguration::new(20, Size::new(100.0, 50.0), 10.0, 3);
        let window = CarouselWindow::compute(&config, 500.0, 300.0);
        assert_eq!(window, CarouselWindow { start: 3, end: 8 });
    }

    #[test]
    fn outside_ranges() {
        let window = CarouselWindow { start: 3, end: 8 };
        assert_eq!(window.outside(20, 0), [0..3, 8..20]);
        assert_eq!(window.outside(20, 1), [0..3, 9..20]);
        // Upper bound below the window end.
        let [leading, trailing] = window.outside(5, 0);
        assert_eq!(leading, 0..3);
        assert!(trailing.is_empty());
    }

    #[test]
    fn content_size_spans_all_cells() {
        let size = sample().content_size(200.0);
        assert_eq!(size, Size::new(20.0 * 110.0 + 10.0, 200.0));
    }

    #[test]
    fn item_frames_are_padded_and_centered() {
        let config = sample();
        assert_eq!(config.item_frame(0, 200.0), Rect::new(10.0, 75.0, 100.0, 50.0));
        assert_eq!(config.item_frame(3, 200.0), Rect::new(340.0, 75.0, 100.0, 50.0));
        assert!(!config.item_frame(3, 200.0).intersects(&config.item_frame(4, 200.0)));
    }

    #[test]
    fn snap_offset_matches_worked_example() {
        assert_eq!(sample().snap_offset(5, 300.0), 440.0);
    }

    #[test]
    fn snap_offset_floors_at_one_unit() {
        assert_eq!(sample().snap_offset(0, 300.0), MIN_SNAP_OFFSET);
        assert_eq!(sample().snap_offset(1, 300.0), MIN_SNAP_OFFSET);
    }

    #[test]
    fn index_for_offset_uses_double_padding_divisor() {
        let config = sample();
        assert_eq!(config.index_for_offset(0.0), 0);
        // (440 + 10 + 50) / 120 = 4.16
        assert_eq!(config.index_for_offset(440.0), 4);
        assert_eq!(config.index_for_offset(-500.0), 0);
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        let zero = CarouselConfiguration::new(5, Size::new(0.0, 10.0), 0.0, 0);
        assert!(matches!(
            zero.validate(),
            Err(CarouselConfigError::NonPositiveStride { .. })
        ));

        let nan = CarouselConfiguration::new(5, Size::new(f32::NAN, 10.0), 0.0, 0);
        assert!(matches!(
            nan.validate(),
            Err(CarouselConfigError::InvalidCellSize { .. })
        ));

        let negative = CarouselConfiguration::new(5, Size::new(10.0, 10.0), -1.0, 0);
        assert!(matches!(
            negative.validate(),
            Err(CarouselConfigError::InvalidPadding { .. })
        ));

        assert!(sample().validate().is_ok());
    }

    #[test]
    fn config_error_display() {
        let err = CarouselConfigError::NonPositiveStride { stride: 0.0 };
        assert_eq!(err.to_string(), "cell width + padding must be > 0 (got 0)");
    }
}
