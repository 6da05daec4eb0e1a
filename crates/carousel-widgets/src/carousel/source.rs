//! Collaborator traits: the views the carousel places, the data source that
//! produces them, and the pass-through scroll observer.

use carousel_core::geometry::{Point, Rect, Size};

use super::window::CarouselConfiguration;

/// A child view placed by the carousel.
///
/// The carousel owns every view it materializes. Attaching a view to the
/// display is bracketed by `will_appear`/`did_appear`, detaching by
/// `will_disappear`/`did_disappear`. The `animated` flag is `true` when the
/// notification comes from scroll tracking rather than from a layout pass.
pub trait CarouselView {
    /// Position the view in content coordinates.
    fn set_frame(&mut self, frame: Rect);

    fn will_appear(&mut self, animated: bool) {
        let _ = animated;
    }

    fn did_appear(&mut self, animated: bool) {
        let _ = animated;
    }

    fn will_disappear(&mut self, animated: bool) {
        let _ = animated;
    }

    fn did_disappear(&mut self, animated: bool) {
        let _ = animated;
    }
}

/// Supplies item geometry and constructs views on demand.
///
/// All methods take `&self`; a data source that tracks state across calls
/// (e.g. counting [`scrolled_to_index`](Self::scrolled_to_index)) uses
/// interior mutability. Implementations must not call back into the
/// carousel.
pub trait CarouselDataSource {
    type View: CarouselView;

    fn cell_count(&self) -> usize;

    fn cell_size(&self) -> Size;

    fn padding(&self) -> f32;

    /// Extra cells to keep materialized beyond the viewport, split before/after.
    fn cache_size(&self) -> usize;

    /// Construct the view for `index`. Ownership passes to the carousel.
    fn view_for_index(&self, index: usize) -> Self::View;

    /// The on-screen index changed.
    fn scrolled_to_index(&self, index: usize) {
        let _ = index;
    }

    /// All four geometry queries in one snapshot.
    fn configuration(&self) -> CarouselConfiguration {
        CarouselConfiguration::new(
            self.cell_count(),
            self.cell_size(),
            self.padding(),
            self.cache_size(),
        )
    }
}

/// Observer for scroll-container notifications, called after the
/// carousel's own handling.
pub trait ScrollDelegate {
    fn did_scroll(&self, offset: Point) {
        let _ = offset;
    }

    /// `target` already holds the carousel's snapped offset (if snapping is
    /// on) and may be adjusted further.
    fn will_end_dragging(&self, velocity: Point, target: &mut Point) {
        let _ = (velocity, target);
    }

    fn did_end_scrolling_animation(&self) {}

    fn did_end_decelerating(&self) {}
}
