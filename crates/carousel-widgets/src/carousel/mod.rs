//! Windowed carousel: a horizontally scrolling row that materializes,
//! positions, and recycles child views as the user scrolls.
//!
//! # Model
//!
//! The carousel sits on top of a host scroll container. The host owns
//! gestures, deceleration, and drawing; it reports offset changes through
//! [`WindowedCarousel::on_scroll_position_changed`] (or
//! [`handle_scroll_event`](WindowedCarousel::handle_scroll_event)) and runs
//! layout passes when [`needs_layout`](WindowedCarousel::needs_layout) is set.
//!
//! Each layout pass:
//!
//! 1. Asks the data source for a [`CarouselConfiguration`].
//! 2. Computes the [`CarouselWindow`] for the current offset.
//! 3. Materializes missing views in the window and attaches any detached ones.
//! 4. Detaches attached views outside the window (they stay resident).
//! 5. Applies the [`SlotResidency`] policy to resident, detached views.
//!
//! # Example
//!
//! ```ignore
//! let source = Rc::new(MyDataSource::new());
//! let mut carousel = WindowedCarousel::new(CarouselOptions::default());
//! carousel.set_data_source(&source);
//! carousel.layout(0.0, Size::new(320.0, 120.0));
//! for (index, frame, view) in carousel.attached_views() {
//!     host.draw(view, frame);
//! }
//! ```

mod options;
mod slots;
mod source;
mod window;

pub use options::{CarouselOptions, OptionsError, OptionsParse, Quirks};
pub use slots::{Slot, SlotResidency, SlotStore};
pub use source::{CarouselDataSource, CarouselView, ScrollDelegate};
pub use window::{CarouselConfigError, CarouselConfiguration, CarouselWindow, MIN_SNAP_OFFSET};

use std::rc::{Rc, Weak};

use carousel_core::geometry::{Point, Rect, Size};
use carousel_core::scroll::{ScrollEvent, ScrollRequest};
use carousel_core::{debug, debug_span, warn};

type DataSourceRef<V> = Weak<dyn CarouselDataSource<View = V>>;
type DataSourceRc<V> = Rc<dyn CarouselDataSource<View = V>>;

/// A virtualizing, horizontally scrolling row of child views.
///
/// Single-threaded: every method runs to completion on the caller's thread
/// and the data source is called synchronously.
pub struct WindowedCarousel<V: CarouselView + 'static> {
    current_index: usize,
    options: CarouselOptions,
    slots: SlotStore<V>,
    data_source: Option<DataSourceRef<V>>,
    scroll_delegate: Option<Weak<dyn ScrollDelegate>>,
    /// Host container state as last reported.
    content_offset: Point,
    viewport: Size,
    content_size: Size,
    needs_layout: bool,
    pending_scroll: Option<ScrollRequest>,
    last_window: Option<CarouselWindow>,
}

impl<V: CarouselView + 'static> WindowedCarousel<V> {
    /// Create a carousel with no collaborators attached.
    #[must_use]
    pub fn new(options: CarouselOptions) -> Self {
        Self {
            current_index: 0,
            options,
            slots: SlotStore::new(),
            data_source: None,
            scroll_delegate: None,
            content_offset: Point::ZERO,
            viewport: Size::ZERO,
            content_size: Size::ZERO,
            needs_layout: true,
            pending_scroll: None,
            last_window: None,
        }
    }

    // --- Collaborators ------------------------------------------------------

    /// Attach a data source. The carousel keeps only a weak reference.
    pub fn set_data_source<S>(&mut self, source: &Rc<S>)
    where
        S: CarouselDataSource<View = V> + 'static,
    {
        let weak: Weak<S> = Rc::downgrade(source);
        let weak: DataSourceRef<V> = weak;
        self.data_source = Some(weak);
        self.needs_layout = true;
    }

    pub fn clear_data_source(&mut self) {
        self.data_source = None;
        self.needs_layout = true;
    }

    /// Attach a pass-through observer. The carousel keeps only a weak reference.
    pub fn set_scroll_delegate<D>(&mut self, delegate: &Rc<D>)
    where
        D: ScrollDelegate + 'static,
    {
        let weak: Weak<D> = Rc::downgrade(delegate);
        let weak: Weak<dyn ScrollDelegate> = weak;
        self.scroll_delegate = Some(weak);
    }

    pub fn clear_scroll_delegate(&mut self) {
        self.scroll_delegate = None;
    }

    fn data_source(&self) -> Option<DataSourceRc<V>> {
        self.data_source.as_ref()?.upgrade()
    }

    fn scroll_delegate(&self) -> Option<Rc<dyn ScrollDelegate>> {
        self.scroll_delegate.as_ref()?.upgrade()
    }

    /// Upgrade the data source and snapshot a usable configuration.
    fn source_and_config(&self) -> Option<(DataSourceRc<V>, CarouselConfiguration)> {
        let source = self.data_source()?;
        let config = source.configuration();
        match config.validate() {
            Ok(()) => Some((source, config)),
            Err(err) => {
                warn!(error = %err, "carousel configuration rejected");
                None
            }
        }
    }

    // --- Properties ---------------------------------------------------------

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn set_current_index(&mut self, index: usize) {
        self.current_index = index;
    }

    #[inline]
    pub fn snap_to_page(&self) -> bool {
        self.options.snap_to_page
    }

    pub fn set_snap_to_page(&mut self, snap: bool) {
        self.options.snap_to_page = snap;
    }

    #[inline]
    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    #[inline]
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Total scrollable size computed by the last layout pass.
    #[inline]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Window computed by the last layout pass that had a data source.
    #[inline]
    pub fn last_window(&self) -> Option<CarouselWindow> {
        self.last_window
    }

    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn set_needs_layout(&mut self) {
        self.needs_layout = true;
    }

    /// Take the pending animated scroll request, if any.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }

    // --- Slot introspection -------------------------------------------------

    pub fn slots(&self) -> &SlotStore<V> {
        &self.slots
    }

    pub fn resident_count(&self) -> usize {
        self.slots.resident_count()
    }

    /// Indices currently attached to the display, ascending.
    pub fn attached_indices(&self) -> Vec<usize> {
        self.slots.attached_indices()
    }

    /// Attached `(index, frame, view)` triples, ascending by index.
    pub fn attached_views(&self) -> impl Iterator<Item = (usize, Rect, &V)> + '_ {
        self.slots.iter().filter_map(|(index, slot)| {
            if slot.is_attached() {
                slot.frame().map(|frame| (index, frame, slot.view()))
            } else {
                None
            }
        })
    }

    /// Last frame assigned to the view at `index`.
    pub fn slot_frame(&self, index: usize) -> Option<Rect> {
        self.slots.get(index).and_then(Slot::frame)
    }

    pub fn view(&self, index: usize) -> Option<&V> {
        self.slots.get(index).map(Slot::view)
    }

    // --- Layout -------------------------------------------------------------

    /// Run a layout pass for the given offset and viewport.
    ///
    /// No-op (beyond recording the offset and viewport) when no data source
    /// is attached or its configuration is invalid.
    pub fn layout(&mut self, offset_x: f32, viewport: Size) {
        self.content_offset.x = offset_x;
        self.viewport = viewport;
        self.perform_layout();
    }

    /// Run a layout pass with the stored offset and viewport if one was requested.
    pub fn layout_if_needed(&mut self) {
        if self.needs_layout {
            self.perform_layout();
        }
    }

    fn perform_layout(&mut self) {
        self.needs_layout = false;
        let Some((source, config)) = self.source_and_config() else {
            return;
        };

        let offset_x = self.content_offset.x;
        let viewport = self.viewport;
        let window = CarouselWindow::compute(&config, offset_x, viewport.width);

        let _span = debug_span!(
            "carousel_layout",
            offset = offset_x,
            viewport_w = viewport.width,
            start = window.start,
            end = window.end,
            cell_count = config.cell_count
        )
        .entered();

        self.content_size = config.content_size(viewport.height);
        self.slots.advance_tick();

        for index in window.range() {
            if !self.slots.contains(index) {
                let view = source.view_for_index(index);
                self.slots.insert(index, view);
                debug!(index, "materialized");
            }
            let frame = config.item_frame(index, viewport.height);
            if self.slots.attach(index, frame) {
                debug!(index, x = frame.x, "attached");
            } else {
                self.slots.reposition(index, frame);
            }
        }

        // Ranges are fixed up front; detaching never resizes the store.
        let (upper, trailing_gap) = if self.options.quirks.contains(Quirks::SKIP_TRAILING_EDGE) {
            (config.cell_count, 1)
        } else {
            (self.slots.span().max(config.cell_count), 0)
        };
        let (first, span) = (self.slots.first_index(), self.slots.span());
        for range in window.outside(upper, trailing_gap) {
            for index in range.start.max(first)..range.end.min(span) {
                if self.slots.detach(index) {
                    debug!(index, "detached");
                }
            }
        }

        let evicted = self.slots.evict(self.options.residency);
        if !evicted.is_empty() {
            debug!(count = evicted.len(), "evicted detached views");
        }

        self.last_window = Some(window);
    }

    // --- Scroll tracking ----------------------------------------------------

    /// Dispatch a host notification. Returns the adjusted target for
    /// [`ScrollEvent::WillEndDragging`], `None` otherwise.
    pub fn handle_scroll_event(&mut self, event: ScrollEvent) -> Option<Point> {
        match event {
            ScrollEvent::Scrolled { offset } => {
                self.on_scroll_position_changed(offset.x);
                None
            }
            ScrollEvent::WillEndDragging { velocity, target } => {
                Some(self.will_end_dragging(velocity, target))
            }
            ScrollEvent::DidEndScrollingAnimation => {
                self.did_end_scrolling_animation();
                None
            }
            ScrollEvent::DidEndDecelerating => {
                self.did_end_decelerating();
                None
            }
        }
    }

    /// Track the on-screen index for a new content offset.
    ///
    /// When the index changes, the displayed view gets `will_appear(true)`,
    /// the data source is told, then the (new) displayed view gets
    /// `did_appear(true)`. Always requests a layout and forwards to the
    /// scroll delegate.
    pub fn on_scroll_position_changed(&mut self, offset_x: f32) {
        self.content_offset.x = offset_x;

        if let Some((source, config)) = self.source_and_config() {
            let new_index = config.index_for_offset(offset_x);
            if new_index != self.current_index {
                debug!(from = self.current_index, to = new_index, "index changed");
                if self.options.quirks.contains(Quirks::STALE_APPEAR_TARGET) {
                    if let Some(view) = self.view_on_display() {
                        view.will_appear(true);
                    }
                    self.current_index = new_index;
                } else {
                    self.current_index = new_index;
                    if let Some(view) = self.view_on_display() {
                        view.will_appear(true);
                    }
                }

                source.scrolled_to_index(new_index);

                if let Some(view) = self.view_on_display() {
                    view.did_appear(true);
                }
            }
        }

        self.needs_layout = true;

        if let Some(delegate) = self.scroll_delegate() {
            delegate.did_scroll(self.content_offset);
        }
    }

    /// Adjust where a drag will come to rest.
    ///
    /// With snapping on, the target becomes the centered offset of the
    /// current index (never below [`MIN_SNAP_OFFSET`]). The delegate sees
    /// the result and may change it further.
    pub fn will_end_dragging(&mut self, velocity: Point, proposed_target: Point) -> Point {
        let mut target = proposed_target;

        if self.options.snap_to_page
            && let Some((_, config)) = self.source_and_config()
        {
            target.x = config.snap_offset(self.current_index, self.viewport.width);
            debug!(index = self.current_index, target = target.x, "snapped");
        }

        if let Some(delegate) = self.scroll_delegate() {
            delegate.will_end_dragging(velocity, &mut target);
        }
        target
    }

    pub fn did_end_scrolling_animation(&mut self) {
        if let Some(delegate) = self.scroll_delegate() {
            delegate.did_end_scrolling_animation();
        }
    }

    pub fn did_end_decelerating(&mut self) {
        if let Some(delegate) = self.scroll_delegate() {
            delegate.did_end_decelerating();
        }
    }

    // --- Public operations --------------------------------------------------

    /// Detach and release every view, then request a layout.
    pub fn reload_data(&mut self) {
        self.release_all();
        debug!("reload");
        self.needs_layout = true;
    }

    /// Release the views at `index` and beyond, then request a layout.
    ///
    /// Views before `index` stay attached unless
    /// [`Quirks::DETACH_ALL_ON_PARTIAL_RELOAD`] is set, in which case they
    /// are detached (but kept resident) and reattached by the next pass.
    pub fn reload_data_after_index(&mut self, index: usize) {
        if self.options.quirks.contains(Quirks::DETACH_ALL_ON_PARTIAL_RELOAD) {
            for slot_index in self.slots.attached_indices() {
                self.slots.detach(slot_index);
            }
        }
        for (_, mut slot) in self.slots.split_off(index) {
            slot.detach();
        }
        debug!(from = index, resident = self.slots.resident_count(), "partial reload");
        self.needs_layout = true;
    }

    /// Scroll so that `index` is centered.
    ///
    /// Non-animated requests move the offset immediately (running the
    /// position-changed handler, as a host container would report it).
    /// Animated requests are queued for [`take_scroll_request`](Self::take_scroll_request).
    /// Returns the request, or `None` without a usable data source.
    pub fn scroll_to_index(&mut self, index: usize, animated: bool) -> Option<ScrollRequest> {
        let (_, config) = self.source_and_config()?;
        let offset = Point::new(
            config.snap_offset(index, self.viewport.width),
            self.content_offset.y,
        );
        let request = ScrollRequest::new(offset, animated);
        debug!(index, target = offset.x, animated, "scroll to index");

        if animated {
            self.pending_scroll = Some(request);
        } else {
            self.pending_scroll = None;
            self.on_scroll_position_changed(offset.x);
        }
        Some(request)
    }

    /// The view for the current index, materializing (without attaching) it
    /// if needed.
    ///
    /// Returns `None` without a data source or when the current index is
    /// outside `[0, cell_count)`.
    pub fn view_on_display(&mut self) -> Option<&mut V> {
        let index = self.current_index;

        if self.options.quirks.contains(Quirks::INVERTED_DISPLAY_CHECK) {
            if self.slots.span() <= index {
                return self.slots.get_mut(index).map(Slot::view_mut);
            }
            let source = self.data_source()?;
            if source.cell_count() <= index {
                return None;
            }
            let view = source.view_for_index(index);
            if let Some(mut replaced) = self.slots.insert(index, view) {
                replaced.detach();
            }
            debug!(index, "materialized for display");
            return self.slots.get_mut(index).map(Slot::view_mut);
        }

        if self.slots.contains(index) {
            return self.slots.get_mut(index).map(Slot::view_mut);
        }
        let source = self.data_source()?;
        if source.cell_count() <= index {
            return None;
        }
        let view = source.view_for_index(index);
        self.slots.insert(index, view);
        debug!(index, "materialized for display");
        self.slots.get_mut(index).map(Slot::view_mut)
    }

    fn release_all(&mut self) {
        for (_, mut slot) in self.slots.drain() {
            slot.detach();
        }
    }
}

impl<V: CarouselView + 'static> Drop for WindowedCarousel<V> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<V: CarouselView + 'static> std::fmt::Debug for WindowedCarousel<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedCarousel")
            .field("current_index", &self.current_index)
            .field("options", &self.options)
            .field("resident", &self.slots.resident_count())
            .field("content_offset", &self.content_offset)
            .field("viewport", &self.viewport)
            .field("content_size", &self.content_size)
            .field("needs_layout", &self.needs_layout)
            .finish()
    }
}
