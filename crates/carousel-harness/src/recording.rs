#![forbid(unsafe_code)]

//! Recording collaborators.
//!
//! [`RecordingView`] appends every lifecycle notification to a shared
//! [`LifecycleLog`], [`ScriptedDataSource`] serves a mutable configuration
//! and counts what it was asked for, and [`RecordingDelegate`] counts
//! scroll notifications.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use carousel_core::geometry::{Point, Rect, Size};
use carousel_widgets::{CarouselConfiguration, CarouselDataSource, CarouselView, ScrollDelegate};

/// Which lifecycle notification a view received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    WillAppear,
    DidAppear,
    WillDisappear,
    DidDisappear,
}

impl LifecycleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WillAppear => "will_appear",
            Self::DidAppear => "did_appear",
            Self::WillDisappear => "will_disappear",
            Self::DidDisappear => "did_disappear",
        }
    }
}

/// One notification delivered to the view for `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub index: usize,
    pub kind: LifecycleKind,
    pub animated: bool,
}

impl LifecycleEvent {
    #[must_use]
    pub const fn new(index: usize, kind: LifecycleKind, animated: bool) -> Self {
        Self {
            index,
            kind,
            animated,
        }
    }
}

/// Shared, append-only record of lifecycle notifications.
#[derive(Debug, Clone, Default)]
pub struct LifecycleLog {
    events: Rc<RefCell<Vec<LifecycleEvent>>>,
}

impl LifecycleLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: LifecycleEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Ref<'_, Vec<LifecycleEvent>> {
        self.events.borrow()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// `(kind, animated)` pairs for a single index, in order.
    pub fn for_index(&self, index: usize) -> Vec<(LifecycleKind, bool)> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.index == index)
            .map(|event| (event.kind, event.animated))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// A view that records its frame and lifecycle.
#[derive(Debug)]
pub struct RecordingView {
    index: usize,
    /// Materialization order (1-based) across the data source's lifetime.
    serial: usize,
    frame: Option<Rect>,
    log: LifecycleLog,
}

impl RecordingView {
    #[must_use]
    pub fn new(index: usize, serial: usize, log: LifecycleLog) -> Self {
        Self {
            index,
            serial,
            frame: None,
            log,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn serial(&self) -> usize {
        self.serial
    }

    #[inline]
    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }

    fn record(&self, kind: LifecycleKind, animated: bool) {
        self.log
            .push(LifecycleEvent::new(self.index, kind, animated));
    }
}

impl CarouselView for RecordingView {
    fn set_frame(&mut self, frame: Rect) {
        self.frame = Some(frame);
    }

    fn will_appear(&mut self, animated: bool) {
        self.record(LifecycleKind::WillAppear, animated);
    }

    fn did_appear(&mut self, animated: bool) {
        self.record(LifecycleKind::DidAppear, animated);
    }

    fn will_disappear(&mut self, animated: bool) {
        self.record(LifecycleKind::WillDisappear, animated);
    }

    fn did_disappear(&mut self, animated: bool) {
        self.record(LifecycleKind::DidDisappear, animated);
    }
}

/// Data source with a swappable configuration and call counters.
#[derive(Debug)]
pub struct ScriptedDataSource {
    config: Cell<CarouselConfiguration>,
    materialized: Cell<usize>,
    scrolled: RefCell<Vec<usize>>,
    log: LifecycleLog,
}

impl ScriptedDataSource {
    #[must_use]
    pub fn new(config: CarouselConfiguration) -> Rc<Self> {
        Rc::new(Self {
            config: Cell::new(config),
            materialized: Cell::new(0),
            scrolled: RefCell::new(Vec::new()),
            log: LifecycleLog::new(),
        })
    }

    /// Replace the configuration served from the next query on.
    pub fn set_configuration(&self, config: CarouselConfiguration) {
        self.config.set(config);
    }

    /// Number of `view_for_index` calls so far.
    pub fn materialized(&self) -> usize {
        self.materialized.get()
    }

    /// Every index passed to `scrolled_to_index`, in order.
    pub fn scrolled_indices(&self) -> Vec<usize> {
        self.scrolled.borrow().clone()
    }

    /// The log shared by every view this source creates.
    pub fn log(&self) -> &LifecycleLog {
        &self.log
    }
}

impl CarouselDataSource for ScriptedDataSource {
    type View = RecordingView;

    fn cell_count(&self) -> usize {
        self.config.get().cell_count
    }

    fn cell_size(&self) -> Size {
        self.config.get().cell_size
    }

    fn padding(&self) -> f32 {
        self.config.get().padding
    }

    fn cache_size(&self) -> usize {
        self.config.get().cache_size
    }

    fn view_for_index(&self, index: usize) -> RecordingView {
        let serial = self.materialized.get() + 1;
        self.materialized.set(serial);
        RecordingView::new(index, serial, self.log.clone())
    }

    fn scrolled_to_index(&self, index: usize) {
        self.scrolled.borrow_mut().push(index);
    }

    fn configuration(&self) -> CarouselConfiguration {
        self.config.get()
    }
}

/// Snapshot of [`RecordingDelegate`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelegateCounts {
    pub did_scroll: usize,
    pub will_end_dragging: usize,
    pub did_end_scrolling_animation: usize,
    pub did_end_decelerating: usize,
}

/// Scroll observer that counts notifications and can nudge drag targets.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    counts: Cell<DelegateCounts>,
    last_offset: Cell<Option<Point>>,
    target_nudge: Cell<f32>,
}

impl RecordingDelegate {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn counts(&self) -> DelegateCounts {
        self.counts.get()
    }

    pub fn last_offset(&self) -> Option<Point> {
        self.last_offset.get()
    }

    /// Added to every drag target this delegate sees.
    pub fn set_target_nudge(&self, dx: f32) {
        self.target_nudge.set(dx);
    }

    fn bump(&self, f: impl FnOnce(&mut DelegateCounts)) {
        let mut counts = self.counts.get();
        f(&mut counts);
        self.counts.set(counts);
    }
}

impl ScrollDelegate for RecordingDelegate {
    fn did_scroll(&self, offset: Point) {
        self.bump(|c| c.did_scroll += 1);
        self.last_offset.set(Some(offset));
    }

    fn will_end_dragging(&self, _velocity: Point, target: &mut Point) {
        self.bump(|c| c.will_end_dragging += 1);
        target.x += self.target_nudge.get();
    }

    fn did_end_scrolling_animation(&self) {
        self.bump(|c| c.did_end_scrolling_animation += 1);
    }

    fn did_end_decelerating(&self) {
        self.bump(|c| c.did_end_decelerating += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_records_into_shared_log() {
        let log = LifecycleLog::new();
        let mut view = RecordingView::new(3, 1, log.clone());
        view.will_appear(false);
        view.did_appear(true);
        assert_eq!(
            log.for_index(3),
            vec![
                (LifecycleKind::WillAppear, false),
                (LifecycleKind::DidAppear, true)
            ]
        );
        assert!(log.for_index(4).is_empty());
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn source_counts_materializations() {
        let source = ScriptedDataSource::new(CarouselConfiguration::new(
            4,
            Size::new(10.0, 10.0),
            1.0,
            0,
        ));
        let first = source.view_for_index(2);
        let second = source.view_for_index(0);
        assert_eq!((first.index(), first.serial()), (2, 1));
        assert_eq!((second.index(), second.serial()), (0, 2));
        assert_eq!(source.materialized(), 2);

        source.scrolled_to_index(3);
        assert_eq!(source.scrolled_indices(), vec![3]);
    }

    #[test]
    fn delegate_counts_and_nudges() {
        let delegate = RecordingDelegate::new();
        delegate.set_target_nudge(4.0);
        let mut target = Point::from_x(10.0);
        delegate.will_end_dragging(Point::ZERO, &mut target);
        delegate.did_scroll(Point::from_x(3.0));
        assert_eq!(target.x, 14.0);
        assert_eq!(
            delegate.counts(),
            DelegateCounts {
                did_scroll: 1,
                will_end_dragging: 1,
                ..DelegateCounts::default()
            }
        );
        assert_eq!(delegate.last_offset(), Some(Point::from_x(3.0)));
    }
}
