#![forbid(unsafe_code)]

//! Scripted scroll sessions.
//!
//! A [`ScrollScript`] plays the part of the host scroll container: it feeds
//! offsets, drag releases, and programmatic scrolls into a
//! [`WindowedCarousel`] and runs layout passes the way a host would.

use std::rc::Rc;

use carousel_core::geometry::{Point, Size};
use carousel_widgets::{
    CarouselConfiguration, CarouselDataSource, CarouselOptions, Quirks, WindowedCarousel,
};

use crate::recording::{RecordingDelegate, RecordingView, ScriptedDataSource};
use crate::session::{SessionLogger, SessionOutcome};

/// One host action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollStep {
    /// Layout pass at the current offset.
    Layout,
    /// Move to an offset, then lay out.
    Scroll(f32),
    /// Release a drag; the carousel's target becomes the resting offset.
    EndDrag { velocity: f32 },
    /// Programmatic scroll. Animated requests settle immediately.
    ScrollTo { index: usize, animated: bool },
    Reload,
    ReloadAfter(usize),
}

impl ScrollStep {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Scroll(_) => "scroll",
            Self::EndDrag { .. } => "end_drag",
            Self::ScrollTo { .. } => "scroll_to",
            Self::Reload => "reload",
            Self::ReloadAfter(_) => "reload_after",
        }
    }
}

/// Ordered list of host actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollScript {
    pub steps: Vec<ScrollStep>,
}

impl ScrollScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn layout(mut self) -> Self {
        self.steps.push(ScrollStep::Layout);
        self
    }

    #[must_use]
    pub fn scroll(mut self, offset: f32) -> Self {
        self.steps.push(ScrollStep::Scroll(offset));
        self
    }

    #[must_use]
    pub fn end_drag(mut self, velocity: f32) -> Self {
        self.steps.push(ScrollStep::EndDrag { velocity });
        self
    }

    #[must_use]
    pub fn scroll_to(mut self, index: usize, animated: bool) -> Self {
        self.steps.push(ScrollStep::ScrollTo { index, animated });
        self
    }

    #[must_use]
    pub fn reload(mut self) -> Self {
        self.steps.push(ScrollStep::Reload);
        self
    }

    #[must_use]
    pub fn reload_after(mut self, index: usize) -> Self {
        self.steps.push(ScrollStep::ReloadAfter(index));
        self
    }

    /// Forward sweep across the whole content in `step` increments, a drag
    /// release, a jump back to the start, and a reload.
    #[must_use]
    pub fn sweep(config: &CarouselConfiguration, viewport: Size, step: f32) -> Self {
        let mut script = Self::new().layout();
        let end = config.content_size(viewport.height).width - viewport.width;
        if step > 0.0 {
            let mut offset = step;
            while offset < end {
                script = script.scroll(offset);
                offset += step;
            }
        }
        script
            .end_drag(0.0)
            .scroll_to(0, false)
            .reload_after(config.cell_count / 2)
            .reload()
            .layout()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A carousel wired to recording collaborators.
pub struct Session {
    pub carousel: WindowedCarousel<RecordingView>,
    pub source: Rc<ScriptedDataSource>,
    pub delegate: Rc<RecordingDelegate>,
    pub viewport: Size,
}

impl Session {
    #[must_use]
    pub fn new(options: CarouselOptions, config: CarouselConfiguration, viewport: Size) -> Self {
        let source = ScriptedDataSource::new(config);
        let delegate = RecordingDelegate::new();
        let mut carousel = WindowedCarousel::new(options);
        carousel.set_data_source(&source);
        carousel.set_scroll_delegate(&delegate);
        Self {
            carousel,
            source,
            delegate,
            viewport,
        }
    }

    /// Apply one step and log what it caused.
    pub fn apply(&mut self, step_no: usize, step: ScrollStep, logger: &mut SessionLogger) {
        let carousel = &mut self.carousel;
        match step {
            ScrollStep::Layout => {
                let offset = carousel.content_offset().x;
                carousel.layout(offset, self.viewport);
            }
            ScrollStep::Scroll(offset) => {
                carousel.on_scroll_position_changed(offset);
                logger.log_scroll(step_no, offset, carousel.current_index());
                carousel.layout(offset, self.viewport);
            }
            ScrollStep::EndDrag { velocity } => {
                let proposed = carousel.content_offset();
                let target = carousel.will_end_dragging(Point::from_x(velocity), proposed);
                carousel.on_scroll_position_changed(target.x);
                logger.log_scroll(step_no, target.x, carousel.current_index());
                carousel.did_end_decelerating();
                carousel.layout(target.x, self.viewport);
            }
            ScrollStep::ScrollTo { index, animated } => {
                if carousel.scroll_to_index(index, animated).is_some() {
                    if let Some(request) = carousel.take_scroll_request() {
                        carousel.on_scroll_position_changed(request.offset.x);
                        carousel.did_end_scrolling_animation();
                    }
                    logger.log_scroll(
                        step_no,
                        carousel.content_offset().x,
                        carousel.current_index(),
                    );
                }
                carousel.layout_if_needed();
            }
            ScrollStep::Reload => {
                carousel.reload_data();
                carousel.layout_if_needed();
            }
            ScrollStep::ReloadAfter(index) => {
                carousel.reload_data_after_index(index);
                carousel.layout_if_needed();
            }
        }

        for event in self.source.log().take() {
            logger.log_lifecycle(step_no, &event);
        }
        logger.log_layout(step_no, step.as_str(), &self.carousel);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("carousel", &self.carousel)
            .field("viewport", &self.viewport)
            .finish()
    }
}

/// What a replayed script left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub steps: usize,
    pub current_index: usize,
    pub attached: Vec<usize>,
    pub resident: usize,
    pub materialized: usize,
    pub scrolled_indices: Vec<usize>,
    /// Whether the final attached set matched the final window.
    pub outcome: SessionOutcome,
}

/// Replay `script` against `session`, logging start, every step, and completion.
pub fn run_script(
    session: &mut Session,
    case: &str,
    script: &ScrollScript,
    logger: &mut SessionLogger,
) -> SessionReport {
    let config = session.source.configuration();
    logger.log_start(case, session.carousel.options(), &config);

    for (step_no, step) in script.steps.iter().enumerate() {
        session.apply(step_no, *step, logger);
    }

    let mut report = SessionReport {
        steps: script.len(),
        current_index: session.carousel.current_index(),
        attached: session.carousel.attached_indices(),
        resident: session.carousel.resident_count(),
        materialized: session.source.materialized(),
        scrolled_indices: session.source.scrolled_indices(),
        outcome: SessionOutcome::Pass,
    };

    // Legacy eviction may leave the view past the window end attached.
    let window: Vec<usize> = session
        .carousel
        .last_window()
        .map(|window| window.range().collect())
        .unwrap_or_default();
    let covered = window.iter().all(|index| report.attached.contains(index));
    let lenient = session
        .carousel
        .options()
        .quirks
        .contains(Quirks::SKIP_TRAILING_EDGE);
    if report.attached != window && !(lenient && covered) {
        report.outcome = SessionOutcome::Fail;
    }
    logger.log_complete(report.outcome, report.steps);
    report
}
