#![forbid(unsafe_code)]

//! Scroll-container notifications and requests.
//!
//! A host scroll container (the platform primitive that owns gesture
//! recognition, deceleration, and rubber-banding) reports what happened
//! through [`ScrollEvent`]. A widget that wants the container to move asks
//! for it with a [`ScrollRequest`].

use crate::geometry::Point;

/// A notification delivered by the host scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    /// The content offset changed.
    Scrolled { offset: Point },
    /// The user lifted their finger; `target` is where deceleration will stop.
    WillEndDragging { velocity: Point, target: Point },
    /// A programmatic animated scroll finished.
    DidEndScrollingAnimation,
    /// Deceleration after a drag came to rest.
    DidEndDecelerating,
}

impl ScrollEvent {
    /// Stable identifier used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scrolled { .. } => "scrolled",
            Self::WillEndDragging { .. } => "will_end_dragging",
            Self::DidEndScrollingAnimation => "did_end_scrolling_animation",
            Self::DidEndDecelerating => "did_end_decelerating",
        }
    }
}

/// Request for the host container to move its content offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: Point,
    pub animated: bool,
}

impl ScrollRequest {
    #[must_use]
    pub const fn new(offset: Point, animated: bool) -> Self {
        Self { offset, animated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_stable() {
        assert_eq!(
            ScrollEvent::Scrolled {
                offset: Point::ZERO
            }
            .as_str(),
            "scrolled"
        );
        assert_eq!(
            ScrollEvent::WillEndDragging {
                velocity: Point::ZERO,
                target: Point::ZERO
            }
            .as_str(),
            "will_end_dragging"
        );
        assert_eq!(
            ScrollEvent::DidEndScrollingAnimation.as_str(),
            "did_end_scrolling_animation"
        );
        assert_eq!(ScrollEvent::DidEndDecelerating.as_str(), "did_end_decelerating");
    }

    #[test]
    fn request_carries_animation_flag() {
        let req = ScrollRequest::new(Point::from_x(440.0), true);
        assert_eq!(req.offset.x, 440.0);
        assert!(req.animated);
    }
}
