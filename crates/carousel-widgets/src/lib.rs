#![forbid(unsafe_code)]

//! Windowed carousel widget.
//!
//! [`WindowedCarousel`](carousel::WindowedCarousel) keeps only the views near
//! the viewport attached, asks its [`CarouselDataSource`](carousel::CarouselDataSource)
//! for views on demand, and tracks which item is centered as the host
//! container scrolls.

pub mod carousel;

pub use carousel::{
    CarouselConfigError, CarouselConfiguration, CarouselDataSource, CarouselOptions,
    CarouselView, CarouselWindow, OptionsError, OptionsParse, Quirks, ScrollDelegate,
    SlotResidency, WindowedCarousel,
};
