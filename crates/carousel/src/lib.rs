#![forbid(unsafe_code)]

//! Windowed carousel public facade.
//!
//! Re-exports the widget, its collaborator traits, and the geometry it
//! speaks, plus a crate-level [`Error`] for hosts that load options and
//! configuration up front.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use carousel_core::geometry::{Point, Rect, Size};
pub use carousel_core::scroll::{ScrollEvent, ScrollRequest};

// --- Widget re-exports -----------------------------------------------------

pub use carousel_widgets::carousel::{MIN_SNAP_OFFSET, Slot, SlotStore};
pub use carousel_widgets::{
    CarouselConfigError, CarouselConfiguration, CarouselDataSource, CarouselOptions,
    CarouselView, CarouselWindow, OptionsError, OptionsParse, Quirks, ScrollDelegate,
    SlotResidency, WindowedCarousel,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for carousel hosts.
#[derive(Debug)]
pub enum Error {
    /// One or more environment options were rejected.
    Options(Vec<OptionsError>),
    /// The data source's geometry cannot drive a layout pass.
    Configuration(CarouselConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Options(errors) => {
                f.write_str("invalid carousel options: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            Self::Configuration(err) => write!(f, "invalid carousel configuration: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Options(errors) => errors
                .first()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Self::Configuration(err) => Some(err),
        }
    }
}

impl From<CarouselConfigError> for Error {
    fn from(err: CarouselConfigError) -> Self {
        Self::Configuration(err)
    }
}

impl From<OptionsError> for Error {
    fn from(err: OptionsError) -> Self {
        Self::Options(vec![err])
    }
}

impl From<Vec<OptionsError>> for Error {
    fn from(errors: Vec<OptionsError>) -> Self {
        Self::Options(errors)
    }
}

/// Standard result type for carousel APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Read [`CarouselOptions`] from the environment, failing on any rejected value.
pub fn options_from_env() -> Result<CarouselOptions> {
    let OptionsParse { options, errors } = CarouselOptions::from_env_with_diagnostics();
    if errors.is_empty() {
        Ok(options)
    } else {
        Err(Error::Options(errors))
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CarouselConfiguration, CarouselDataSource, CarouselOptions, CarouselView, Error, Point,
        Quirks, Rect, Result, ScrollDelegate, ScrollEvent, Size, SlotResidency,
        WindowedCarousel,
    };

    pub use crate::{core, widgets};
}

pub use carousel_core as core;
pub use carousel_widgets as widgets;
