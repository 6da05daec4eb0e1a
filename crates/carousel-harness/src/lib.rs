#![forbid(unsafe_code)]

//! Test harness for the windowed carousel.
//!
//! - **Recording doubles**: [`RecordingView`], [`ScriptedDataSource`], and
//!   [`RecordingDelegate`] capture every callback the carousel makes.
//! - **Scripted sessions**: [`ScrollScript`] drives a carousel the way a host
//!   scroll container would; [`run_script`] replays it and reports the result.
//! - **JSONL logs**: [`SessionLogger`] writes one JSON object per event.
//!
//! # Quick Start
//!
//! ```ignore
//! use carousel_harness::{ScrollScript, Session, SessionLogger, run_script};
//!
//! let mut session = Session::new(options, config, Size::new(300.0, 200.0));
//! let script = ScrollScript::new().layout().scroll(440.0).end_drag(0.0);
//! let report = run_script(&mut session, "drag", &script, &mut SessionLogger::noop());
//! assert_eq!(report.current_index, 4);
//! ```

pub mod recording;
pub mod script;
pub mod session;

pub use recording::{
    DelegateCounts, LifecycleEvent, LifecycleKind, LifecycleLog, RecordingDelegate,
    RecordingView, ScriptedDataSource,
};
pub use script::{ScrollScript, ScrollStep, Session, SessionReport, run_script};
pub use session::{SessionLogger, SessionOutcome, SharedBuffer};

use carousel_core::geometry::Size;
use carousel_widgets::CarouselConfiguration;

/// Configuration used by the binary and most harness tests: twenty
/// 100x50 cells, 10 units apart, two cached.
#[must_use]
pub const fn sample_configuration() -> CarouselConfiguration {
    CarouselConfiguration::new(20, Size::new(100.0, 50.0), 10.0, 2)
}

/// Viewport paired with [`sample_configuration`].
pub const SAMPLE_VIEWPORT: Size = Size::new(300.0, 200.0);
