#![forbid(unsafe_code)]

//! Replay a scroll sweep against the sample carousel and print the JSONL
//! trace to stdout.
//!
//! # Running
//!
//! ```sh
//! cargo run -p carousel-harness
//! CAROUSEL_QUIRKS=legacy CAROUSEL_SNAP_TO_PAGE=1 cargo run -p carousel-harness
//! RUST_LOG=debug cargo run -p carousel-harness --features tracing
//! ```
//!
//! An optional first argument sets the sweep step (default 55).

use std::io;

use carousel::Result;
use carousel_harness::{
    SAMPLE_VIEWPORT, ScrollScript, Session, SessionLogger, run_script, sample_configuration,
};

const DEFAULT_STEP: f32 = 55.0;

fn main() -> Result<()> {
    init_tracing();

    let options = carousel::options_from_env()?;

    let step = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f32>().ok())
        .filter(|step| *step > 0.0)
        .unwrap_or(DEFAULT_STEP);

    let config = sample_configuration();
    config.validate()?;

    let mut session = Session::new(options, config, SAMPLE_VIEWPORT);
    let script = ScrollScript::sweep(&config, SAMPLE_VIEWPORT, step);
    let mut logger = SessionLogger::new(io::stdout());
    let report = run_script(&mut session, "sweep", &script, &mut logger);

    eprintln!(
        "{} · {} steps · {} · index={} · attached={:?} · resident={} · materialized={}",
        report.outcome.as_str(),
        report.steps,
        options.summary_short(),
        report.current_index,
        report.attached,
        report.resident,
        report.materialized,
    );
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}
