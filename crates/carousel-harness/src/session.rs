#![forbid(unsafe_code)]

//! JSONL session logs.
//!
//! Every line is one JSON object with an `event` field:
//!
//! ```text
//! {"event":"start","run_id":"…","case":"sweep","options":{…},"config":{…}}
//! {"event":"scroll","run_id":"…","step":3,"offset":440.0,"index":4}
//! {"event":"lifecycle","run_id":"…","step":3,"index":4,"kind":"will_appear","animated":true}
//! {"event":"layout","run_id":"…","step":4,"action":"scroll","offset":440.0,"start":3,"end":7,"attached":[3,4,5,6],"resident":5}
//! {"event":"complete","run_id":"…","outcome":"pass","steps":12,"total_ms":0}
//! ```

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use carousel_widgets::{CarouselConfiguration, CarouselOptions, CarouselView, WindowedCarousel};
use serde_json::{Value, json};

use crate::recording::LifecycleEvent;

/// Session outcome reported in the `complete` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Pass,
    Fail,
}

impl SessionOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

/// Writes session events as JSON lines.
pub struct SessionLogger {
    writer: Option<Box<dyn Write>>,
    run_id: String,
    start_time: Instant,
    lines: usize,
}

impl SessionLogger {
    /// Log to any writer.
    pub fn new(writer: impl Write + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            run_id: generate_run_id(),
            start_time: Instant::now(),
            lines: 0,
        }
    }

    /// Append to a file, creating parent directories as needed.
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// A logger that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            writer: None,
            run_id: generate_run_id(),
            start_time: Instant::now(),
            lines: 0,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Lines written so far (zero for a no-op logger).
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn log_start(
        &mut self,
        case: &str,
        options: &CarouselOptions,
        config: &CarouselConfiguration,
    ) {
        self.write_event(
            "start",
            json!({
                "case": case,
                "options": {
                    "snap_to_page": options.snap_to_page,
                    "residency": options.residency.to_string(),
                    "quirks": options.quirks.to_string(),
                },
                "config": {
                    "cell_count": config.cell_count,
                    "cell_width": config.cell_size.width,
                    "cell_height": config.cell_size.height,
                    "padding": config.padding,
                    "cache_size": config.cache_size,
                },
            }),
        );
    }

    /// Record the carousel's state after a layout pass.
    pub fn log_layout<V: CarouselView + 'static>(
        &mut self,
        step: usize,
        action: &str,
        carousel: &WindowedCarousel<V>,
    ) {
        let window = carousel.last_window();
        self.write_event(
            "layout",
            json!({
                "step": step,
                "action": action,
                "offset": carousel.content_offset().x,
                "start": window.map(|w| w.start),
                "end": window.map(|w| w.end),
                "attached": carousel.attached_indices(),
                "resident": carousel.resident_count(),
            }),
        );
    }

    pub fn log_scroll(&mut self, step: usize, offset: f32, index: usize) {
        self.write_event(
            "scroll",
            json!({ "step": step, "offset": offset, "index": index }),
        );
    }

    pub fn log_lifecycle(&mut self, step: usize, event: &LifecycleEvent) {
        self.write_event(
            "lifecycle",
            json!({
                "step": step,
                "index": event.index,
                "kind": event.kind.as_str(),
                "animated": event.animated,
            }),
        );
    }

    pub fn log_complete(&mut self, outcome: SessionOutcome, steps: usize) {
        let total_ms = self.start_time.elapsed().as_millis() as u64;
        self.write_event(
            "complete",
            json!({ "outcome": outcome.as_str(), "steps": steps, "total_ms": total_ms }),
        );
    }

    fn write_event(&mut self, event: &str, body: Value) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let mut line = json!({ "event": event, "run_id": self.run_id });
        if let (Some(fields), Value::Object(body)) = (line.as_object_mut(), body) {
            fields.extend(body);
        }
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
        self.lines += 1;
    }
}

impl std::fmt::Debug for SessionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLogger")
            .field("run_id", &self.run_id)
            .field("enabled", &self.writer.is_some())
            .field("lines", &self.lines)
            .finish()
    }
}

/// In-memory sink that can be read back while a logger still holds it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    /// Parse every line as JSON, skipping lines that fail to parse.
    pub fn json_lines(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn generate_run_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{timestamp:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::LifecycleKind;

    #[test]
    fn lines_carry_event_and_run_id() {
        let buffer = SharedBuffer::new();
        let mut logger = SessionLogger::new(buffer.clone());
        logger.log_scroll(1, 440.0, 4);
        logger.log_lifecycle(1, &LifecycleEvent::new(4, LifecycleKind::DidAppear, true));
        logger.log_complete(SessionOutcome::Pass, 1);

        let lines = buffer.json_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(logger.lines(), 3);
        for line in &lines {
            assert_eq!(line["run_id"], logger.run_id());
        }
        assert_eq!(lines[0]["event"], "scroll");
        assert_eq!(lines[0]["index"], 4);
        assert_eq!(lines[1]["kind"], "did_appear");
        assert_eq!(lines[1]["animated"], true);
        assert_eq!(lines[2]["outcome"], "pass");
    }

    #[test]
    fn noop_logger_writes_nothing() {
        let mut logger = SessionLogger::noop();
        logger.log_scroll(0, 0.0, 0);
        assert_eq!(logger.lines(), 0);
    }

    #[test]
    fn file_logger_appends() {
        let dir = std::env::temp_dir().join(format!("carousel-harness-{}", generate_run_id()));
        let path = dir.join("session.jsonl");
        {
            let mut logger = SessionLogger::create(&path).unwrap();
            logger.log_complete(SessionOutcome::Fail, 0);
        }
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""outcome":"fail""#));
        let _ = fs::remove_dir_all(dir);
    }
}
