//! Carousel options (deterministic, env-overridable).
//!
//! # Environment Variables
//! - `CAROUSEL_SNAP_TO_PAGE` (bool)
//! - `CAROUSEL_SLOT_RESIDENCY` = unbounded|`<max detached slots>`
//! - `CAROUSEL_QUIRKS` = none|legacy|comma-separated quirk names
//!
//! Parsing never fails outright: bad values keep the default and are
//! reported through [`OptionsParse::errors`].

use std::env;
use std::fmt;

use bitflags::bitflags;

use super::slots::SlotResidency;

const ENV_SNAP_TO_PAGE: &str = "CAROUSEL_SNAP_TO_PAGE";
const ENV_SLOT_RESIDENCY: &str = "CAROUSEL_SLOT_RESIDENCY";
const ENV_QUIRKS: &str = "CAROUSEL_QUIRKS";

bitflags! {
    /// Opt-in reproductions of legacy carousel behavior.
    ///
    /// The empty set is the corrected behavior. Each flag restores one
    /// legacy quirk so hosts migrating from the old widget can match it
    /// exactly.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Quirks: u8 {
        /// `view_on_display` treats a populated index as missing (and a
        /// missing one as populated): it returns nothing for indices past the
        /// populated span and re-materializes indices inside it. The new view
        /// replaces the slot in place; later slots are not shifted up.
        const INVERTED_DISPLAY_CHECK = 0b0001;
        /// On an index change, `will_appear` fires on the view for the old
        /// index instead of the new one.
        const STALE_APPEAR_TARGET = 0b0010;
        /// `reload_data_after_index` detaches every view, not just the
        /// ones it removes.
        const DETACH_ALL_ON_PARTIAL_RELOAD = 0b0100;
        /// Window eviction starts one past the window end, so the view at
        /// `end` stays attached after scrolling backwards.
        const SKIP_TRAILING_EDGE = 0b1000;
    }
}

impl Quirks {
    /// Every legacy quirk.
    pub const LEGACY: Self = Self::all();

    /// Parse `none`, `legacy`, or a comma-separated list of quirk names.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "" | "none" | "off" | "corrected" => return Some(Self::empty()),
            "legacy" | "all" | "literal" => return Some(Self::LEGACY),
            _ => {}
        }
        value.split(',').try_fold(Self::empty(), |acc, name| {
            Self::from_quirk_name(name.trim()).map(|flag| acc | flag)
        })
    }

    /// Kebab- or snake-case name of a single quirk.
    fn from_quirk_name(name: &str) -> Option<Self> {
        match name.replace('_', "-").as_str() {
            "inverted-display-check" => Some(Self::INVERTED_DISPLAY_CHECK),
            "stale-appear-target" => Some(Self::STALE_APPEAR_TARGET),
            "detach-all-on-partial-reload" => Some(Self::DETACH_ALL_ON_PARTIAL_RELOAD),
            "skip-trailing-edge" => Some(Self::SKIP_TRAILING_EDGE),
            _ => None,
        }
    }
}

impl fmt::Display for Quirks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names = [
            (Self::INVERTED_DISPLAY_CHECK, "inverted-display-check"),
            (Self::STALE_APPEAR_TARGET, "stale-appear-target"),
            (Self::DETACH_ALL_ON_PARTIAL_RELOAD, "detach-all-on-partial-reload"),
            (Self::SKIP_TRAILING_EDGE, "skip-trailing-edge"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Behavior switches for a [`WindowedCarousel`](super::WindowedCarousel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselOptions {
    /// Redirect drag release to the current item's centered offset.
    pub snap_to_page: bool,
    pub residency: SlotResidency,
    pub quirks: Quirks,
}

impl CarouselOptions {
    #[must_use]
    pub fn with_snap_to_page(mut self, snap: bool) -> Self {
        self.snap_to_page = snap;
        self
    }

    #[must_use]
    pub fn with_residency(mut self, residency: SlotResidency) -> Self {
        self.residency = residency;
        self
    }

    #[must_use]
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Parse options from environment variables.
    #[must_use]
    pub fn from_env() -> CarouselOptions {
        Self::from_env_with_diagnostics().options
    }

    /// Parse options from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> OptionsParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Short human-readable summary for logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        let snap = if self.snap_to_page { "snap" } else { "free" };
        format!(
            "{snap} · residency={} · quirks={}",
            self.residency, self.quirks
        )
    }
}

/// Options plus any problems found while reading them.
#[derive(Debug, Clone)]
pub struct OptionsParse {
    pub options: CarouselOptions,
    pub errors: Vec<OptionsError>,
}

/// A rejected option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl OptionsError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for OptionsError {}

fn from_env_with<F>(mut get: F) -> OptionsParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut options = CarouselOptions::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_SNAP_TO_PAGE) {
        match parse_bool(&value) {
            Some(parsed) => options.snap_to_page = parsed,
            None => errors.push(OptionsError::new(
                "snap_to_page",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_SLOT_RESIDENCY) {
        match SlotResidency::parse(&value) {
            Some(parsed) => options.residency = parsed,
            None => errors.push(OptionsError::new(
                "residency",
                value,
                "expected unbounded or a detached-slot limit",
            )),
        }
    }

    if let Some(value) = get(ENV_QUIRKS) {
        match Quirks::parse(&value) {
            Some(parsed) => options.quirks = parsed,
            None => errors.push(OptionsError::new(
                "quirks",
                value,
                "expected none|legacy|comma-separated quirk names",
            )),
        }
    }

    OptionsParse { options, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
