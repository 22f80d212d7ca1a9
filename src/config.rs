//! Run configuration.

use crate::event::CallSite;
use crate::warning::{UsageWarning, WarningKind};
use std::sync::Once;

/// Environment variable that switches fixtures into update mode.
pub const UPDATE_ENV: &str = "UPDATE_GOLDENS";

/// Environment variable that turns the assertion hook on or off (default on).
pub const ASSERTION_HOOK_ENV: &str = "GOLDEN_ASSERTION_HOOK";

/// Whether fixtures are checked or rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Placeholders compare against the stored values; files are never written.
    Compare,
    /// Placeholders record actual values; asserted keys are written back.
    Update,
}

/// Configuration for golden tests.
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    pub mode: Mode,
    /// When set, only comparisons covered by a passing `golden_assert!` are
    /// written. When unset, every recorded comparison is written.
    pub assertion_hook: bool,
}

impl GoldenConfig {
    /// Check fixtures without writing.
    pub fn compare() -> Self {
        Self {
            mode: Mode::Compare,
            assertion_hook: true,
        }
    }

    /// Rewrite asserted outputs.
    pub fn update() -> Self {
        Self {
            mode: Mode::Update,
            assertion_hook: true,
        }
    }

    /// Read `UPDATE_GOLDENS` and `GOLDEN_ASSERTION_HOOK`.
    #[track_caller]
    pub fn from_env() -> Self {
        let base = if env_flag(UPDATE_ENV).unwrap_or(false) {
            Self::update()
        } else {
            Self::compare()
        };
        base.with_assertion_hook(env_flag(ASSERTION_HOOK_ENV).unwrap_or(true))
    }

    /// Turn the assertion hook on or off. Turning it off logs a warning once
    /// per process.
    #[track_caller]
    pub fn with_assertion_hook(mut self, enabled: bool) -> Self {
        if !enabled {
            warn_hook_disabled();
        }
        self.assertion_hook = enabled;
        self
    }

    pub fn is_update(&self) -> bool {
        self.mode == Mode::Update
    }
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// The warning for a config with the assertion hook off.
pub(crate) fn hook_disabled_warning(site: CallSite) -> UsageWarning {
    UsageWarning::new(
        WarningKind::AssertionHookDisabled,
        format!(
            "Set {}=1 and assert with golden_assert! for safer usage of golden fixtures",
            ASSERTION_HOOK_ENV
        ),
        site,
    )
}

#[track_caller]
fn warn_hook_disabled() {
    static WARNED: Once = Once::new();
    let site = CallSite::caller();
    WARNED.call_once(|| hook_disabled_warning(site).emit());
}
