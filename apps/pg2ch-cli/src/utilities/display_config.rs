//! Process-wide display flags, set once from the command line.
//!
//! Stored behind `arc-swap` so the display helpers can read them without
//! threading a config value through every routine.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayConfig {
    /// Disable ANSI escape codes in terminal output.
    pub no_ansi: bool,

    /// Only show errors; informational and warning lines are dropped.
    pub quiet: bool,
}

static DISPLAY_CONFIG: ArcSwapOption<DisplayConfig> = ArcSwapOption::const_empty();

/// Returns the current configuration, or the default one if none was set.
pub fn load_display_config() -> Arc<DisplayConfig> {
    DISPLAY_CONFIG
        .load_full()
        .unwrap_or_else(|| Arc::new(DisplayConfig::default()))
}

pub fn update_display_config(config: DisplayConfig) {
    DISPLAY_CONFIG.store(Some(Arc::new(config)));
}
