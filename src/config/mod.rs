//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::hints::DEFAULT_HINT_CHARS;
use crate::render::Theme;

pub use defaults::{
    DEFAULT_HOST_LATENCY_MS, DEFAULT_OPEN_TIMEOUT_MS, DEFAULT_REFRESH_FALLBACK_MS,
    DEFAULT_TOGGLE_KEY, MAX_HOST_LATENCY_MS, MAX_OPEN_TIMEOUT_MS, MAX_REFRESH_FALLBACK_MS,
    MIN_OPEN_TIMEOUT_MS, MIN_REFRESH_FALLBACK_MS,
};

/// CLI options for the tabhint demo host. Validated before anything touches the terminal.
#[derive(Debug, Parser, Clone)]
#[command(about = "tabhint: keyboard hint overlay for switching tabs", author, version)]
pub struct AppConfig {
    /// Seed the built-in tab host from a JSON array of tabs, or `{"zoomFactor", "tabs"}`
    #[arg(long = "tabs-file", value_name = "PATH", conflicts_with = "host_cmd")]
    pub tabs_file: Option<PathBuf>,

    /// External host command speaking JSON lines on stdin/stdout
    #[arg(long = "host-cmd", value_name = "CMD")]
    pub host_cmd: Option<String>,

    /// Extra arguments to pass to the host command (repeatable)
    #[arg(
        long = "host-arg",
        action = ArgAction::Append,
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub host_args: Vec<String>,

    /// Simulated reply latency of the built-in host (milliseconds)
    #[arg(long = "host-latency-ms", default_value_t = DEFAULT_HOST_LATENCY_MS)]
    pub host_latency_ms: u64,

    /// Chord that opens and closes the overlay (e.g. ctrl+space, alt+t, f2)
    #[arg(long = "toggle-key", default_value = DEFAULT_TOGGLE_KEY)]
    pub toggle_key: String,

    /// Hint symbols in slot order
    #[arg(long = "hint-chars", default_value = DEFAULT_HINT_CHARS)]
    pub hint_chars: String,

    /// How long to wait for a close/pin acknowledgement before refreshing (milliseconds)
    #[arg(long = "refresh-fallback-ms", default_value_t = DEFAULT_REFRESH_FALLBACK_MS)]
    pub refresh_fallback_ms: u64,

    /// Give up on opening when the host has not sent tabs by then (milliseconds)
    #[arg(long = "open-timeout-ms", default_value_t = DEFAULT_OPEN_TIMEOUT_MS)]
    pub open_timeout_ms: u64,

    /// Overlay color theme
    #[arg(long = "theme", value_enum, default_value_t = Theme::Coral)]
    pub theme: Theme,

    /// Disable colors (also honored via NO_COLOR)
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Print the host's tabs and exit
    #[arg(long = "list-tabs", default_value_t = false)]
    pub list_tabs: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "TABHINT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "TABHINT_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging tab titles (debug log only)
    #[arg(
        long = "log-content",
        env = "TABHINT_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

/// How the binary reaches the tab host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    /// Built-in sample tabs.
    Sample,
    /// Built-in host seeded from a file.
    TabsFile(PathBuf),
    /// External process: program plus arguments.
    Command { program: String, args: Vec<String> },
}
