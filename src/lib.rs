//! Keyboard hint overlay for picking, closing and pinning tabs.
//!
//! The core is host-agnostic: an [`session::OverlayController`] talks to the
//! tab host through [`gateway::HostGateway`] and paints through
//! [`render::OverlayRenderer`]. The `tabhint` binary wires it to a terminal.

pub mod config;
pub mod gateway;
pub mod hints;
pub mod input;
pub mod item;
mod lock;
mod logging;
pub mod pagination;
pub mod render;
pub mod session;
mod telemetry;
pub mod terminal_restore;

pub(crate) use lock::lock_or_recover;
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use telemetry::{init_tracing, tracing_log_path};
