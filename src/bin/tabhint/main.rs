//! tabhint entrypoint: a terminal tab host with the hint overlay on top.
//!
//! # Architecture
//!
//! - Input thread: terminal key, mouse and resize events
//! - Host link: built-in tab store worker or an external JSON-lines process,
//!   both posting replies to one channel
//! - Event loop: feeds keys, clicks, replies and deadlines to the overlay
//!   controller and repaints the page

mod event_loop;
mod host;
mod input;
mod screen;

use anyhow::Result;
use crossbeam_channel::bounded;
use crossterm::terminal::size as terminal_size;
use std::io;
use std::time::Duration;
use tabhint::config::AppConfig;
use tabhint::session::OverlayController;
use tabhint::terminal_restore::TerminalRestoreGuard;
use tabhint::{init_logging, init_tracing, log_debug, log_file_path};

use crate::event_loop::{run_event_loop, EventLoopDeps};
use crate::host::{fetch_items, format_tab_listing, HostLink, HostPage};
use crate::input::spawn_input_thread;
use crate::screen::TerminalRenderer;

/// Max pending host replies before the host worker blocks.
const REPLY_CHANNEL_CAPACITY: usize = 256;

/// Max pending input events before backpressure.
const INPUT_CHANNEL_CAPACITY: usize = 256;

const LIST_TABS_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);
    log_debug(&format!(
        "tabhint v{} starting (log {})",
        env!("CARGO_PKG_VERSION"),
        log_file_path().display()
    ));

    let (reply_tx, reply_rx) = bounded(REPLY_CHANNEL_CAPACITY);
    let mut link = HostLink::connect(&config, reply_tx)?;

    if config.list_tabs {
        let items = fetch_items(&mut link, &reply_rx, LIST_TABS_TIMEOUT)?;
        print!("{}", format_tab_listing(&items));
        return Ok(());
    }

    let toggle = config.toggle_chord()?;
    let settings = config.controller_settings()?;
    let (cols, rows) = terminal_size().unwrap_or((80, 24));
    let renderer = TerminalRenderer::new(config.theme_colors(), cols, rows);
    let header = format!(
        " tabhint · {} · {toggle} opens tabs · ctrl+q quits",
        link.label()
    );
    let mut controller = OverlayController::new(link, renderer, settings);

    let terminal_guard = TerminalRestoreGuard::new();
    let mut stdout = io::stdout();
    terminal_guard.enter(&mut stdout)?;

    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let _input_handle = spawn_input_thread(input_tx);

    let mut page = HostPage::default();
    page.set_status(format!("press {toggle} to pick a tab"));
    let deps = EventLoopDeps {
        input_rx,
        reply_rx,
        toggle,
        header,
    };
    let result = run_event_loop(&mut controller, &mut page, &deps, &mut stdout);

    terminal_guard.restore();
    log_debug("tabhint exiting");
    result
}
