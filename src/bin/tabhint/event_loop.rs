use anyhow::Result;
use crossbeam_channel::{never, select, Receiver};
use std::io::Write;
use std::time::{Duration, Instant};
use tabhint::gateway::{GatewayReply, GatewayResponse};
use tabhint::input::{Key, KeyDisposition, KeyInput, ToggleChord};
use tabhint::log_debug;
use tabhint::session::{OverlayController, OverlayPhase};

use crate::host::{HostLink, HostPage};
use crate::input::InputEvent;
use crate::screen::TerminalRenderer;

/// Upper bound on how long the loop sleeps with nothing to do.
const IDLE_TICK: Duration = Duration::from_millis(250);

pub(crate) type Controller = OverlayController<HostLink, TerminalRenderer>;

pub(crate) struct EventLoopDeps {
    pub(crate) input_rx: Receiver<InputEvent>,
    pub(crate) reply_rx: Receiver<GatewayReply>,
    pub(crate) toggle: ToggleChord,
    pub(crate) header: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Quit,
}

pub(crate) fn run_event_loop(
    controller: &mut Controller,
    page: &mut HostPage,
    deps: &EventLoopDeps,
    out: &mut impl Write,
) -> Result<()> {
    let store = controller.gateway().store();
    let closed_replies = never::<GatewayReply>();
    let mut replies_open = true;
    let mut redraw = true;

    loop {
        if redraw || controller.renderer().is_dirty() {
            page.sync_from(store.as_ref());
            controller.renderer_mut().present(out, page, &deps.header)?;
            redraw = false;
        }

        let now = Instant::now();
        let wait = controller
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_TICK)
            .min(IDLE_TICK);
        let reply_rx = if replies_open {
            &deps.reply_rx
        } else {
            &closed_replies
        };
        let phase_before = controller.phase();

        select! {
            recv(deps.input_rx) -> event => {
                let Ok(event) = event else {
                    log_debug("input thread stopped; exiting");
                    return Ok(());
                };
                if handle_input(controller, page, &deps.toggle, event) == LoopControl::Quit {
                    return Ok(());
                }
                redraw = true;
            }
            recv(reply_rx) -> reply => {
                match reply {
                    Ok(reply) => handle_reply(controller, page, reply),
                    Err(_) => {
                        log_debug("host reply channel closed");
                        page.set_status("host disconnected");
                        replies_open = false;
                    }
                }
                redraw = true;
            }
            default(wait) => {}
        }

        controller.poll_timers(Instant::now());
        if controller.phase() != phase_before {
            note_phase(page, controller.phase());
            redraw = true;
        }
    }
}

pub(crate) fn handle_input(
    controller: &mut Controller,
    page: &mut HostPage,
    toggle: &ToggleChord,
    event: InputEvent,
) -> LoopControl {
    match event {
        InputEvent::Key(key) => {
            if toggle.matches(&key) {
                controller.toggle();
                return LoopControl::Continue;
            }
            if controller.handle_key(&key) == KeyDisposition::PassThrough {
                if is_quit_key(&key) {
                    return LoopControl::Quit;
                }
                page.set_status(format!("page got {}", describe_key(&key)));
            }
        }
        InputEvent::Click { col, row } => {
            if let Some(target) = controller.renderer().hit(col, row) {
                controller.handle_pointer(target);
            }
        }
        InputEvent::Resize { cols, rows } => {
            controller.renderer_mut().resize(cols, rows);
        }
    }
    LoopControl::Continue
}

pub(crate) fn handle_reply(controller: &mut Controller, page: &mut HostPage, reply: GatewayReply) {
    match &reply.result {
        // External hosts have no shared store; mirror their latest snapshot.
        Ok(GatewayResponse::Items(items)) if controller.gateway().store().is_none() => {
            page.tabs = items.clone();
        }
        Err(err) => page.set_status(format!("host {}: {err}", reply.id)),
        Ok(_) => {}
    }
    controller.handle_reply(reply);
    controller.renderer_mut().mark_dirty();
}

fn note_phase(page: &mut HostPage, phase: OverlayPhase) {
    match phase {
        OverlayPhase::Opening => page.set_status("loading tabs…"),
        OverlayPhase::Open => page.set_status("hint key switches · Tab pages · Esc closes"),
        OverlayPhase::Closed => {}
    }
}

fn is_quit_key(key: &KeyInput) -> bool {
    key.ctrl && !key.alt && matches!(key.key, Key::Char('q') | Key::Char('Q'))
}

pub(crate) fn describe_key(key: &KeyInput) -> String {
    let mut parts: Vec<String> = Vec::new();
    if key.ctrl {
        parts.push("ctrl".to_string());
    }
    if key.alt {
        parts.push("alt".to_string());
    }
    if key.meta {
        parts.push("meta".to_string());
    }
    if key.shift {
        parts.push("shift".to_string());
    }
    parts.push(match key.key {
        Key::Escape => "esc".to_string(),
        Key::Tab => "tab".to_string(),
        Key::BackTab => "backtab".to_string(),
        Key::Enter => "enter".to_string(),
        Key::Char(' ') => "space".to_string(),
        Key::Char(ch) => ch.to_string(),
        Key::Function(n) => format!("f{n}"),
        Key::Other => "key".to_string(),
    });
    parts.join("+")
}
