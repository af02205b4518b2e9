use crossbeam_channel::Sender;
use crossterm::event::{self, Event, MouseButton, MouseEventKind};
use std::thread;
use tabhint::input::KeyInput;
use tabhint::log_debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Key(KeyInput),
    /// Left button press at a terminal cell.
    Click { col: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
}

impl InputEvent {
    pub(crate) fn from_crossterm(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) => KeyInput::from_crossterm(key).map(InputEvent::Key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click {
                    col: mouse.column,
                    row: mouse.row,
                }),
                _ => None,
            },
            Event::Resize(cols, rows) => Some(InputEvent::Resize {
                cols: *cols,
                rows: *rows,
            }),
            _ => None,
        }
    }
}

pub(crate) fn spawn_input_thread(tx: Sender<InputEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                log_debug(&format!("terminal read error: {err}"));
                break;
            }
        };
        let Some(input) = InputEvent::from_crossterm(&event) else {
            continue;
        };
        if tx.send(input).is_err() {
            break;
        }
    })
}
