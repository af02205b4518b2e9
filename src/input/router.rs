use super::key::{Key, KeyInput};
use crate::hints::HintAlphabet;

/// What a key means to an open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Dismiss,
    PageForward,
    PageBackward,
    /// Slot on the current page; the controller resolves it against the items.
    Hint(usize),
    Ignored,
}

/// Whether the host should still see a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The overlay owned the key; nothing else may act on it.
    Consumed,
    PassThrough,
}

/// Exclusive keyboard consumer while the overlay is open.
///
/// Only the session controller creates one, and it holds at most one at a
/// time; dropping it is how the capture is released.
#[derive(Debug)]
pub struct InputRouter {
    alphabet: HintAlphabet,
    page_size: usize,
}

impl InputRouter {
    pub(crate) fn install(alphabet: HintAlphabet, page_size: usize) -> Self {
        Self {
            alphabet,
            page_size,
        }
    }

    pub fn classify(&self, input: &KeyInput) -> RouteOutcome {
        match input.key {
            Key::Escape => RouteOutcome::Dismiss,
            Key::Tab if input.has_command_modifier() => RouteOutcome::Ignored,
            Key::Tab if input.shift => RouteOutcome::PageBackward,
            Key::Tab => RouteOutcome::PageForward,
            Key::BackTab if input.has_command_modifier() => RouteOutcome::Ignored,
            Key::BackTab => RouteOutcome::PageBackward,
            Key::Char(ch) if !input.has_command_modifier() => self
                .alphabet
                .slot_for(ch, self.page_size)
                .map_or(RouteOutcome::Ignored, RouteOutcome::Hint),
            _ => RouteOutcome::Ignored,
        }
    }
}
