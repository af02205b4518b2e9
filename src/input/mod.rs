//! Keyboard plumbing for the overlay.
//!
//! `KeyInput` is the host-neutral key shape, `InputRouter` classifies keys
//! while the overlay owns the keyboard, and `ToggleChord` is the global
//! shortcut that opens or closes it.

mod chord;
mod key;
mod router;

pub use chord::ToggleChord;
pub use key::{Key, KeyInput};
pub use router::{InputRouter, KeyDisposition, RouteOutcome};
