use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    /// Shift+Tab as reported by terminals that fold the modifier in.
    BackTab,
    Enter,
    Char(char),
    Function(u8),
    Other,
}

/// A single key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Ctrl, Alt or Super held; Shift alone does not count.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    /// Convert a crossterm key event. Release events yield `None`.
    pub fn from_crossterm(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let mods = event.modifiers;
        let mut ctrl = mods.contains(KeyModifiers::CONTROL);
        let key = match event.code {
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(ch) => Key::Char(ch),
            // Many terminals report ctrl+space as NUL.
            KeyCode::Null => {
                ctrl = true;
                Key::Char(' ')
            }
            KeyCode::F(n) => Key::Function(n),
            _ => Key::Other,
        };
        Some(Self {
            key,
            shift: mods.contains(KeyModifiers::SHIFT) || key == Key::BackTab,
            ctrl,
            alt: mods.contains(KeyModifiers::ALT),
            meta: mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META),
        })
    }
}
