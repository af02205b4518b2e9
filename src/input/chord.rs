use super::key::{Key, KeyInput};
use std::fmt;
use std::str::FromStr;

/// Host-level shortcut that toggles the overlay, e.g. `ctrl+space` or `f2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleChord {
    key: Key,
    ctrl: bool,
    alt: bool,
    shift: bool,
}

impl ToggleChord {
    pub fn matches(&self, input: &KeyInput) -> bool {
        let key_matches = match (self.key, input.key) {
            (Key::Char(want), Key::Char(got)) => want.eq_ignore_ascii_case(&got),
            (want, got) => want == got,
        };
        key_matches
            && self.ctrl == input.ctrl
            && self.alt == input.alt
            && (!self.shift || input.shift)
    }
}

impl Default for ToggleChord {
    fn default() -> Self {
        Self {
            key: Key::Char(' '),
            ctrl: true,
            alt: false,
            shift: false,
        }
    }
}

impl FromStr for ToggleChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        if text.is_empty() {
            return Err("toggle key is empty".to_string());
        }
        let mut chord = ToggleChord {
            key: Key::Other,
            ctrl: false,
            alt: false,
            shift: false,
        };
        let parts: Vec<&str> = text.split('+').map(str::trim).collect();
        let (key_part, modifiers) = parts
            .split_last()
            .ok_or_else(|| format!("invalid toggle key '{s}'"))?;
        for modifier in modifiers {
            match *modifier {
                "ctrl" | "control" => chord.ctrl = true,
                "alt" | "option" => chord.alt = true,
                "shift" => chord.shift = true,
                other => return Err(format!("unknown modifier '{other}' in '{s}'")),
            }
        }
        chord.key = match *key_part {
            "space" => Key::Char(' '),
            "tab" | "esc" | "escape" | "enter" => {
                return Err(format!("'{key_part}' is reserved for the overlay"))
            }
            name if name.len() > 1 && name.starts_with('f') => {
                let n: u8 = name[1..]
                    .parse()
                    .map_err(|_| format!("invalid function key '{name}'"))?;
                if !(1..=24).contains(&n) {
                    return Err(format!("function key out of range: '{name}'"));
                }
                Key::Function(n)
            }
            name => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => return Err(format!("unknown key '{name}' in '{s}'")),
                }
            }
        };
        // A bare character would shadow a hint or ordinary typing.
        if matches!(chord.key, Key::Char(_)) && !chord.ctrl && !chord.alt {
            return Err(format!("toggle key '{s}' needs ctrl or alt"));
        }
        Ok(chord)
    }
}

impl fmt::Display for ToggleChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            Key::Char(' ') => f.write_str("space"),
            Key::Char(ch) => write!(f, "{ch}"),
            Key::Function(n) => write!(f, "f{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}
