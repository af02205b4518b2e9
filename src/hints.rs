//! Hint symbols for the visible page.
//!
//! The item in slot `i` of whatever page is showing gets `alphabet[i]`. Hints
//! are shown upper-case and matched case-insensitively.

use std::fmt;

/// Default symbol order: number row first, then the top and home letter rows.
pub const DEFAULT_HINT_CHARS: &str = "1234567890qwertyuiopasdfghjkl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    Empty,
    Duplicate(char),
    Unprintable(char),
    /// More slots per page than symbols to label them with.
    AlphabetExhausted { symbols: usize, page_size: usize },
}

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintError::Empty => write!(f, "hint alphabet is empty"),
            HintError::Duplicate(ch) => write!(f, "hint alphabet repeats '{ch}'"),
            HintError::Unprintable(ch) => {
                write!(f, "hint alphabet contains unusable character {ch:?}")
            }
            HintError::AlphabetExhausted { symbols, page_size } => write!(
                f,
                "hint alphabet has {symbols} symbols but pages hold {page_size} items"
            ),
        }
    }
}

impl std::error::Error for HintError {}

/// Ordered, distinct, lower-cased hint symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintAlphabet {
    symbols: Vec<char>,
}

impl HintAlphabet {
    pub fn new(chars: &str, page_size: usize) -> Result<Self, HintError> {
        let mut symbols: Vec<char> = Vec::new();
        for ch in chars.chars() {
            if ch.is_control() || ch.is_whitespace() {
                return Err(HintError::Unprintable(ch));
            }
            let folded = fold(ch);
            if symbols.contains(&folded) {
                return Err(HintError::Duplicate(ch));
            }
            symbols.push(folded);
        }
        if symbols.is_empty() {
            return Err(HintError::Empty);
        }
        if symbols.len() < page_size {
            return Err(HintError::AlphabetExhausted {
                symbols: symbols.len(),
                page_size,
            });
        }
        Ok(Self { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Display form of the hint for `slot`, if the alphabet reaches that far.
    pub fn label(&self, slot: usize) -> Option<char> {
        self.symbols.get(slot).map(|ch| upper(*ch))
    }

    /// Slot bound to `key` among the first `page_size` symbols.
    pub fn slot_for(&self, key: char, page_size: usize) -> Option<usize> {
        let folded = fold(key);
        self.symbols
            .iter()
            .take(page_size)
            .position(|symbol| *symbol == folded)
    }

    /// Labels for a page holding `count` items. Slots past the alphabet get
    /// `None` and are only reachable by pointer.
    pub fn assign(&self, count: usize) -> Vec<Option<char>> {
        (0..count).map(|slot| self.label(slot)).collect()
    }
}

impl Default for HintAlphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_HINT_CHARS.chars().collect(),
        }
    }
}

fn fold(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

fn upper(ch: char) -> char {
    ch.to_uppercase().next().unwrap_or(ch)
}
