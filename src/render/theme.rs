//! Overlay palettes and box-drawing sets.

use clap::ValueEnum;
use std::fmt;

/// Border character set for drawing boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    pub t_left: char,  // ├
    pub t_right: char, // ┤
}

pub const BORDER_SINGLE: BorderSet = BorderSet {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
    t_left: '├',
    t_right: '┤',
};

pub const BORDER_ROUNDED: BorderSet = BorderSet {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
    t_left: '├',
    t_right: '┤',
};

/// ANSI sequences used by the overlay frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Hint badge color
    pub hint: &'static str,
    /// Page indicator and active-tab marker
    pub accent: &'static str,
    /// Pinned marker
    pub pinned: &'static str,
    /// Close control
    pub danger: &'static str,
    pub dim: &'static str,
    pub border: &'static str,
    pub reset: &'static str,
    pub borders: BorderSet,
    pub pin_marker: &'static str,
}

pub const THEME_CORAL: ThemeColors = ThemeColors {
    hint: "\x1b[93m",   // Bright yellow
    accent: "\x1b[94m", // Bright blue
    pinned: "\x1b[92m", // Bright green
    danger: "\x1b[91m", // Bright red
    dim: "\x1b[90m",
    border: "\x1b[91m",
    reset: "\x1b[0m",
    borders: BORDER_SINGLE,
    pin_marker: "●",
};

pub const THEME_NORD: ThemeColors = ThemeColors {
    hint: "\x1b[38;2;235;203;139m",   // Aurora yellow #ebcb8b
    accent: "\x1b[38;2;136;192;208m", // Frost #88c0d0
    pinned: "\x1b[38;2;163;190;140m", // Aurora green #a3be8c
    danger: "\x1b[38;2;191;97;106m",  // Aurora red #bf616a
    dim: "\x1b[38;2;76;86;106m",
    border: "\x1b[38;2;136;192;208m",
    reset: "\x1b[0m",
    borders: BORDER_ROUNDED,
    pin_marker: "◆",
};

pub const THEME_NONE: ThemeColors = ThemeColors {
    hint: "",
    accent: "",
    pinned: "",
    danger: "",
    dim: "",
    border: "",
    reset: "",
    borders: BORDER_SINGLE,
    pin_marker: "*",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Coral,
    Nord,
    None,
}

impl Theme {
    pub fn colors(&self) -> ThemeColors {
        match self {
            Self::Coral => THEME_CORAL,
            Self::Nord => THEME_NORD,
            Self::None => THEME_NONE,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coral => write!(f, "coral"),
            Self::Nord => write!(f, "nord"),
            Self::None => write!(f, "none"),
        }
    }
}
