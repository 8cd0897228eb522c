//! Scroll directions

use std::fmt;
use std::str::FromStr;

use crate::error::ComputerError;

/// Scroll amount used by `scroll_at` when the caller gives none
pub const DEFAULT_SCROLL_MAGNITUDE: i32 = 800;

/// One of the four scroll directions understood by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Axis and signed amount of a single scroll primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDelta {
    /// Positive scrolls up
    Vertical(i32),
    /// Positive scrolls right
    Horizontal(i32),
}

impl ScrollDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        }
    }

    /// Sign `amount` for this direction, saturating at the `i32` bounds
    pub fn delta(self, amount: i32) -> ScrollDelta {
        match self {
            ScrollDirection::Up => ScrollDelta::Vertical(amount),
            ScrollDirection::Down => ScrollDelta::Vertical(amount.saturating_neg()),
            ScrollDirection::Left => ScrollDelta::Horizontal(amount.saturating_neg()),
            ScrollDirection::Right => ScrollDelta::Horizontal(amount),
        }
    }
}

impl FromStr for ScrollDirection {
    type Err = ComputerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            "left" => Ok(ScrollDirection::Left),
            "right" => Ok(ScrollDirection::Right),
            other => Err(ComputerError::InvalidArgument(format!(
                "Unsupported direction: {other}"
            ))),
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
