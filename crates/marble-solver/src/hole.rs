//! Hole and marble vocabulary.
//!
//! The twelve holes are named after the colors painted on the physical
//! board. Eleven of them are also the home of the marble with the same
//! color; `White` is the spare hole that has no marble of its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolverError;

/// Number of holes on the board.
pub const HOLE_COUNT: usize = 12;

/// Number of marbles on the board.
pub const MARBLE_COUNT: usize = 11;

/// A hole on the board, identified by its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Hole {
    Red = 0,
    LightBlue = 1,
    DarkGreen = 2,
    Yellow = 3,
    Purple = 4,
    Orange = 5,
    Black = 6,
    LightGreen = 7,
    DarkBlue = 8,
    Pink = 9,
    Cyan = 10,
    White = 11,
}

impl Hole {
    /// Every hole, in index order.
    pub const ALL: [Hole; HOLE_COUNT] = [
        Hole::Red,
        Hole::LightBlue,
        Hole::DarkGreen,
        Hole::Yellow,
        Hole::Purple,
        Hole::Orange,
        Hole::Black,
        Hole::LightGreen,
        Hole::DarkBlue,
        Hole::Pink,
        Hole::Cyan,
        Hole::White,
    ];

    const NAMES: [&'static str; HOLE_COUNT] = [
        "Red",
        "LightBlue",
        "DarkGreen",
        "Yellow",
        "Purple",
        "Orange",
        "Black",
        "LightGreen",
        "DarkBlue",
        "Pink",
        "Cyan",
        "White",
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a hole by index (0-11)
    #[inline]
    pub const fn from_index(index: usize) -> Option<Hole> {
        if index < HOLE_COUNT {
            Some(Hole::ALL[index])
        } else {
            None
        }
    }

    /// Display name of the hole
    pub const fn name(self) -> &'static str {
        Hole::NAMES[self as usize]
    }

    /// The marble whose goal is this hole, if any
    pub const fn home_marble(self) -> Option<Marble> {
        if self.index() < MARBLE_COUNT {
            Some(Marble(self as u8))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for Hole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Hole {
    type Err = SolverError;

    /// Accepts a display name in any case, with optional `-`, `_` or space
    /// separators (`light-blue`, `LIGHT_BLUE`), or a numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Hole::from_index(index).ok_or_else(|| SolverError::UnknownHole(s.to_string()));
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        Hole::ALL
            .iter()
            .copied()
            .find(|hole| hole.name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| SolverError::UnknownHole(s.to_string()))
    }
}

impl Serialize for Hole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Hole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A marble, identified by the index of its home hole.
///
/// The identity never changes while the marble travels around the board;
/// move descriptions always name a marble by its home color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marble(u8);

impl Marble {
    /// Every marble, in index order.
    pub const ALL: [Marble; MARBLE_COUNT] = [
        Marble(0),
        Marble(1),
        Marble(2),
        Marble(3),
        Marble(4),
        Marble(5),
        Marble(6),
        Marble(7),
        Marble(8),
        Marble(9),
        Marble(10),
    ];

    pub const fn new(index: usize) -> Option<Marble> {
        if index < MARBLE_COUNT {
            Some(Marble(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The hole this marble belongs in
    #[inline]
    pub const fn home(self) -> Hole {
        Hole::ALL[self.0 as usize]
    }
}

impl fmt::Display for Marble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.home().name())
    }
}

impl Serialize for Marble {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.home().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Marble {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hole = Hole::deserialize(deserializer)?;
        hole.home_marble()
            .ok_or_else(|| serde::de::Error::custom(format!("no marble lives in hole {}", hole)))
    }
}
