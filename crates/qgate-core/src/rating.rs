//! Five-level ratings, A (best) to E (worst)

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    A = 1,
    B = 2,
    C = 3,
    D = 4,
    E = 5,
}

impl Rating {
    pub const BEST: Rating = Rating::A;
    pub const WORST: Rating = Rating::E;

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::A),
            2 => Some(Self::B),
            3 => Some(Self::C),
            4 => Some(Self::D),
            5 => Some(Self::E),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        *self as i64
    }

    pub fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
