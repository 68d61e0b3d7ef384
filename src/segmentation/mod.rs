pub mod decode;

pub use self::decode::{decode, Segment, Segmentation};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Where a pixel points in the genotype. `None` marks a segment root.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    #[default]
    None,
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// The four pointing directions, in the order used by neighbour tables.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Slot in a 4-neighbour table, `None` for [`Direction::None`].
    #[inline(always)]
    pub fn cardinal_index(self) -> Option<usize> {
        match self {
            Direction::None => None,
            Direction::Up => Some(0),
            Direction::Right => Some(1),
            Direction::Down => Some(2),
            Direction::Left => Some(3),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// One direction per pixel, row-major.
pub type Genotype = Vec<Direction>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_cardinal_indices_match_table_order() {
        for (i, d) in Direction::CARDINAL.iter().enumerate() {
            assert_eq!(d.cardinal_index(), Some(i));
            assert_eq!(d.opposite().opposite(), *d);
        }
        assert_eq!(Direction::None.cardinal_index(), None);
    }

    #[test]
    fn test_names_round_trip() {
        for d in Direction::iter() {
            assert_eq!(Direction::from_str(&d.to_string()).unwrap(), d);
        }
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
