//! ID types for fighters and roster entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two player slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FighterSlot {
    /// Player 1, spawns on the left.
    One,
    /// Player 2, spawns on the right.
    Two,
}

impl FighterSlot {
    /// Both slots in id order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Creates a slot from its numeric id (1 or 2).
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Returns the numeric id (1 or 2).
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Returns the slot's index into two-element arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Returns the opposing slot.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for FighterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.id())
    }
}

/// Per-slot storage indexed by [`FighterSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSlot<T> {
    values: [T; 2],
}

impl<T> PerSlot<T> {
    /// Creates storage from the values for slot one and slot two.
    #[must_use]
    pub const fn new(one: T, two: T) -> Self {
        Self { values: [one, two] }
    }

    /// Returns the value for a slot.
    #[must_use]
    pub fn get(&self, slot: FighterSlot) -> &T {
        &self.values[slot.index()]
    }

    /// Returns the value for a slot mutably.
    pub fn get_mut(&mut self, slot: FighterSlot) -> &mut T {
        &mut self.values[slot.index()]
    }

    /// Iterates `(slot, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FighterSlot, &T)> {
        FighterSlot::ALL.into_iter().zip(self.values.iter())
    }

    /// Iterates `(slot, value)` pairs mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FighterSlot, &mut T)> {
        FighterSlot::ALL.into_iter().zip(self.values.iter_mut())
    }
}

impl<T> std::ops::Index<FighterSlot> for PerSlot<T> {
    type Output = T;

    fn index(&self, slot: FighterSlot) -> &Self::Output {
        self.get(slot)
    }
}

impl<T> std::ops::IndexMut<FighterSlot> for PerSlot<T> {
    fn index_mut(&mut self, slot: FighterSlot) -> &mut Self::Output {
        self.get_mut(slot)
    }
}
