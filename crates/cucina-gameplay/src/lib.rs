//! # Cucina Gameplay
//!
//! The fighting core of Cucina Clash.
//!
//! This crate provides everything between raw controls and what the
//! presentation layer draws:
//! - Physics and vector utilities
//! - Combat rules (attack table, damage, blocking, combos)
//! - Character roster and accessories
//! - The fighting state machine with its deferred-timer scheduler
//! - Event bus for presentation subscribers
//! - Input mapping, reactive AI and the per-frame control loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ai;
pub mod combat;
pub mod config;
pub mod control;
pub mod damage_calc;
pub mod events;
pub mod fighter;
pub mod fighting;
pub mod input;
pub mod physics;
pub mod roster;
pub mod timers;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ai::*;
    pub use crate::combat::*;
    pub use crate::config::*;
    pub use crate::control::*;
    pub use crate::damage_calc::*;
    pub use crate::events::*;
    pub use crate::fighter::*;
    pub use crate::fighting::*;
    pub use crate::input::*;
    pub use crate::physics::*;
    pub use crate::roster::*;
    pub use crate::timers::*;
}

pub use prelude::*;
