//! # Cucina Common
//!
//! Common types, utilities, and shared abstractions for Cucina Clash.
//!
//! This crate provides foundational types used across the fighting core:
//! - Player slot ids and per-slot storage
//! - Arena coordinates on the x/z plane
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

pub use glam::Vec3;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
