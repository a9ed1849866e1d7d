//! Reactive opponent AI.
//!
//! The AI has no memory. Each frame it looks at the lateral gap to its
//! opponent and the elapsed fight time, and produces an [`Intent`]: close
//! the gap, throw an attack on a rhythm when near, and sidestep now and then.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::combat::AttackKind;
use crate::control::Intent;

/// Tunables for the reactive AI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Lateral gap above which the AI walks in
    pub approach_distance: f32,
    /// Lateral movement input while walking in
    pub approach_input: f32,
    /// Lateral gap below which the AI may attack
    pub attack_distance: f32,
    /// Angular rate of the attack rhythm
    pub attack_rate: f32,
    /// Rhythm value above which an attack is thrown
    pub attack_threshold: f32,
    /// Angular rate of the sidestep gate
    pub sidestep_rate: f32,
    /// Gate value above which the AI sidesteps
    pub sidestep_threshold: f32,
    /// Angular rate of the sidestep wave
    pub sidestep_wave: f32,
    /// Depth input amplitude while sidestepping
    pub sidestep_amplitude: f32,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self {
            approach_distance: 2.0,
            approach_input: 0.5,
            attack_distance: 2.5,
            attack_rate: 3.0,
            attack_threshold: 0.7,
            sidestep_rate: 2.0,
            sidestep_threshold: 0.8,
            sidestep_wave: 5.0,
            sidestep_amplitude: 0.3,
        }
    }
}

impl AiProfile {
    /// Sets the attack rhythm.
    #[must_use]
    pub fn with_attack_rhythm(mut self, rate: f32, threshold: f32) -> Self {
        self.attack_rate = rate;
        self.attack_threshold = threshold;
        self
    }

    /// Sets the approach speed as a fraction of full input.
    #[must_use]
    pub fn with_approach_input(mut self, input: f32) -> Self {
        self.approach_input = input.clamp(0.0, 1.0);
        self
    }

    /// Whether the attack rhythm is on at `elapsed` seconds.
    #[must_use]
    pub fn attack_window(&self, elapsed: f32) -> bool {
        (elapsed * self.attack_rate).sin() > self.attack_threshold
    }

    /// Decides this frame's intent.
    ///
    /// Only the lateral gap is measured. The attack kind is a coin flip
    /// between a high punch and a high kick.
    pub fn decide(&self, own: Vec3, opponent: Vec3, elapsed: f32, rng: &mut fastrand::Rng) -> Intent {
        let mut intent = Intent::default();
        let gap = (own.x - opponent.x).abs();

        if gap > self.approach_distance {
            intent.movement.x = if opponent.x > own.x {
                self.approach_input
            } else {
                -self.approach_input
            };
        }

        if gap < self.attack_distance && self.attack_window(elapsed) {
            intent.attack = Some(if rng.bool() {
                AttackKind::PunchHigh
            } else {
                AttackKind::KickHigh
            });
        }

        if (elapsed * self.sidestep_rate).sin() > self.sidestep_threshold {
            intent.movement.z = (elapsed * self.sidestep_wave).sin() * self.sidestep_amplitude;
        }

        intent
    }
}
