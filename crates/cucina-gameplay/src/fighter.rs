//! Runtime fighter records.

use glam::Vec3;
use serde::Serialize;

use cucina_common::FighterSlot;

use crate::combat::AttackKind;
use crate::roster::{Archetype, FighterStats};

/// Full energy bar.
pub const MAX_ENERGY: u32 = 100;

/// Mutable state of one combatant during a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fighter {
    /// Player slot.
    pub slot: FighterSlot,
    /// Display name.
    pub name: &'static str,
    /// Roster key of the archetype.
    pub character_id: &'static str,
    /// Emoji shown in the HUD.
    pub emoji: &'static str,
    /// Accessory carried into the fight.
    pub accessory: Option<&'static str>,
    /// Archetype stats.
    pub stats: FighterStats,
    /// Position in the arena.
    pub position: Vec3,
    /// Remaining energy, 0 to 100.
    pub energy: u32,
    /// Current hit streak.
    pub combo: u32,
    /// Attack window is open.
    pub is_attacking: bool,
    /// Moved during the last frame.
    pub is_moving: bool,
    /// Holding block.
    pub is_blocking: bool,
    /// Clock time of the last accepted attack.
    pub last_attack_ms: Option<u64>,
    /// Kind of the last accepted attack.
    pub last_attack_kind: AttackKind,
    /// Bumped on every accepted attack so stale window resets are skipped.
    #[serde(skip)]
    pub(crate) attack_generation: u64,
}

impl Fighter {
    /// Creates a fresh fighter for a slot at a spawn point.
    #[must_use]
    pub fn new(slot: FighterSlot, archetype: &'static Archetype, spawn: Vec3) -> Self {
        Self {
            slot,
            name: archetype.name,
            character_id: archetype.id,
            emoji: archetype.emoji,
            accessory: archetype.accessory,
            stats: archetype.stats,
            position: spawn,
            energy: MAX_ENERGY,
            combo: 0,
            is_attacking: false,
            is_moving: false,
            is_blocking: false,
            last_attack_ms: None,
            last_attack_kind: AttackKind::default(),
            attack_generation: 0,
        }
    }

    /// Whether the fighter has been knocked out.
    #[must_use]
    pub const fn is_knocked_out(&self) -> bool {
        self.energy == 0
    }

    /// Energy as a 0.0-1.0 fraction for HUD bars.
    #[must_use]
    pub fn energy_fraction(&self) -> f32 {
        self.energy as f32 / MAX_ENERGY as f32
    }

    /// Whether the cooldown since the last attack has elapsed.
    #[must_use]
    pub fn cooldown_elapsed(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        self.last_attack_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= cooldown_ms)
    }

    /// Removes energy, flooring at zero. Returns the energy left.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.energy = self.energy.saturating_sub(damage);
        self.energy
    }

    /// Restores energy, position, combo and transient flags for a rematch.
    pub fn reset(&mut self, spawn: Vec3) {
        self.energy = MAX_ENERGY;
        self.position = spawn;
        self.combo = 0;
        self.is_attacking = false;
        self.is_moving = false;
        self.is_blocking = false;
        self.attack_generation += 1;
    }
}

/// Transient "just got hit" signal for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HitEffect {
    /// Effect is showing.
    pub active: bool,
    /// Clock time the effect started.
    pub start_ms: u64,
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl HitEffect {
    /// Turns the effect on at the given time.
    pub fn trigger(&mut self, now_ms: u64) -> u64 {
        self.active = true;
        self.start_ms = now_ms;
        self.generation += 1;
        self.generation
    }

    /// Turns the effect off and invalidates pending clears.
    pub fn clear(&mut self) {
        self.active = false;
        self.start_ms = 0;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::archetype;

    fn fighter() -> Fighter {
        let giovanni = archetype("giovanni").expect("on roster");
        Fighter::new(FighterSlot::One, giovanni, Vec3::new(-4.0, 0.0, 0.0))
    }

    #[test]
    fn test_new_fighter() {
        let f = fighter();
        assert_eq!(f.energy, MAX_ENERGY);
        assert_eq!(f.combo, 0);
        assert_eq!(f.accessory, Some("rollingPin"));
        assert!(!f.is_knocked_out());
        assert_eq!(f.energy_fraction(), 1.0);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut f = fighter();
        assert_eq!(f.take_damage(30), 70);
        assert_eq!(f.take_damage(500), 0);
        assert!(f.is_knocked_out());
    }

    #[test]
    fn test_cooldown() {
        let mut f = fighter();
        assert!(f.cooldown_elapsed(0, 300));

        f.last_attack_ms = Some(1_000);
        assert!(!f.cooldown_elapsed(1_299, 300));
        assert!(f.cooldown_elapsed(1_300, 300));
    }

    #[test]
    fn test_reset_restores_state() {
        let mut f = fighter();
        f.take_damage(60);
        f.combo = 4;
        f.is_attacking = true;
        f.position = Vec3::new(2.0, 0.3, 1.0);

        f.reset(Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(f.energy, MAX_ENERGY);
        assert_eq!(f.combo, 0);
        assert!(!f.is_attacking);
        assert_eq!(f.position, Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn test_hit_effect_generations() {
        let mut effect = HitEffect::default();
        let first = effect.trigger(100);
        let second = effect.trigger(150);
        assert!(second > first);
        assert!(effect.active);
        assert_eq!(effect.start_ms, 150);

        effect.clear();
        assert!(!effect.active);
    }
}
