//! Attack definitions and hit rules.
//!
//! This module provides:
//! - The static attack table (damage, speed, recovery, range)
//! - Hit detection by planar reach with a blocking roll
//! - Combo multiplier steps
//! - Energy drain by attack category
//! - Fighting-style matchups

use glam::Vec3;
use serde::{Deserialize, Serialize};

use cucina_common::planar_distance;

// ============================================================================
// Attack Types
// ============================================================================

/// Broad family of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackCategory {
    /// Hand strike.
    Punch,
    /// Leg strike.
    Kick,
    /// Signature move.
    Special,
    /// Chained strike. Has no table entry of its own.
    Combo,
}

/// Target height of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackHeight {
    /// Aimed at the head.
    High,
    /// Aimed at the legs.
    Low,
}

/// Concrete attack a fighter can throw, keyed into the attack table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    /// High punch.
    #[default]
    PunchHigh,
    /// Low punch.
    PunchLow,
    /// High kick.
    KickHigh,
    /// Low kick.
    KickLow,
    /// Special move.
    Special,
}

impl AttackKind {
    /// All attack kinds in table order.
    pub const ALL: [Self; 5] = [
        Self::PunchHigh,
        Self::PunchLow,
        Self::KickHigh,
        Self::KickLow,
        Self::Special,
    ];

    /// Returns this attack's static definition.
    #[must_use]
    pub const fn definition(self) -> &'static AttackDefinition {
        match self {
            Self::PunchHigh => &PUNCH_HIGH,
            Self::PunchLow => &PUNCH_LOW,
            Self::KickHigh => &KICK_HIGH,
            Self::KickLow => &KICK_LOW,
            Self::Special => &SPECIAL,
        }
    }

    /// Returns the attack's category.
    #[must_use]
    pub const fn category(self) -> AttackCategory {
        self.definition().category
    }

    /// Stable snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PunchHigh => "punch_high",
            Self::PunchLow => "punch_low",
            Self::KickHigh => "kick_high",
            Self::KickLow => "kick_low",
            Self::Special => "special",
        }
    }
}

// ============================================================================
// Attack Table
// ============================================================================

/// Static shape of an attack. Identical for every fighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttackDefinition {
    /// Attack family.
    pub category: AttackCategory,
    /// Target height.
    pub height: AttackHeight,
    /// Base damage before stat scaling.
    pub damage: f32,
    /// Execution time in seconds.
    pub speed: f32,
    /// Time before the next attack in seconds.
    pub recovery: f32,
    /// Planar reach in arena units.
    pub range: f32,
}

const PUNCH_HIGH: AttackDefinition = AttackDefinition {
    category: AttackCategory::Punch,
    height: AttackHeight::High,
    damage: 12.0,
    speed: 0.2,
    recovery: 0.3,
    range: 1.5,
};

const PUNCH_LOW: AttackDefinition = AttackDefinition {
    category: AttackCategory::Punch,
    height: AttackHeight::Low,
    damage: 10.0,
    speed: 0.15,
    recovery: 0.25,
    range: 1.3,
};

const KICK_HIGH: AttackDefinition = AttackDefinition {
    category: AttackCategory::Kick,
    height: AttackHeight::High,
    damage: 18.0,
    speed: 0.3,
    recovery: 0.4,
    range: 2.0,
};

const KICK_LOW: AttackDefinition = AttackDefinition {
    category: AttackCategory::Kick,
    height: AttackHeight::Low,
    damage: 15.0,
    speed: 0.25,
    recovery: 0.35,
    range: 1.8,
};

const SPECIAL: AttackDefinition = AttackDefinition {
    category: AttackCategory::Special,
    height: AttackHeight::High,
    damage: 25.0,
    speed: 0.5,
    recovery: 0.8,
    range: 2.5,
};

// ============================================================================
// Hit Detection
// ============================================================================

/// Chance that a blocking defender stops an attack.
pub const BLOCK_CHANCE: f32 = 0.7;

/// Damage fraction that gets through a successful block.
pub const BLOCKED_DAMAGE_FACTOR: f32 = 0.2;

/// Outcome of a reach and block check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitCheck {
    /// Whether the defender was within reach.
    pub hit: bool,
    /// Table damage, reduced if blocked.
    pub damage: u32,
    /// Whether a block absorbed the attack.
    pub blocked: bool,
}

/// Rolls a block for a defender that is holding block.
pub fn roll_block(is_blocking: bool, rng: &mut fastrand::Rng) -> bool {
    is_blocking && rng.f32() > 1.0 - BLOCK_CHANCE
}

/// Checks whether an attack reaches the defender and whether it is blocked.
pub fn check_hit(
    attacker_pos: Vec3,
    defender_pos: Vec3,
    kind: AttackKind,
    is_blocking: bool,
    rng: &mut fastrand::Rng,
) -> HitCheck {
    let attack = kind.definition();

    if planar_distance(attacker_pos, defender_pos) > attack.range {
        return HitCheck::default();
    }

    let blocked = roll_block(is_blocking, rng);
    let mut damage = attack.damage;
    if blocked {
        damage *= BLOCKED_DAMAGE_FACTOR;
    }

    HitCheck {
        hit: true,
        damage: damage.round() as u32,
        blocked,
    }
}

// ============================================================================
// Combos and Energy
// ============================================================================

/// Highest combo multiplier.
pub const MAX_COMBO_MULTIPLIER: f32 = 1.8;

/// Damage multiplier for a hit streak.
#[must_use]
pub fn combo_multiplier(hit_streak: u32) -> f32 {
    match hit_streak {
        0..=1 => 1.0,
        2..=3 => 1.2,
        4..=5 => 1.4,
        6..=7 => 1.6,
        _ => MAX_COMBO_MULTIPLIER,
    }
}

/// Energy a hit drains from its target, weighted by attack category.
#[must_use]
pub fn energy_drain(damage: u32, category: AttackCategory) -> u32 {
    let factor = match category {
        AttackCategory::Kick => 1.2,
        AttackCategory::Special => 1.5,
        AttackCategory::Punch | AttackCategory::Combo => 1.0,
    };
    (damage as f32 * factor).round() as u32
}

/// Style matchup modifier, 1.0 when no matchup is defined.
#[must_use]
pub fn attack_effectiveness(attacker_style: &str, defender_style: &str) -> f32 {
    STYLE_MATCHUPS
        .iter()
        .find(|(attacker, defender, _)| *attacker == attacker_style && *defender == defender_style)
        .map_or(1.0, |(_, _, modifier)| *modifier)
}

const STYLE_MATCHUPS: &[(&str, &str, f32)] = &[
    ("Maestro Pizzaiolo", "Gelato Warrior", 1.1),
    ("Maestro Pizzaiolo", "Espresso Fighter", 0.9),
    ("Maestro Pizzaiolo", "Pasta Master", 1.0),
    ("Maestro Pizzaiolo", "Gondoliere", 1.2),
    ("Maestro Pizzaiolo", "Opera Singer", 1.1),
    ("Gelato Warrior", "Maestro Pizzaiolo", 0.9),
    ("Gelato Warrior", "Espresso Fighter", 1.1),
    ("Gelato Warrior", "Pasta Master", 1.2),
    ("Gelato Warrior", "Gondoliere", 0.8),
    ("Gelato Warrior", "Opera Singer", 1.0),
    ("Espresso Fighter", "Maestro Pizzaiolo", 1.1),
    ("Espresso Fighter", "Gelato Warrior", 0.9),
    ("Espresso Fighter", "Pasta Master", 0.8),
    ("Espresso Fighter", "Gondoliere", 1.0),
    ("Espresso Fighter", "Opera Singer", 1.2),
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_attack_table_values() {
        let kick = AttackKind::KickHigh.definition();
        assert_eq!(kick.damage, 18.0);
        assert_eq!(kick.range, 2.0);
        assert_eq!(kick.height, AttackHeight::High);
        assert_eq!(AttackKind::PunchLow.category(), AttackCategory::Punch);
        assert_eq!(AttackKind::Special.definition().range, 2.5);
    }

    #[test]
    fn test_combo_steps() {
        assert_eq!(combo_multiplier(0), 1.0);
        assert_eq!(combo_multiplier(1), 1.0);
        assert_eq!(combo_multiplier(2), 1.2);
        assert_eq!(combo_multiplier(5), 1.4);
        assert_eq!(combo_multiplier(7), 1.6);
        assert_eq!(combo_multiplier(8), 1.8);
        assert_eq!(combo_multiplier(500), 1.8);
    }

    #[test]
    fn test_energy_drain_by_category() {
        assert_eq!(energy_drain(10, AttackCategory::Punch), 10);
        assert_eq!(energy_drain(10, AttackCategory::Kick), 12);
        assert_eq!(energy_drain(10, AttackCategory::Special), 15);
        assert_eq!(energy_drain(10, AttackCategory::Combo), 10);
        assert_eq!(energy_drain(5, AttackCategory::Special), 8);
    }

    #[test]
    fn test_check_hit_in_range_unblocked() {
        let mut rng = fastrand::Rng::with_seed(1);
        let result = check_hit(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            AttackKind::PunchHigh,
            false,
            &mut rng,
        );
        assert_eq!(
            result,
            HitCheck {
                hit: true,
                damage: 12,
                blocked: false
            }
        );
    }

    #[test]
    fn test_check_hit_range_is_inclusive() {
        let mut rng = fastrand::Rng::with_seed(1);
        let result = check_hit(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            AttackKind::KickHigh,
            false,
            &mut rng,
        );
        assert!(result.hit);
    }

    #[test]
    fn test_blocked_hits_are_reduced() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut blocked = 0;
        for _ in 0..1000 {
            let result = check_hit(Vec3::ZERO, Vec3::ZERO, AttackKind::Special, true, &mut rng);
            assert!(result.hit);
            if result.blocked {
                blocked += 1;
                assert_eq!(result.damage, 5);
            } else {
                assert_eq!(result.damage, 25);
            }
        }
        // 70% block rate, loose bounds
        assert!((600..=800).contains(&blocked), "blocked {blocked} of 1000");
    }

    #[test]
    fn test_style_matchups() {
        assert_eq!(attack_effectiveness("Maestro Pizzaiolo", "Gondoliere"), 1.2);
        assert_eq!(attack_effectiveness("Gelato Warrior", "Gondoliere"), 0.8);
        assert_eq!(attack_effectiveness("Opera Singer", "Gondoliere"), 1.0);
    }

    proptest! {
        #[test]
        fn prop_combo_multiplier_monotonic_and_capped(n in 0u32..10_000) {
            prop_assert!(combo_multiplier(n) <= combo_multiplier(n + 1));
            prop_assert!(combo_multiplier(n) <= MAX_COMBO_MULTIPLIER);
            prop_assert!(combo_multiplier(n) >= 1.0);
        }

        #[test]
        fn prop_check_hit_misses_beyond_range(
            kind_index in 0usize..5,
            extra in 0.001f32..20.0,
            angle in 0.0f32..std::f32::consts::TAU,
            blocking: bool,
            seed: u64,
        ) {
            let kind = AttackKind::ALL[kind_index];
            let distance = kind.definition().range + extra;
            let defender = Vec3::new(distance * angle.cos(), 0.0, distance * angle.sin());
            let mut rng = fastrand::Rng::with_seed(seed);

            let result = check_hit(Vec3::ZERO, defender, kind, blocking, &mut rng);
            prop_assert!(!result.hit);
            prop_assert_eq!(result.damage, 0);
        }
    }
}
