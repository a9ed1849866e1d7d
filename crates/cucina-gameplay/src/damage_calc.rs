//! Damage calculation.
//!
//! Final damage is built up from the attack table's base damage:
//! power scaling, optional defense reduction, flat accessory bonus, combo
//! multiplier, and a ±10% random spread. The result is never below 1.

use crate::combat::AttackKind;
use crate::roster::FighterStats;

/// Lowest damage any landed attack deals.
pub const MIN_DAMAGE: u32 = 1;

/// Lower bound of the random damage spread.
pub const SPREAD_MIN: f32 = 0.9;

/// Width of the random damage spread.
pub const SPREAD_WIDTH: f32 = 0.2;

/// Multiplier from the attacker's power stat.
#[must_use]
pub fn power_multiplier(power: u8) -> f32 {
    0.5 + f32::from(power) / 20.0
}

/// Multiplier from the defender's defense stat.
#[must_use]
pub fn defense_multiplier(defense: u8) -> f32 {
    1.0 - f32::from(defense) / 20.0
}

/// Resolves the damage of one landed attack.
pub fn resolve_damage(
    kind: AttackKind,
    attacker: &FighterStats,
    defender: Option<&FighterStats>,
    combo_multiplier: f32,
    accessory_power: u32,
    rng: &mut fastrand::Rng,
) -> u32 {
    let mut damage = kind.definition().damage * power_multiplier(attacker.power);

    if let Some(defender) = defender {
        damage *= defense_multiplier(defender.defense);
    }

    damage += accessory_power as f32;
    damage *= combo_multiplier;
    damage *= SPREAD_MIN + rng.f32() * SPREAD_WIDTH;

    damage.max(MIN_DAMAGE as f32).round() as u32
}
