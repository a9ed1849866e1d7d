//! Tunable fight parameters.

use serde::{Deserialize, Serialize};

use cucina_common::ArenaBounds;

/// Timings, distances and bounds used by the fighting core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightConfig {
    // === Round ===
    /// Round length in seconds
    pub round_seconds: f32,
    /// Round clock tick interval in milliseconds
    pub tick_ms: u64,
    /// Delay between the round result and the match result
    pub round_end_delay_ms: u64,

    // === Attacks ===
    /// Minimum time between two attacks of one fighter
    pub attack_cooldown_ms: u64,
    /// How long an attack window stays open
    pub attack_active_ms: u64,
    /// How long a hit effect shows
    pub hit_effect_ms: u64,
    /// Planar distance under which a collision check lands
    pub hit_distance: f32,
    /// Planar distance under which the control loop asks for a collision check
    pub attack_trigger_distance: f32,

    // === Movement ===
    /// Movement speed in units per second at full input
    pub move_speed: f32,
    /// Arena floor
    pub arena: ArenaBounds,
    /// Spawn distance from the arena center on x
    pub spawn_x: f32,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            round_seconds: 60.0,
            tick_ms: 100,
            round_end_delay_ms: 2_000,

            attack_cooldown_ms: 300,
            attack_active_ms: 300,
            hit_effect_ms: 200,
            hit_distance: 2.5,
            attack_trigger_distance: 2.0,

            move_speed: 3.0,
            arena: ArenaBounds::default(),
            spawn_x: 4.0,
        }
    }
}

impl FightConfig {
    /// Number of clock ticks in a full round.
    #[must_use]
    pub fn round_ticks(&self) -> u32 {
        let tick_seconds = self.tick_ms.max(1) as f32 / 1000.0;
        (self.round_seconds / tick_seconds).round().max(1.0) as u32
    }

    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.round_seconds = self.round_seconds.clamp(5.0, 600.0);
        self.tick_ms = self.tick_ms.clamp(10, 1_000);
        self.attack_cooldown_ms = self.attack_cooldown_ms.min(5_000);
        self.attack_active_ms = self.attack_active_ms.clamp(1, 5_000);
        self.hit_effect_ms = self.hit_effect_ms.clamp(1, 5_000);
        self.hit_distance = self.hit_distance.max(0.0);
        self.attack_trigger_distance = self.attack_trigger_distance.max(0.0);
        self.move_speed = self.move_speed.clamp(0.0, 50.0);
        self.spawn_x = self.spawn_x.clamp(0.0, self.arena.max_x.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_ticks() {
        assert_eq!(FightConfig::default().round_ticks(), 600);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = FightConfig {
            round_seconds: 1.0,
            tick_ms: 0,
            spawn_x: 40.0,
            ..FightConfig::default()
        };
        config.validate();

        assert_eq!(config.round_seconds, 5.0);
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.spawn_x, 9.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FightConfig =
            serde_json::from_str(r#"{"round_seconds": 30.0}"#).expect("valid json");
        assert_eq!(config.round_seconds, 30.0);
        assert_eq!(config.attack_cooldown_ms, 300);
        assert_eq!(config.arena, ArenaBounds::default());
    }
}
