//! Fighting state machine.
//!
//! [`Fight`] is the single owner of match state: lifecycle phase, both
//! fighters, hit effects, the round clock, the winner and the scores. Its
//! methods are the only way to mutate that state. Delayed effects run on a
//! simulated millisecond clock that the frame loop moves forward with
//! [`Fight::advance`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cucina_common::{planar_distance, FightError, FightResult, FighterSlot, PerSlot};

use crate::combat::{roll_block, AttackKind, BLOCKED_DAMAGE_FACTOR};
use crate::config::FightConfig;
use crate::damage_calc::resolve_damage;
use crate::events::{EventBus, FightEvent};
use crate::fighter::{Fighter, HitEffect};
use crate::roster::{self, accessory_power};
use crate::timers::{Scheduler, TimerTask};

/// Top-level lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Title screen.
    #[default]
    Menu,
    /// Players are picking characters.
    CharacterSelection,
    /// Round in progress. The only phase with a running clock.
    Fighting,
    /// Round decided, result on screen.
    RoundEnd,
    /// Match result screen.
    MatchEnd,
}

/// How a round was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// A fighter ran out of energy.
    Knockout,
    /// The clock ran out.
    Timeout,
}

/// Result of a landed collision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HitReport {
    /// Attacking fighter.
    pub attacker: FighterSlot,
    /// Fighter that was hit.
    pub defender: FighterSlot,
    /// Damage applied.
    pub damage: u32,
    /// Whether a block absorbed most of the hit.
    pub blocked: bool,
    /// Defender energy after the hit.
    pub remaining_energy: u32,
    /// Whether the hit ended the round.
    pub knockout: bool,
}

/// Read-only view of the fight for rendering and UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FightSnapshot {
    /// Lifecycle phase.
    pub phase: GamePhase,
    /// Fighter records, empty before character selection.
    pub fighters: Vec<Fighter>,
    /// Hit effects per slot.
    pub hit_effects: PerSlot<HitEffect>,
    /// Seconds left on the round clock.
    pub game_timer: f32,
    /// Round winner, `None` while undecided or on a draw.
    pub winner: Option<FighterSlot>,
    /// How the round was decided.
    pub outcome: Option<RoundOutcome>,
    /// Accumulated damage dealt per slot.
    pub scores: PerSlot<u32>,
    /// Simulated clock.
    pub clock_ms: u64,
}

/// The fighting state machine.
#[derive(Debug)]
pub struct Fight {
    config: FightConfig,
    phase: GamePhase,
    fighters: Option<PerSlot<Fighter>>,
    hit_effects: PerSlot<HitEffect>,
    /// Remaining round clock ticks
    timer_ticks: u32,
    winner: Option<FighterSlot>,
    outcome: Option<RoundOutcome>,
    scores: PerSlot<u32>,
    clock_ms: u64,
    /// Sub-millisecond remainder of frame deltas
    carry_ms: f64,
    /// Bumped on every fight start so ticks and delays of old rounds are dropped
    round_generation: u64,
    scheduler: Scheduler,
    events: EventBus,
    rng: fastrand::Rng,
}

impl Fight {
    /// Creates a fight in the menu phase.
    #[must_use]
    pub fn new(config: FightConfig, seed: u64) -> Self {
        let timer_ticks = config.round_ticks();
        Self {
            config,
            phase: GamePhase::Menu,
            fighters: None,
            hit_effects: PerSlot::default(),
            timer_ticks,
            winner: None,
            outcome: None,
            scores: PerSlot::default(),
            clock_ms: 0,
            carry_ms: 0.0,
            round_generation: 0,
            scheduler: Scheduler::new(),
            events: EventBus::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Creates a fight with default tuning.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(FightConfig::default(), seed)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Opens character selection.
    pub fn start_character_selection(&mut self) {
        self.set_phase(GamePhase::CharacterSelection);
    }

    /// Creates both fighters at their spawn points.
    ///
    /// Fails without touching state if either id is not on the roster.
    pub fn set_selected_characters(&mut self, first: &str, second: &str) -> FightResult<()> {
        let lookup = |id: &str| {
            roster::archetype(id).ok_or_else(|| {
                warn!("Rejected unknown character id {id:?}");
                FightError::UnknownCharacter(id.to_string())
            })
        };
        let (one, two) = (lookup(first)?, lookup(second)?);

        self.fighters = Some(PerSlot::new(
            Fighter::new(FighterSlot::One, one, self.spawn_point(FighterSlot::One)),
            Fighter::new(FighterSlot::Two, two, self.spawn_point(FighterSlot::Two)),
        ));
        for (_, effect) in self.hit_effects.iter_mut() {
            effect.clear();
        }

        info!("Fighters selected: {} vs {}", one.name, two.name);
        self.events.publish(&FightEvent::FightersSelected {
            one: one.id,
            two: two.id,
        });
        Ok(())
    }

    /// Starts a round: full clock, no winner, clock ticking.
    pub fn start_fight(&mut self) {
        self.round_generation += 1;
        self.timer_ticks = self.config.round_ticks();
        self.winner = None;
        self.outcome = None;
        self.set_phase(GamePhase::Fighting);

        self.scheduler.schedule(
            self.clock_ms + self.config.tick_ms,
            TimerTask::RoundTick {
                round: self.round_generation,
            },
        );
    }

    /// Decides the round and shows the result.
    ///
    /// Knockout wins first, otherwise the higher remaining energy wins and
    /// equal energy is a draw. The match result follows after the configured
    /// delay. Ignored unless a round is in progress.
    pub fn end_round(&mut self) {
        if self.phase != GamePhase::Fighting {
            debug!("end_round ignored in phase {:?}", self.phase);
            return;
        }

        let (winner, outcome) = self.decide_round();
        self.winner = winner;
        self.outcome = Some(outcome);
        self.set_phase(GamePhase::RoundEnd);

        match winner {
            Some(slot) => info!("Round won by {slot} ({outcome:?})"),
            None => info!("Round drawn ({outcome:?})"),
        }
        self.events
            .publish(&FightEvent::RoundEnded { outcome, winner });

        self.scheduler.schedule(
            self.clock_ms + self.config.round_end_delay_ms,
            TimerTask::MatchEnd {
                round: self.round_generation,
            },
        );
    }

    /// Rematch with the same characters. Scores carry over.
    pub fn reset_game(&mut self) -> FightResult<()> {
        let spawns = PerSlot::new(
            self.spawn_point(FighterSlot::One),
            self.spawn_point(FighterSlot::Two),
        );
        let fighters = self.fighters.as_mut().ok_or(FightError::FightersNotSelected)?;

        for (slot, fighter) in fighters.iter_mut() {
            fighter.reset(spawns[slot]);
        }
        for (_, effect) in self.hit_effects.iter_mut() {
            effect.clear();
        }

        info!("Rematch");
        self.start_fight();
        Ok(())
    }

    fn decide_round(&self) -> (Option<FighterSlot>, RoundOutcome) {
        let Some(fighters) = &self.fighters else {
            return (None, RoundOutcome::Timeout);
        };
        let (one, two) = (&fighters[FighterSlot::One], &fighters[FighterSlot::Two]);

        if one.is_knocked_out() {
            (Some(FighterSlot::Two), RoundOutcome::Knockout)
        } else if two.is_knocked_out() {
            (Some(FighterSlot::One), RoundOutcome::Knockout)
        } else {
            let winner = match one.energy.cmp(&two.energy) {
                std::cmp::Ordering::Greater => Some(FighterSlot::One),
                std::cmp::Ordering::Less => Some(FighterSlot::Two),
                std::cmp::Ordering::Equal => None,
            };
            (winner, RoundOutcome::Timeout)
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        info!("Phase {from:?} -> {to:?}");
        self.events.publish(&FightEvent::PhaseChanged { from, to });
    }

    fn spawn_point(&self, slot: FighterSlot) -> Vec3 {
        let x = match slot {
            FighterSlot::One => -self.config.spawn_x,
            FighterSlot::Two => self.config.spawn_x,
        };
        Vec3::new(x, 0.0, 0.0)
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Overwrites a fighter's position and movement flag.
    ///
    /// No bounds checking happens here; callers clamp to the arena first.
    pub fn update_fighter_position(&mut self, slot: FighterSlot, x: f32, y: f32, z: f32, is_moving: bool) {
        if let Some(fighter) = self.fighter_mut(slot) {
            fighter.position = Vec3::new(x, y, z);
            fighter.is_moving = is_moving;
        }
    }

    /// Sets a fighter's block stance.
    pub fn set_blocking(&mut self, slot: FighterSlot, is_blocking: bool) {
        if let Some(fighter) = self.fighter_mut(slot) {
            fighter.is_blocking = is_blocking;
        }
    }

    /// Opens an attack window if the fighter is free to attack.
    ///
    /// Returns `false` without changing state while an attack window is open or
    /// the cooldown since the last attack has not elapsed. The window closes on
    /// its own after the configured active time.
    pub fn perform_attack(&mut self, slot: FighterSlot, kind: AttackKind) -> bool {
        let now = self.clock_ms;
        let (cooldown, active) = (self.config.attack_cooldown_ms, self.config.attack_active_ms);
        let Some(fighter) = self.fighter_mut(slot) else {
            return false;
        };

        if fighter.is_attacking || !fighter.cooldown_elapsed(now, cooldown) {
            return false;
        }

        fighter.is_attacking = true;
        fighter.last_attack_ms = Some(now);
        fighter.last_attack_kind = kind;
        fighter.attack_generation += 1;
        let generation = fighter.attack_generation;

        debug!("{slot} throws {}", kind.name());
        self.scheduler
            .schedule(now + active, TimerTask::AttackWindowEnd { slot, generation });
        self.events.publish(&FightEvent::AttackStarted { slot, kind });
        true
    }

    /// Resolves a strike from `attacker` on `defender` if they are close enough.
    ///
    /// Every call in range lands; there is no invincibility window. Returns
    /// `None` when out of range, outside a round, or when a fighter is missing.
    pub fn check_collision(&mut self, attacker: FighterSlot, defender: FighterSlot) -> Option<HitReport> {
        if self.phase != GamePhase::Fighting || attacker == defender {
            return None;
        }

        let fighters = self.fighters.as_mut()?;
        let (att, def) = (&fighters[attacker], &fighters[defender]);
        if planar_distance(att.position, def.position) >= self.config.hit_distance {
            return None;
        }

        // Collisions always land as a plain punch; the attack kind and combo
        // are reported but do not scale damage.
        let mut damage = resolve_damage(
            AttackKind::PunchHigh,
            &att.stats,
            None,
            1.0,
            accessory_power(att.accessory),
            &mut self.rng,
        );
        let blocked = roll_block(def.is_blocking, &mut self.rng);
        if blocked {
            damage = (damage as f32 * BLOCKED_DAMAGE_FACTOR).round() as u32;
        }

        let remaining_energy = fighters[defender].take_damage(damage);
        let att = &mut fighters[attacker];
        if !blocked {
            att.combo += 1;
        }
        let combo = att.combo;
        self.scores[attacker] += damage;

        let generation = self.hit_effects[defender].trigger(self.clock_ms);
        self.scheduler.schedule(
            self.clock_ms + self.config.hit_effect_ms,
            TimerTask::HitEffectEnd {
                slot: defender,
                generation,
            },
        );

        debug!("{attacker} hits {defender} for {damage} (blocked: {blocked}, energy left: {remaining_energy})");
        self.events.publish(&FightEvent::HitLanded {
            attacker,
            defender,
            damage,
            blocked,
            remaining_energy,
            combo,
        });

        let knockout = remaining_energy == 0;
        if knockout {
            self.end_round();
        }

        Some(HitReport {
            attacker,
            defender,
            damage,
            blocked,
            remaining_energy,
            knockout,
        })
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Advances the clock by `dt` seconds.
    ///
    /// Fractions of a millisecond carry over to the next call.
    pub fn advance(&mut self, dt: f32) {
        let total = f64::from(dt.max(0.0)) * 1000.0 + self.carry_ms;
        let whole = total.floor();
        self.carry_ms = total - whole;
        self.advance_ms(whole as u64);
    }

    /// Advances the clock by `ms` milliseconds, firing due tasks in order.
    pub fn advance_ms(&mut self, ms: u64) {
        let target = self.clock_ms + ms;
        while let Some((due_ms, task)) = self.scheduler.pop_due(target) {
            self.clock_ms = self.clock_ms.max(due_ms);
            self.run_task(task);
        }
        self.clock_ms = target;
    }

    fn run_task(&mut self, task: TimerTask) {
        match task {
            TimerTask::RoundTick { round } => {
                if round != self.round_generation || self.phase != GamePhase::Fighting {
                    return;
                }
                self.timer_ticks = self.timer_ticks.saturating_sub(1);
                if self.timer_ticks == 0 {
                    info!("Time up");
                    self.end_round();
                } else {
                    self.scheduler.schedule(
                        self.clock_ms + self.config.tick_ms,
                        TimerTask::RoundTick { round },
                    );
                }
            },
            TimerTask::AttackWindowEnd { slot, generation } => {
                let Some(fighter) = self.fighter_mut(slot) else {
                    return;
                };
                if fighter.attack_generation != generation {
                    return;
                }
                fighter.is_attacking = false;
                self.events.publish(&FightEvent::AttackEnded { slot });
            },
            TimerTask::HitEffectEnd { slot, generation } => {
                let effect = &mut self.hit_effects[slot];
                if effect.generation != generation {
                    return;
                }
                effect.active = false;
                self.events.publish(&FightEvent::HitEffectCleared { slot });
            },
            TimerTask::MatchEnd { round } => {
                if round == self.round_generation && self.phase == GamePhase::RoundEnd {
                    self.set_phase(GamePhase::MatchEnd);
                }
            },
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Fighter in a slot, if characters have been selected.
    #[must_use]
    pub fn fighter(&self, slot: FighterSlot) -> Option<&Fighter> {
        self.fighters.as_ref().map(|f| &f[slot])
    }

    fn fighter_mut(&mut self, slot: FighterSlot) -> Option<&mut Fighter> {
        self.fighters.as_mut().map(|f| &mut f[slot])
    }

    /// Whether both fighters exist.
    #[must_use]
    pub const fn has_fighters(&self) -> bool {
        self.fighters.is_some()
    }

    /// Hit effect of a slot.
    #[must_use]
    pub fn hit_effect(&self, slot: FighterSlot) -> &HitEffect {
        &self.hit_effects[slot]
    }

    /// Seconds left on the round clock.
    #[must_use]
    pub fn game_timer(&self) -> f32 {
        self.timer_ticks as f32 * self.config.tick_ms as f32 / 1000.0
    }

    /// Whole seconds left, rounded up, as shown on the HUD.
    #[must_use]
    pub fn display_timer(&self) -> u32 {
        let tick_ms = u64::from(self.timer_ticks) * self.config.tick_ms;
        tick_ms.div_ceil(1000) as u32
    }

    /// Round winner, `None` while undecided or on a draw.
    #[must_use]
    pub const fn winner(&self) -> Option<FighterSlot> {
        self.winner
    }

    /// How the last round was decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// Accumulated damage dealt by a slot.
    #[must_use]
    pub fn score(&self, slot: FighterSlot) -> u32 {
        self.scores[slot]
    }

    /// Simulated clock in milliseconds.
    #[must_use]
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> &FightConfig {
        &self.config
    }

    /// Registers an event subscriber.
    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<FightEvent> {
        self.events.subscribe()
    }

    /// Copies the current state for presentation.
    #[must_use]
    pub fn snapshot(&self) -> FightSnapshot {
        FightSnapshot {
            phase: self.phase,
            fighters: self
                .fighters
                .as_ref()
                .map(|f| f.iter().map(|(_, fighter)| fighter.clone()).collect())
                .unwrap_or_default(),
            hit_effects: self.hit_effects,
            game_timer: self.game_timer(),
            winner: self.winner,
            outcome: self.outcome,
            scores: self.scores,
            clock_ms: self.clock_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::drain;

    fn fight_in_progress() -> Fight {
        let mut fight = Fight::with_seed(42);
        fight.start_character_selection();
        fight
            .set_selected_characters("giovanni", "sofia")
            .expect("both on roster");
        fight.start_fight();
        fight
    }

    fn place(fight: &mut Fight, slot: FighterSlot, x: f32) {
        fight.update_fighter_position(slot, x, 0.0, 0.0, false);
    }

    fn set_energy(fight: &mut Fight, slot: FighterSlot, energy: u32) {
        fight.fighter_mut(slot).expect("fighter").energy = energy;
    }

    #[test]
    fn test_fresh_fight() {
        let fight = fight_in_progress();

        assert_eq!(fight.phase(), GamePhase::Fighting);
        assert_eq!(fight.game_timer(), 60.0);
        assert_eq!(fight.display_timer(), 60);

        let one = fight.fighter(FighterSlot::One).expect("fighter");
        let two = fight.fighter(FighterSlot::Two).expect("fighter");
        assert_eq!(one.energy, 100);
        assert_eq!(two.energy, 100);
        assert_eq!(one.position, Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(two.position, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(one.name, "Giovanni");
        assert_eq!(two.character_id, "sofia");
    }

    #[test]
    fn test_unknown_character_leaves_state_untouched() {
        let mut fight = Fight::with_seed(1);
        fight.start_character_selection();

        let err = fight.set_selected_characters("giovanni", "ryu").expect_err("rejected");
        assert_eq!(err, FightError::UnknownCharacter("ryu".to_string()));
        assert!(!fight.has_fighters());
        assert_eq!(fight.phase(), GamePhase::CharacterSelection);
    }

    #[test]
    fn test_perform_attack_cooldown() {
        let mut fight = fight_in_progress();
        let slot = FighterSlot::One;

        assert!(fight.perform_attack(slot, AttackKind::KickHigh));
        let before = fight.fighter(slot).cloned();

        // Still inside the window and the cooldown
        fight.advance_ms(100);
        assert!(!fight.perform_attack(slot, AttackKind::PunchLow));
        assert_eq!(fight.fighter(slot).cloned(), before);

        fight.advance_ms(200);
        assert!(!fight.fighter(slot).expect("fighter").is_attacking);
        assert!(fight.perform_attack(slot, AttackKind::PunchLow));
        assert_eq!(
            fight.fighter(slot).expect("fighter").last_attack_kind,
            AttackKind::PunchLow
        );
    }

    #[test]
    fn test_attack_window_closes_after_active_time() {
        let mut fight = fight_in_progress();
        fight.perform_attack(FighterSlot::Two, AttackKind::PunchHigh);

        fight.advance_ms(299);
        assert!(fight.fighter(FighterSlot::Two).expect("fighter").is_attacking);
        fight.advance_ms(1);
        assert!(!fight.fighter(FighterSlot::Two).expect("fighter").is_attacking);
    }

    #[test]
    fn test_stale_attack_reset_is_ignored() {
        let mut config = FightConfig::default();
        config.attack_cooldown_ms = 0;
        config.attack_active_ms = 300;
        let mut fight = Fight::new(config, 3);
        fight
            .set_selected_characters("marco", "lucia")
            .expect("on roster");
        fight.start_fight();

        assert!(fight.perform_attack(FighterSlot::One, AttackKind::PunchHigh));
        fight.advance_ms(200);
        // Window forced closed by a rematch, then a new attack opens
        fight.reset_game().expect("fighters selected");
        assert!(fight.perform_attack(FighterSlot::One, AttackKind::KickLow));

        // The first attack's reset comes due here and must not close the second window
        fight.advance_ms(150);
        assert!(fight.fighter(FighterSlot::One).expect("fighter").is_attacking);

        fight.advance_ms(150);
        assert!(!fight.fighter(FighterSlot::One).expect("fighter").is_attacking);
    }

    #[test]
    fn test_collision_out_of_range() {
        let mut fight = fight_in_progress();
        place(&mut fight, FighterSlot::One, -1.5);
        place(&mut fight, FighterSlot::Two, 1.0);

        assert!(fight.check_collision(FighterSlot::One, FighterSlot::Two).is_none());
        assert_eq!(fight.fighter(FighterSlot::Two).expect("fighter").energy, 100);
    }

    #[test]
    fn test_collision_applies_damage_combo_score_and_effect() {
        let mut fight = fight_in_progress();
        let events = fight.subscribe();
        place(&mut fight, FighterSlot::One, 0.0);
        place(&mut fight, FighterSlot::Two, 1.0);

        let report = fight
            .check_collision(FighterSlot::One, FighterSlot::Two)
            .expect("in range");
        assert!(!report.blocked);
        assert!(report.damage >= 1);

        let defender = fight.fighter(FighterSlot::Two).expect("fighter");
        assert_eq!(defender.energy, 100 - report.damage);
        assert_eq!(fight.fighter(FighterSlot::One).expect("fighter").combo, 1);
        assert_eq!(fight.score(FighterSlot::One), report.damage);
        assert!(fight.hit_effect(FighterSlot::Two).active);

        fight.advance_ms(200);
        assert!(!fight.hit_effect(FighterSlot::Two).active);

        let seen = drain(&events);
        assert!(seen.iter().any(|e| matches!(e, FightEvent::HitLanded { .. })));
        assert!(seen.contains(&FightEvent::HitEffectCleared {
            slot: FighterSlot::Two
        }));
    }

    // giovanni: punch high 12 x 0.9 power factor + 2 rolling pin, then +/-10%
    const GIOVANNI_HIT: std::ops::RangeInclusive<u32> = 12..=14;

    #[test]
    fn test_collision_damage_ignores_attack_kind() {
        let mut fight = fight_in_progress();
        place(&mut fight, FighterSlot::One, 0.0);
        place(&mut fight, FighterSlot::Two, 1.0);
        fight.perform_attack(FighterSlot::One, AttackKind::Special);

        let report = fight
            .check_collision(FighterSlot::One, FighterSlot::Two)
            .expect("in range");
        assert!(!report.blocked);
        assert!(GIOVANNI_HIT.contains(&report.damage), "damage {}", report.damage);
    }

    #[test]
    fn test_collision_damage_does_not_scale_with_combo() {
        let mut fight = fight_in_progress();
        place(&mut fight, FighterSlot::One, 0.0);
        place(&mut fight, FighterSlot::Two, 1.0);
        fight.perform_attack(FighterSlot::One, AttackKind::KickHigh);

        for _ in 0..6 {
            let report = fight
                .check_collision(FighterSlot::One, FighterSlot::Two)
                .expect("in range");
            assert!(GIOVANNI_HIT.contains(&report.damage), "damage {}", report.damage);
        }
        assert!(fight.fighter(FighterSlot::One).expect("fighter").combo >= 6);
    }

    #[test]
    fn test_repeated_collisions_never_go_below_zero() {
        let mut fight = fight_in_progress();
        place(&mut fight, FighterSlot::One, 0.0);
        place(&mut fight, FighterSlot::Two, 0.5);

        for _ in 0..200 {
            fight.check_collision(FighterSlot::One, FighterSlot::Two);
        }
        assert_eq!(fight.fighter(FighterSlot::Two).expect("fighter").energy, 0);
        assert_eq!(fight.phase(), GamePhase::RoundEnd);
    }

    #[test]
    fn test_knockout_ends_round_immediately() {
        let mut fight = fight_in_progress();
        place(&mut fight, FighterSlot::One, 0.0);
        place(&mut fight, FighterSlot::Two, 1.9);
        set_energy(&mut fight, FighterSlot::Two, 5);

        let report = fight
            .check_collision(FighterSlot::One, FighterSlot::Two)
            .expect("in range");
        assert!(report.knockout);
        assert_eq!(fight.fighter(FighterSlot::Two).expect("fighter").energy, 0);
        assert_eq!(fight.phase(), GamePhase::RoundEnd);
        assert_eq!(fight.winner(), Some(FighterSlot::One));
        assert_eq!(fight.outcome(), Some(RoundOutcome::Knockout));
    }

    #[test]
    fn test_winner_by_knockout_of_slot_one() {
        let mut fight = fight_in_progress();
        set_energy(&mut fight, FighterSlot::One, 0);
        set_energy(&mut fight, FighterSlot::Two, 40);

        fight.end_round();
        assert_eq!(fight.winner(), Some(FighterSlot::Two));
    }

    #[test]
    fn test_equal_energy_is_a_draw() {
        let mut fight = fight_in_progress();
        set_energy(&mut fight, FighterSlot::One, 55);
        set_energy(&mut fight, FighterSlot::Two, 55);

        fight.end_round();
        assert_eq!(fight.winner(), None);
        assert_eq!(fight.outcome(), Some(RoundOutcome::Timeout));
    }

    #[test]
    fn test_timeout_picks_higher_energy() {
        let mut fight = fight_in_progress();
        set_energy(&mut fight, FighterSlot::One, 70);
        set_energy(&mut fight, FighterSlot::Two, 20);

        fight.advance(59.9);
        assert_eq!(fight.phase(), GamePhase::Fighting);
        assert_eq!(fight.display_timer(), 1);

        fight.advance(0.1);
        assert_eq!(fight.phase(), GamePhase::RoundEnd);
        assert_eq!(fight.game_timer(), 0.0);
        assert_eq!(fight.winner(), Some(FighterSlot::One));
        assert_eq!(fight.outcome(), Some(RoundOutcome::Timeout));
    }

    #[test]
    fn test_frame_deltas_do_not_drift() {
        let mut fight = fight_in_progress();
        for _ in 0..60 {
            fight.advance(1.0 / 60.0);
        }
        assert_eq!(fight.clock_ms(), 1_000);
        assert_eq!(fight.display_timer(), 59);
    }

    #[test]
    fn test_round_end_moves_to_match_end_after_delay() {
        let mut fight = fight_in_progress();
        fight.end_round();

        fight.advance_ms(1_999);
        assert_eq!(fight.phase(), GamePhase::RoundEnd);
        fight.advance_ms(1);
        assert_eq!(fight.phase(), GamePhase::MatchEnd);
    }

    #[test]
    fn test_clock_stops_outside_fighting() {
        let mut fight = fight_in_progress();
        fight.advance(10.0);
        fight.end_round();
        let frozen = fight.game_timer();

        fight.advance(30.0);
        assert_eq!(fight.game_timer(), frozen);
        assert_eq!(fight.phase(), GamePhase::MatchEnd);
    }

    #[test]
    fn test_reset_game_keeps_scores() {
        let mut fight = fight_in_progress();
        place(&mut fight, FighterSlot::One, 0.0);
        place(&mut fight, FighterSlot::Two, 1.0);
        let report = fight
            .check_collision(FighterSlot::One, FighterSlot::Two)
            .expect("in range");
        fight.end_round();
        fight.advance(5.0);
        assert_eq!(fight.phase(), GamePhase::MatchEnd);

        fight.reset_game().expect("fighters selected");

        assert_eq!(fight.phase(), GamePhase::Fighting);
        assert_eq!(fight.game_timer(), 60.0);
        assert_eq!(fight.winner(), None);
        assert_eq!(fight.score(FighterSlot::One), report.damage);
        for slot in FighterSlot::ALL {
            let fighter = fight.fighter(slot).expect("fighter");
            assert_eq!(fighter.energy, 100);
            assert_eq!(fighter.combo, 0);
            assert!(!fight.hit_effect(slot).active);
        }
        assert_eq!(
            fight.fighter(FighterSlot::Two).expect("fighter").position,
            Vec3::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_reset_during_round_end_cancels_pending_match_end() {
        let mut fight = fight_in_progress();
        fight.end_round();
        fight.advance_ms(1_000);

        fight.reset_game().expect("fighters selected");
        fight.advance_ms(1_500);
        assert_eq!(fight.phase(), GamePhase::Fighting);
    }

    #[test]
    fn test_reset_mid_round_runs_a_single_clock() {
        let mut fight = fight_in_progress();
        fight.advance(5.0);
        fight.reset_game().expect("fighters selected");

        fight.advance(1.0);
        assert!((fight.game_timer() - 59.0).abs() < 1e-4);
    }

    #[test]
    fn test_reset_without_fighters() {
        let mut fight = Fight::with_seed(0);
        assert_eq!(fight.reset_game(), Err(FightError::FightersNotSelected));
        assert_eq!(fight.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_operations_without_fighters_are_noops() {
        let mut fight = Fight::with_seed(0);
        fight.start_fight();
        fight.update_fighter_position(FighterSlot::One, 1.0, 0.0, 0.0, true);
        assert!(!fight.perform_attack(FighterSlot::One, AttackKind::PunchHigh));
        assert!(fight.check_collision(FighterSlot::One, FighterSlot::Two).is_none());
        assert!(fight.snapshot().fighters.is_empty());
    }

    #[test]
    fn test_phase_events() {
        let mut fight = Fight::with_seed(9);
        let events = fight.subscribe();
        fight.start_character_selection();
        fight
            .set_selected_characters("antonio", "francesca")
            .expect("on roster");
        fight.start_fight();

        assert_eq!(
            drain(&events),
            vec![
                FightEvent::PhaseChanged {
                    from: GamePhase::Menu,
                    to: GamePhase::CharacterSelection
                },
                FightEvent::FightersSelected {
                    one: "antonio",
                    two: "francesca"
                },
                FightEvent::PhaseChanged {
                    from: GamePhase::CharacterSelection,
                    to: GamePhase::Fighting
                },
            ]
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let fight = fight_in_progress();
        let json = serde_json::to_value(fight.snapshot()).expect("serializable");

        assert_eq!(json["phase"], "fighting");
        assert_eq!(json["fighters"][0]["energy"], 100);
        assert_eq!(json["fighters"][1]["name"], "Sofia");
    }
}
