//! Per-frame control loop.
//!
//! Each frame runs in two steps per fighter: a pure decision that turns
//! controls (or the AI) into an [`Intent`], then an apply step that moves the
//! fighter inside the arena and drives attacks through the state machine.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cucina_common::{planar_distance, FighterSlot, PerSlot};

use crate::ai::AiProfile;
use crate::combat::AttackKind;
use crate::fighting::{Fight, GamePhase, HitReport};
use crate::input::{ControlAction, ControlMapping, ControlState, KeyCode, VirtualInputs};

/// What a fighter wants to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Intent {
    /// Movement input on x (lateral) and z (depth), each in -1.0..=1.0
    pub movement: Vec3,
    /// Attack to throw
    pub attack: Option<AttackKind>,
    /// Hold block
    pub block: bool,
}

/// Attack buttons in the order they win when several are held.
const ATTACK_PRIORITY: [(ControlAction, AttackKind); 5] = [
    (ControlAction::PunchHigh, AttackKind::PunchHigh),
    (ControlAction::PunchLow, AttackKind::PunchLow),
    (ControlAction::KickHigh, AttackKind::KickHigh),
    (ControlAction::KickLow, AttackKind::KickLow),
    (ControlAction::Special, AttackKind::Special),
];

impl Intent {
    /// Reads a human control snapshot.
    #[must_use]
    pub fn from_controls(controls: &ControlState) -> Self {
        let axis = |negative, positive| {
            let mut value = 0.0;
            if controls.is_held(negative) {
                value -= 1.0;
            }
            if controls.is_held(positive) {
                value += 1.0;
            }
            value
        };

        Self {
            movement: Vec3::new(
                axis(ControlAction::Leftward, ControlAction::Rightward),
                0.0,
                axis(ControlAction::Forward, ControlAction::Backward),
            ),
            attack: ATTACK_PRIORITY
                .iter()
                .find(|(action, _)| controls.is_held(*action))
                .map(|&(_, kind)| kind),
            block: controls.is_held(ControlAction::Block),
        }
    }

    /// Whether any movement is requested.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.movement.x != 0.0 || self.movement.z != 0.0
    }
}

/// Who drives a fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pilot {
    /// Keyboard (and touch for slot one) through a mapping
    Human(ControlMapping),
    /// Reactive AI
    Ai(AiProfile),
}

impl Pilot {
    /// Human pilot with the slot's default keys.
    #[must_use]
    pub fn human(slot: FighterSlot) -> Self {
        Self::Human(ControlMapping::for_slot(slot))
    }

    /// AI pilot with default tuning.
    #[must_use]
    pub fn ai() -> Self {
        Self::Ai(AiProfile::default())
    }
}

/// Decides a fighter's intent for one frame.
///
/// `controls` is only read for human pilots; `elapsed` (fight seconds) only
/// for the AI.
pub fn decide_intent(
    pilot: &Pilot,
    controls: &ControlState,
    own: Vec3,
    opponent: Vec3,
    elapsed: f32,
    rng: &mut fastrand::Rng,
) -> Intent {
    match pilot {
        Pilot::Human(_) => Intent::from_controls(controls),
        Pilot::Ai(profile) => profile.decide(own, opponent, elapsed, rng),
    }
}

/// Applies an intent to a fighter for a frame of `dt` seconds.
///
/// Movement is scaled by the configured speed and clamped to the arena.
/// An attack is only thrown when the fighter is free; if it starts within
/// the trigger distance of the opponent a collision check follows. Returns
/// the hit if one landed. Does nothing outside a round.
pub fn apply_intent(fight: &mut Fight, slot: FighterSlot, intent: &Intent, dt: f32) -> Option<HitReport> {
    if fight.phase() != GamePhase::Fighting {
        return None;
    }

    let config = fight.config();
    let (speed, arena, trigger) = (config.move_speed, config.arena, config.attack_trigger_distance);
    let own = fight.fighter(slot)?;
    let opponent = fight.fighter(slot.opponent())?.position;
    let (start, already_attacking) = (own.position, own.is_attacking);

    let moving = intent.is_moving();
    let position = if moving {
        let step = Vec3::new(intent.movement.x, 0.0, intent.movement.z) * speed * dt;
        arena.clamp(start + step)
    } else {
        start
    };
    fight.update_fighter_position(slot, position.x, position.y, position.z, moving);
    fight.set_blocking(slot, intent.block);

    let kind = intent.attack?;
    if already_attacking || !fight.perform_attack(slot, kind) {
        return None;
    }

    let distance = planar_distance(position, opponent);
    if distance < trigger {
        fight.check_collision(slot, slot.opponent())
    } else {
        debug!("{slot} whiffs {} at distance {distance:.2}", kind.name());
        None
    }
}

/// Drives both fighters and the fight clock frame by frame.
#[derive(Debug)]
pub struct FrameController {
    pilots: PerSlot<Pilot>,
    virtual_inputs: VirtualInputs,
    elapsed: f32,
    rng: fastrand::Rng,
}

impl FrameController {
    /// Creates a controller with a pilot per slot.
    #[must_use]
    pub fn new(one: Pilot, two: Pilot, seed: u64) -> Self {
        Self {
            pilots: PerSlot::new(one, two),
            virtual_inputs: VirtualInputs::new(),
            elapsed: 0.0,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Human in slot one against the AI.
    #[must_use]
    pub fn versus_ai(seed: u64) -> Self {
        Self::new(Pilot::human(FighterSlot::One), Pilot::ai(), seed)
    }

    /// Pilot of a slot.
    #[must_use]
    pub fn pilot(&self, slot: FighterSlot) -> &Pilot {
        &self.pilots[slot]
    }

    /// Replaces the pilot of a slot.
    pub fn set_pilot(&mut self, slot: FighterSlot, pilot: Pilot) {
        self.pilots[slot] = pilot;
    }

    /// On-screen controls, merged into slot one's keyboard input.
    pub fn virtual_inputs_mut(&mut self) -> &mut VirtualInputs {
        &mut self.virtual_inputs
    }

    /// Seconds of frames run so far.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Control snapshot for a slot from the keys held this frame.
    #[must_use]
    pub fn controls_for(&self, slot: FighterSlot, pressed: &HashSet<KeyCode>) -> ControlState {
        match &self.pilots[slot] {
            Pilot::Human(mapping) => {
                let keyboard = mapping.resolve(pressed);
                if slot == FighterSlot::One {
                    self.virtual_inputs.merge_into(&keyboard)
                } else {
                    keyboard
                }
            },
            Pilot::Ai(_) => ControlState::new(),
        }
    }

    /// Runs one frame: both fighters act, then the fight clock moves by `dt`.
    pub fn step(&mut self, fight: &mut Fight, pressed: &HashSet<KeyCode>, dt: f32) -> Vec<HitReport> {
        let mut hits = Vec::new();

        if fight.phase() == GamePhase::Fighting {
            for slot in FighterSlot::ALL {
                let (Some(own), Some(opponent)) = (fight.fighter(slot), fight.fighter(slot.opponent())) else {
                    continue;
                };
                let (own, opponent) = (own.position, opponent.position);
                let controls = self.controls_for(slot, pressed);
                let intent = decide_intent(
                    &self.pilots[slot],
                    &controls,
                    own,
                    opponent,
                    self.elapsed,
                    &mut self.rng,
                );
                hits.extend(apply_intent(fight, slot, &intent, dt));
            }
        }

        fight.advance(dt);
        self.elapsed += dt;
        hits
    }
}
