//! Event bus for presentation-layer subscribers.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::Serialize;

use cucina_common::FighterSlot;

use crate::combat::AttackKind;
use crate::fighting::{GamePhase, RoundOutcome};

/// Things that happen during a fight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FightEvent {
    /// Lifecycle phase changed
    PhaseChanged {
        /// Previous phase
        from: GamePhase,
        /// New phase
        to: GamePhase,
    },
    /// Both fighters were created at their spawn points
    FightersSelected {
        /// Character in slot one
        one: &'static str,
        /// Character in slot two
        two: &'static str,
    },
    /// A fighter opened an attack window
    AttackStarted {
        /// Attacking fighter
        slot: FighterSlot,
        /// Attack thrown
        kind: AttackKind,
    },
    /// A fighter's attack window closed
    AttackEnded {
        /// Fighter that attacked
        slot: FighterSlot,
    },
    /// An attack connected
    HitLanded {
        /// Attacking fighter
        attacker: FighterSlot,
        /// Fighter that was hit
        defender: FighterSlot,
        /// Damage dealt
        damage: u32,
        /// Whether a block absorbed most of it
        blocked: bool,
        /// Defender energy after the hit
        remaining_energy: u32,
        /// Attacker hit streak after the hit
        combo: u32,
    },
    /// A hit effect decayed
    HitEffectCleared {
        /// Fighter whose effect ended
        slot: FighterSlot,
    },
    /// The round was decided
    RoundEnded {
        /// How it was decided
        outcome: RoundOutcome,
        /// Winner, `None` on a draw
        winner: Option<FighterSlot>,
    },
}

/// Fan-out event bus. Each subscriber gets its own bounded channel.
#[derive(Debug)]
pub struct EventBus {
    /// Live subscriber channels
    subscribers: Vec<Sender<FightEvent>>,
    /// Per-subscriber channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given per-subscriber capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            capacity,
        }
    }

    /// Registers a subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<FightEvent> {
        let (sender, receiver) = bounded(self.capacity);
        self.subscribers.push(sender);
        receiver
    }

    /// Publishes an event to every subscriber.
    ///
    /// Non-blocking: a full subscriber misses the event, and subscribers whose
    /// receiver was dropped are removed.
    pub fn publish(&mut self, event: &FightEvent) {
        self.subscribers
            .retain(|sender| match sender.try_send(event.clone()) {
                Ok(()) | Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns the per-subscriber capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Drains every pending event from a receiver.
pub fn drain(receiver: &Receiver<FightEvent>) -> Vec<FightEvent> {
    receiver.try_iter().collect()
}
