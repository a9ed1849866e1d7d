//! Input mapping for fighter controls.
//!
//! Raw keys are mapped to logical [`ControlAction`]s through a per-player,
//! rebindable [`ControlMapping`]. On-screen buttons and the virtual joystick
//! write into [`VirtualInputs`], which merge with the keyboard into one
//! [`ControlState`] snapshot per frame.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cucina_common::FighterSlot;

/// Errors that can occur in the input system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Action has no binding
    #[error("action not bound: {0:?}")]
    ActionNotBound(ControlAction),

    /// Key already bound to another action
    #[error("key {key:?} already bound to action {action:?}")]
    KeyAlreadyBound {
        /// The key that's already bound
        key: KeyCode,
        /// The action it's bound to
        action: ControlAction,
    },
}

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Up,
    Down,
    Left,
    Right,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Space,
    Enter,
    Escape,
    LShift,
    RShift,
}

/// Logical fighter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlAction {
    /// Step into the arena (negative z)
    Forward,
    /// Step out of the arena (positive z)
    Backward,
    /// Move toward negative x
    Leftward,
    /// Move toward positive x
    Rightward,
    /// High punch
    PunchHigh,
    /// Low punch
    PunchLow,
    /// High kick
    KickHigh,
    /// Low kick
    KickLow,
    /// Hold block
    Block,
    /// Special move
    Special,
}

impl ControlAction {
    /// Every action, in snapshot order.
    pub const ALL: [Self; 10] = [
        Self::Forward,
        Self::Backward,
        Self::Leftward,
        Self::Rightward,
        Self::PunchHigh,
        Self::PunchLow,
        Self::KickHigh,
        Self::KickLow,
        Self::Block,
        Self::Special,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Which actions are held this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    held: [bool; 10],
}

impl ControlState {
    /// Creates a snapshot with nothing held.
    #[must_use]
    pub const fn new() -> Self {
        Self { held: [false; 10] }
    }

    /// Creates a snapshot with the given actions held.
    #[must_use]
    pub fn with(actions: &[ControlAction]) -> Self {
        let mut state = Self::new();
        for &action in actions {
            state.set(action, true);
        }
        state
    }

    /// Whether an action is held.
    #[must_use]
    pub const fn is_held(&self, action: ControlAction) -> bool {
        self.held[action.index()]
    }

    /// Sets whether an action is held.
    pub fn set(&mut self, action: ControlAction, held: bool) {
        self.held[action.index()] = held;
    }

    /// Held in either snapshot.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut held = self.held;
        for (mine, theirs) in held.iter_mut().zip(other.held) {
            *mine |= theirs;
        }
        Self { held }
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.held.iter().any(|&h| h)
    }
}

/// Key binding for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key for this action
    pub primary: KeyCode,
    /// Optional secondary key
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    /// Create a new key binding with only a primary key.
    #[must_use]
    pub const fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Create a new key binding with primary and secondary keys.
    #[must_use]
    pub const fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Check if a key matches this binding.
    #[must_use]
    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }

    fn keys(&self) -> impl Iterator<Item = KeyCode> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// Per-player action bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlMapping {
    bindings: HashMap<ControlAction, KeyBinding>,
}

impl Default for ControlMapping {
    fn default() -> Self {
        Self::player_one()
    }
}

impl ControlMapping {
    /// WASD movement with arrow keys as secondary, attacks on the right hand.
    #[must_use]
    pub fn player_one() -> Self {
        use ControlAction as A;
        Self::from_pairs([
            (A::Forward, KeyBinding::with_secondary(KeyCode::W, KeyCode::Up)),
            (A::Backward, KeyBinding::with_secondary(KeyCode::S, KeyCode::Down)),
            (A::Leftward, KeyBinding::with_secondary(KeyCode::A, KeyCode::Left)),
            (A::Rightward, KeyBinding::with_secondary(KeyCode::D, KeyCode::Right)),
            (A::PunchHigh, KeyBinding::new(KeyCode::J)),
            (A::PunchLow, KeyBinding::new(KeyCode::U)),
            (A::KickHigh, KeyBinding::new(KeyCode::K)),
            (A::KickLow, KeyBinding::new(KeyCode::I)),
            (A::Block, KeyBinding::new(KeyCode::L)),
            (A::Special, KeyBinding::new(KeyCode::Space)),
        ])
    }

    /// Arrow keys and numpad, for a second player on the same keyboard.
    #[must_use]
    pub fn player_two() -> Self {
        use ControlAction as A;
        Self::from_pairs([
            (A::Forward, KeyBinding::new(KeyCode::Up)),
            (A::Backward, KeyBinding::new(KeyCode::Down)),
            (A::Leftward, KeyBinding::new(KeyCode::Left)),
            (A::Rightward, KeyBinding::new(KeyCode::Right)),
            (A::PunchHigh, KeyBinding::new(KeyCode::Numpad1)),
            (A::PunchLow, KeyBinding::new(KeyCode::Numpad4)),
            (A::KickHigh, KeyBinding::new(KeyCode::Numpad2)),
            (A::KickLow, KeyBinding::new(KeyCode::Numpad5)),
            (A::Block, KeyBinding::new(KeyCode::Numpad3)),
            (A::Special, KeyBinding::new(KeyCode::Numpad0)),
        ])
    }

    /// Default layout for a slot.
    #[must_use]
    pub fn for_slot(slot: FighterSlot) -> Self {
        match slot {
            FighterSlot::One => Self::player_one(),
            FighterSlot::Two => Self::player_two(),
        }
    }

    fn from_pairs(pairs: [(ControlAction, KeyBinding); 10]) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    /// Get the current binding for an action.
    #[must_use]
    pub fn binding(&self, action: ControlAction) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Action a key is bound to.
    #[must_use]
    pub fn action_for(&self, key: KeyCode) -> Option<ControlAction> {
        ControlAction::ALL
            .into_iter()
            .find(|action| self.bindings.get(action).is_some_and(|b| b.matches(key)))
    }

    /// Rebinds an action. Fails if one of the keys belongs to another action.
    pub fn rebind(&mut self, action: ControlAction, binding: KeyBinding) -> Result<(), InputError> {
        for key in binding.keys() {
            match self.action_for(key) {
                Some(other) if other != action => {
                    return Err(InputError::KeyAlreadyBound { key, action: other });
                },
                _ => {},
            }
        }
        self.bindings.insert(action, binding);
        Ok(())
    }

    /// Removes an action's binding and returns it.
    pub fn unbind(&mut self, action: ControlAction) -> Result<KeyBinding, InputError> {
        self.bindings
            .remove(&action)
            .ok_or(InputError::ActionNotBound(action))
    }

    /// Snapshot of the actions held by a set of pressed keys.
    #[must_use]
    pub fn resolve(&self, pressed: &HashSet<KeyCode>) -> ControlState {
        let mut state = ControlState::new();
        for (&action, binding) in &self.bindings {
            if binding.keys().any(|key| pressed.contains(&key)) {
                state.set(action, true);
            }
        }
        state
    }
}

// ============================================================================
// Touch controls
// ============================================================================

/// Dead-zone as a fraction of the joystick radius.
pub const JOYSTICK_DEAD_ZONE: f32 = 0.3;

/// Directions a joystick deflection reads as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoystickDirections {
    /// Pushed up (into the arena)
    pub up: bool,
    /// Pushed down
    pub down: bool,
    /// Pushed left
    pub left: bool,
    /// Pushed right
    pub right: bool,
}

impl JoystickDirections {
    /// Whether the stick reads as centered.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Clamps a knob offset to the joystick radius.
#[must_use]
pub fn clamp_knob(dx: f32, dy: f32, max_distance: f32) -> Vec2 {
    Vec2::new(dx, dy).clamp_length_max(max_distance.max(0.0))
}

/// Reads directions from a knob offset in screen space (y grows downward).
///
/// Each axis counts once its clamped offset passes the dead-zone.
#[must_use]
pub fn joystick_directions(dx: f32, dy: f32, max_distance: f32) -> JoystickDirections {
    let knob = clamp_knob(dx, dy, max_distance);
    let threshold = max_distance * JOYSTICK_DEAD_ZONE;

    let horizontal = knob.x.abs() > threshold;
    let vertical = knob.y.abs() > threshold;
    JoystickDirections {
        up: vertical && knob.y < 0.0,
        down: vertical && knob.y > 0.0,
        left: horizontal && knob.x < 0.0,
        right: horizontal && knob.x > 0.0,
    }
}

/// On-screen button and joystick state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualInputs {
    state: ControlState,
}

impl VirtualInputs {
    /// Creates virtual inputs with nothing pressed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ControlState::new(),
        }
    }

    /// Presses or releases an on-screen button.
    pub fn set(&mut self, action: ControlAction, held: bool) {
        self.state.set(action, held);
    }

    /// Replaces the movement actions with a joystick reading.
    pub fn apply_joystick(&mut self, directions: JoystickDirections) {
        self.state.set(ControlAction::Forward, directions.up);
        self.state.set(ControlAction::Backward, directions.down);
        self.state.set(ControlAction::Leftward, directions.left);
        self.state.set(ControlAction::Rightward, directions.right);
    }

    /// Releases everything.
    pub fn release_all(&mut self) {
        self.state = ControlState::new();
    }

    /// Current virtual snapshot.
    #[must_use]
    pub const fn state(&self) -> ControlState {
        self.state
    }

    /// Keyboard snapshot merged with the virtual one.
    #[must_use]
    pub fn merge_into(&self, keyboard: &ControlState) -> ControlState {
        keyboard.merged(&self.state)
    }
}
