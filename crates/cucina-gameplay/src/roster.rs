//! Character roster and accessories.
//!
//! Archetypes are plain data consulted by both the fighting core (stats,
//! accessory power) and the presentation layer (name, emoji, color).

use serde::Serialize;

/// Combat stats on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FighterStats {
    /// Movement speed.
    pub speed: u8,
    /// Attack power.
    pub power: u8,
    /// Damage resistance.
    pub defense: u8,
    /// Starting energy.
    pub energy: u32,
}

/// A selectable character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Archetype {
    /// Roster key.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Fighting style, used for matchups.
    pub style: &'static str,
    /// Emoji shown on the character select screen.
    pub emoji: &'static str,
    /// Body color as a hex string.
    pub color: &'static str,
    /// Combat stats.
    pub stats: FighterStats,
    /// Names of the character's special moves.
    pub special_moves: &'static [&'static str],
    /// Accessory carried into the fight.
    pub accessory: Option<&'static str>,
}

/// A cosmetic item that adds flat damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accessory {
    /// Accessory key.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Flat damage bonus.
    pub power: u32,
}

const fn stats(speed: u8, power: u8, defense: u8) -> FighterStats {
    FighterStats {
        speed,
        power,
        defense,
        energy: 100,
    }
}

/// Every selectable character, in select-screen order.
pub const ARCHETYPES: [Archetype; 6] = [
    Archetype {
        id: "giovanni",
        name: "Giovanni",
        style: "Maestro Pizzaiolo",
        emoji: "🍕",
        color: "#FF6B47",
        stats: stats(7, 8, 7),
        special_moves: &["Pizza Slice", "Dough Spin", "Marinara Splash"],
        accessory: Some("rollingPin"),
    },
    Archetype {
        id: "sofia",
        name: "Sofia",
        style: "Gelato Warrior",
        emoji: "🍨",
        color: "#FFB3E6",
        stats: stats(9, 6, 6),
        special_moves: &["Ice Cream Freeze", "Gelato Whip", "Vanilla Strike"],
        accessory: Some("iceCreamScoop"),
    },
    Archetype {
        id: "marco",
        name: "Marco",
        style: "Espresso Fighter",
        emoji: "☕",
        color: "#8B4513",
        stats: stats(8, 7, 6),
        special_moves: &["Caffeine Rush", "Steam Shot", "Crema Blast"],
        accessory: Some("coffeeGrinder"),
    },
    Archetype {
        id: "lucia",
        name: "Lucia",
        style: "Pasta Master",
        emoji: "🍝",
        color: "#FFD700",
        stats: stats(6, 9, 8),
        special_moves: &["Spaghetti Whip", "Linguine Lasso", "Carbonara Bomb"],
        accessory: Some("ladle"),
    },
    Archetype {
        id: "antonio",
        name: "Antonio",
        style: "Gondoliere",
        emoji: "🚣",
        color: "#0066CC",
        stats: stats(4, 10, 9),
        special_moves: &["Oar Slam", "Venetian Rush", "Canal Splash"],
        accessory: Some("gondolaPaddle"),
    },
    Archetype {
        id: "francesca",
        name: "Francesca",
        style: "Opera Singer",
        emoji: "🎭",
        color: "#8B0000",
        stats: stats(5, 7, 5),
        special_moves: &["Sonic Aria", "High Note", "Drama Strike"],
        accessory: Some("microphone"),
    },
];

/// Every accessory.
pub const ACCESSORIES: [Accessory; 6] = [
    Accessory {
        id: "rollingPin",
        name: "Rolling Pin",
        power: 2,
    },
    Accessory {
        id: "iceCreamScoop",
        name: "Ice Cream Scoop",
        power: 1,
    },
    Accessory {
        id: "coffeeGrinder",
        name: "Coffee Grinder",
        power: 3,
    },
    Accessory {
        id: "ladle",
        name: "Ladle",
        power: 2,
    },
    Accessory {
        id: "gondolaPaddle",
        name: "Gondola Paddle",
        power: 4,
    },
    Accessory {
        id: "microphone",
        name: "Microphone",
        power: 2,
    },
];

/// Looks up a character by id.
#[must_use]
pub fn archetype(id: &str) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.id == id)
}

/// Looks up an accessory by id.
#[must_use]
pub fn accessory(id: &str) -> Option<&'static Accessory> {
    ACCESSORIES.iter().find(|a| a.id == id)
}

/// Flat damage bonus of an optional accessory. Unknown ids contribute nothing.
#[must_use]
pub fn accessory_power(id: Option<&str>) -> u32 {
    id.and_then(accessory).map_or(0, |a| a.power)
}

/// Picks a random character id.
pub fn random_character(rng: &mut fastrand::Rng) -> &'static str {
    ARCHETYPES[rng.usize(..ARCHETYPES.len())].id
}

/// Picks two distinct random character ids.
pub fn random_pair(rng: &mut fastrand::Rng) -> (&'static str, &'static str) {
    let first = rng.usize(..ARCHETYPES.len());
    let offset = rng.usize(1..ARCHETYPES.len());
    let second = (first + offset) % ARCHETYPES.len();
    (ARCHETYPES[first].id, ARCHETYPES[second].id)
}

/// Stat comparison between two characters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matchup {
    /// -1.0 to 1.0, positive when the first character is favored.
    pub advantage: f32,
    /// Short human-readable verdict.
    pub description: String,
}

/// Compares two characters by summed stats. Returns `None` for unknown ids.
#[must_use]
pub fn matchup(first: &str, second: &str) -> Option<Matchup> {
    let (a, b) = (archetype(first)?, archetype(second)?);
    let total = |s: &FighterStats| i32::from(s.speed) + i32::from(s.power) + i32::from(s.defense);

    let advantage = ((total(&a.stats) - total(&b.stats)) as f32 / 30.0).clamp(-1.0, 1.0);
    let description = if advantage > 0.3 {
        format!("{} has the advantage", a.name)
    } else if advantage < -0.3 {
        format!("{} has the advantage", b.name)
    } else {
        "Even match".to_string()
    };

    Some(Matchup {
        advantage,
        description,
    })
}
