//! Match runner.
//!
//! Runs one AI-vs-AI exhibition match to completion, logging fight events as
//! they happen and returning a summary with the final snapshot.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use cucina_common::FighterSlot;
use cucina_gameplay::{
    drain, random_pair, Fight, FightEvent, FightSnapshot, FrameController, GamePhase, Pilot,
};

use crate::config::EngineConfig;
use crate::timing::FrameClock;

/// Result of a finished (or abandoned) match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    /// Seed the match ran with
    pub seed: u64,
    /// Character in slot one
    pub player_one: String,
    /// Character in slot two
    pub player_two: String,
    /// Fixed frames simulated
    pub frames: u64,
    /// Whether the match reached its result screen
    pub completed: bool,
    /// Final state
    pub snapshot: FightSnapshot,
}

/// Runs a match with the given configuration.
pub fn run(config: &EngineConfig) -> Result<MatchSummary> {
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut rng = fastrand::Rng::with_seed(seed);
    let (random_one, random_two) = random_pair(&mut rng);
    let player_one = config.player_one.clone().unwrap_or_else(|| random_one.to_string());
    let player_two = config.player_two.clone().unwrap_or_else(|| random_two.to_string());

    info!("Seed: {seed}");
    info!("Match: {player_one} vs {player_two}");

    let mut fight = Fight::new(config.fight.clone(), seed);
    let events = fight.subscribe();
    fight.start_character_selection();
    fight
        .set_selected_characters(&player_one, &player_two)
        .context("character selection failed")?;
    fight.start_fight();

    let mut controller = FrameController::new(Pilot::ai(), Pilot::ai(), rng.u64(..));
    let mut clock = FrameClock::new(config.target_fps).with_realtime(config.realtime);
    let dt = clock.fixed_dt();
    let max_frames = (config.max_match_seconds / dt).ceil() as u64;
    let no_keys = HashSet::new();

    let mut frames = 0u64;
    'frames: while frames < max_frames {
        let steps = steps_within_cap(clock.begin_frame(), frames, max_frames);
        for _ in 0..steps {
            controller.step(&mut fight, &no_keys, dt);
            frames += 1;

            for event in drain(&events) {
                log_event(&event);
            }
            if fight.phase() == GamePhase::MatchEnd {
                break 'frames;
            }
        }
        clock.end_frame();
    }

    let completed = fight.phase() == GamePhase::MatchEnd;
    if completed {
        info!(
            "Match over after {frames} frames, scores {} - {}",
            fight.score(FighterSlot::One),
            fight.score(FighterSlot::Two)
        );
    } else {
        warn!("Match abandoned after {frames} frames in phase {:?}", fight.phase());
    }
    if clock.is_realtime() {
        debug!("Average FPS: {:.1}", clock.average_fps());
    }

    Ok(MatchSummary {
        seed,
        player_one,
        player_two,
        frames,
        completed,
        snapshot: fight.snapshot(),
    })
}

/// Clamps a frame's catch-up steps so the run never passes `max_frames`.
fn steps_within_cap(steps: u32, frames: u64, max_frames: u64) -> u32 {
    let left = max_frames.saturating_sub(frames);
    u32::try_from(left).map_or(steps, |left| steps.min(left))
}

fn log_event(event: &FightEvent) {
    match event {
        FightEvent::HitLanded {
            attacker,
            defender,
            damage,
            blocked,
            remaining_energy,
            combo,
        } => {
            let how = if *blocked { "blocked hit" } else { "hit" };
            info!("{attacker} {how} on {defender} for {damage} ({remaining_energy} left, combo {combo})");
        },
        FightEvent::RoundEnded { outcome, winner } => match winner {
            Some(slot) => info!("Round to {slot} by {outcome:?}"),
            None => info!("Round drawn by {outcome:?}"),
        },
        other => debug!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> EngineConfig {
        EngineConfig {
            seed: Some(seed),
            player_one: Some("giovanni".to_string()),
            player_two: Some("francesca".to_string()),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_match_runs_to_completion() {
        let summary = run(&config(99)).expect("match runs");

        assert!(summary.completed);
        assert_eq!(summary.snapshot.phase, GamePhase::MatchEnd);
        assert_eq!(summary.player_one, "giovanni");
        assert_eq!(summary.snapshot.fighters.len(), 2);
    }

    #[test]
    fn test_same_seed_same_match() {
        let first = run(&config(5)).expect("match runs");
        let second = run(&config(5)).expect("match runs");

        assert_eq!(first.frames, second.frames);
        assert_eq!(first.snapshot, second.snapshot);
    }

    #[test]
    fn test_short_cap_abandons_match() {
        let mut config = config(1);
        config.max_match_seconds = 1.0;

        let summary = run(&config).expect("match runs");
        assert!(!summary.completed);
        assert_eq!(summary.frames, 60);
    }

    #[test]
    fn test_catch_up_steps_stop_at_cap() {
        let mut clock = FrameClock::new(60).with_realtime(true);
        // A long stall yields the per-frame maximum of catch-up steps
        let steps = clock.accumulate(1.0);
        assert!(steps > 3);

        assert_eq!(steps_within_cap(steps, 57, 60), 3);
        assert_eq!(steps_within_cap(steps, 60, 60), 0);
        assert_eq!(steps_within_cap(steps, 0, 60), steps);
        assert_eq!(steps_within_cap(steps, 0, u64::MAX), steps);
    }

    #[test]
    fn test_realtime_run_respects_frame_cap() {
        let mut config = config(2);
        config.realtime = true;
        config.max_match_seconds = 0.04;

        let summary = run(&config).expect("match runs");
        assert!(!summary.completed);
        assert_eq!(summary.frames, 3);
    }

    #[test]
    fn test_unknown_pick_is_an_error() {
        let mut config = config(1);
        config.player_two = Some("ryu".to_string());
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = run(&config(3)).expect("match runs");
        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["seed"], 3);
        assert_eq!(json["snapshot"]["phase"], "match_end");
    }
}
