//! Deferred tasks on the simulated fight clock.
//!
//! Every delayed effect of the fight (timer ticks, attack windows, hit-effect
//! decay, the round-end delay) is queued here with a due time and fired in
//! due-time order as the clock advances. Tasks carry the generation they were
//! scheduled under; the state machine drops any task whose generation is stale.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use cucina_common::FighterSlot;

/// A delayed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Repeating round-clock tick.
    RoundTick {
        /// Round generation that scheduled the tick.
        round: u64,
    },
    /// Close a fighter's attack window.
    AttackWindowEnd {
        /// Attacking fighter.
        slot: FighterSlot,
        /// Attack generation that opened the window.
        generation: u64,
    },
    /// Turn off a fighter's hit effect.
    HitEffectEnd {
        /// Fighter that was hit.
        slot: FighterSlot,
        /// Hit-effect generation that triggered it.
        generation: u64,
    },
    /// Move from the round result to the match result.
    MatchEnd {
        /// Round generation that ended.
        round: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due_ms: u64,
    seq: u64,
    task: TimerTask,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap yields the earliest task first
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of deferred tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task to fire at `due_ms`. Tasks due at the same time fire in
    /// scheduling order.
    pub fn schedule(&mut self, due_ms: u64, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled { due_ms, seq, task });
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|s| s.due_ms)
    }

    /// Removes and returns the earliest task if it is due by `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, TimerTask)> {
        if self.next_due()? > now_ms {
            return None;
        }
        self.queue.pop().map(|s| (s.due_ms, s.task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, TimerTask::MatchEnd { round: 1 });
        scheduler.schedule(100, TimerTask::RoundTick { round: 1 });
        scheduler.schedule(200, TimerTask::RoundTick { round: 2 });

        assert_eq!(scheduler.next_due(), Some(100));
        assert_eq!(scheduler.pop_due(50), None);
        assert_eq!(
            scheduler.pop_due(1_000),
            Some((100, TimerTask::RoundTick { round: 1 }))
        );
        assert_eq!(
            scheduler.pop_due(1_000),
            Some((200, TimerTask::RoundTick { round: 2 }))
        );
        assert_eq!(
            scheduler.pop_due(1_000),
            Some((300, TimerTask::MatchEnd { round: 1 }))
        );
        assert_eq!(scheduler.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_same_due_time_keeps_schedule_order() {
        let mut scheduler = Scheduler::new();
        let first = TimerTask::HitEffectEnd {
            slot: FighterSlot::Two,
            generation: 1,
        };
        let second = TimerTask::AttackWindowEnd {
            slot: FighterSlot::One,
            generation: 1,
        };
        scheduler.schedule(500, first);
        scheduler.schedule(500, second);

        assert_eq!(scheduler.pop_due(500), Some((500, first)));
        assert_eq!(scheduler.pop_due(500), Some((500, second)));
    }
}
