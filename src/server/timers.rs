//! The unified per-room timer registry (§9 "model each room as an actor
//! with an inbound command queue; timers post commands to that queue
//! rather than mutating state directly").
//!
//! Every per-room timing need funnels through one Start/Cancel API keyed by
//! a monotonically increasing generation counter. Starting a new timer
//! always bumps the generation, so any in-flight expiry or tick from a
//! previous timer is recognized as stale and dropped on arrival — this is
//! what gives the "at most one active timer per room" invariant for free,
//! without a flag checked on a shared event loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::room_actor::RoomCommand;

/// Identifies which timing need a pending timer serves. Every duration
/// named in the Timeouts list (§5) has exactly one corresponding kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    JudgeSelectionAutoAdvance,
    PromptSelectionTimeout,
    SoundSelectionTimeout,
    PostPlaybackDelay,
    PostWinCelebration,
    AutoWinnerAudio,
    DisconnectionGrace,
    ReconnectionVote,
}

#[derive(Clone)]
pub struct TimerRegistry {
    sender: mpsc::Sender<RoomCommand>,
    generation: Arc<AtomicU64>,
}

impl TimerRegistry {
    pub fn new(sender: mpsc::Sender<RoomCommand>) -> Self {
        Self {
            sender,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidate whatever timer is currently pending, without starting a
    /// replacement.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a plain timer: one `TimerExpired` command after `duration`,
    /// with no intermediate ticks. Replaces any timer already pending.
    pub fn start(&self, kind: TimerKind, duration: Duration) {
        self.start_inner(kind, duration, None);
    }

    /// Start a timer that also emits a `TimerTick` once per second, for
    /// countdowns surfaced to clients (prompt/sound selection, reconnection
    /// vote). Replaces any timer already pending.
    pub fn start_with_countdown(&self, kind: TimerKind, duration: Duration) {
        self.start_inner(kind, duration, Some(Duration::from_secs(1)));
    }

    fn start_inner(&self, kind: TimerKind, duration: Duration, tick: Option<Duration>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let sender = self.sender.clone();
        let generation_cell = self.generation.clone();

        tokio::spawn(async move {
            let deadline = Instant::now() + duration;

            if let Some(tick) = tick {
                let mut remaining = duration;
                while remaining > tick {
                    tokio::time::sleep(tick).await;
                    if generation_cell.load(Ordering::SeqCst) != generation {
                        return;
                    }
                    remaining = remaining.saturating_sub(tick);
                    let seconds_remaining = remaining.as_secs() as u32;
                    if sender
                        .send(RoomCommand::TimerTick {
                            kind,
                            generation,
                            seconds_remaining,
                        })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                let remainder = deadline.saturating_duration_since(Instant::now());
                tokio::time::sleep(remainder).await;
            } else {
                tokio::time::sleep(duration).await;
            }

            if generation_cell.load(Ordering::SeqCst) != generation {
                return;
            }
            let _ = sender.send(RoomCommand::TimerExpired { kind, generation }).await;
        });
    }
}
