//! Pause-aware timer scheduling
//!
//! All real-time scheduling (staggered portal drops, portal despawn, wave
//! pacing) funnels through one queue that is advanced exactly once per
//! unpaused tick. Paused frames simply never advance the queue, so every
//! pending duration freezes in place and resumes with its exact remaining
//! time - there is no catch-up burst after a long pause.
//!
//! Cancellation uses a run token: restarting the game bumps the token and
//! clears the queue. An entry whose token no longer matches is additionally
//! discarded at fire time, so a stale timer can never mutate state belonging
//! to a newer run.

use glam::Vec3;

use super::enemy::EnemyKind;
use super::state::EntityId;

/// What a timer does when it comes due
#[derive(Debug, Clone, PartialEq)]
pub enum TimerKind {
    /// Materialize one enemy at a portal (staggered drop)
    SpawnEnemy {
        portal_id: EntityId,
        kind: EnemyKind,
        pos: Vec3,
    },
    /// Close a portal whose lifetime expired
    ClosePortal { portal_id: EntityId },
    /// Open the next wave's portals
    NextWave,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    remaining_ms: f32,
    kind: TimerKind,
    token: u32,
}

/// Single scheduler for all pending real-time callbacks
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    /// Current run token; bumped on restart to invalidate stale entries
    token: u32,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback `delay_ms` from now, tagged with the current run
    pub fn schedule(&mut self, delay_ms: f32, kind: TimerKind) {
        self.entries.push(TimerEntry {
            remaining_ms: delay_ms.max(0.0),
            kind,
            token: self.token,
        });
    }

    /// Advance all pending timers by `dt_ms` and return the ones that came
    /// due, in scheduling order. Must only be called on unpaused ticks.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<TimerKind> {
        let token = self.token;
        let mut due = Vec::new();
        self.entries.retain_mut(|e| {
            if e.token != token {
                // Stale entry from a cancelled run
                return false;
            }
            e.remaining_ms -= dt_ms;
            if e.remaining_ms <= 0.0 {
                due.push(e.kind.clone());
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop every pending timer and invalidate any entry still in flight.
    /// Called on restart and teardown.
    pub fn cancel_all(&mut self) {
        self.token = self.token.wrapping_add(1);
        self.entries.clear();
    }

    /// Number of pending entries (test/diagnostic)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any pending entry matches the predicate
    pub fn any_pending(&self, pred: impl Fn(&TimerKind) -> bool) -> bool {
        self.entries.iter().any(|e| pred(&e.kind))
    }

    /// Iterate pending entry kinds, in scheduling order
    pub fn pending(&self) -> impl Iterator<Item = &TimerKind> {
        self.entries.iter().map(|e| &e.kind)
    }

    /// Smallest remaining delay among pending entries, if any
    pub fn next_due_ms(&self) -> Option<f32> {
        self.entries
            .iter()
            .map(|e| e.remaining_ms)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}
