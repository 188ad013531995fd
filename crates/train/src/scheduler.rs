//! Learning rate schedules.
//!
//! A schedule is driven from two places in a training loop: once after every
//! optimiser update ([`LrScheduler::step_update`]) and once at the end of
//! every epoch ([`LrScheduler::step`]). Each schedule owns (or borrows) the
//! optimizer it feeds and pushes every new rate into it.

mod inverse_sqrt;

pub use inverse_sqrt::{InverseSqrtSchedule, WarmupInitLr};

use serde::{Deserialize, Serialize};

// ── Scheduler trait ─────────────────────────────────────────────────────────

pub trait LrScheduler {
    /// End-of-epoch hook. Returns the optimizer's learning rate afterwards.
    fn step(&mut self, epoch: usize, val_loss: Option<f64>) -> f64;

    /// Per-update hook. Returns the learning rate now set on the optimizer.
    fn step_update(&mut self, num_updates: u64) -> f64;

    /// The optimizer's current learning rate.
    fn get_lr(&self) -> f64;

    /// Bookkeeping to persist alongside a training checkpoint.
    fn state(&self) -> SchedulerState;

    fn load_state(&mut self, state: SchedulerState);
}

// ── Shared epoch bookkeeping ────────────────────────────────────────────────

/// Checkpointable scheduler state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Lowest validation loss reported so far.
    pub best: Option<f64>,
}

/// Epoch-level bookkeeping common to every schedule.
#[derive(Debug, Clone, Default)]
pub struct SchedulerBase {
    best: Option<f64>,
}

impl SchedulerBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an end-of-epoch validation loss.
    pub fn observe(&mut self, val_loss: Option<f64>) {
        let Some(loss) = val_loss else {
            return;
        };
        self.best = Some(match self.best {
            Some(best) => best.min(loss),
            None => loss,
        });
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState { best: self.best }
    }

    pub fn load_state(&mut self, state: SchedulerState) {
        self.best = state.best;
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
