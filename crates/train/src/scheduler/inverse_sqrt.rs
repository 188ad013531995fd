//! Inverse square root decay with linear warmup ("vaswani").
//!
//! ```text
//! lr(n) = min(n * warmup_updates^-1.5, n^-0.5) * hidden_layer_size^-0.5
//! ```
//!
//! The linear term is smaller while `n < warmup_updates`, the decay term after;
//! both meet at `n == warmup_updates`, where the rate peaks.

use lrsched_common::{LrSchedulerConfig, ScheduleError};

use super::{LrScheduler, SchedulerBase, SchedulerState};
use crate::optimizer::LrOptimizer;

/// How the configured `warmup_init_lr` turned into the initial learning rate
/// (before the `d_model` scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarmupInitLr {
    /// The sentinel (negative) value was given; the target `lr` is used.
    TargetFallback(f64),
    /// A non-negative value was given and discarded in favour of
    /// `warmup_updates^-1.5`. The requested value never reaches the optimizer.
    Overridden { requested: f64, applied: f64 },
}

impl WarmupInitLr {
    pub fn value(&self) -> f64 {
        match *self {
            Self::TargetFallback(lr) => lr,
            Self::Overridden { applied, .. } => applied,
        }
    }
}

pub struct InverseSqrtSchedule<O> {
    base: SchedulerBase,
    optimizer: O,
    warmup_updates: u64,
    warmup_slope: f64,
    d_model_factor: f64,
    warmup_init: WarmupInitLr,
    initial_lr: f64,
    lr: f64,
}

impl<O: LrOptimizer> InverseSqrtSchedule<O> {
    /// Build the schedule and set the initial learning rate on `optimizer`.
    pub fn new(config: &LrSchedulerConfig, mut optimizer: O) -> Result<Self, ScheduleError> {
        if config.lr.len() > 1 {
            return Err(ScheduleError::configuration(
                "Cannot use a fixed learning rate schedule with inverse_sqrt. \
                 Consider --lr-scheduler=fixed instead.",
            ));
        }
        if config.warmup_updates == 0 {
            return Err(ScheduleError::domain(
                "warmup_updates^-1.5 is undefined for warmup_updates = 0",
            ));
        }
        if config.hidden_layer_size == 0 {
            return Err(ScheduleError::domain(
                "hidden_layer_size^-0.5 is undefined for hidden_layer_size = 0",
            ));
        }
        config.validate()?;

        let warmup_slope = (config.warmup_updates as f64).powf(-1.5);
        let d_model_factor = (config.hidden_layer_size as f64).powf(-0.5);

        let warmup_init = if config.warmup_init_lr_unset() {
            WarmupInitLr::TargetFallback(config.lr[0])
        } else {
            WarmupInitLr::Overridden {
                requested: config.warmup_init_lr,
                applied: warmup_slope,
            }
        };
        if let WarmupInitLr::Overridden { requested, applied } = warmup_init {
            tracing::warn!(
                requested,
                applied,
                "warmup_init_lr replaced by warmup_updates^-1.5 (init lr before d_model scaling)"
            );
        }

        let initial_lr = warmup_init.value() * d_model_factor;
        optimizer.set_lr(initial_lr);
        tracing::debug!(
            warmup_updates = config.warmup_updates,
            hidden_layer_size = config.hidden_layer_size,
            d_model_factor,
            initial_lr,
            "inverse-sqrt schedule ready"
        );

        Ok(Self {
            base: SchedulerBase::new(),
            optimizer,
            warmup_updates: config.warmup_updates,
            warmup_slope,
            d_model_factor,
            warmup_init,
            initial_lr,
            lr: initial_lr,
        })
    }

    /// Learning rate after `num_updates` updates, without touching any state.
    ///
    /// `n^-0.5` has no value at zero, so update 0 maps to the initial rate.
    pub fn rate_at(&self, num_updates: u64) -> f64 {
        if num_updates == 0 {
            return self.initial_lr;
        }
        let n = num_updates as f64;
        let linear = n * self.warmup_slope;
        let decay = n.powf(-0.5);
        linear.min(decay) * self.d_model_factor
    }

    /// Update count where warmup hands over to decay.
    pub fn crossover(&self) -> u64 {
        self.warmup_updates
    }

    /// Highest rate the schedule reaches (at the crossover).
    pub fn peak_lr(&self) -> f64 {
        self.rate_at(self.warmup_updates)
    }

    pub fn d_model_factor(&self) -> f64 {
        self.d_model_factor
    }

    /// Slope of the warmup ramp, `warmup_updates^-1.5`.
    pub fn warmup_slope(&self) -> f64 {
        self.warmup_slope
    }

    pub fn warmup_init(&self) -> WarmupInitLr {
        self.warmup_init
    }

    pub fn initial_lr(&self) -> f64 {
        self.initial_lr
    }

    /// Last rate this schedule computed.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    pub fn best_val_loss(&self) -> Option<f64> {
        self.base.best()
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut O {
        &mut self.optimizer
    }

    pub fn into_optimizer(self) -> O {
        self.optimizer
    }
}

impl<O: LrOptimizer> LrScheduler for InverseSqrtSchedule<O> {
    fn step(&mut self, epoch: usize, val_loss: Option<f64>) -> f64 {
        self.base.observe(val_loss);
        // rate only moves per update
        tracing::trace!(epoch, ?val_loss, "epoch end");
        self.optimizer.get_lr()
    }

    fn step_update(&mut self, num_updates: u64) -> f64 {
        self.lr = self.rate_at(num_updates);
        self.optimizer.set_lr(self.lr);
        self.lr
    }

    fn get_lr(&self) -> f64 {
        self.optimizer.get_lr()
    }

    fn state(&self) -> SchedulerState {
        self.base.state()
    }

    fn load_state(&mut self, state: SchedulerState) {
        self.base.load_state(state);
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
