//! # lrsched-train — Learning Rate Scheduling
//!
//! Schedules that feed an optimizer a new learning rate after every update:
//!
//! * **[`LrOptimizer`]** — the `get_lr` / `set_lr` contract, with
//!   [`CandleOptimizer`] adapting any `candle_nn::Optimizer`.
//! * **[`LrScheduler`]** — per-update and per-epoch hooks plus checkpoint state.
//! * **[`InverseSqrtSchedule`]** — linear warmup → inverse square root decay.
//! * **[`build_scheduler`]** — look a schedule up by name.

pub mod optimizer;
pub mod registry;
pub mod scheduler;

pub use optimizer::{CandleOptimizer, LrOptimizer};
pub use registry::{build_scheduler, SchedulerKind};
pub use scheduler::{
    InverseSqrtSchedule, LrScheduler, SchedulerBase, SchedulerState, WarmupInitLr,
};
