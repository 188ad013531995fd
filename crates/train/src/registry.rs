//! Name → schedule lookup, as selected by `--lr-scheduler`.

use std::fmt;
use std::str::FromStr;

use lrsched_common::{LrSchedulerConfig, ScheduleError};

use crate::optimizer::LrOptimizer;
use crate::scheduler::{InverseSqrtSchedule, LrScheduler};

/// Registered schedule names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerKind {
    /// Inverse square root decay with linear warmup.
    Vaswani,
}

impl SchedulerKind {
    pub const NAMES: &'static [&'static str] = &["vaswani"];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vaswani => "vaswani",
        }
    }

    /// Build this schedule around `optimizer`.
    pub fn build<'a, O: LrOptimizer + 'a>(
        &self,
        config: &LrSchedulerConfig,
        optimizer: O,
    ) -> Result<Box<dyn LrScheduler + 'a>, ScheduleError> {
        match self {
            Self::Vaswani => Ok(Box::new(InverseSqrtSchedule::new(config, optimizer)?)),
        }
    }
}

impl FromStr for SchedulerKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vaswani" => Ok(Self::Vaswani),
            other => Err(ScheduleError::configuration(format!(
                "unknown lr scheduler '{other}' (available: {})",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up `name` and build the schedule it refers to.
pub fn build_scheduler<'a, O: LrOptimizer + 'a>(
    name: &str,
    config: &LrSchedulerConfig,
    optimizer: O,
) -> Result<Box<dyn LrScheduler + 'a>, ScheduleError> {
    name.parse::<SchedulerKind>()?.build(config, optimizer)
}

// ── Tests ───────────────────────────────────────────────────────────────────
