//! Learning-rate schedule configuration.
//!
//! Serialised as JSON. Every field has a default matching the command-line
//! defaults, so a minimal `{}` JSON yields a usable schedule.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Hyper-parameters consumed by the inverse-sqrt schedule.
///
/// Schedules only ever read this struct; the warmup sentinel is resolved
/// into the schedule's own state, never written back here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LrSchedulerConfig {
    /// Target learning rate(s). The inverse-sqrt schedule accepts exactly one.
    #[serde(default = "default_lr")]
    pub lr: Vec<f64>,
    /// Number of updates spent on the linear warmup ramp.
    #[serde(default = "default_warmup_updates")]
    pub warmup_updates: u64,
    /// Initial warmup learning rate. Negative means "unset".
    #[serde(default)]
    pub warmup_init_lr: f64,
    /// Model dimension used for the `d_model^-0.5` scale.
    #[serde(default = "default_hidden_layer_size")]
    pub hidden_layer_size: u64,
}

// ── Default value functions ─────────────────────────────────────────────────

fn default_lr() -> Vec<f64> {
    vec![5e-4]
}
fn default_warmup_updates() -> u64 {
    4000
}
fn default_hidden_layer_size() -> u64 {
    1024
}

// ── Impl ────────────────────────────────────────────────────────────────────

impl Default for LrSchedulerConfig {
    fn default() -> Self {
        Self {
            lr: default_lr(),
            warmup_updates: default_warmup_updates(),
            warmup_init_lr: 0.0,
            hidden_layer_size: default_hidden_layer_size(),
        }
    }
}

impl LrSchedulerConfig {
    /// Save config to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ScheduleError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Whether `warmup_init_lr` carries the "not provided" sentinel.
    pub fn warmup_init_lr_unset(&self) -> bool {
        self.warmup_init_lr < 0.0
    }

    /// Check every field and report all problems at once.
    ///
    /// The target `lr` is only checked when the warmup sentinel makes it the
    /// initial rate; otherwise the schedule never reads it.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let mut errors = Vec::new();

        match self.lr.first() {
            None => errors.push("lr must contain a target learning rate".to_string()),
            Some(&lr) if self.warmup_init_lr_unset() && (!lr.is_finite() || lr <= 0.0) => {
                errors.push(format!(
                    "lr[0] must be finite and greater than 0 when warmup_init_lr is unset (got {lr})"
                ));
            }
            Some(_) => {}
        }
        if self.warmup_updates == 0 {
            errors.push("warmup_updates must be greater than 0".to_string());
        }
        if self.hidden_layer_size == 0 {
            errors.push("hidden_layer_size must be greater than 0".to_string());
        }

        if !errors.is_empty() {
            return Err(ScheduleError::Validation(errors));
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
