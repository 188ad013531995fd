//! # lrsched-common — Shared Primitives
//!
//! Types shared across every crate in the workspace:
//!
//! * **[`LrSchedulerConfig`]** — schedule hyper-parameters (serialised as JSON).
//! * **[`ScheduleError`]** — configuration, domain and I/O failures.

pub mod config;
pub mod error;

pub use config::LrSchedulerConfig;
pub use error::ScheduleError;
