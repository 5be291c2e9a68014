//! A deterministic simulator for Multi-Level Feedback Queue CPU scheduling.
//!
//! A [`Simulation`] replays a fixed workload against a [`SchedulerConfig`]
//! one time unit at a time, producing the chronological [`SimEvent`] stream
//! and per-job timings from which a [`Report`] is built.
pub mod boost;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod queues;
pub mod registry;
pub mod report;
pub mod types;

pub use config::{Level, Scenario, SchedulerConfig};
pub use engine::{Outcome, Simulation, Transition};
pub use error::{ConfigError, ConfigResult};
pub use report::Report;
pub use types::event::SimEvent;
pub use types::job::{JobId, JobRecord, JobSpec, Ticks};
pub use types::trace::TraceLine;
