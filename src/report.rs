//! Summary statistics for a finished run.
use std::fmt::{self, Write};

use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::engine::Outcome;
use crate::types::job::{JobId, Ticks};

/// One completed job's timings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobRow {
    pub id: JobId,
    pub arrival: Ticks,
    pub service: Ticks,
    pub response: Ticks,
    pub completion: Ticks,
    pub turnaround: Ticks,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "end-time")]
    pub end_time: Ticks,
    pub jobs: Vec<JobRow>,
    /// Mean response time; zero for an empty workload.
    #[serde(rename = "avg-response")]
    pub avg_response: f64,
    /// Mean turnaround time; zero for an empty workload.
    #[serde(rename = "avg-turnaround")]
    pub avg_turnaround: f64,
}

impl Report {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let jobs: Vec<JobRow> = outcome
            .records
            .iter()
            .map(|r| JobRow {
                id: r.id,
                arrival: r.arrival,
                service: r.service,
                response: r.response(),
                completion: r.completion,
                turnaround: r.turnaround(),
            })
            .collect();

        let mean = |f: fn(&JobRow) -> Ticks| {
            if jobs.is_empty() {
                0.0
            } else {
                jobs.iter().map(f).sum::<Ticks>() as f64 / jobs.len() as f64
            }
        };

        Self {
            end_time: outcome.end_time,
            avg_response: mean(|row| row.response),
            avg_turnaround: mean(|row| row.turnaround),
            jobs,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Simulation completed at time {}", self.end_time)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10}{:<15}{:<15}{:<20}",
            "JobID", "StartTime", "ResponseTime", "TurnaroundTime"
        )?;
        for row in &self.jobs {
            writeln!(
                f,
                "{:<10}{:<15}{:<15}{:<20}",
                row.id, row.arrival, row.response, row.turnaround
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Final statistics:")?;
        writeln!(
            f,
            "Avg\t{:<10}{:<15.2}{:<20.2}",
            "-", self.avg_response, self.avg_turnaround
        )
    }
}

/// Renders the per-level quantum and allotment table printed before a run.
pub fn level_banner(config: &SchedulerConfig) -> String {
    let mut out = String::from("Priority Allotments:\n");
    for (i, level) in config.levels().iter().enumerate() {
        // Writing to a String can't fail.
        let _ = writeln!(
            out,
            "Priority {i} allotment: {} | Quantum: {}",
            level.allotment, level.quantum
        );
    }
    out
}
