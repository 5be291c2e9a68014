//! The workload and each job's runtime state.
use std::collections::BTreeMap;

use tracing::warn;

use crate::config::SchedulerConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::types::job::{Job, JobId, JobRecord, JobSpec, Ticks};

/// Holds every job of a run, keyed by identifier.
///
/// Jobs are also kept in admission order, ascending by `(arrival, id)`, so
/// jobs arriving on the same tick are always admitted in the same order.
#[derive(Debug)]
pub struct JobRegistry {
    jobs: BTreeMap<JobId, Job>,
    admission_order: Vec<JobId>,
    /// Index into `admission_order` of the next job to arrive.
    cursor: usize,
}

impl JobRegistry {
    /// Validates the workload and initialises each job at level 0. A repeated
    /// identifier replaces the earlier entry.
    pub fn create(
        specs: &[JobSpec],
        config: &SchedulerConfig,
    ) -> ConfigResult<Self> {
        let top_allotment = config.level(0).allotment;
        let mut jobs = BTreeMap::new();

        for &spec in specs {
            if spec.service == 0 {
                return Err(ConfigError::ZeroServiceTime { job: spec.id });
            }
            if jobs.insert(spec.id, Job::new(spec, top_allotment)).is_some() {
                warn!(job = spec.id, "duplicate job id; keeping the last entry");
            }
        }

        let mut admission_order: Vec<JobId> = jobs.keys().copied().collect();
        // Stable, and the keys are already ascending, so ties stay in id order.
        admission_order.sort_by_key(|id| jobs[id].spec.arrival);

        Ok(Self {
            jobs,
            admission_order,
            cursor: 0,
        })
    }

    /// True once no job has remaining work.
    pub fn all_done(&self) -> bool {
        self.jobs.values().all(Job::is_done)
    }

    /// Takes the jobs that have arrived by `now` and not yet been admitted,
    /// in admission order.
    pub(crate) fn take_arrivals(&mut self, now: Ticks) -> Vec<JobId> {
        let start = self.cursor;
        while let Some(id) = self.admission_order.get(self.cursor) {
            if self.jobs[id].spec.arrival > now {
                break;
            }
            self.cursor += 1;
        }

        self.admission_order[start..self.cursor].to_vec()
    }

    /// Whether some job is still to arrive.
    pub fn has_pending_arrivals(&self) -> bool {
        self.cursor < self.admission_order.len()
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    // Only the engine mutates job state.
    pub(crate) fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    /// Jobs in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Results for every completed job, in ascending identifier order.
    pub fn records(&self) -> Vec<JobRecord> {
        self.jobs.values().filter_map(Job::record).collect()
    }
}
