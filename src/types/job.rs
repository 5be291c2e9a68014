use serde::{Deserialize, Serialize};

use super::states::JobState;

pub type JobId = u64;
/// Simulated time units. The clock starts at zero and only moves forward.
pub type Ticks = u64;

/// One entry of the workload, as supplied by the caller.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JobSpec {
    pub id: JobId,
    /// Clock value at which the job becomes ready.
    pub arrival: Ticks,
    /// Total CPU time the job needs.
    pub service: Ticks,
}

impl JobSpec {
    pub fn new(id: JobId, arrival: Ticks, service: Ticks) -> Self {
        Self {
            id,
            arrival,
            service,
        }
    }
}

/// A job plus the runtime bookkeeping the engine keeps for it.
#[derive(Clone, Debug)]
pub struct Job {
    pub spec: JobSpec,
    pub state: JobState,
    pub remaining: Ticks,
    pub level: usize,
    /// Time left at `level` before the job is demoted.
    pub allotment_left: Ticks,
    pub first_run: Option<Ticks>,
    pub completion: Option<Ticks>,
}

impl Job {
    pub(crate) fn new(spec: JobSpec, top_allotment: Ticks) -> Self {
        Self {
            spec,
            state: JobState::Pending,
            remaining: spec.service,
            level: 0,
            allotment_left: top_allotment,
            first_run: None,
            completion: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.spec.id
    }

    pub fn started(&self) -> bool {
        self.first_run.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Time from arrival to first dispatch, once the job has run.
    pub fn response(&self) -> Option<Ticks> {
        self.first_run.map(|t| t - self.spec.arrival)
    }

    /// The finished job's result, or `None` while it still has work left.
    pub fn record(&self) -> Option<JobRecord> {
        Some(JobRecord {
            id: self.spec.id,
            arrival: self.spec.arrival,
            service: self.spec.service,
            first_run: self.first_run?,
            completion: self.completion?,
        })
    }
}

/// Final timing facts for a completed job.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: JobId,
    pub arrival: Ticks,
    pub service: Ticks,
    pub first_run: Ticks,
    pub completion: Ticks,
}

impl JobRecord {
    pub fn response(&self) -> Ticks {
        self.first_run - self.arrival
    }

    pub fn turnaround(&self) -> Ticks {
        self.completion - self.arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_job() {
        let job = Job::new(JobSpec::new(7, 3, 5), 4);

        assert_eq!(job.id(), 7);
        assert_eq!(job.remaining, 5);
        assert_eq!(job.level, 0);
        assert_eq!(job.allotment_left, 4);
        assert_eq!(job.state, JobState::Pending);
        assert!(!job.started());
        assert!(!job.is_done());
        assert_eq!(job.response(), None);
        assert_eq!(job.record(), None);
    }

    #[test]
    fn test_record_timings() {
        let mut job = Job::new(JobSpec::new(1, 2, 3), 4);
        job.first_run = Some(4);
        job.remaining = 0;
        job.completion = Some(9);

        let record = job.record().unwrap();
        assert_eq!(record.response(), 2);
        assert_eq!(record.turnaround(), 7);
        assert_eq!(job.response(), Some(2));
    }
}
