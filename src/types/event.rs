use serde::Serialize;

use super::job::{JobId, Ticks};
use super::trace::TraceLine;

/// Something the engine did, stamped with the clock value it happened at.
/// A run's events are recorded in the order they occur.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SimEvent {
    /// A job arrived and joined the tail of the level 0 queue.
    Admitted { at: Ticks, job: JobId, level: usize },
    /// A job was taken off its queue and given the CPU. `first` is set on
    /// the job's first ever dispatch.
    Dispatched {
        at: Ticks,
        job: JobId,
        level: usize,
        quantum: Ticks,
        allotment_left: Ticks,
        first: bool,
    },
    /// A dispatch ended without finishing the job. `allotment_left` is the
    /// allotment after charging `used`.
    SliceEnded {
        at: Ticks,
        job: JobId,
        level: usize,
        used: Ticks,
        allotment_left: Ticks,
    },
    /// The job exhausted its allotment and moved down one level.
    Demoted {
        at: Ticks,
        job: JobId,
        from: usize,
        to: usize,
        allotment: Ticks,
    },
    /// The job exhausted its allotment on the lowest level and had it reset.
    AllotmentRefreshed {
        at: Ticks,
        job: JobId,
        level: usize,
        allotment: Ticks,
    },
    /// Every waiting job below level 0 was moved to level 0.
    Boosted { at: Ticks, moved: usize },
    /// The job ran out of remaining work.
    Completed { at: Ticks, job: JobId },
}

impl SimEvent {
    pub fn at(&self) -> Ticks {
        use SimEvent::*;

        match self {
            Admitted { at, .. }
            | Dispatched { at, .. }
            | SliceEnded { at, .. }
            | Demoted { at, .. }
            | AllotmentRefreshed { at, .. }
            | Boosted { at, .. }
            | Completed { at, .. } => *at,
        }
    }

    /// The job the event concerns, if it concerns a single job.
    pub fn job(&self) -> Option<JobId> {
        use SimEvent::*;

        match self {
            Admitted { job, .. }
            | Dispatched { job, .. }
            | SliceEnded { job, .. }
            | Demoted { job, .. }
            | AllotmentRefreshed { job, .. }
            | Completed { job, .. } => Some(*job),
            Boosted { .. } => None,
        }
    }
}

impl TraceLine for SimEvent {
    fn trace_line(&self) -> String {
        use SimEvent::*;

        match self {
            Admitted { at, job, level } => {
                format!("Job {job} arrived at time {at} and added to queue {level}")
            },
            Dispatched {
                at,
                job,
                level,
                quantum,
                allotment_left,
                first: true,
            } => format!(
                "Job {job} started at time {at} with priority {level} \
                 (Quantum: {quantum}, Allotment: {allotment_left})"
            ),
            Dispatched {
                at,
                job,
                level,
                quantum,
                allotment_left,
                first: false,
            } => format!(
                "Job {job} resumed at time {at} with priority {level} \
                 (Quantum: {quantum}, Allotment left: {allotment_left})"
            ),
            SliceEnded {
                at: _,
                job,
                level,
                used,
                allotment_left,
            } => format!(
                "Job {job} used {used} units at priority {level} \
                 (Quantum used: {used}, Allotment left: {allotment_left})"
            ),
            Demoted {
                at,
                job,
                from: _,
                to,
                allotment,
            } => format!(
                "Job {job} demoted to queue {to} at time {at} \
                 (Allotment reset to {allotment})"
            ),
            AllotmentRefreshed {
                at,
                job,
                level,
                allotment,
            } => format!(
                "Job {job} remains at queue {level} with allotment reset to \
                 {allotment} at time {at}"
            ),
            Boosted { at, moved: _ } => {
                format!("Boosting all jobs to highest priority at time {at}")
            },
            Completed { at, job } => {
                format!("Job {job} finished at time {at}")
            },
        }
    }
}
