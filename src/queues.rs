//! One FIFO ready queue per priority level.
use std::collections::VecDeque;

use crate::types::job::JobId;

/// Ready queues indexed by level, level 0 being the highest priority.
///
/// A job identifier appears in at most one queue at a time. The engine
/// upholds this by only enqueuing jobs it has just admitted or just taken
/// off the CPU.
#[derive(Debug)]
pub struct QueueSet {
    queues: Vec<VecDeque<JobId>>,
}

impl QueueSet {
    pub fn new(num_levels: usize) -> Self {
        Self {
            queues: (0..num_levels).map(|_| VecDeque::new()).collect(),
        }
    }

    /// Appends a job to the tail of `level`'s queue.
    pub fn enqueue(&mut self, level: usize, job: JobId) {
        debug_assert!(!self.contains(job), "job {job} is already queued");
        self.queues[level].push_back(job);
    }

    /// Dequeues the head of the highest-priority non-empty queue, returning
    /// the level it came from alongside it.
    pub fn select_next(&mut self) -> Option<(usize, JobId)> {
        self.queues
            .iter_mut()
            .enumerate()
            .find_map(|(level, queue)| queue.pop_front().map(|job| (level, job)))
    }

    /// Empties every queue below level 0, yielding jobs level by level from
    /// level 1 downwards, each in FIFO order.
    pub fn drain_lower_levels(&mut self) -> Vec<JobId> {
        self.queues
            .iter_mut()
            .skip(1)
            .flat_map(|queue| queue.drain(..))
            .collect()
    }

    pub fn contains(&self, job: JobId) -> bool {
        self.queues.iter().any(|queue| queue.contains(&job))
    }

    /// The jobs waiting at `level`, head first.
    pub fn level(&self, level: usize) -> impl Iterator<Item = JobId> + '_ {
        self.queues[level].iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }
}
