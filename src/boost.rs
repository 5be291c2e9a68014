//! Periodic priority boost.
use tracing::debug;

use crate::queues::QueueSet;
use crate::registry::JobRegistry;
use crate::types::job::Ticks;

/// Tracks when the next boost is due.
#[derive(Debug)]
pub struct BoostController {
    interval: Ticks,
    next: Ticks,
}

impl BoostController {
    /// The first boost is due one interval after time zero.
    pub fn new(interval: Ticks) -> Self {
        Self {
            interval,
            next: interval,
        }
    }

    pub fn due_at(&self, now: Ticks) -> bool {
        now == self.next
    }

    pub fn next(&self) -> Ticks {
        self.next
    }

    /// Moves every job waiting below level 0 to the tail of level 0, resets
    /// its priority and allotment, and schedules the next boost. Only queued
    /// jobs are touched. Returns how many jobs moved.
    pub fn fire(
        &mut self,
        queues: &mut QueueSet,
        registry: &mut JobRegistry,
        top_allotment: Ticks,
    ) -> usize {
        let moved = queues.drain_lower_levels();

        for &id in &moved {
            if let Some(job) = registry.get_mut(id) {
                job.level = 0;
                job.allotment_left = top_allotment;
            }
            queues.enqueue(0, id);
        }

        self.next += self.interval;
        debug!(moved = moved.len(), next = self.next, "boost fired");

        moved.len()
    }
}
