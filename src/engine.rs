//! The tick-driven MLFQ simulation loop.
use tracing::{debug, info, instrument, trace};

use crate::boost::BoostController;
use crate::config::SchedulerConfig;
use crate::error::ConfigResult;
use crate::queues::QueueSet;
use crate::registry::JobRegistry;
use crate::types::event::SimEvent;
use crate::types::job::{JobId, JobRecord, JobSpec, Ticks};
use crate::types::states::JobState;

/// What happens to a job once a dispatch ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// No work left; the job leaves the scheduler.
    Completed,
    /// Allotment remains; back to the tail of the same level.
    Requeued,
    /// Allotment exhausted above the lowest level; moves down to `to`.
    Demoted { to: usize },
    /// Allotment exhausted on the lowest level; stays there with a fresh
    /// allotment.
    Refreshed,
}

/// Decides a job's fate after a dispatch at `level`, given its remaining
/// work and its allotment after charging the units just used.
pub fn transition(
    level: usize,
    lowest: usize,
    remaining: Ticks,
    allotment_left: Ticks,
) -> Transition {
    if remaining == 0 {
        Transition::Completed
    } else if allotment_left > 0 {
        Transition::Requeued
    } else if level < lowest {
        Transition::Demoted { to: level + 1 }
    } else {
        Transition::Refreshed
    }
}

/// Everything a finished run produced.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Scheduling events in the order they happened.
    pub events: Vec<SimEvent>,
    /// Per-job results in ascending identifier order.
    pub records: Vec<JobRecord>,
    /// Clock value when the last job completed.
    pub end_time: Ticks,
    /// Time units spent running jobs.
    pub busy: Ticks,
    /// Time units with nothing to run.
    pub idle: Ticks,
}

/// A single simulation run. Owns its clock, queues and boost state, so
/// separate instances never interfere with each other.
#[derive(Debug)]
pub struct Simulation {
    config: SchedulerConfig,
    registry: JobRegistry,
    queues: QueueSet,
    boost: BoostController,
    now: Ticks,
    busy: Ticks,
    idle: Ticks,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(config: SchedulerConfig, jobs: &[JobSpec]) -> ConfigResult<Self> {
        let registry = JobRegistry::create(jobs, &config)?;

        Ok(Self {
            queues: QueueSet::new(config.num_levels()),
            boost: BoostController::new(config.boost_interval()),
            config,
            registry,
            now: 0,
            busy: 0,
            idle: 0,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs until every job has completed. Terminates because every job has
    /// positive service time and each busy tick removes one unit of work.
    #[instrument(
        name = "simulate",
        skip_all,
        fields(jobs = self.registry.len(), levels = self.config.num_levels())
    )]
    pub fn run(mut self) -> Outcome {
        loop {
            self.tick_boundary();

            match self.queues.select_next() {
                Some((level, id)) => {
                    self.dispatch(level, id);
                    if cfg!(debug_assertions) {
                        self.check_invariants();
                    }
                },
                None if self.registry.all_done() => break,
                None => {
                    debug_assert!(
                        self.registry.has_pending_arrivals(),
                        "unfinished jobs but nothing queued or arriving"
                    );
                    trace!(at = self.now, "idle");
                    self.now += 1;
                    self.idle += 1;
                },
            }
        }

        info!(
            end_time = self.now,
            busy = self.busy,
            idle = self.idle,
            "simulation finished"
        );

        Outcome {
            records: self.registry.records(),
            events: self.events,
            end_time: self.now,
            busy: self.busy,
            idle: self.idle,
        }
    }

    /// Fires a due boost, then admits the jobs arriving now. Runs once per
    /// clock value, including those reached partway through a dispatch.
    fn tick_boundary(&mut self) {
        if self.boost.due_at(self.now) {
            let moved = self.boost.fire(
                &mut self.queues,
                &mut self.registry,
                self.config.level(0).allotment,
            );
            self.emit(SimEvent::Boosted {
                at: self.now,
                moved,
            });
        }

        for id in self.registry.take_arrivals(self.now) {
            let top_allotment = self.config.level(0).allotment;
            // Arrivals come from the registry itself.
            let Some(job) = self.registry.get_mut(id) else {
                continue;
            };
            job.level = 0;
            job.allotment_left = top_allotment;
            job.state = JobState::Ready;

            self.queues.enqueue(0, id);
            self.emit(SimEvent::Admitted {
                at: self.now,
                job: id,
                level: 0,
            });
        }
    }

    /// Runs `id` for one slice and applies the resulting transition.
    fn dispatch(&mut self, level: usize, id: JobId) {
        let quantum = self.config.level(level).quantum;
        let now = self.now;

        // Queues only ever hold registered jobs.
        let Some(job) = self.registry.get_mut(id) else {
            return;
        };
        debug_assert_eq!(job.level, level, "job {id} queued at wrong level");

        let first = !job.started();
        if first {
            job.first_run = Some(now);
        }
        job.state = JobState::Running;

        // Caps are fixed here; arrivals or boosts mid-slice don't shorten it.
        let slice = quantum.min(job.remaining).min(job.allotment_left);
        let allotment_left = job.allotment_left;

        self.emit(SimEvent::Dispatched {
            at: now,
            job: id,
            level,
            quantum,
            allotment_left,
            first,
        });

        let mut used = 0;
        while used < slice {
            self.now += 1;
            self.busy += 1;
            used += 1;

            let remaining = match self.registry.get_mut(id) {
                Some(job) => {
                    job.remaining -= 1;
                    job.remaining
                },
                None => return,
            };

            self.tick_boundary();

            if remaining == 0 {
                break;
            }
        }

        self.finish_slice(level, id, used);
    }

    fn finish_slice(&mut self, level: usize, id: JobId, used: Ticks) {
        let now = self.now;
        let lowest = self.config.lowest();

        let Some(job) = self.registry.get_mut(id) else {
            return;
        };
        if job.remaining > 0 {
            job.allotment_left -= used;
        }
        let allotment_left = job.allotment_left;

        let outcome = transition(level, lowest, job.remaining, allotment_left);
        trace!(job = id, used, ?outcome, "slice ended");

        match outcome {
            Transition::Completed => {
                job.state = JobState::Completed;
                job.completion = Some(now);
                self.emit(SimEvent::Completed { at: now, job: id });
                return;
            },
            Transition::Requeued => {},
            Transition::Demoted { to } => {
                job.level = to;
                job.allotment_left = self.config.level(to).allotment;
            },
            Transition::Refreshed => {
                job.allotment_left = self.config.level(level).allotment;
            },
        }

        job.state = JobState::Ready;
        let (new_level, new_allotment) = (job.level, job.allotment_left);

        self.emit(SimEvent::SliceEnded {
            at: now,
            job: id,
            level,
            used,
            allotment_left,
        });
        match outcome {
            Transition::Demoted { to } => self.emit(SimEvent::Demoted {
                at: now,
                job: id,
                from: level,
                to,
                allotment: new_allotment,
            }),
            Transition::Refreshed => {
                self.emit(SimEvent::AllotmentRefreshed {
                    at: now,
                    job: id,
                    level,
                    allotment: new_allotment,
                })
            },
            _ => {},
        }

        self.queues.enqueue(new_level, id);
    }

    // Between dispatches every job with work left and already admitted sits
    // in exactly one queue, at its own level.
    fn check_invariants(&self) {
        let mut ready = 0;
        for job in self.registry.iter() {
            let id = job.id();
            if job.state == JobState::Ready {
                ready += 1;
                debug_assert!(
                    self.queues.level(job.level).any(|queued| queued == id),
                    "ready job {id} missing from queue {}",
                    job.level
                );
            } else {
                debug_assert!(
                    !self.queues.contains(id),
                    "job {id} is {:?} but still queued",
                    job.state
                );
            }
        }
        debug_assert_eq!(self.queues.len(), ready, "job queued more than once");
    }

    fn emit(&mut self, event: SimEvent) {
        debug!(at = event.at(), job = event.job(), ?event, "scheduling event");
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        quantums: &[Ticks],
        allotments: &[Ticks],
        boost: Ticks,
        jobs: &[JobSpec],
    ) -> Outcome {
        let config = SchedulerConfig::new(quantums, allotments, boost).unwrap();
        Simulation::new(config, jobs).unwrap().run()
    }

    fn completion(outcome: &Outcome, id: JobId) -> Ticks {
        outcome
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.completion)
            .unwrap()
    }

    #[test]
    fn test_transition_table() {
        use Transition::*;

        // (level, lowest, remaining, allotment_left) -> outcome
        let cases = [
            ((0, 2, 0, 3), Completed),
            ((0, 2, 0, 0), Completed),
            ((2, 2, 0, 0), Completed),
            ((0, 2, 5, 3), Requeued),
            ((2, 2, 5, 1), Requeued),
            ((0, 2, 5, 0), Demoted { to: 1 }),
            ((1, 2, 5, 0), Demoted { to: 2 }),
            ((2, 2, 5, 0), Refreshed),
            ((0, 0, 5, 0), Refreshed),
        ];

        for ((level, lowest, remaining, left), expected) in cases {
            assert_eq!(
                transition(level, lowest, remaining, left),
                expected,
                "level={level} lowest={lowest} remaining={remaining} left={left}"
            );
        }
    }

    #[test]
    fn test_round_robin_single_level() {
        let outcome = run(
            &[1],
            &[Ticks::MAX],
            1000,
            &[JobSpec::new(1, 0, 3), JobSpec::new(2, 0, 2)],
        );

        let order: Vec<_> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Dispatched { job, .. } => Some(*job),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![1, 2, 1, 2, 1]);

        assert_eq!(completion(&outcome, 1), 5);
        assert_eq!(completion(&outcome, 2), 4);
        // One CPU, so the second job waits one unit for its first turn.
        assert_eq!(outcome.records[0].response(), 0);
        assert_eq!(outcome.records[1].response(), 1);
        assert_eq!(outcome.end_time, 5);
    }

    #[test]
    fn test_single_job_demotions() {
        let outcome = run(&[1, 2, 3], &[4, 6, 8], 20, &[JobSpec::new(1, 0, 14)]);

        let dispatches: Vec<_> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Dispatched { at, level, .. } => Some((*at, *level)),
                _ => None,
            })
            .collect();
        assert_eq!(
            dispatches,
            vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (3, 0),
                (4, 1),
                (6, 1),
                (8, 1),
                (10, 2),
                (13, 2),
            ]
        );

        let demotions: Vec<_> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Demoted { at, from, to, .. } => Some((*at, *from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(demotions, vec![(4, 0, 1), (10, 1, 2)]);
        assert_eq!(completion(&outcome, 1), 14);
    }

    #[test]
    fn test_completion_preempts_demotion() {
        // Ten units fit exactly into the level 0 and level 1 allotments.
        let outcome = run(&[1, 2, 3], &[4, 6, 8], 20, &[JobSpec::new(1, 0, 10)]);

        assert_eq!(completion(&outcome, 1), 10);
        assert_eq!(
            outcome
                .events
                .iter()
                .filter(|e| matches!(e, SimEvent::Demoted { .. }))
                .count(),
            1
        );
        assert_eq!(
            outcome.events.last(),
            Some(&SimEvent::Completed { at: 10, job: 1 })
        );
    }

    #[test]
    fn test_lowest_level_refreshes() {
        let outcome = run(&[2], &[2], 100, &[JobSpec::new(1, 0, 5)]);

        let refreshes = outcome
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::AllotmentRefreshed { .. }))
            .count();
        assert_eq!(refreshes, 2);
        assert!(!outcome
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::Demoted { .. })));
        assert_eq!(completion(&outcome, 1), 5);
    }

    #[test]
    fn test_boost_moves_waiting_jobs() {
        let outcome = run(
            &[1, 1],
            &[1, 1],
            4,
            &[JobSpec::new(1, 0, 4), JobSpec::new(2, 0, 4)],
        );

        let boosts: Vec<_> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Boosted { at, moved } => Some((*at, *moved)),
                _ => None,
            })
            .collect();
        // Job 2 is running at both boosts, so only job 1 moves, and only once.
        assert_eq!(boosts, vec![(4, 1), (8, 0)]);

        // After the boost at 4, job 1 runs again at level 0.
        assert!(outcome.events.contains(&SimEvent::Dispatched {
            at: 4,
            job: 1,
            level: 0,
            quantum: 1,
            allotment_left: 1,
            first: false,
        }));

        assert_eq!(completion(&outcome, 1), 7);
        assert_eq!(completion(&outcome, 2), 8);
        assert_eq!(outcome.end_time, 8);
    }

    #[test]
    fn test_idle_until_arrival() {
        let outcome = run(&[1, 2, 3], &[4, 6, 8], 20, &[JobSpec::new(1, 3, 2)]);

        assert_eq!(outcome.idle, 3);
        assert_eq!(outcome.busy, 2);
        assert_eq!(outcome.end_time, 5);
        assert_eq!(outcome.records[0].response(), 0);
        assert_eq!(
            outcome.events.first(),
            Some(&SimEvent::Admitted {
                at: 3,
                job: 1,
                level: 0
            })
        );
    }

    #[test]
    fn test_mid_slice_arrival() {
        // Job 2 arrives while job 1 runs, and again exactly as a slice ends.
        let outcome = run(
            &[5],
            &[100],
            1000,
            &[
                JobSpec::new(1, 0, 5),
                JobSpec::new(2, 2, 1),
                JobSpec::new(3, 5, 1),
            ],
        );

        let admitted: Vec<_> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Admitted { at, job, .. } => Some((*at, *job)),
                _ => None,
            })
            .collect();
        assert_eq!(admitted, vec![(0, 1), (2, 2), (5, 3)]);

        // The in-progress slice isn't shortened by the arrival.
        assert_eq!(completion(&outcome, 1), 5);
        assert_eq!(completion(&outcome, 2), 6);
        assert_eq!(completion(&outcome, 3), 7);
        assert_eq!(outcome.records[1].response(), 3);
    }

    #[test]
    fn test_empty_workload() {
        let outcome = run(&[1], &[1], 1, &[]);

        assert_eq!(outcome.end_time, 0);
        assert!(outcome.events.is_empty());
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_rejects_bad_workload() {
        let result = Simulation::new(
            SchedulerConfig::default(),
            &[JobSpec::new(4, 0, 0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_independent_runs() {
        let jobs = [JobSpec::new(1, 0, 7), JobSpec::new(2, 1, 3)];
        let first = Simulation::new(SchedulerConfig::default(), &jobs)
            .unwrap()
            .run();
        let second = Simulation::new(SchedulerConfig::default(), &jobs)
            .unwrap()
            .run();

        assert_eq!(first.events, second.events);
        assert_eq!(first.records, second.records);
    }
}
