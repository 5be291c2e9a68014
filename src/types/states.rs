/// Where a job is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobState {
    /// Not yet arrived.
    Pending,
    /// Waiting in one of the level queues.
    Ready,
    /// Being executed by the engine; never present in a queue.
    Running,
    Completed,
}
