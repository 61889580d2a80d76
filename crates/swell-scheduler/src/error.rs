use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("wave must contain at least one task")]
    EmptyWave,
    #[error("cannot spawn {requested} tasks: concurrency limit is {max}")]
    WaveTooLarge { requested: usize, max: usize },
    #[error("task execution failed: {0}")]
    TaskFailed(String),
}
