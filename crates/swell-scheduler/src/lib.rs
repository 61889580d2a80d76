//! Concurrency-bounded wave scheduler for sub-agent tasks.

mod error;
mod scheduler;
mod task;

pub use error::SchedulerError;
pub use scheduler::{DEFAULT_MAX_CONCURRENT, DEFAULT_TASK_TIMEOUT, TaskScheduler};
pub use task::{TaskContext, TaskExecutor, TaskResult, TaskSpec, TaskStatus};
