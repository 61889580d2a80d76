use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::SchedulerError;
use crate::task::{TaskContext, TaskExecutor, TaskResult, TaskSpec, TaskStatus};

pub const DEFAULT_MAX_CONCURRENT: usize = 10;
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(300);

/// Dispatches waves of independent tasks concurrently under a shared
/// concurrency bound and per-task timeout.
///
/// The semaphore lives on the scheduler instance, so the bound holds across
/// concurrent `spawn_wave` calls, not per call. Failures are isolated per
/// task: a wave always resolves to one result per submitted task.
pub struct TaskScheduler<E> {
    executor: Arc<E>,
    max_concurrent: usize,
    task_timeout: Duration,
    permits: Arc<Semaphore>,
}

impl<E: TaskExecutor + 'static> TaskScheduler<E> {
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self::with_limits(executor, DEFAULT_MAX_CONCURRENT, DEFAULT_TASK_TIMEOUT)
    }

    #[must_use]
    pub fn with_limits(executor: E, max_concurrent: usize, task_timeout: Duration) -> Self {
        Self {
            executor: Arc::new(executor),
            max_concurrent,
            task_timeout,
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    #[must_use]
    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    /// Spawn a wave of tasks concurrently and collect one result per task,
    /// ordered by submission index.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::EmptyWave` or `SchedulerError::WaveTooLarge`
    /// before any task starts. Per-task failures and timeouts never surface
    /// here; they land in the corresponding `TaskResult`.
    pub async fn spawn_wave(&self, tasks: Vec<TaskSpec>) -> Result<Vec<TaskResult>, SchedulerError> {
        self.spawn_named_wave("wave", tasks).await
    }

    /// Like [`spawn_wave`](Self::spawn_wave), with a label used in logs.
    ///
    /// # Errors
    ///
    /// Same as [`spawn_wave`](Self::spawn_wave).
    pub async fn spawn_named_wave(
        &self,
        name: &str,
        tasks: Vec<TaskSpec>,
    ) -> Result<Vec<TaskResult>, SchedulerError> {
        if tasks.is_empty() {
            return Err(SchedulerError::EmptyWave);
        }
        if tasks.len() > self.max_concurrent {
            return Err(SchedulerError::WaveTooLarge {
                requested: tasks.len(),
                max: self.max_concurrent,
            });
        }

        tracing::info!(wave = name, tasks = tasks.len(), "spawning wave");
        let start = Instant::now();

        let contexts: Vec<TaskContext> = tasks.iter().map(TaskContext::from).collect();
        let handles: Vec<JoinHandle<TaskResult>> = tasks
            .into_iter()
            .enumerate()
            .map(|(task_id, spec)| {
                let executor = Arc::clone(&self.executor);
                let permits = Arc::clone(&self.permits);
                let budget = self.task_timeout;
                tokio::spawn(run_task(executor, permits, spec, task_id, budget))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (handle, context) in handles.into_iter().zip(contexts) {
            let task_id = results.len();
            // A panicking executor surfaces as a join error; capture it as a
            // failed result instead of aborting the wave.
            let result = handle.await.unwrap_or_else(|e| {
                tracing::warn!(task_id, "task aborted: {e}");
                TaskResult {
                    task_id,
                    status: TaskStatus::Failed,
                    result: None,
                    error: Some(e.to_string()),
                    duration_ms: 0,
                    context,
                }
            });
            results.push(result);
        }

        let successful = results.iter().filter(|r| r.is_completed()).count();
        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            wave = name,
            successful,
            total = results.len(),
            duration_ms,
            "wave completed"
        );

        Ok(results)
    }

    /// Execute waves strictly sequentially: wave *n+1* starts only after
    /// wave *n* has fully resolved. Failures inside a wave are logged and do
    /// not prevent subsequent waves.
    ///
    /// # Errors
    ///
    /// Propagates wave-level validation errors (`EmptyWave`, `WaveTooLarge`).
    pub async fn execute_wave_pattern(
        &self,
        waves: Vec<Vec<TaskSpec>>,
    ) -> Result<Vec<Vec<TaskResult>>, SchedulerError> {
        let total = waves.len();
        let mut all_results = Vec::with_capacity(total);

        for (idx, wave) in waves.into_iter().enumerate() {
            let name = format!("wave-{}", idx + 1);
            let results = self.spawn_named_wave(&name, wave).await?;

            let failures = results.iter().filter(|r| !r.is_completed()).count();
            if failures > 0 {
                tracing::warn!(wave = %name, failures, "wave had failures, continuing");
            }
            all_results.push(results);
        }

        tracing::info!(waves = total, "wave pattern complete");
        Ok(all_results)
    }
}

async fn run_task<E: TaskExecutor>(
    executor: Arc<E>,
    permits: Arc<Semaphore>,
    spec: TaskSpec,
    task_id: usize,
    budget: Duration,
) -> TaskResult {
    let context = TaskContext::from(&spec);

    let Ok(_permit) = permits.acquire_owned().await else {
        return TaskResult {
            task_id,
            status: TaskStatus::Failed,
            result: None,
            error: Some("scheduler shut down before task started".to_owned()),
            duration_ms: 0,
            context,
        };
    };

    tracing::debug!(task_id, "task started");
    // The timeout clock starts when the task starts, not when the wave does.
    let start = Instant::now();
    let outcome = tokio::time::timeout(budget, executor.execute(&spec.instruction, budget)).await;
    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(output)) => {
            tracing::debug!(task_id, duration_ms, "task completed");
            TaskResult {
                task_id,
                status: TaskStatus::Completed,
                result: Some(output),
                error: None,
                duration_ms,
                context,
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(task_id, duration_ms, "task failed: {e}");
            TaskResult {
                task_id,
                status: TaskStatus::Failed,
                result: None,
                error: Some(e.to_string()),
                duration_ms,
                context,
            }
        }
        Err(_) => {
            tracing::warn!(task_id, duration_ms, "task timed out");
            TaskResult {
                task_id,
                status: TaskStatus::TimedOut,
                result: None,
                error: Some(format!("task exceeded timeout of {}ms", budget.as_millis())),
                duration_ms,
                context,
            }
        }
    }
}
