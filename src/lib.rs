//! Wave-based sub-agent task orchestration with hook-gated tool execution.
//!
//! `swell-scheduler` dispatches waves of independent tasks concurrently under
//! a shared concurrency bound; `swell-hooks` gates governed actions through
//! external validation commands. This crate re-exports both and adds
//! [`GatedExecutor`], the wrapper that consults the hook engine around each
//! dispatched task.

mod gated;

pub use gated::{GatedExecutor, TASK_TOOL};
pub use swell_hooks::{
    HookAction, HookConfig, HookContext, HookDefinition, HookEngine, HookError, HookExecutor,
    HookGroup, HookResult, events, matches_pattern,
};
pub use swell_scheduler::{
    DEFAULT_MAX_CONCURRENT, DEFAULT_TASK_TIMEOUT, SchedulerError, TaskContext, TaskExecutor,
    TaskResult, TaskScheduler, TaskSpec, TaskStatus,
};
