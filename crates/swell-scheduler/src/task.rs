use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;

use crate::error::SchedulerError;

/// One unit of work dispatched to the injected executor.
///
/// The instruction is opaque to the scheduler; `tools` and `model` are hints
/// passed through to the executor untouched.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSpec {
    pub instruction: String,
    pub tools: Option<Vec<String>>,
    pub model: Option<String>,
}

impl TaskSpec {
    #[must_use]
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            tools: None,
            model: None,
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = Some(tools);
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Failed,
    #[serde(rename = "timeout")]
    TimedOut,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TimedOut => "timeout",
        }
    }
}

/// Echo of the submitted spec, kept on the result for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct TaskContext {
    pub instruction: String,
    pub tools: Option<Vec<String>>,
    pub model: Option<String>,
}

impl From<&TaskSpec> for TaskContext {
    fn from(spec: &TaskSpec) -> Self {
        Self {
            instruction: spec.instruction.clone(),
            tools: spec.tools.clone(),
            model: spec.model.clone(),
        }
    }
}

/// Outcome of one task within a wave.
///
/// `task_id` is the task's position in the submitted wave, so callers can
/// correlate `tasks[i]` with `results[i]` regardless of completion order.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub task_id: usize,
    pub status: TaskStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub context: TaskContext,
}

impl TaskResult {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Executor contract injected into the scheduler.
///
/// `deadline` is the wall-clock budget the scheduler enforces around the
/// returned future; executors may use it to bound work they delegate.
pub trait TaskExecutor: Send + Sync {
    fn execute(
        &self,
        instruction: &str,
        deadline: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, SchedulerError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder() {
        let spec = TaskSpec::new("analyze module A")
            .with_tools(vec!["Read".into(), "Grep".into()])
            .with_model("small");
        assert_eq!(spec.instruction, "analyze module A");
        assert_eq!(spec.tools.as_deref(), Some(&["Read".to_owned(), "Grep".to_owned()][..]));
        assert_eq!(spec.model.as_deref(), Some("small"));
    }

    #[test]
    fn status_as_str() {
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
        assert_eq!(TaskStatus::Failed.as_str(), "failed");
        assert_eq!(TaskStatus::TimedOut.as_str(), "timeout");
    }

    #[test]
    fn result_serialization() {
        let spec = TaskSpec::new("do the thing");
        let result = TaskResult {
            task_id: 3,
            status: TaskStatus::TimedOut,
            result: None,
            error: Some("task exceeded timeout of 1s".into()),
            duration_ms: 1002,
            context: TaskContext::from(&spec),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"task_id\":3"));
        assert!(json.contains("\"status\":\"timeout\""));
        assert!(json.contains("\"duration_ms\":1002"));
        assert!(json.contains("\"instruction\":\"do the thing\""));
    }
}
