use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use swell_hooks::{HookAction, HookEngine, HookResult, events};
use swell_scheduler::{SchedulerError, TaskExecutor};

/// Tool name under which gated task dispatches are presented to matchers.
pub const TASK_TOOL: &str = "Task";

/// Wraps an inner [`TaskExecutor`] and consults the hook engine around each
/// dispatch.
///
/// Dispatches appear to `PreToolUse` matchers as the `Task` tool with the
/// instruction in the `command` argument, so patterns like `Task(deploy:*)`
/// govern sub-agent instructions the same way `Bash(...)` patterns govern
/// shell commands. A block or unrecovered error verdict fails the task before
/// the inner executor runs; `PostToolUse` fires after a successful run and
/// its verdict is logged, not enforced.
pub struct GatedExecutor<E> {
    inner: E,
    engine: Arc<HookEngine>,
}

impl<E: TaskExecutor> GatedExecutor<E> {
    #[must_use]
    pub fn new(inner: E, engine: Arc<HookEngine>) -> Self {
        Self { inner, engine }
    }
}

impl<E: TaskExecutor> TaskExecutor for GatedExecutor<E> {
    fn execute(
        &self,
        instruction: &str,
        deadline: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, SchedulerError>> + Send + '_>> {
        let instruction = instruction.to_owned();
        Box::pin(async move {
            let mut args = HashMap::new();
            args.insert("command".to_owned(), Value::String(instruction.clone()));

            let verdict = self.engine.pre_tool_use(TASK_TOOL, &args).await;
            if verdict.blocked {
                return Err(SchedulerError::TaskFailed(format!(
                    "blocked by {} hook: {}",
                    events::PRE_TOOL_USE,
                    verdict_detail(&verdict)
                )));
            }
            if verdict.action == HookAction::Error {
                return Err(SchedulerError::TaskFailed(format!(
                    "{} hook error (exit {}): {}",
                    events::PRE_TOOL_USE,
                    verdict.exit_code,
                    verdict_detail(&verdict)
                )));
            }

            let output = self.inner.execute(&instruction, deadline).await?;

            let post = self.engine.post_tool_use(TASK_TOOL, &args).await;
            if post.blocked || post.action == HookAction::Error {
                tracing::warn!(
                    exit_code = post.exit_code,
                    "{} hook flagged completed task: {}",
                    events::POST_TOOL_USE,
                    verdict_detail(&post)
                );
            }

            Ok(output)
        })
    }
}

fn verdict_detail(result: &HookResult) -> &str {
    let stderr = result.stderr.trim();
    if stderr.is_empty() {
        let stdout = result.stdout.trim();
        if stdout.is_empty() { "(no output)" } else { stdout }
    } else {
        stderr
    }
}
