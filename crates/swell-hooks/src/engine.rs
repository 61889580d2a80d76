use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::config::{HookConfig, HookGroup};
use crate::context::HookContext;
use crate::error::HookError;
use crate::events;
use crate::executor::{HookAction, HookExecutor, HookResult};
use crate::matcher::matches_pattern;

/// Evaluates configured hooks for lifecycle events, halting on the first
/// block or unrecovered error.
///
/// The config is loaded once at construction and read-only afterwards;
/// reload semantics belong to the caller.
#[derive(Debug)]
pub struct HookEngine {
    config: HookConfig,
    executor: HookExecutor,
}

impl HookEngine {
    #[must_use]
    pub fn new(config: HookConfig) -> Self {
        Self {
            config,
            executor: HookExecutor,
        }
    }

    /// Load the config from a JSON file and build the engine.
    ///
    /// # Errors
    ///
    /// Returns `HookError` if the file cannot be read or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HookError> {
        Ok(Self::new(HookConfig::load(path)?))
    }

    #[must_use]
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Evaluate the hooks registered under `event` for a tool invocation.
    ///
    /// Groups run in declaration order; only groups whose matcher selects
    /// `(tool, args)` fire. Returns the first blocking or unrecovered-error
    /// result, or an implicit allow.
    pub async fn evaluate(
        &self,
        event: &str,
        tool: &str,
        args: &HashMap<String, Value>,
    ) -> HookResult {
        let context = HookContext::tool_use(tool, args.clone());
        for group in self.config.groups(event) {
            let selected = group
                .matcher
                .as_deref()
                .is_none_or(|pattern| matches_pattern(pattern, tool, Some(args)));
            if !selected {
                continue;
            }
            if let Some(halt) = self.run_group(event, group, &context).await {
                return halt;
            }
        }
        HookResult::allow()
    }

    /// Evaluate an event without tool context: matchers are skipped and every
    /// configured hook for the event runs, under the same halt rule.
    pub async fn evaluate_simple(&self, event: &str, context: &HookContext) -> HookResult {
        for group in self.config.groups(event) {
            if let Some(halt) = self.run_group(event, group, context).await {
                return halt;
            }
        }
        HookResult::allow()
    }

    async fn run_group(
        &self,
        event: &str,
        group: &HookGroup,
        context: &HookContext,
    ) -> Option<HookResult> {
        for hook in &group.hooks {
            let result = self.executor.run(hook, context).await;
            if result.blocked {
                tracing::info!(event, command = %hook.command, "hook blocked");
                return Some(result);
            }
            if result.action == HookAction::Error {
                if hook.continue_on_error {
                    tracing::warn!(
                        event,
                        command = %hook.command,
                        exit_code = result.exit_code,
                        "hook errored, continuing"
                    );
                } else {
                    tracing::warn!(
                        event,
                        command = %hook.command,
                        exit_code = result.exit_code,
                        "hook errored, halting"
                    );
                    return Some(result);
                }
            }
        }
        None
    }

    pub async fn pre_tool_use(&self, tool: &str, args: &HashMap<String, Value>) -> HookResult {
        self.evaluate(events::PRE_TOOL_USE, tool, args).await
    }

    pub async fn post_tool_use(&self, tool: &str, args: &HashMap<String, Value>) -> HookResult {
        self.evaluate(events::POST_TOOL_USE, tool, args).await
    }

    pub async fn user_prompt_submit(&self, prompt: &str) -> HookResult {
        let context = HookContext::bare().with_var("PROMPT", prompt);
        self.evaluate_simple(events::USER_PROMPT_SUBMIT, &context).await
    }

    pub async fn notification(&self, message: &str) -> HookResult {
        let context = HookContext::bare().with_var("MESSAGE", message);
        self.evaluate_simple(events::NOTIFICATION, &context).await
    }

    pub async fn subagent_stop(&self, agent_id: &str) -> HookResult {
        let context = HookContext::bare().with_var("AGENT_ID", agent_id);
        self.evaluate_simple(events::SUBAGENT_STOP, &context).await
    }

    pub async fn stop(&self) -> HookResult {
        self.evaluate_simple(events::STOP, &HookContext::bare()).await
    }

    pub async fn pre_compact(&self) -> HookResult {
        self.evaluate_simple(events::PRE_COMPACT, &HookContext::bare()).await
    }

    pub async fn session_start(&self) -> HookResult {
        self.evaluate_simple(events::SESSION_START, &HookContext::bare()).await
    }

    pub async fn session_end(&self) -> HookResult {
        self.evaluate_simple(events::SESSION_END, &HookContext::bare()).await
    }
}
