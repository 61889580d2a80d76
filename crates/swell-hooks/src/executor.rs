use std::borrow::Cow;
use std::process::Stdio;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tokio::process::Command;

use crate::config::HookDefinition;
use crate::context::HookContext;

/// Verdict derived from a hook command's exit code. The mapping is fixed
/// policy: 0 allow, 2 block, anything else error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookAction {
    Allow,
    Block,
    Error,
}

/// Outcome of one hook command execution.
#[derive(Debug, Clone, Serialize)]
pub struct HookResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub action: HookAction,
    pub blocked: bool,
}

impl HookResult {
    /// Implicit allow, returned when no configured hook halts evaluation.
    #[must_use]
    pub fn allow() -> Self {
        Self::from_exit_code(0, String::new(), String::new())
    }

    #[must_use]
    pub fn from_exit_code(exit_code: i32, stdout: String, stderr: String) -> Self {
        let action = match exit_code {
            0 => HookAction::Allow,
            2 => HookAction::Block,
            _ => HookAction::Error,
        };
        Self {
            exit_code,
            stdout,
            stderr,
            action,
            blocked: action == HookAction::Block,
        }
    }

    fn error(message: String) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: message,
            action: HookAction::Error,
            blocked: false,
        }
    }
}

/// Runs one external validation command with timeout and environment
/// substitution, and interprets its exit code.
///
/// The command is spawned directly, never through a shell; substituted
/// context values are shell-quoted so a hook script that re-expands them
/// cannot be injected.
#[derive(Debug, Default)]
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook and interpret the exit code. Misbehavior (spawn
    /// failure, timeout, signal death) is captured as an error-action result,
    /// never returned as an `Err`.
    pub async fn run(&self, hook: &HookDefinition, context: &HookContext) -> HookResult {
        let mut command = Command::new(&hook.command);
        command
            .args(&hook.args)
            .envs(substitute_env(&hook.env, context))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(command = %hook.command, "failed to spawn hook: {e}");
                return HookResult::error(format!("failed to spawn hook `{}`: {e}", hook.command));
            }
        };

        let budget = Duration::from_millis(hook.timeout);
        match tokio::time::timeout(budget, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                // Signal death reports no code; treat it like any other error.
                let exit_code = output.status.code().unwrap_or(-1);
                HookResult::from_exit_code(
                    exit_code,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }
            Ok(Err(e)) => {
                tracing::warn!(command = %hook.command, "hook wait failed: {e}");
                HookResult::error(format!("hook `{}` failed: {e}", hook.command))
            }
            Err(_) => {
                // kill_on_drop reaps the child when the timed-out future drops.
                tracing::warn!(command = %hook.command, timeout_ms = hook.timeout, "hook timed out");
                HookResult::error(format!("hook timed out after {}ms", hook.timeout))
            }
        }
    }
}

/// Substitute `${VAR}` context placeholders in hook-declared env entries,
/// shell-quoting each value.
fn substitute_env(
    env: &IndexMap<String, String>,
    context: &HookContext,
) -> IndexMap<String, String> {
    let vars = context.substitutions();
    env.iter()
        .map(|(key, value)| {
            let mut substituted = value.clone();
            for (name, raw) in &vars {
                let placeholder = format!("${{{name}}}");
                if substituted.contains(&placeholder) {
                    let quoted = shlex::try_quote(raw)
                        .map_or_else(|_| String::new(), Cow::into_owned);
                    substituted = substituted.replace(&placeholder, &quoted);
                }
            }
            (key.clone(), substituted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::Value;
    use tokio::time::Instant;

    use super::*;

    fn sh(script: &str) -> HookDefinition {
        HookDefinition {
            kind: "command".to_owned(),
            command: "sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
            env: IndexMap::new(),
            timeout: 5_000,
            continue_on_error: false,
        }
    }

    fn bash_context(command: &str) -> HookContext {
        let mut args = HashMap::new();
        args.insert("command".to_owned(), Value::String(command.to_owned()));
        HookContext::tool_use("Bash", args)
    }

    #[tokio::test]
    async fn exit_zero_allows() {
        let result = HookExecutor.run(&sh("exit 0"), &HookContext::bare()).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.action, HookAction::Allow);
        assert!(!result.blocked);
    }

    #[tokio::test]
    async fn exit_two_blocks() {
        let result = HookExecutor
            .run(&sh("echo nope >&2; exit 2"), &HookContext::bare())
            .await;
        assert_eq!(result.exit_code, 2);
        assert_eq!(result.action, HookAction::Block);
        assert!(result.blocked);
        assert!(result.stderr.contains("nope"));
    }

    #[tokio::test]
    async fn other_exit_codes_are_errors() {
        let result = HookExecutor.run(&sh("exit 1"), &HookContext::bare()).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.action, HookAction::Error);
        assert!(!result.blocked);
    }

    #[tokio::test]
    async fn captures_stdout() {
        let result = HookExecutor.run(&sh("echo checked"), &HookContext::bare()).await;
        assert_eq!(result.stdout.trim(), "checked");
    }

    #[tokio::test]
    async fn timeout_terminates_and_reports_error() {
        let mut hook = sh("sleep 30");
        hook.timeout = 100;
        let start = Instant::now();
        let result = HookExecutor.run(&hook, &HookContext::bare()).await;
        let elapsed = start.elapsed();

        assert_eq!(result.exit_code, -1);
        assert_eq!(result.action, HookAction::Error);
        assert!(!result.blocked);
        assert!(result.stderr.contains("timed out"));
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn spawn_failure_is_error_result() {
        let mut hook = sh("true");
        hook.command = "/nonexistent/hook-binary".to_owned();
        let result = HookExecutor.run(&hook, &HookContext::bare()).await;
        assert_eq!(result.exit_code, -1);
        assert_eq!(result.action, HookAction::Error);
        assert!(result.stderr.contains("failed to spawn"));
    }

    #[tokio::test]
    async fn env_substitution_exposes_context() {
        let mut hook = sh("printf %s \"$CHECK_TOOL\"");
        hook.env.insert("CHECK_TOOL".to_owned(), "${TOOL_NAME}".to_owned());
        let result = HookExecutor.run(&hook, &bash_context("git status")).await;
        assert_eq!(result.stdout, "Bash");
    }

    #[tokio::test]
    async fn substituted_values_are_shell_quoted() {
        let mut hook = sh("printf %s \"$CHECK_CMD\"");
        hook.env.insert("CHECK_CMD".to_owned(), "${COMMAND}".to_owned());
        let result = HookExecutor
            .run(&hook, &bash_context("echo hi; rm -rf /"))
            .await;
        // The whole command arrives as one quoted token, metacharacters inert.
        assert_eq!(result.stdout, "\"echo hi; rm -rf /\"");
    }

    #[test]
    fn substitution_leaves_unknown_placeholders() {
        let mut env = IndexMap::new();
        env.insert("A".to_owned(), "${NOT_A_VAR}".to_owned());
        env.insert("B".to_owned(), "plain".to_owned());
        let out = substitute_env(&env, &HookContext::bare());
        assert_eq!(out["A"], "${NOT_A_VAR}");
        assert_eq!(out["B"], "plain");
    }

    #[test]
    fn from_exit_code_mapping() {
        assert_eq!(HookResult::from_exit_code(0, String::new(), String::new()).action, HookAction::Allow);
        assert_eq!(HookResult::from_exit_code(2, String::new(), String::new()).action, HookAction::Block);
        assert_eq!(HookResult::from_exit_code(1, String::new(), String::new()).action, HookAction::Error);
        assert_eq!(HookResult::from_exit_code(-1, String::new(), String::new()).action, HookAction::Error);
        assert!(HookResult::from_exit_code(2, String::new(), String::new()).blocked);
    }
}
