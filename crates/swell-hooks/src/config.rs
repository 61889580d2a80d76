use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::HookError;

fn default_hook_type() -> String {
    "command".to_owned()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn is_default_hook_type(kind: &str) -> bool {
    kind == "command"
}

fn is_default_timeout(timeout: &u64) -> bool {
    *timeout == default_timeout_ms()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One configured policy action: an external command run at a lifecycle
/// event, with a wall-clock budget and exit-code interpretation.
///
/// Defaulted fields are skipped on serialization, so a document that omits
/// them round-trips without gaining entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDefinition {
    /// Only `"command"` hooks are supported; validated at load time.
    #[serde(
        rename = "type",
        default = "default_hook_type",
        skip_serializing_if = "is_default_hook_type"
    )]
    pub kind: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Extra environment entries; values may reference `${TOOL_NAME}`,
    /// `${FILE_PATH}`, `${COMMAND}`, `${ARGS}` and event-specific variables.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    /// Budget in milliseconds.
    #[serde(
        default = "default_timeout_ms",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,
    /// On an error verdict, proceed to the next hook instead of halting.
    #[serde(rename = "continueOnError", default, skip_serializing_if = "is_false")]
    pub continue_on_error: bool,
}

/// A matcher pattern plus the hooks to run when it selects the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookGroup {
    /// Absent matcher means the group applies unconditionally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub hooks: Vec<HookDefinition>,
}

/// Lifecycle-event name to ordered hook groups, as loaded from JSON.
///
/// Read-only for the engine's lifetime; reload semantics belong to the
/// caller. The event map keeps insertion order so a loaded document
/// round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub hooks: IndexMap<String, Vec<HookGroup>>,
}

impl HookConfig {
    /// Load and validate a hook config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Io` if the file cannot be read, `HookError::Parse`
    /// on malformed JSON, or `HookError::Invalid` on a well-formed document
    /// that fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HookError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| HookError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a hook config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Parse` or `HookError::Invalid` as in
    /// [`load`](Self::load).
    pub fn from_json(raw: &str) -> Result<Self, HookError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Ordered hook groups for an event; empty for unknown events.
    #[must_use]
    pub fn groups(&self, event: &str) -> &[HookGroup] {
        self.hooks.get(event).map_or(&[], Vec::as_slice)
    }

    fn validate(&self) -> Result<(), HookError> {
        for (event, groups) in &self.hooks {
            for group in groups {
                for hook in &group.hooks {
                    if hook.kind != "command" {
                        return Err(HookError::Invalid(format!(
                            "event {event}: unsupported hook type `{}`",
                            hook.kind
                        )));
                    }
                    if hook.command.is_empty() {
                        return Err(HookError::Invalid(format!(
                            "event {event}: hook with empty command"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
