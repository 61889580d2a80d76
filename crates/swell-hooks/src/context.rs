use std::collections::HashMap;

use serde_json::Value;

/// Invocation context exposed to hook commands through `${VAR}` placeholders
/// in their declared environment entries.
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    pub tool: String,
    pub args: HashMap<String, Value>,
    extra: Vec<(String, String)>,
}

impl HookContext {
    /// Context for a governed tool invocation.
    #[must_use]
    pub fn tool_use(tool: impl Into<String>, args: HashMap<String, Value>) -> Self {
        Self {
            tool: tool.into(),
            args,
            extra: Vec::new(),
        }
    }

    /// Context for lifecycle events without a tool invocation.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// Add an event-specific variable (e.g. `PROMPT`, `MESSAGE`, `AGENT_ID`).
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// The substitutable variables for this context, in substitution order.
    pub(crate) fn substitutions(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            ("TOOL_NAME".to_owned(), self.tool.clone()),
            ("FILE_PATH".to_owned(), self.string_arg("file_path")),
            ("COMMAND".to_owned(), self.string_arg("command")),
            (
                "ARGS".to_owned(),
                serde_json::to_string(&self.args).unwrap_or_else(|_| "{}".to_owned()),
            ),
        ];
        vars.extend(self.extra.iter().cloned());
        vars
    }

    fn string_arg(&self, key: &str) -> String {
        self.args
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    }
}
