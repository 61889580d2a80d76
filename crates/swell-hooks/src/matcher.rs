use std::collections::HashMap;

use serde_json::Value;

/// Decide whether a matcher pattern applies to a tool invocation.
///
/// Pattern grammar:
/// - `*` matches any tool.
/// - `Edit|Write` matches a tool name equal to one alternative.
/// - `Bash(P)` matches the tool-name portion first (pipe-separable), then
///   matches `P` against the `command` argument: `*` matches any command,
///   `prefix:*` matches by prefix, anything else must match exactly. With no
///   `command` argument the tool-name match alone suffices.
///
/// Matching is case-sensitive; there is no regex support.
#[must_use]
pub fn matches_pattern(pattern: &str, tool: &str, args: Option<&HashMap<String, Value>>) -> bool {
    if pattern == "*" {
        return true;
    }

    if let Some((tool_pattern, rest)) = pattern.split_once('(') {
        let command_pattern = rest.strip_suffix(')').unwrap_or(rest);
        if !matches_tool_name(tool_pattern, tool) {
            return false;
        }
        match args.and_then(|a| a.get("command")).and_then(Value::as_str) {
            Some(command) => matches_command(command_pattern, command),
            None => true,
        }
    } else {
        matches_tool_name(pattern, tool)
    }
}

fn matches_tool_name(pattern: &str, tool: &str) -> bool {
    pattern.split('|').any(|alternative| alternative == tool)
}

fn matches_command(pattern: &str, command: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix(":*") {
        return command.starts_with(prefix);
    }
    pattern == command
}
