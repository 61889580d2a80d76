//! Lifecycle event names recognized in hook configuration files.
//!
//! Configs may also register hooks under arbitrary event names; the engine
//! looks events up by string and treats unknown names as having no hooks.

/// Before a tool invocation; the only event whose verdict can block it.
pub const PRE_TOOL_USE: &str = "PreToolUse";
/// After a tool invocation completed.
pub const POST_TOOL_USE: &str = "PostToolUse";
/// A user prompt was submitted; `${PROMPT}` is substitutable.
pub const USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";
/// An out-of-band notification; `${MESSAGE}` is substitutable.
pub const NOTIFICATION: &str = "Notification";
/// The agent finished a response.
pub const STOP: &str = "Stop";
/// A sub-agent finished; `${AGENT_ID}` is substitutable.
pub const SUBAGENT_STOP: &str = "SubagentStop";
/// Before context compaction.
pub const PRE_COMPACT: &str = "PreCompact";
pub const SESSION_START: &str = "SessionStart";
pub const SESSION_END: &str = "SessionEnd";
