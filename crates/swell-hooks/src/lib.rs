//! Hook-based policy gate: external validation commands gate governed
//! actions by exit code (0 allow, 2 block, anything else error).

mod config;
mod context;
mod engine;
mod error;
pub mod events;
mod executor;
mod matcher;

pub use config::{HookConfig, HookDefinition, HookGroup};
pub use context::HookContext;
pub use engine::HookEngine;
pub use error::HookError;
pub use executor::{HookAction, HookExecutor, HookResult};
pub use matcher::matches_pattern;
