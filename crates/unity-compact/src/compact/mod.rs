//! Per-domain compaction policy and the compact operations.
//!
//! Each operation fetches one payload from the editor and asks the
//! [`CompactionPolicy`] whether it is too large to hand back verbatim. If
//! so, the raw payload is parked in the domain's store under a fresh handle
//! and the caller gets a bounded summary plus a `detailsUri`; otherwise the
//! raw payload is returned untouched and the store is not touched.
//!
//! | Domain | Compacts when | Returns |
//! |--------|---------------|---------|
//! | logs | more than 20 records, or stack traces requested | [`CompactedLogs`] |
//! | hierarchy | more than 100 nodes in total | [`CompactedHierarchy`] |
//! | gameobject | forced, or `auto` with more than 5 components or 50 children | [`CompactGameObject`] |

pub mod gameobject;
pub mod hierarchy;
pub mod logs;

pub use gameobject::{CompactGameObject, CompactMode, CompactModeArg, GameObjectArgs};
pub use hierarchy::CompactedHierarchy;
pub use logs::{CompactedLogs, ConsoleLogsArgs, LogType};

use crate::bridge::HostBridge;
use crate::error::CompactError;
use crate::records::GameObjectRecord;
use crate::store::CacheRegistry;
use crate::summarize::SummarizerConfig;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Editor method names used by the compact operations.
pub const GET_CONSOLE_LOGS: &str = "get_console_logs";
pub const GET_SCENES_HIERARCHY: &str = "get_scenes_hierarchy";
pub const GET_GAMEOBJECT: &str = "get_gameobject";

// ── Policy ─────────────────────────────────────────────────────────

/// Size thresholds above which a payload is compacted. All comparisons are
/// strict: a log list of exactly `log_threshold` entries is returned as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionPolicy {
    pub log_threshold: usize,
    pub hierarchy_threshold: usize,
    pub component_threshold: usize,
    pub child_threshold: usize,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            log_threshold: 20,
            hierarchy_threshold: 100,
            component_threshold: 5,
            child_threshold: 50,
        }
    }
}

impl CompactionPolicy {
    /// Stack traces are bulky, so asking for them always compacts.
    pub fn should_compact_logs(&self, count: usize, include_stack_trace: bool) -> bool {
        count > self.log_threshold || include_stack_trace
    }

    pub fn should_compact_hierarchy(&self, total_objects: usize) -> bool {
        total_objects > self.hierarchy_threshold
    }

    /// `Compact` and `Full` are honored as-is; `Auto` falls back to size.
    pub fn should_compact_gameobject(&self, mode: CompactMode, record: GameObjectRecord<'_>) -> bool {
        match mode {
            CompactMode::Compact => true,
            CompactMode::Full => false,
            CompactMode::Auto => {
                record.component_count() > self.component_threshold
                    || record.child_count() > self.child_threshold
            }
        }
    }
}

// ── Outcome ────────────────────────────────────────────────────────

/// Result of a compact operation: either the domain's bounded view or the
/// raw payload exactly as the editor sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompactOutcome<C> {
    Compacted(C),
    Full(Value),
}

impl<C: Serialize> CompactOutcome<C> {
    pub fn is_compacted(&self) -> bool {
        matches!(self, CompactOutcome::Compacted(_))
    }

    pub fn compacted(&self) -> Option<&C> {
        match self {
            CompactOutcome::Compacted(c) => Some(c),
            CompactOutcome::Full(_) => None,
        }
    }

    pub fn full(&self) -> Option<&Value> {
        match self {
            CompactOutcome::Full(v) => Some(v),
            CompactOutcome::Compacted(_) => None,
        }
    }

    /// Pretty-printed JSON, as handed back to the client.
    pub fn render(&self) -> Result<String, CompactError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CompactError::ToolExecution(format!("failed to render result: {e}")))
    }
}

// ── Compactor ──────────────────────────────────────────────────────

/// Runs the compact operations against one editor and one cache registry.
///
/// Cheap to clone; clones share the bridge and the stores.
#[derive(Clone)]
pub struct Compactor {
    bridge: Arc<dyn HostBridge>,
    registry: Arc<CacheRegistry>,
    policy: CompactionPolicy,
    summarizer: SummarizerConfig,
}

impl fmt::Debug for Compactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compactor")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("summarizer", &self.summarizer)
            .finish()
    }
}

impl Compactor {
    pub fn new(bridge: Arc<dyn HostBridge>, registry: Arc<CacheRegistry>) -> Self {
        Self {
            bridge,
            registry,
            policy: CompactionPolicy::default(),
            summarizer: SummarizerConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: CompactionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_summarizer_config(mut self, config: SummarizerConfig) -> Self {
        self.summarizer = config;
        self
    }

    pub fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    fn bridge(&self) -> &dyn HostBridge {
        self.bridge.as_ref()
    }
}
