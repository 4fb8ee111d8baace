//! Convenience re-exports for embedding the compactor.
//!
//! ```ignore
//! use unity_compact::prelude::*;
//! ```

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{CompactConfig, CompactError, ToolDef, compact_tools_guidance, json_schema_for};

// ── Editor bridge ───────────────────────────────────────────────────
pub use crate::bridge::{BridgeRequest, BridgeResponse, HostBridge, HttpBridge, StaticBridge};

// ── Compaction ──────────────────────────────────────────────────────
pub use crate::compact::{
    CompactGameObject, CompactMode, CompactOutcome, CompactedHierarchy, CompactedLogs,
    CompactionPolicy, Compactor, ConsoleLogsArgs, GameObjectArgs,
};
pub use crate::summarize::{HierarchySummary, LogSummary, SummarizerConfig};

// ── Cache ───────────────────────────────────────────────────────────
pub use crate::locator::{CacheUri, Domain};
pub use crate::retrieval::Lookup;
pub use crate::store::{CacheRegistry, Clock, EphemeralStore, SystemClock};

// ── Tools ───────────────────────────────────────────────────────────
pub use crate::tools::{CompactToolsExt, Tool, ToolFuture, ToolSet, ToolSpec};
