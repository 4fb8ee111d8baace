//! Tool surface: the [`Tool`] trait, [`ToolSet`] dispatch, structured
//! [`ToolSpec`] descriptions, and the compact tools registered through
//! [`CompactToolsExt`].

pub mod compact;
pub mod core;
pub mod spec;

pub use self::compact::{
    CacheStatsTool, ConsoleLogsCompact, GameObjectCompact, ReadCached, ReadCachedArgs,
    ScenesHierarchyCompact,
};
pub use self::core::{Tool, ToolFuture, ToolSet};
pub use self::spec::ToolSpec;

use crate::bridge::HostBridge;
use crate::compact::Compactor;
use crate::store::CacheRegistry;
use std::sync::Arc;

// ── Tool name constants ─────────────────────────────────────────────

pub const GET_CONSOLE_LOGS_COMPACT: &str = "get_console_logs_compact";
pub const GET_SCENES_HIERARCHY_COMPACT: &str = "get_scenes_hierarchy_compact";
pub const GET_GAMEOBJECT_COMPACT: &str = "get_gameobject_compact";
pub const READ_CACHED: &str = "read_cached";
pub const CACHE_STATS: &str = "cache_stats";

// ── Extension trait ─────────────────────────────────────────────────

/// Registers the compact tools on a [`ToolSet`].
///
/// ```ignore
/// let registry = Arc::new(CacheRegistry::default());
/// let tools = ToolSet::new().with_compact_tools(bridge, registry);
/// assert_eq!(tools.len(), 5);
/// ```
pub trait CompactToolsExt {
    /// Register with the default policy and summarizer limits.
    fn with_compact_tools(self, bridge: Arc<dyn HostBridge>, registry: Arc<CacheRegistry>) -> Self;

    /// Register tools driven by an already configured [`Compactor`].
    fn with_compactor(self, compactor: Compactor) -> Self;
}

impl CompactToolsExt for ToolSet {
    fn with_compact_tools(self, bridge: Arc<dyn HostBridge>, registry: Arc<CacheRegistry>) -> Self {
        self.with_compactor(Compactor::new(bridge, registry))
    }

    fn with_compactor(self, compactor: Compactor) -> Self {
        let registry = compactor.registry().clone();
        self.with(ConsoleLogsCompact::new(compactor.clone()))
            .with(ScenesHierarchyCompact::new(compactor.clone()))
            .with(GameObjectCompact::new(compactor))
            .with(ReadCached::new(registry.clone()))
            .with(CacheStatsTool::new(registry))
    }
}
