//! Client-facing compact tools.
//!
//! | Tool | Name | Purpose |
//! |------|------|---------|
//! | [`ConsoleLogsCompact`] | `get_console_logs_compact` | Console logs, summarized when large |
//! | [`ScenesHierarchyCompact`] | `get_scenes_hierarchy_compact` | Scene hierarchy, summarized when large |
//! | [`GameObjectCompact`] | `get_gameobject_compact` | One GameObject, projected when large |
//! | [`ReadCached`] | `read_cached` | Full payload behind a `detailsUri` |
//! | [`CacheStatsTool`] | `cache_stats` | Entry counts per cache domain |

use super::core::{Tool, ToolFuture, error_result, parse_tool_args};
use super::spec::ToolSpec;
use crate::ToolDef;
use crate::compact::{CompactOutcome, Compactor, ConsoleLogsArgs, GameObjectArgs};
use crate::error::CompactError;
use crate::retrieval::Lookup;
use crate::store::CacheRegistry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const NOT_FOUND: &str = "Cached data not found or expired.";

fn render_outcome<C: Serialize>(result: Result<CompactOutcome<C>, CompactError>) -> String {
    match result.and_then(|outcome| outcome.render()) {
        Ok(text) => text,
        Err(e) => error_result(&e),
    }
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        error_result(&CompactError::ToolExecution(format!(
            "failed to render result: {e}"
        )))
    })
}

// ── ConsoleLogsCompact ──────────────────────────────────────────────

/// `get_console_logs_compact`.
pub struct ConsoleLogsCompact {
    compactor: Compactor,
}

impl ConsoleLogsCompact {
    pub fn new(compactor: Compactor) -> Self {
        Self { compactor }
    }
}

impl Tool for ConsoleLogsCompact {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GET_CONSOLE_LOGS_COMPACT)
            .purpose("Retrieve Unity console logs, auto-summarized when large")
            .when_to_use(
                "By default when inspecting console output; more than 20 logs, or any \
                 request for stack traces, returns a summary plus a detailsUri",
            )
            .when_not_to_use(
                "When the user explicitly asks for every log line with full stack traces; \
                 follow the detailsUri with read_cached instead of re-fetching",
            )
            .parameters_for::<ConsoleLogsArgs>()
            .example(
                r#"get_console_logs_compact({"logType": "error", "limit": 50})"#,
                "summary of error logs plus unity://logs/cached/<id>",
            )
            .output_format(
                "Either the raw log array, or {summary, count, includeStackTrace, detailsUri, message}",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let args: Result<ConsoleLogsArgs, String> = parse_tool_args(arguments);
        Box::pin(async move {
            match args {
                Ok(args) => render_outcome(self.compactor.compact_console_logs(&args).await),
                Err(e) => e,
            }
        })
    }
}

// ── ScenesHierarchyCompact ──────────────────────────────────────────

/// `get_scenes_hierarchy_compact`. Takes no arguments.
pub struct ScenesHierarchyCompact {
    compactor: Compactor,
}

impl ScenesHierarchyCompact {
    pub fn new(compactor: Compactor) -> Self {
        Self { compactor }
    }
}

impl Tool for ScenesHierarchyCompact {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GET_SCENES_HIERARCHY_COMPACT)
            .purpose("Retrieve the hierarchy of all loaded scenes, auto-summarized when large")
            .when_to_use(
                "When exploring scene structure; more than 100 GameObjects returns counts, \
                 depth and sample paths plus a detailsUri",
            )
            .when_not_to_use("When you need one specific object; use get_gameobject_compact")
            .example(
                "get_scenes_hierarchy_compact()",
                "summary with rootObjects, totalObjects, maxDepth, samplePaths",
            )
            .output_format(
                "Either the raw hierarchy, or {summary, totalObjects, detailsUri, message}",
            )
            .to_tool_def()
    }

    fn execute(&self, _arguments: &str) -> ToolFuture<'_> {
        Box::pin(async move { render_outcome(self.compactor.compact_scenes_hierarchy().await) })
    }
}

// ── GameObjectCompact ───────────────────────────────────────────────

/// `get_gameobject_compact`.
pub struct GameObjectCompact {
    compactor: Compactor,
}

impl GameObjectCompact {
    pub fn new(compactor: Compactor) -> Self {
        Self { compactor }
    }
}

impl Tool for GameObjectCompact {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GET_GAMEOBJECT_COMPACT)
            .purpose("Get GameObject details, compacted when the object is large")
            .when_to_use(
                "When inspecting a GameObject; with compactMode \"auto\" (default) objects \
                 with more than 5 components or 50 children are reduced to name, id, \
                 component types and child count",
            )
            .when_not_to_use(
                "When you need serialized component fields; pass compactMode: false",
            )
            .parameters_for::<GameObjectArgs>()
            .example(r#"get_gameobject_compact({"idOrName": "Player"})"#, "auto mode")
            .example(
                r#"get_gameobject_compact({"idOrName": "Canvas/Panel/Button", "compactMode": false})"#,
                "the full object",
            )
            .output_format(
                "Either the raw object, or {name, instanceId, activeSelf, components, childCount, detailsUri}",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let args: Result<GameObjectArgs, String> = parse_tool_args(arguments);
        Box::pin(async move {
            match args {
                Ok(args) => render_outcome(self.compactor.compact_gameobject(&args).await),
                Err(e) => e,
            }
        })
    }
}

// ── ReadCached ──────────────────────────────────────────────────────

/// Arguments for `read_cached`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadCachedArgs {
    /// A detailsUri returned by a compact tool, e.g. unity://logs/cached/<id>.
    pub uri: String,
}

/// `read_cached`: resolve a `detailsUri` to the payload it stands for.
pub struct ReadCached {
    registry: Arc<CacheRegistry>,
}

impl ReadCached {
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }
}

impl Tool for ReadCached {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::READ_CACHED)
            .purpose("Read the full payload behind a detailsUri returned by a compact tool")
            .when_to_use(
                "When a compact summary is not enough and the full logs, hierarchy or \
                 GameObject are needed",
            )
            .when_not_to_use(format!(
                "When the summary answers the question; cached entries expire after {}, \
                 so re-run the compact tool for fresh data",
                describe_ttl(self.registry.default_ttl())
            ))
            .parameters_for::<ReadCachedArgs>()
            .example(
                r#"read_cached({"uri": "unity://hierarchy/cached/<id>"})"#,
                "the full hierarchy array",
            )
            .output_format("The cached JSON, or {uri, found: false, message} when missing")
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let result = parse_tool_args::<ReadCachedArgs>(arguments).map(|args| {
            match self.registry.resolve(&args.uri) {
                Ok(Lookup::Found(value)) => pretty(&value),
                Ok(Lookup::Missing) => pretty(&json!({
                    "uri": args.uri,
                    "found": false,
                    "message": NOT_FOUND,
                })),
                Err(e) => error_result(&e),
            }
        });
        let text = result.unwrap_or_else(|e| e);
        Box::pin(async move { text })
    }
}

/// `"30 minutes"`, `"1 minute"`, `"90 seconds"`.
fn describe_ttl(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    match (secs / 60, secs % 60) {
        (1, 0) => "1 minute".to_string(),
        (mins, 0) if mins > 0 => format!("{mins} minutes"),
        _ if secs == 1 => "1 second".to_string(),
        _ => format!("{secs} seconds"),
    }
}

// ── CacheStatsTool ──────────────────────────────────────────────────

/// `cache_stats`: live entry counts per domain, after pruning.
pub struct CacheStatsTool {
    registry: Arc<CacheRegistry>,
}

impl CacheStatsTool {
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }
}

impl Tool for CacheStatsTool {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::CACHE_STATS)
            .purpose("Report how many unexpired payloads each cache domain holds")
            .when_to_use("When checking whether earlier detailsUri handles may still resolve")
            .output_format(r#"{"logs": {"size": n}, "hierarchy": {...}, "gameobject": {...}}"#)
            .to_tool_def()
    }

    fn execute(&self, _arguments: &str) -> ToolFuture<'_> {
        let text = pretty(&self.registry.stats());
        Box::pin(async move { text })
    }
}
