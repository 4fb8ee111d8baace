//! Context-budget-aware compaction bridge for Unity editor state.
//!
//! `unity-compact` sits between a tool-calling client and a live Unity
//! editor. It fetches console logs, scene hierarchies, and individual
//! GameObjects through a [`HostBridge`](bridge::HostBridge) and decides,
//! per domain, whether to hand the payload back verbatim or to replace it
//! with a bounded summary plus a `unity://<domain>/cached/<handle>` URI. The
//! full payload stays in a short-lived [`EphemeralStore`](store::EphemeralStore)
//! until the client asks for it via [`read_cached`](tools::READ_CACHED) or
//! the entry expires.
//!
//! # Getting started
//!
//! ```ignore
//! use unity_compact::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CompactError> {
//!     let config = CompactConfig::default().with_cache_ttl_secs(600);
//!     let tools = config.build_tool_set()?;
//!
//!     let out = tools
//!         .execute("get_console_logs_compact", r#"{"logType":"error"}"#)
//!         .await;
//!     println!("{out}");
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`store`] | Generic expiring [`EphemeralStore`](store::EphemeralStore), [`Clock`](store::Clock), per-domain [`CacheRegistry`](store::CacheRegistry) |
//! | [`records`] | Lenient typed views over log records, hierarchy nodes, and GameObjects |
//! | [`summarize`] | Pure log and hierarchy summarizers |
//! | [`compact`] | Per-domain compaction policy and the three compact operations |
//! | [`retrieval`] | Resolving a cached URI back to its payload |
//! | [`bridge`] | [`HostBridge`](bridge::HostBridge) trait, HTTP and static implementations |
//! | [`tools`] | [`Tool`](tools::Tool) trait, [`ToolSet`](tools::ToolSet), compact tools |
//! | [`config`] | [`CompactConfig`](config::CompactConfig) and builders |

pub mod bridge;
pub mod compact;
pub mod config;
pub mod error;
pub mod locator;
pub mod prelude;
pub mod prompt;
pub mod records;
pub mod retrieval;
pub mod store;
pub mod summarize;
pub mod tools;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use config::CompactConfig;
pub use error::CompactError;
pub use prompt::compact_tools_guidance;

// Re-export schemars for downstream crates.
pub use schemars;

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`. Tool argument structs derive `JsonSchema` and
/// the result is what a function-calling client expects as `parameters`.
///
/// # Example
///
/// ```
/// use unity_compact::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct LookupArgs {
///     uri: String,
///     #[serde(default)]
///     pretty: Option<bool>,
/// }
///
/// let schema = json_schema_for::<LookupArgs>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"uri".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Tool types ─────────────────────────────────────────────────────

/// The type of a tool definition. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// Tool definition exported to the client (OpenAI function-calling format).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolDef {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: FunctionDef,
}

impl ToolDef {
    /// Create a function-calling tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: ToolType::Function,
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
