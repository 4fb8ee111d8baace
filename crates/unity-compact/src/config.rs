//! Runtime configuration with sensible defaults.
//!
//! [`CompactConfig`] captures the editor endpoint, cache lifetime, and
//! compaction thresholds, and turns them into ready-to-use parts via
//! [`build_policy`](CompactConfig::build_policy),
//! [`build_registry`](CompactConfig::build_registry),
//! [`build_bridge`](CompactConfig::build_bridge), and
//! [`build_tool_set`](CompactConfig::build_tool_set).

use crate::bridge::HttpBridge;
use crate::compact::{CompactionPolicy, Compactor};
use crate::error::CompactError;
use crate::store::CacheRegistry;
use crate::tools::{CompactToolsExt, ToolSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Configuration for one compaction server.
///
/// Every field is optional in a config file; missing fields take the
/// defaults below and unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompactConfig {
    /// Editor bridge endpoint. Default: `"http://localhost:8090/mcp"`.
    pub bridge_url: String,
    /// Per-request timeout for the bridge. Default: `10`.
    pub request_timeout_secs: u64,
    /// Lifetime of cached payloads. Default: `1800` (30 minutes).
    pub cache_ttl_secs: u64,
    /// Logs compact above this many records. Default: `20`.
    pub log_threshold: usize,
    /// Hierarchies compact above this many nodes. Default: `100`.
    pub hierarchy_threshold: usize,
    /// GameObjects compact (in auto mode) above this many components. Default: `5`.
    pub component_threshold: usize,
    /// GameObjects compact (in auto mode) above this many children. Default: `50`.
    pub child_threshold: usize,
    /// Validate tool arguments against their JSON Schema. Default: `true`.
    pub validate_args: bool,
}

impl Default for CompactConfig {
    fn default() -> Self {
        let policy = CompactionPolicy::default();
        Self {
            bridge_url: "http://localhost:8090/mcp".to_string(),
            request_timeout_secs: 10,
            cache_ttl_secs: 1800,
            log_threshold: policy.log_threshold,
            hierarchy_threshold: policy.hierarchy_threshold,
            component_threshold: policy.component_threshold,
            child_threshold: policy.child_threshold,
            validate_args: true,
        }
    }
}

impl CompactConfig {
    /// Load a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CompactError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompactError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| CompactError::Config(format!("cannot parse {}: {e}", path.display())))?;
        debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn with_bridge_url(mut self, url: impl Into<String>) -> Self {
        self.bridge_url = url.into();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Replace all four thresholds at once.
    pub fn with_policy(mut self, policy: &CompactionPolicy) -> Self {
        self.log_threshold = policy.log_threshold;
        self.hierarchy_threshold = policy.hierarchy_threshold;
        self.component_threshold = policy.component_threshold;
        self.child_threshold = policy.child_threshold;
        self
    }

    pub fn with_validate_args(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    /// Reject settings that cannot work.
    pub fn validate(&self) -> Result<(), CompactError> {
        if self.bridge_url.trim().is_empty() {
            return Err(CompactError::Config("bridge_url must not be empty".into()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(CompactError::Config("cache_ttl_secs must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CompactError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn build_policy(&self) -> CompactionPolicy {
        CompactionPolicy {
            log_threshold: self.log_threshold,
            hierarchy_threshold: self.hierarchy_threshold,
            component_threshold: self.component_threshold,
            child_threshold: self.child_threshold,
        }
    }

    pub fn build_registry(&self) -> CacheRegistry {
        CacheRegistry::new(self.cache_ttl())
    }

    pub fn build_bridge(&self) -> Result<HttpBridge, CompactError> {
        HttpBridge::with_timeout(self.bridge_url.clone(), self.request_timeout())
    }

    /// Build a [`ToolSet`] with the compact tools talking to the configured
    /// bridge over a fresh registry.
    pub fn build_tool_set(&self) -> Result<ToolSet, CompactError> {
        self.validate()?;
        let compactor = Compactor::new(Arc::new(self.build_bridge()?), Arc::new(self.build_registry()))
            .with_policy(self.build_policy());
        Ok(ToolSet::new()
            .with_arg_validation(self.validate_args)
            .with_compactor(compactor))
    }
}
