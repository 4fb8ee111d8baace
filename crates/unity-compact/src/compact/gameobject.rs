//! Single GameObject compaction.

use super::{CompactOutcome, Compactor, GET_GAMEOBJECT};
use crate::bridge::{BridgeRequest, fetch};
use crate::error::CompactError;
use crate::locator::CacheUri;
use crate::records::{GameObjectRecord, into_payload};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

const FETCH_FAILED: &str = "Failed to fetch GameObject from Unity";

/// How to answer a GameObject request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompactMode {
    /// Always return the compact view.
    Compact,
    /// Always return the raw object.
    Full,
    /// Compact only when the object is large.
    #[default]
    Auto,
}

/// Wire form of [`CompactMode`]: `true`, `false` or `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CompactModeArg {
    Flag(bool),
    Keyword(AutoKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AutoKeyword {
    Auto,
}

impl From<CompactModeArg> for CompactMode {
    fn from(arg: CompactModeArg) -> Self {
        match arg {
            CompactModeArg::Flag(true) => CompactMode::Compact,
            CompactModeArg::Flag(false) => CompactMode::Full,
            CompactModeArg::Keyword(AutoKeyword::Auto) => CompactMode::Auto,
        }
    }
}

/// Arguments for `get_gameobject_compact`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameObjectArgs {
    /// The instance ID (integer) or the name or path (string) of the GameObject to find.
    pub id_or_name: String,
    /// true for compact, false for full, "auto" (default) to compact only large objects.
    #[serde(default)]
    pub compact_mode: Option<CompactModeArg>,
}

impl GameObjectArgs {
    pub fn new(id_or_name: impl Into<String>) -> Self {
        Self {
            id_or_name: id_or_name.into(),
            compact_mode: None,
        }
    }

    pub fn with_mode(mut self, mode: CompactModeArg) -> Self {
        self.compact_mode = Some(mode);
        self
    }

    pub fn mode(&self) -> CompactMode {
        self.compact_mode.map(CompactMode::from).unwrap_or_default()
    }
}

/// Compacted GameObject: identity, component type names and child count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactGameObject {
    pub name: String,
    pub instance_id: Value,
    pub active_self: bool,
    pub components: Vec<String>,
    pub child_count: usize,
    pub details_uri: CacheUri,
}

impl Compactor {
    /// Fetch one GameObject and return its compact projection or the raw
    /// object, depending on the requested mode and the object's size.
    pub async fn compact_gameobject(
        &self,
        args: &GameObjectArgs,
    ) -> Result<CompactOutcome<CompactGameObject>, CompactError> {
        let body = fetch(
            self.bridge(),
            BridgeRequest::new(GET_GAMEOBJECT, json!({ "idOrName": args.id_or_name })),
            FETCH_FAILED,
        )
        .await?;

        let object = into_payload(body, &["gameObject", "data"]);
        let mode = args.mode();
        let record = GameObjectRecord(&object);

        if !self.policy.should_compact_gameobject(mode, record) {
            info!("Returning GameObject '{}' in full", args.id_or_name);
            return Ok(CompactOutcome::Full(object));
        }

        let name = record.name();
        let instance_id = record.instance_id();
        let active_self = record.active_self();
        let components = record.component_types();
        let child_count = record.child_count();

        let details_uri = self.registry.cache_gameobject(object);
        info!("Compacted GameObject '{name}' into {details_uri}");

        Ok(CompactOutcome::Compacted(CompactGameObject {
            name,
            instance_id,
            active_self,
            components,
            child_count,
            details_uri,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::StaticBridge;
    use crate::store::CacheRegistry;
    use std::sync::Arc;

    fn compactor_with(body: Value) -> (Compactor, Arc<StaticBridge>) {
        let bridge = Arc::new(StaticBridge::new().with_response(GET_GAMEOBJECT, body));
        let compactor = Compactor::new(bridge.clone(), Arc::new(CacheRegistry::default()));
        (compactor, bridge)
    }

    fn player(components: usize, children: usize) -> Value {
        let components: Vec<Value> = (0..components)
            .map(|i| json!({"type": format!("Component{i}"), "enabled": true}))
            .collect();
        let children: Vec<Value> = (0..children)
            .map(|i| json!({"name": format!("Child{i}")}))
            .collect();
        json!({
            "name": "Player",
            "instanceId": 4242,
            "activeSelf": true,
            "components": components,
            "children": children,
        })
    }

    #[test]
    fn mode_argument_parses_all_forms() {
        let parse = |v: Value| serde_json::from_value::<GameObjectArgs>(v).unwrap().mode();
        assert_eq!(parse(json!({"idOrName": "A", "compactMode": true})), CompactMode::Compact);
        assert_eq!(parse(json!({"idOrName": "A", "compactMode": false})), CompactMode::Full);
        assert_eq!(parse(json!({"idOrName": "A", "compactMode": "auto"})), CompactMode::Auto);
        assert_eq!(parse(json!({"idOrName": "A"})), CompactMode::Auto);
    }

    #[test]
    fn mode_argument_rejects_other_strings() {
        let result = serde_json::from_value::<GameObjectArgs>(
            json!({"idOrName": "A", "compactMode": "sometimes"}),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn small_object_in_auto_mode_is_raw() {
        let raw = player(3, 2);
        let (compactor, bridge) =
            compactor_with(json!({"success": true, "gameObject": raw.clone()}));
        let outcome = compactor
            .compact_gameobject(&GameObjectArgs::new("Player"))
            .await
            .unwrap();

        assert_eq!(outcome.full(), Some(&raw));
        assert_eq!(compactor.registry().stats().gameobject.size, 0);
        assert_eq!(bridge.requests()[0].params, json!({"idOrName": "Player"}));
    }

    #[tokio::test]
    async fn many_components_compact_in_auto_mode() {
        let raw = player(6, 0);
        let (compactor, _) = compactor_with(json!({"success": true, "data": raw.clone()}));
        let outcome = compactor
            .compact_gameobject(&GameObjectArgs::new("Player"))
            .await
            .unwrap();

        let compact = outcome.compacted().expect("compacted");
        assert_eq!(compact.name, "Player");
        assert_eq!(compact.instance_id, json!(4242));
        assert!(compact.active_self);
        assert_eq!(compact.components.len(), 6);
        assert_eq!(compact.components[0], "Component0");
        assert_eq!(compact.child_count, 0);

        let cached = compactor
            .registry()
            .gameobjects()
            .get(&compact.details_uri.handle)
            .cloned();
        assert_eq!(cached, Some(raw));
    }

    #[tokio::test]
    async fn forced_compact_applies_to_small_objects() {
        let (compactor, _) = compactor_with(json!({"success": true, "gameObject": player(1, 1)}));
        let args = GameObjectArgs::new("Player").with_mode(CompactModeArg::Flag(true));
        let outcome = compactor.compact_gameobject(&args).await.unwrap();
        assert!(outcome.is_compacted());
    }

    #[tokio::test]
    async fn forced_full_applies_to_large_objects() {
        let (compactor, _) = compactor_with(json!({"success": true, "gameObject": player(10, 60)}));
        let args = GameObjectArgs::new("Player").with_mode(CompactModeArg::Flag(false));
        let outcome = compactor.compact_gameobject(&args).await.unwrap();
        assert!(!outcome.is_compacted());
    }

    #[tokio::test]
    async fn sparse_object_uses_defaults() {
        let (compactor, _) = compactor_with(json!({"success": true, "gameObject": {"id": 7}}));
        let args = GameObjectArgs::new("7").with_mode(CompactModeArg::Flag(true));
        let outcome = compactor.compact_gameobject(&args).await.unwrap();

        let compact = outcome.compacted().expect("compacted");
        assert_eq!(compact.name, "Unnamed");
        assert_eq!(compact.instance_id, json!(7));
        assert!(!compact.active_self);
        assert!(compact.components.is_empty());
    }

    #[tokio::test]
    async fn not_found_reports_fallback() {
        let (compactor, _) = compactor_with(json!({"success": false}));
        let err = compactor
            .compact_gameobject(&GameObjectArgs::new("Ghost"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tool execution failed: Failed to fetch GameObject from Unity"
        );
    }
}
