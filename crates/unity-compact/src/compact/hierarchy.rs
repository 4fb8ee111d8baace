//! Scene hierarchy compaction.

use super::{CompactOutcome, Compactor, GET_SCENES_HIERARCHY};
use crate::bridge::{BridgeRequest, fetch};
use crate::error::CompactError;
use crate::locator::CacheUri;
use crate::records::{as_list, into_payload};
use crate::summarize::{HierarchySummary, count_hierarchy_objects, summarize_hierarchy_with};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

const FETCH_FAILED: &str = "Failed to fetch hierarchy from Unity";

/// Compacted scene hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactedHierarchy {
    pub summary: HierarchySummary,
    pub total_objects: usize,
    pub details_uri: CacheUri,
    pub message: &'static str,
}

impl Compactor {
    /// Fetch every loaded scene's hierarchy and compact it when the total
    /// node count exceeds the policy's threshold. The count is taken with a
    /// cheap pass before any summary work is done.
    pub async fn compact_scenes_hierarchy(
        &self,
    ) -> Result<CompactOutcome<CompactedHierarchy>, CompactError> {
        let body = fetch(
            self.bridge(),
            BridgeRequest::new(GET_SCENES_HIERARCHY, json!({})),
            FETCH_FAILED,
        )
        .await?;

        let hierarchy = into_payload(body, &["hierarchy", "data"]);
        let total_objects = count_hierarchy_objects(as_list(&hierarchy));

        if !self.policy.should_compact_hierarchy(total_objects) {
            info!("Returning hierarchy with {total_objects} objects in full");
            return Ok(CompactOutcome::Full(hierarchy));
        }

        let roots = match hierarchy {
            Value::Array(roots) => roots,
            _ => Vec::new(),
        };
        let summary = summarize_hierarchy_with(&roots, &self.summarizer);
        let details_uri = self.registry.cache_hierarchy(roots);
        info!("Compacted hierarchy with {total_objects} objects into {details_uri}");

        Ok(CompactOutcome::Compacted(CompactedHierarchy {
            summary,
            total_objects,
            details_uri,
            message: "Large hierarchy cached. Access via URI to view details.",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::StaticBridge;
    use crate::compact::CompactionPolicy;
    use crate::store::CacheRegistry;
    use std::sync::Arc;

    fn compactor_with(body: Value) -> Compactor {
        let bridge = Arc::new(StaticBridge::new().with_response(GET_SCENES_HIERARCHY, body));
        Compactor::new(bridge, Arc::new(CacheRegistry::default()))
    }

    fn forest(roots: usize, children: usize) -> Value {
        let roots: Vec<Value> = (0..roots)
            .map(|r| {
                let kids: Vec<Value> = (0..children)
                    .map(|c| json!({"name": format!("Child{c}"), "activeSelf": c % 2 == 0}))
                    .collect();
                json!({"name": format!("Root{r}"), "activeSelf": true, "children": kids})
            })
            .collect();
        Value::Array(roots)
    }

    #[tokio::test]
    async fn large_forest_is_compacted() {
        let compactor = compactor_with(json!({"success": true, "hierarchy": forest(3, 40)}));
        let outcome = compactor.compact_scenes_hierarchy().await.unwrap();

        let compacted = outcome.compacted().expect("compacted");
        assert_eq!(compacted.total_objects, 123);
        assert_eq!(compacted.summary.root_objects, 3);
        assert_eq!(compacted.summary.total_objects, compacted.total_objects);
        assert_eq!(compacted.summary.active_objects, 3 + 3 * 20);
        assert_eq!(compacted.summary.sample_paths.len(), 10);

        let cached = compactor
            .registry()
            .hierarchy()
            .get(&compacted.details_uri.handle)
            .map(Vec::len);
        assert_eq!(cached, Some(3));
    }

    #[tokio::test]
    async fn small_forest_is_returned_raw() {
        let tree = forest(2, 10);
        let compactor = compactor_with(json!({"success": true, "data": tree.clone()}));
        let outcome = compactor.compact_scenes_hierarchy().await.unwrap();

        assert_eq!(outcome.full(), Some(&tree));
        assert_eq!(compactor.registry().stats().hierarchy.size, 0);
    }

    #[tokio::test]
    async fn threshold_comes_from_policy() {
        let compactor = compactor_with(json!({"success": true, "hierarchy": forest(1, 5)}))
            .with_policy(CompactionPolicy {
                hierarchy_threshold: 5,
                ..Default::default()
            });
        let outcome = compactor.compact_scenes_hierarchy().await.unwrap();
        assert!(outcome.is_compacted());
    }

    #[tokio::test]
    async fn sends_empty_params() {
        let bridge = Arc::new(
            StaticBridge::new().with_response(GET_SCENES_HIERARCHY, json!({"success": true, "hierarchy": []})),
        );
        let compactor = Compactor::new(bridge.clone(), Arc::new(CacheRegistry::default()));
        compactor.compact_scenes_hierarchy().await.unwrap();

        assert_eq!(bridge.requests()[0].params, json!({}));
    }

    #[tokio::test]
    async fn host_message_is_propagated() {
        let compactor = compactor_with(json!({"success": false, "message": "No scene loaded"}));
        let err = compactor.compact_scenes_hierarchy().await.unwrap_err();
        assert!(matches!(err, CompactError::ToolExecution(ref m) if m == "No scene loaded"));
    }
}
