//! Scene hierarchy summarization.

use super::SummarizerConfig;
use crate::records::HierarchyNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bounded digest of a scene hierarchy forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySummary {
    pub total_objects: usize,
    pub active_objects: usize,
    pub root_objects: usize,
    /// Deepest node depth, roots at depth 1; 0 for an empty forest.
    pub max_depth: usize,
    /// First paths visited depth-first, e.g. `Canvas/Panel/Button`.
    pub sample_paths: Vec<String>,
}

/// Count every node in the forest. Cheaper than a full summary; used to
/// decide whether a hierarchy is worth compacting at all.
pub fn count_hierarchy_objects(roots: &[Value]) -> usize {
    fn walk(node: HierarchyNode<'_>) -> usize {
        if !node.is_present() {
            return 0;
        }
        1 + node.children().map(walk).sum::<usize>()
    }

    roots.iter().map(|root| walk(HierarchyNode(root))).sum()
}

/// Summarize `roots` with the default limits.
pub fn summarize_hierarchy(roots: &[Value]) -> HierarchySummary {
    summarize_hierarchy_with(roots, &SummarizerConfig::default())
}

/// Summarize `roots` with explicit limits.
pub fn summarize_hierarchy_with(roots: &[Value], config: &SummarizerConfig) -> HierarchySummary {
    let mut walker = Walker {
        summary: HierarchySummary {
            total_objects: 0,
            active_objects: 0,
            root_objects: roots.len(),
            max_depth: 0,
            sample_paths: Vec::new(),
        },
        sample_limit: config.hierarchy_sample_limit,
    };

    for root in roots {
        let node = HierarchyNode(root);
        walker.visit(node, &node.name(), 1);
    }

    walker.summary
}

struct Walker {
    summary: HierarchySummary,
    sample_limit: usize,
}

impl Walker {
    fn visit(&mut self, node: HierarchyNode<'_>, path: &str, depth: usize) {
        if !node.is_present() {
            return;
        }

        let summary = &mut self.summary;
        summary.total_objects += 1;
        if node.is_active() {
            summary.active_objects += 1;
        }
        summary.max_depth = summary.max_depth.max(depth);
        if summary.sample_paths.len() < self.sample_limit {
            summary.sample_paths.push(path.to_string());
        }

        for child in node.children() {
            let child_path = format!("{path}/{}", child.name());
            self.visit(child, &child_path, depth + 1);
        }
    }
}
