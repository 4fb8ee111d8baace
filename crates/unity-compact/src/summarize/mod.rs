//! Bounded summaries of large host payloads.
//!
//! Summarizers are pure and infallible: a malformed record degrades to its
//! documented fallbacks (see [`records`](crate::records)) instead of failing
//! the whole summary.

pub mod hierarchy;
pub mod logs;

pub use hierarchy::{
    HierarchySummary, count_hierarchy_objects, summarize_hierarchy, summarize_hierarchy_with,
};
pub use logs::{LogSummary, MessageSample, summarize_logs, summarize_logs_with};

/// Limits applied by the summarizers.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Maximum number of `(type, message)` groups in `sampleMessages`.
    pub log_sample_limit: usize,
    /// Messages longer than this many characters are cut and suffixed with `...`.
    pub max_message_chars: usize,
    /// Maximum number of entries in `samplePaths`.
    pub hierarchy_sample_limit: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            log_sample_limit: 5,
            max_message_chars: 200,
            hierarchy_sample_limit: 10,
        }
    }
}
