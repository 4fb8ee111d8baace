//! Console log summarization.

use super::SummarizerConfig;
use crate::records::LogRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Suffix appended to truncated messages.
const ELLIPSIS: &str = "...";

/// A group of identical `(type, message)` log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSample {
    #[serde(rename = "type")]
    pub log_type: String,
    pub message: String,
    pub count: usize,
}

/// Bounded digest of a console log list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    /// Most frequent groups, count descending, ties in first-seen order.
    pub sample_messages: Vec<MessageSample>,
    pub has_stack_traces: bool,
}

/// Summarize `logs` with the default limits.
pub fn summarize_logs(logs: &[Value]) -> LogSummary {
    summarize_logs_with(logs, &SummarizerConfig::default())
}

/// Summarize `logs` with explicit limits.
pub fn summarize_logs_with(logs: &[Value], config: &SummarizerConfig) -> LogSummary {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    // Groups in first-seen order; the map points into `groups`.
    let mut groups: Vec<MessageSample> = Vec::new();
    let mut group_index: HashMap<(String, String), usize> = HashMap::new();
    let mut has_stack_traces = false;

    for log in logs {
        let record = LogRecord(log);
        let log_type = record.log_type();
        let message = truncate_message(&record.message(), config.max_message_chars);

        *by_type.entry(log_type.clone()).or_default() += 1;

        let key = (log_type, message);
        match group_index.get(&key) {
            Some(&i) => groups[i].count += 1,
            None => {
                group_index.insert(key.clone(), groups.len());
                groups.push(MessageSample {
                    log_type: key.0,
                    message: key.1,
                    count: 1,
                });
            }
        }

        if !has_stack_traces && record.has_stack_trace() {
            has_stack_traces = true;
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(config.log_sample_limit);

    LogSummary {
        total: logs.len(),
        by_type,
        sample_messages: groups,
        has_stack_traces,
    }
}

/// Cut `message` to `max_chars` characters, appending `...` when cut.
fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().nth(max_chars).is_none() {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(max_chars).collect();
    cut.push_str(ELLIPSIS);
    cut
}
