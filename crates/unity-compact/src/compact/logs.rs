//! Console log compaction.

use super::{CompactOutcome, Compactor, GET_CONSOLE_LOGS};
use crate::bridge::{BridgeRequest, fetch};
use crate::error::CompactError;
use crate::locator::CacheUri;
use crate::records::into_payload;
use crate::summarize::{LogSummary, summarize_logs_with};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

/// Default page size requested from the editor.
pub const DEFAULT_LOG_LIMIT: u32 = 50;
/// Largest page size the editor is asked for.
pub const MAX_LOG_LIMIT: u32 = 500;

const FETCH_FAILED: &str = "Failed to fetch logs from Unity";

/// Console log severity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Warning,
    Error,
}

/// Arguments for `get_console_logs_compact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleLogsArgs {
    /// The type of logs to retrieve (info, warning, error). Defaults to all logs.
    #[serde(default)]
    pub log_type: Option<LogType>,
    /// Starting index for pagination (0-based, defaults to 0).
    #[serde(default)]
    pub offset: Option<u32>,
    /// Maximum number of logs to return (defaults to 50, max 500).
    #[serde(default)]
    #[schemars(range(min = 1, max = 500))]
    pub limit: Option<u32>,
    /// Whether to include stack traces. Requesting them always returns a
    /// compact summary; the traces stay in the cached payload.
    #[serde(default)]
    pub include_stack_trace: Option<bool>,
}

/// Compacted console logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactedLogs {
    pub summary: LogSummary,
    pub count: usize,
    pub include_stack_trace: bool,
    pub details_uri: CacheUri,
    pub message: &'static str,
}

impl Compactor {
    /// Fetch console logs and compact them when there are more than the
    /// policy's threshold, or when stack traces were requested.
    pub async fn compact_console_logs(
        &self,
        args: &ConsoleLogsArgs,
    ) -> Result<CompactOutcome<CompactedLogs>, CompactError> {
        let offset = args.offset.unwrap_or(0);
        let limit = args.limit.unwrap_or(DEFAULT_LOG_LIMIT);
        if !(1..=MAX_LOG_LIMIT).contains(&limit) {
            return Err(CompactError::InvalidArguments(format!(
                "limit must be between 1 and {MAX_LOG_LIMIT}, got {limit}"
            )));
        }
        let include_stack_trace = args.include_stack_trace.unwrap_or(false);

        let mut params = Map::new();
        if let Some(log_type) = args.log_type {
            params.insert("logType".into(), json!(log_type));
        }
        params.insert("offset".into(), json!(offset));
        params.insert("limit".into(), json!(limit));
        params.insert("includeStackTrace".into(), json!(include_stack_trace));

        let body = fetch(
            self.bridge(),
            BridgeRequest::new(GET_CONSOLE_LOGS, Value::Object(params)),
            FETCH_FAILED,
        )
        .await?;

        let logs = match into_payload(body, &["data", "logs"]) {
            Value::Array(list) => list,
            other if !self.policy.should_compact_logs(0, include_stack_trace) => {
                // Not a list: nothing to summarize, hand it back as-is.
                return Ok(CompactOutcome::Full(other));
            }
            _ => Vec::new(),
        };

        if !self.policy.should_compact_logs(logs.len(), include_stack_trace) {
            info!("Returning {} console logs in full", logs.len());
            return Ok(CompactOutcome::Full(Value::Array(logs)));
        }

        let summary = summarize_logs_with(&logs, &self.summarizer);
        let count = logs.len();
        let details_uri = self.registry.cache_logs(logs);
        info!("Compacted {count} console logs into {details_uri}");

        Ok(CompactOutcome::Compacted(CompactedLogs {
            summary,
            count,
            include_stack_trace,
            details_uri,
            message: "Full logs available via URI.",
        }))
    }
}
