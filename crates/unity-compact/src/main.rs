//! Line-oriented stdio server for the Unity compact tools.
//!
//! Reads one JSON call per line from stdin and writes one JSON result per
//! line to stdout. Logs go to stderr.
//!
//! # Examples
//!
//! ```sh
//! # List the tool definitions
//! unity-compact --list-tools
//!
//! # Serve calls against a local editor, keeping cached payloads for 10 minutes
//! echo '{"tool": "get_console_logs_compact", "arguments": {"logType": "error"}}' \
//!     | unity-compact --bridge-url http://localhost:8090/mcp --ttl-secs 600
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use unity_compact::tools::ToolSet;
use unity_compact::{CompactConfig, CompactError, compact_tools_guidance};

/// Context-budget-aware compaction server for Unity editor state.
#[derive(Parser)]
#[command(name = "unity-compact", version)]
struct Cli {
    /// JSON config file. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Editor bridge endpoint (overrides the config file).
    #[arg(long, env = "UNITY_BRIDGE_URL")]
    bridge_url: Option<String>,

    /// Lifetime of cached payloads in seconds (overrides the config file).
    #[arg(long, env = "UNITY_COMPACT_TTL_SECS")]
    ttl_secs: Option<u64>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the tool definitions as JSON and exit.
    #[arg(long)]
    list_tools: bool,

    /// Print the client usage guidance and exit.
    #[arg(long)]
    guidance: bool,
}

/// One inbound call.
#[derive(Deserialize)]
struct CallRequest {
    tool: String,
    #[serde(default)]
    arguments: Value,
}

/// One outbound result.
#[derive(Serialize)]
struct CallResponse {
    tool: Option<String>,
    result: String,
}

impl Cli {
    fn resolve_config(&self) -> Result<CompactConfig, CompactError> {
        let mut config = match &self.config {
            Some(path) => CompactConfig::from_file(path)?,
            None => CompactConfig::default(),
        };
        if let Some(url) = &self.bridge_url {
            config = config.with_bridge_url(url.clone());
        }
        if let Some(ttl) = self.ttl_secs {
            config = config.with_cache_ttl_secs(ttl);
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Arguments may arrive as an object or as an already-encoded string.
fn arguments_text(arguments: Value) -> String {
    match arguments {
        Value::Null => "{}".to_string(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

async fn handle_line(tools: &ToolSet, line: &str) -> CallResponse {
    match serde_json::from_str::<CallRequest>(line) {
        Ok(call) => {
            let result = tools.execute(&call.tool, &arguments_text(call.arguments)).await;
            CallResponse {
                tool: Some(call.tool),
                result,
            }
        }
        Err(e) => {
            warn!("Malformed call: {e}");
            CallResponse {
                tool: None,
                result: format!(
                    "Error: malformed call: {e}. Expected {{\"tool\": \"<name>\", \"arguments\": {{...}}}}"
                ),
            }
        }
    }
}

async fn serve(tools: ToolSet) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(&tools, line).await;
        let mut out = serde_json::to_string(&response)
            .unwrap_or_else(|e| format!(r#"{{"tool":null,"result":"Error: {e}"}}"#));
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if cli.guidance {
        println!("{}", compact_tools_guidance());
        return ExitCode::SUCCESS;
    }

    let config = match cli.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let tools = match config.build_tool_set() {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.list_tools {
        return match serde_json::to_string_pretty(&tools.definitions()) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("failed to render tool definitions: {e}");
                ExitCode::FAILURE
            }
        };
    }

    info!(
        "Serving {} tools against {} (cache TTL {}s)",
        tools.len(),
        config.bridge_url,
        config.cache_ttl_secs
    );

    match serve(tools).await {
        Ok(()) => {
            info!("stdin closed, shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("stdio failure: {e}");
            ExitCode::FAILURE
        }
    }
}
