//! End-to-end checks through the `ToolSet` dispatcher with a canned editor.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use unity_compact::bridge::StaticBridge;
use unity_compact::compact::{GET_CONSOLE_LOGS, GET_GAMEOBJECT, GET_SCENES_HIERARCHY};
use unity_compact::store::{CacheRegistry, ManualClock};
use unity_compact::tools::{CompactToolsExt, ToolSet};

fn editor() -> StaticBridge {
    let logs: Vec<Value> = (0..25)
        .map(|_| json!({"type": "error", "message": "X"}))
        .collect();
    let roots: Vec<Value> = (0..3)
        .map(|r| {
            let children: Vec<Value> = (0..40)
                .map(|c| json!({"name": format!("Item{c}"), "activeSelf": true}))
                .collect();
            json!({"name": format!("Root{r}"), "activeSelf": true, "children": children})
        })
        .collect();
    let player = json!({
        "name": "Player",
        "instanceId": 1001,
        "activeSelf": true,
        "components": [{"type": "Transform"}, {"type": "Rigidbody"}, {"type": "PlayerController"}],
        "children": [{"name": "Camera"}, {"name": "Model"}],
    });

    StaticBridge::new()
        .with_response(GET_CONSOLE_LOGS, json!({"success": true, "data": logs}))
        .with_response(GET_SCENES_HIERARCHY, json!({"success": true, "hierarchy": roots}))
        .with_response(GET_GAMEOBJECT, json!({"success": true, "gameObject": player}))
}

fn tools_with(registry: Arc<CacheRegistry>) -> ToolSet {
    ToolSet::new()
        .with_arg_validation(true)
        .with_compact_tools(Arc::new(editor()), registry)
}

async fn call(tools: &ToolSet, name: &str, args: Value) -> Value {
    let out = tools.execute(name, &args.to_string()).await;
    serde_json::from_str(&out).unwrap_or_else(|e| panic!("{name} returned non-JSON ({e}): {out}"))
}

#[tokio::test]
async fn compacted_logs_resolve_through_read_cached() {
    let tools = tools_with(Arc::new(CacheRegistry::default()));

    let compact = call(&tools, "get_console_logs_compact", json!({})).await;
    assert_eq!(compact["summary"]["total"], 25);
    assert_eq!(compact["summary"]["byType"], json!({"error": 25}));
    assert_eq!(compact["summary"]["sampleMessages"][0]["count"], 25);

    let uri = compact["detailsUri"].as_str().unwrap();
    let full = call(&tools, "read_cached", json!({"uri": uri})).await;
    assert_eq!(full.as_array().map(Vec::len), Some(25));
}

#[tokio::test]
async fn hierarchy_and_gameobject_follow_their_thresholds() {
    let tools = tools_with(Arc::new(CacheRegistry::default()));

    let hierarchy = call(&tools, "get_scenes_hierarchy_compact", json!({})).await;
    assert_eq!(hierarchy["summary"]["rootObjects"], 3);
    assert_eq!(hierarchy["totalObjects"], 123);
    assert_eq!(hierarchy["summary"]["maxDepth"], 2);

    let player = call(&tools, "get_gameobject_compact", json!({"idOrName": "Player"})).await;
    assert_eq!(player["name"], "Player");
    assert!(player.get("detailsUri").is_none(), "small object should be raw");

    let forced = call(
        &tools,
        "get_gameobject_compact",
        json!({"idOrName": "Player", "compactMode": true}),
    )
    .await;
    assert_eq!(forced["components"], json!(["Transform", "Rigidbody", "PlayerController"]));
    assert_eq!(forced["childCount"], 2);

    let stats = call(&tools, "cache_stats", json!({})).await;
    assert_eq!(
        stats,
        json!({"logs": {"size": 0}, "hierarchy": {"size": 1}, "gameobject": {"size": 1}})
    );
}

#[tokio::test]
async fn large_cached_payloads_read_back_whole() {
    let logs: Vec<Value> = (0..500)
        .map(|i| {
            json!({
                "type": "error",
                "message": format!("NullReferenceException #{i}"),
                "stackTrace": "at Player.Update () in Assets/Scripts/Player.cs:42\n\
                               at GameManager.Tick () in Assets/Scripts/GameManager.cs:17\n\
                               at UnityEngine.Internal.Loop ()",
            })
        })
        .collect();
    let mut components: Vec<Value> = (0..400)
        .map(|i| json!({"type": format!("Behaviour{i}"), "properties": {"note": "x".repeat(200)}}))
        .collect();
    components.insert(0, json!({"type": "Transform"}));
    let big_object = json!({"name": "Boss", "instanceId": 7, "activeSelf": true, "components": components});

    let editor = StaticBridge::new()
        .with_response(GET_CONSOLE_LOGS, json!({"success": true, "data": logs}))
        .with_response(GET_GAMEOBJECT, json!({"success": true, "data": big_object}));
    let tools = ToolSet::new()
        .with_arg_validation(true)
        .with_compact_tools(Arc::new(editor), Arc::new(CacheRegistry::default()));

    let compact = call(
        &tools,
        "get_console_logs_compact",
        json!({"limit": 500, "includeStackTrace": true}),
    )
    .await;
    assert_eq!(compact["count"], 500);

    let uri = compact["detailsUri"].as_str().unwrap();
    let raw = tools
        .execute("read_cached", &json!({"uri": uri}).to_string())
        .await;
    assert!(raw.len() > 60_000, "payload is only {} bytes", raw.len());
    let full: Value = serde_json::from_str(&raw).expect("read_cached output is JSON");
    assert_eq!(full.as_array().map(Vec::len), Some(500));
    assert_eq!(full[499]["message"], "NullReferenceException #499");

    let raw = tools
        .execute(
            "get_gameobject_compact",
            r#"{"idOrName": "Boss", "compactMode": false}"#,
        )
        .await;
    assert!(raw.len() > 60_000, "payload is only {} bytes", raw.len());
    let full: Value = serde_json::from_str(&raw).expect("full GameObject is JSON");
    assert_eq!(full["components"].as_array().map(Vec::len), Some(401));
}

#[tokio::test]
async fn expired_handles_report_not_found() {
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let registry = Arc::new(CacheRegistry::with_clock(Duration::from_secs(60), clock.clone()));
    let tools = tools_with(registry);

    let compact = call(&tools, "get_console_logs_compact", json!({})).await;
    let uri = compact["detailsUri"].as_str().unwrap().to_string();

    clock.advance(Duration::from_secs(60));
    let missing = call(&tools, "read_cached", json!({"uri": uri})).await;
    assert_eq!(missing["found"], false);
    assert_eq!(missing["message"], "Cached data not found or expired.");
}

#[tokio::test]
async fn schema_validation_rejects_bad_mode() {
    let tools = tools_with(Arc::new(CacheRegistry::default()));
    let out = tools
        .execute(
            "get_gameobject_compact",
            r#"{"idOrName": "Player", "compactMode": "always"}"#,
        )
        .await;
    assert!(out.starts_with("Error:"), "{out}");
}
