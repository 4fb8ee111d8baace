//! Usage guidance for clients of the compact tools.

/// Guidance text telling a client when to prefer the compact tools and when
/// to fall back to the full editor tools.
pub fn compact_tools_guidance() -> String {
    "\
# Unity Compact Tools

Use compact tools by default to keep context small. Ask for full output only \
when the user explicitly wants it.

Use compact tools for:
- Large datasets (console logs, scene hierarchies, GameObjects with many components)
- Answers where a summary is enough
- Requests that do not ask for full details

Use the full editor tools when:
- Debugging needs complete stack traces
- The dataset is small (fewer than 20 items)
- The user explicitly asks for full details

Compacted answers carry a `detailsUri` such as `unity://logs/cached/<id>`. \
Pass it to `read_cached` to get the full payload. Entries expire after the \
server's cache TTL; call `cache_stats` to see what is still held.

Examples:

get_console_logs_compact({ \"logType\": \"error\", \"limit\": 50 })
get_scenes_hierarchy_compact()
get_gameobject_compact({ \"idOrName\": \"Player\" })
get_gameobject_compact({ \"idOrName\": \"Player\", \"compactMode\": false })
read_cached({ \"uri\": \"unity://hierarchy/cached/<id>\" })"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{
        CACHE_STATS, GET_CONSOLE_LOGS_COMPACT, GET_GAMEOBJECT_COMPACT, GET_SCENES_HIERARCHY_COMPACT,
        READ_CACHED,
    };

    #[test]
    fn guidance_mentions_every_tool() {
        let text = compact_tools_guidance();
        for name in [
            GET_CONSOLE_LOGS_COMPACT,
            GET_SCENES_HIERARCHY_COMPACT,
            GET_GAMEOBJECT_COMPACT,
            READ_CACHED,
            CACHE_STATS,
        ] {
            assert!(text.contains(name), "guidance is missing {name}");
        }
        assert!(text.contains("cache TTL"));
        assert!(!text.contains("30 minutes"));
    }
}
