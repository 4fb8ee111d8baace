//! Lenient typed views over host payloads.
//!
//! The editor's payloads are loosely shaped: the same fact shows up under
//! different field names depending on which editor-side serializer produced
//! it, fields go missing, and values are not always the expected JSON type.
//! Each view borrows a `serde_json::Value` and resolves fields through an
//! ordered alias list (the `*_FIELDS` constants): the first alias holding a
//! non-null value wins, otherwise the documented fallback applies. None of
//! the accessors can fail.

use serde_json::Value;

/// Log level aliases, in precedence order. Fallback: `"info"`.
pub const LOG_TYPE_FIELDS: &[&str] = &["logType", "type", "level"];
/// Log message aliases, in precedence order. Fallback: `""`.
pub const LOG_MESSAGE_FIELDS: &[&str] = &["message", "condition", "text"];
/// Stack trace aliases, in precedence order. Fallback: no stack trace.
pub const STACK_TRACE_FIELDS: &[&str] = &["stackTrace", "stack", "stacktrace"];
/// Active-state aliases for hierarchy nodes. Fallback: inactive.
pub const NODE_ACTIVE_FIELDS: &[&str] = &["activeSelf", "active", "isActive"];
/// Active-state aliases for a fetched GameObject. Fallback: inactive.
pub const GAMEOBJECT_ACTIVE_FIELDS: &[&str] = &["activeSelf", "active"];
/// Instance id aliases for a fetched GameObject. Fallback: `null`.
pub const INSTANCE_ID_FIELDS: &[&str] = &["instanceId", "id"];
/// Component type-name aliases. Components with none of them are skipped.
pub const COMPONENT_TYPE_FIELDS: &[&str] = &["type", "name", "componentType"];

/// Name used when a node or object has no `name`.
pub const UNNAMED: &str = "Unnamed";

// ── Field resolution helpers ───────────────────────────────────────

/// First non-null value among `fields` on `value`.
///
/// Returns `None` when `value` is not an object or none of the fields is set.
pub fn first_present<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    let object = value.as_object()?;
    fields
        .iter()
        .filter_map(|field| object.get(*field))
        .find(|v| !v.is_null())
}

/// Truthiness of a loosely typed flag: `false`, `0`, `""`, and `null` are
/// false, everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a scalar as text: strings verbatim, everything else as JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unwrap a bridge response such as `{ success, data: [...] }`: moves the
/// first non-null field in `fields` out of `body`, or returns `body` itself
/// when none is present.
pub fn into_payload(mut body: Value, fields: &[&str]) -> Value {
    let key = body.as_object().and_then(|object| {
        fields
            .iter()
            .find(|field| object.get(**field).is_some_and(|v| !v.is_null()))
    });
    match (key, body.as_object_mut()) {
        (Some(key), Some(object)) => object.remove(*key).unwrap_or(Value::Null),
        _ => body,
    }
}

/// `value` as an array, or an empty slice for anything else.
pub fn as_list(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

// ── LogRecord ──────────────────────────────────────────────────────

/// One console log entry.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a>(pub &'a Value);

impl<'a> LogRecord<'a> {
    /// Lower-cased level, `"info"` when absent.
    pub fn log_type(&self) -> String {
        first_present(self.0, LOG_TYPE_FIELDS)
            .map(display_string)
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
    }

    /// Raw message text, `""` when absent.
    pub fn message(&self) -> String {
        first_present(self.0, LOG_MESSAGE_FIELDS)
            .map(display_string)
            .unwrap_or_default()
    }

    /// Whether a non-blank stack trace is attached.
    pub fn has_stack_trace(&self) -> bool {
        match first_present(self.0, STACK_TRACE_FIELDS) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(other) => truthy(other),
            None => false,
        }
    }
}

// ── HierarchyNode ──────────────────────────────────────────────────

/// One node of a scene hierarchy forest.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyNode<'a>(pub &'a Value);

impl<'a> HierarchyNode<'a> {
    /// Whether the node exists at all. `null` (and other falsy
    /// placeholders) are skipped by traversals.
    pub fn is_present(&self) -> bool {
        truthy(self.0)
    }

    pub fn name(&self) -> String {
        first_present(self.0, &["name"])
            .map(display_string)
            .unwrap_or_else(|| UNNAMED.to_string())
    }

    pub fn is_active(&self) -> bool {
        first_present(self.0, NODE_ACTIVE_FIELDS).is_some_and(truthy)
    }

    /// Child nodes; empty unless `children` is an array.
    pub fn children(self) -> impl Iterator<Item = HierarchyNode<'a>> + 'a {
        self.0
            .get("children")
            .map(as_list)
            .unwrap_or(&[])
            .iter()
            .map(HierarchyNode)
    }
}

// ── GameObjectRecord ───────────────────────────────────────────────

/// A single fetched GameObject.
#[derive(Debug, Clone, Copy)]
pub struct GameObjectRecord<'a>(pub &'a Value);

impl<'a> GameObjectRecord<'a> {
    pub fn name(&self) -> String {
        first_present(self.0, &["name"])
            .map(display_string)
            .unwrap_or_else(|| UNNAMED.to_string())
    }

    /// Instance id as sent by the host (usually an integer), `null` when absent.
    pub fn instance_id(&self) -> Value {
        first_present(self.0, INSTANCE_ID_FIELDS)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn active_self(&self) -> bool {
        first_present(self.0, GAMEOBJECT_ACTIVE_FIELDS).is_some_and(truthy)
    }

    /// Number of entries in `components`, 0 unless it is an array.
    pub fn component_count(&self) -> usize {
        self.components().len()
    }

    /// Component type names, skipping components without a usable name.
    pub fn component_types(&self) -> Vec<String> {
        self.components()
            .iter()
            .filter_map(|component| first_present(component, COMPONENT_TYPE_FIELDS))
            .filter(|name| truthy(name))
            .map(display_string)
            .collect()
    }

    /// Length of `children` when it is an array, else a numeric
    /// `childCount`, else 0.
    pub fn child_count(&self) -> usize {
        if let Some(children) = self.0.get("children").and_then(Value::as_array) {
            return children.len();
        }
        match self.0.get("childCount") {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|c| c as usize)
                .or_else(|| n.as_f64().map(|f| f.max(0.0) as usize))
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn components(&self) -> &'a [Value] {
        self.0.get("components").map(as_list).unwrap_or(&[])
    }
}
