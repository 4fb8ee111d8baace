//! Structured tool descriptions.
//!
//! A [`ToolSpec`] renders purpose, usage guidance, examples, and the output
//! shape into one description string, so every compact tool tells the
//! client when the raw editor tool is the better choice.

use crate::ToolDef;
use std::fmt::Write as _;

/// A tool description with usage guidance.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    /// One-sentence imperative purpose.
    pub purpose: String,
    pub when_to_use: String,
    /// Steers the client away from this tool when a sibling fits better.
    pub when_not_to_use: String,
    /// JSON Schema for the arguments.
    pub parameters: serde_json::Value,
    pub examples: Vec<UsageExample>,
    pub output_format: String,
}

/// An `(input, behavior)` usage example.
#[derive(Debug, Clone)]
pub struct UsageExample {
    pub input: String,
    pub output: String,
}

impl ToolSpec {
    pub fn builder(name: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            spec: ToolSpec {
                name: name.into(),
                purpose: String::new(),
                when_to_use: String::new(),
                when_not_to_use: String::new(),
                parameters: serde_json::json!({"type": "object", "properties": {}}),
                examples: Vec::new(),
                output_format: String::new(),
            },
        }
    }

    /// Render the structured fields as a single description.
    pub fn to_description(&self) -> String {
        let mut desc = format!("{}.", self.purpose.trim_end_matches('.'));
        if !self.when_to_use.is_empty() {
            let _ = write!(desc, "\nWhen to use: {}", self.when_to_use);
        }
        if !self.when_not_to_use.is_empty() {
            let _ = write!(desc, "\nWhen NOT to use: {}", self.when_not_to_use);
        }

        if !self.examples.is_empty() {
            desc.push_str("\nExamples:");
            for ex in &self.examples {
                let _ = write!(desc, "\n  - {} → {}", ex.input, ex.output);
            }
        }

        if !self.output_format.is_empty() {
            let _ = write!(desc, "\nOutput format: {}", self.output_format);
        }

        desc
    }

    pub fn to_tool_def(&self) -> ToolDef {
        ToolDef::new(
            self.name.clone(),
            self.to_description(),
            self.parameters.clone(),
        )
    }
}

/// Builder for [`ToolSpec`]. Omitted fields stay empty and are left out of
/// the rendered description; parameters default to an empty object schema.
#[derive(Debug, Clone)]
pub struct ToolSpecBuilder {
    spec: ToolSpec,
}

impl ToolSpecBuilder {
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.spec.purpose = purpose.into();
        self
    }

    pub fn when_to_use(mut self, when: impl Into<String>) -> Self {
        self.spec.when_to_use = when.into();
        self
    }

    pub fn when_not_to_use(mut self, when_not: impl Into<String>) -> Self {
        self.spec.when_not_to_use = when_not.into();
        self
    }

    pub fn parameters(mut self, params: serde_json::Value) -> Self {
        self.spec.parameters = params;
        self
    }

    /// Derive the parameter schema from the argument type, so schema and
    /// deserialization cannot drift apart.
    pub fn parameters_for<T: schemars::JsonSchema>(self) -> Self {
        self.parameters(crate::json_schema_for::<T>())
    }

    pub fn example(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.spec.examples.push(UsageExample {
            input: input.into(),
            output: output.into(),
        });
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.spec.output_format = format.into();
        self
    }

    /// Shortcut for `.build().to_tool_def()`.
    pub fn to_tool_def(self) -> ToolDef {
        self.build().to_tool_def()
    }

    pub fn build(self) -> ToolSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_includes_guidance_and_examples() {
        let spec = ToolSpec::builder("get_scenes_hierarchy_compact")
            .purpose("Summarize the scene hierarchy")
            .when_to_use("Large scenes")
            .when_not_to_use("Small scenes; use get_scenes_hierarchy instead")
            .example("get_scenes_hierarchy_compact()", "summary plus detailsUri")
            .output_format("JSON")
            .build();

        let desc = spec.to_description();
        assert!(desc.starts_with("Summarize the scene hierarchy."));
        assert!(desc.contains("When NOT to use: Small scenes"));
        assert!(desc.contains("  - get_scenes_hierarchy_compact() → summary plus detailsUri"));
        assert!(desc.ends_with("Output format: JSON"));
    }

    #[test]
    fn omitted_sections_are_left_out() {
        let def = ToolSpec::builder("cache_stats")
            .purpose("Report cache sizes.")
            .to_tool_def();

        assert_eq!(def.function.name, "cache_stats");
        assert_eq!(def.function.description, "Report cache sizes.");
        assert_eq!(def.function.parameters["type"], "object");
    }

    #[test]
    fn parameters_for_derives_schema() {
        #[derive(serde::Deserialize, schemars::JsonSchema)]
        #[allow(dead_code)]
        struct Args {
            uri: String,
        }

        let spec = ToolSpec::builder("read_cached")
            .purpose("Read")
            .parameters_for::<Args>()
            .build();
        assert!(spec.parameters["properties"]["uri"].is_object());
    }
}
