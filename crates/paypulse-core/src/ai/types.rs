//! Backend-agnostic request types
//!
//! A `ResponseSchema` describes the JSON object a structured-generation call
//! must return. Each backend renders it in the dialect its API understands.

use serde_json::{json, Map, Value};

/// Value type of a single schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    String,
    /// Text restricted to a closed set of literals
    Enum(Vec<String>),
}

/// One required property of the response object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

/// Declared shape of a structured response: a JSON object whose fields are
/// all required, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSchema {
    fields: Vec<SchemaField>,
}

impl ResponseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free-text field
    pub fn string(mut self, name: &str) -> Self {
        self.fields.push(SchemaField {
            name: name.to_string(),
            kind: FieldKind::String,
        });
        self
    }

    /// Add a field restricted to `values`
    pub fn enumeration(mut self, name: &str, values: &[&str]) -> Self {
        self.fields.push(SchemaField {
            name: name.to_string(),
            kind: FieldKind::Enum(values.iter().map(|v| v.to_string()).collect()),
        });
        self
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// OpenAPI-subset schema used by Gemini's `responseSchema`
    pub fn to_gemini(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let property = match &field.kind {
                FieldKind::String => json!({ "type": "STRING" }),
                FieldKind::Enum(values) => json!({ "type": "STRING", "enum": values }),
            };
            properties.insert(field.name.clone(), property);
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.field_names(),
            "propertyOrdering": self.field_names(),
        })
    }

    /// JSON Schema used by Ollama's `format`
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let property = match &field.kind {
                FieldKind::String => json!({ "type": "string" }),
                FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
            };
            properties.insert(field.name.clone(), property);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.field_names(),
            "additionalProperties": false,
        })
    }

    /// Human-readable shape for embedding in a prompt, e.g.
    ///
    /// ```text
    /// {
    ///   "topCategory": "string",
    ///   "spendingTrend": "increasing" | "decreasing" | "stable"
    /// }
    /// ```
    pub fn describe(&self) -> String {
        let lines = self
            .fields
            .iter()
            .map(|field| {
                let shape = match &field.kind {
                    FieldKind::String => "\"string\"".to_string(),
                    FieldKind::Enum(values) => values
                        .iter()
                        .map(|v| format!("\"{}\"", v))
                        .collect::<Vec<_>>()
                        .join(" | "),
                };
                format!("  \"{}\": {}", field.name, shape)
            })
            .collect::<Vec<_>>()
            .join(",\n");

        format!("{{\n{}\n}}", lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResponseSchema {
        ResponseSchema::new()
            .string("summary")
            .enumeration("trend", &["up", "down"])
    }

    #[test]
    fn test_gemini_schema_shape() {
        let schema = sample().to_gemini();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["summary"]["type"], "STRING");
        assert_eq!(schema["properties"]["trend"]["enum"], json!(["up", "down"]));
        assert_eq!(schema["required"], json!(["summary", "trend"]));
        assert_eq!(schema["propertyOrdering"], json!(["summary", "trend"]));
    }

    #[test]
    fn test_json_schema_shape() {
        let schema = sample().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["trend"]["type"], "string");
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_describe_lists_every_field() {
        let text = sample().describe();
        assert_eq!(
            text,
            "{\n  \"summary\": \"string\",\n  \"trend\": \"up\" | \"down\"\n}"
        );
    }
}
