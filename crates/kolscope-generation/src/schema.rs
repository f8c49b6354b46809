//! Typed output schema.
//!
//! One [`OutputSchema`] value renders the JSON Schema attached to a
//! generation request and validates the response against the same rules,
//! so the two can never drift apart.

use serde_json::{json, Map, Value};

/// Kind of value a field holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Boolean,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Array {
        items: Box<FieldKind>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object(ObjectSchema),
}

impl FieldKind {
    #[must_use]
    pub fn integer(min: Option<i64>, max: Option<i64>) -> Self {
        Self::Integer { min, max }
    }

    #[must_use]
    pub fn array_of(items: FieldKind, min_items: Option<usize>, max_items: Option<usize>) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items,
            max_items,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer { .. } => "integer",
            Self::Array { .. } => "array",
            Self::Object(_) => "object",
        }
    }
}

/// A named, always-required key.
///
/// `nullable` fields must still be present; they may carry `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            nullable: false,
        });
        self
    }

    #[must_use]
    pub fn nullable_field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            nullable: true,
        });
        self
    }
}

/// Root schema for one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub root: ObjectSchema,
}

impl OutputSchema {
    /// Render as a strict JSON Schema document.
    ///
    /// Every field is listed in `required` and additional properties are
    /// disallowed; nullable fields use a `[type, "null"]` union.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        render_object(&self.root)
    }

    /// Check `value` against this schema.
    ///
    /// # Errors
    ///
    /// Returns every violation found, each formatted as `path: problem`.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<String>> {
        let mut violations = Vec::new();
        validate_object(&self.root, value, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_object(schema: &ObjectSchema) -> Value {
    let mut properties = Map::new();
    for field in &schema.fields {
        let mut rendered = render_kind(&field.kind);
        if field.nullable {
            rendered["type"] = json!([field.kind.type_name(), "null"]);
        }
        properties.insert(field.name.to_string(), rendered);
    }
    let required: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn render_kind(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String | FieldKind::Boolean => json!({ "type": kind.type_name() }),
        FieldKind::Integer { min, max } => {
            let mut out = json!({ "type": "integer" });
            if let Some(min) = min {
                out["minimum"] = json!(min);
            }
            if let Some(max) = max {
                out["maximum"] = json!(max);
            }
            out
        }
        FieldKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut out = json!({ "type": "array", "items": render_kind(items) });
            if let Some(min) = min_items {
                out["minItems"] = json!(min);
            }
            if let Some(max) = max_items {
                out["maxItems"] = json!(max);
            }
            out
        }
        FieldKind::Object(obj) => render_object(obj),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

fn validate_object(schema: &ObjectSchema, value: &Value, path: &str, out: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        out.push(format!(
            "{}: expected object, got {}",
            display_path(path),
            json_type(value)
        ));
        return;
    };

    for field in &schema.fields {
        let field_path = join_path(path, field.name);
        match obj.get(field.name) {
            None => out.push(format!("{field_path}: required key missing")),
            Some(Value::Null) if field.nullable => {}
            Some(Value::Null) => out.push(format!("{field_path}: must not be null")),
            Some(v) => validate_kind(&field.kind, v, &field_path, out),
        }
    }

    for key in obj.keys() {
        if !schema.fields.iter().any(|f| f.name == key) {
            out.push(format!("{}: unexpected key", join_path(path, key)));
        }
    }
}

fn validate_kind(kind: &FieldKind, value: &Value, path: &str, out: &mut Vec<String>) {
    match kind {
        FieldKind::String => {
            if !value.is_string() {
                out.push(format!("{path}: expected string, got {}", json_type(value)));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                out.push(format!("{path}: expected boolean, got {}", json_type(value)));
            }
        }
        FieldKind::Integer { min, max } => {
            // u64 covers integers above i64::MAX; they are still integers.
            let Some(n) = value
                .as_i64()
                .map(i128::from)
                .or_else(|| value.as_u64().map(i128::from))
            else {
                out.push(format!("{path}: expected integer, got {}", json_type(value)));
                return;
            };
            let below = min.is_some_and(|m| n < i128::from(m));
            let above = max.is_some_and(|m| n > i128::from(m));
            if below || above {
                out.push(format!("{path}: {}, got {n}", describe_bounds(*min, *max)));
            }
        }
        FieldKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let Some(arr) = value.as_array() else {
                out.push(format!("{path}: expected array, got {}", json_type(value)));
                return;
            };
            let len = arr.len();
            if min_items.is_some_and(|m| len < m) || max_items.is_some_and(|m| len > m) {
                out.push(format!(
                    "{path}: {}, got {len}",
                    describe_length(*min_items, *max_items)
                ));
            }
            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                if item.is_null() {
                    out.push(format!("{item_path}: must not be null"));
                } else {
                    validate_kind(items, item, &item_path, out);
                }
            }
        }
        FieldKind::Object(obj) => validate_object(obj, value, path, out),
    }
}

fn describe_bounds(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("must be between {lo} and {hi}"),
        (Some(lo), None) => format!("must be at least {lo}"),
        (None, Some(hi)) => format!("must be at most {hi}"),
        (None, None) => "out of range".to_string(),
    }
}

fn describe_length(min: Option<usize>, max: Option<usize>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("must contain between {lo} and {hi} items"),
        (Some(lo), None) => format!("must contain at least {lo} items"),
        (None, Some(hi)) => format!("must contain at most {hi} items"),
        (None, None) => "has an invalid length".to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
