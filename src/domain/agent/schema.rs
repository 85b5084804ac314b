//! Declarative output schemas for structured agent responses.
//!
//! Each agent kind describes its expected JSON shape as a table of
//! [`FieldRule`]s. Validation walks the whole table and reports every
//! violated field, so callers see the complete picture instead of the
//! first failure only.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// What a field must look like.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A string; `non_empty` rejects blank strings.
    String { non_empty: bool },
    /// An integer within an inclusive range.
    Integer { min: i64, max: i64 },
    /// A string drawn from a fixed set.
    Enum(&'static [&'static str]),
    /// An array of strings with a minimum length.
    StringList { min_items: usize },
    /// Any JSON object.
    Object,
    /// An array of objects, each checked against nested rules.
    ObjectList {
        min_items: usize,
        fields: Vec<FieldRule>,
    },
}

impl FieldKind {
    pub fn text() -> Self {
        Self::String { non_empty: true }
    }

    pub fn any_text() -> Self {
        Self::String { non_empty: false }
    }

    pub fn integer(min: i64, max: i64) -> Self {
        Self::Integer { min, max }
    }

    pub fn string_list(min_items: usize) -> Self {
        Self::StringList { min_items }
    }

    fn expected(&self) -> &'static str {
        match self {
            Self::String { .. } | Self::Enum(_) => "string",
            Self::Integer { .. } => "integer",
            Self::StringList { .. } | Self::ObjectList { .. } => "array",
            Self::Object => "object",
        }
    }
}

/// A single field constraint, addressed by a dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub path: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// A violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Field {field} must not be empty")]
    EmptyString { field: String },

    #[error("Array too short for field {field}: minimum {min}, got {actual}")]
    ArrayTooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Value out of range for field {field}: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: i64,
        max: i64,
    },

    #[error("Invalid value for field {field}: {value} is not one of {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Could not decode output: {message}")]
    Undecodable { message: String },
}

impl SchemaViolation {
    /// The dotted path of the offending field, if the violation has one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { field }
            | Self::InvalidType { field, .. }
            | Self::EmptyString { field }
            | Self::ArrayTooShort { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotAllowed { field, .. } => Some(field),
            Self::Undecodable { .. } => None,
        }
    }

    /// Convert to client-safe error message.
    ///
    /// Omits the offending value so model output is not echoed back.
    pub fn to_client_message(&self) -> String {
        match self {
            Self::MissingRequired { field } => format!("Missing required field: {}", field),
            Self::InvalidType {
                field, expected, ..
            } => format!("Invalid type for field '{}': expected {}", field, expected),
            Self::EmptyString { field } => format!("Field '{}' must not be empty", field),
            Self::ArrayTooShort { field, min, .. } => {
                format!("Field '{}' requires at least {} items", field, min)
            }
            Self::OutOfRange { field, min, max, .. } => {
                format!("Field '{}' must be between {} and {}", field, min, max)
            }
            Self::NotAllowed { field, allowed, .. } => {
                format!("Field '{}' must be one of: {}", field, allowed.join(", "))
            }
            Self::Undecodable { .. } => "Output could not be decoded".to_string(),
        }
    }
}

/// A named, declarative description of a structured output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    name: &'static str,
    rules: Vec<FieldRule>,
}

impl OutputSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Adds a required field. Parents must be declared before children.
    pub fn require(mut self, path: &'static str, kind: FieldKind) -> Self {
        self.rules.push(FieldRule {
            path,
            kind,
            required: true,
        });
        self
    }

    /// Adds an optional field; absent or `null` values pass.
    pub fn optional(mut self, path: &'static str, kind: FieldKind) -> Self {
        self.rules.push(FieldRule {
            path,
            kind,
            required: false,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validates a candidate, collecting every violation.
    pub fn validate(&self, candidate: &Value) -> Result<(), Vec<SchemaViolation>> {
        let Some(root) = candidate.as_object() else {
            return Err(vec![SchemaViolation::InvalidType {
                field: "$".to_string(),
                expected: "object".to_string(),
                actual: type_name(candidate).to_string(),
            }]);
        };

        let mut violations = Vec::new();
        check_rules(root, &self.rules, "", &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Validates a candidate and decodes it into its typed form.
    ///
    /// Decoding only runs once the schema passes, so a typed value is never
    /// produced from a partially valid candidate.
    pub fn decode<T: DeserializeOwned>(&self, candidate: Value) -> Result<T, Vec<SchemaViolation>> {
        self.validate(&candidate)?;
        serde_json::from_value(candidate).map_err(|e| {
            vec![SchemaViolation::Undecodable {
                message: e.to_string(),
            }]
        })
    }
}

fn check_rules(
    root: &Map<String, Value>,
    rules: &[FieldRule],
    prefix: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    // Paths whose subtree is already reported; children are skipped.
    let mut failed: Vec<String> = Vec::new();

    for rule in rules {
        let full_path = format!("{}{}", prefix, rule.path);
        if failed
            .iter()
            .any(|parent| full_path.starts_with(&format!("{}.", parent)))
        {
            continue;
        }

        let before = violations.len();
        match lookup(root, rule.path) {
            Lookup::Found(value) => check_value(value, &rule.kind, &full_path, violations),
            Lookup::Missing => {
                if rule.required {
                    violations.push(SchemaViolation::MissingRequired {
                        field: full_path.clone(),
                    });
                }
            }
            Lookup::ParentNotObject { parent, value } => {
                violations.push(SchemaViolation::InvalidType {
                    field: format!("{}{}", prefix, parent),
                    expected: "object".to_string(),
                    actual: type_name(value).to_string(),
                });
            }
        }

        if violations.len() > before || lookup(root, rule.path).is_missing() {
            failed.push(full_path);
        }
    }
}

enum Lookup<'a> {
    Found(&'a Value),
    Missing,
    ParentNotObject { parent: String, value: &'a Value },
}

impl Lookup<'_> {
    fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Lookup<'a> {
    let mut current = root;
    let mut walked = String::new();
    let segments: Vec<&str> = path.split('.').collect();

    for (i, segment) in segments.iter().enumerate() {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        let value = match current.get(*segment) {
            None | Some(Value::Null) => return Lookup::Missing,
            Some(value) => value,
        };

        if i + 1 == segments.len() {
            return Lookup::Found(value);
        }

        match value.as_object() {
            Some(obj) => current = obj,
            None => {
                return Lookup::ParentNotObject {
                    parent: walked,
                    value,
                }
            }
        }
    }

    Lookup::Missing
}

fn check_value(value: &Value, kind: &FieldKind, path: &str, violations: &mut Vec<SchemaViolation>) {
    let invalid_type = |violations: &mut Vec<SchemaViolation>| {
        violations.push(SchemaViolation::InvalidType {
            field: path.to_string(),
            expected: kind.expected().to_string(),
            actual: type_name(value).to_string(),
        });
    };

    match kind {
        FieldKind::String { non_empty } => match value.as_str() {
            Some(s) if *non_empty && s.trim().is_empty() => {
                violations.push(SchemaViolation::EmptyString {
                    field: path.to_string(),
                })
            }
            Some(_) => {}
            None => invalid_type(violations),
        },
        FieldKind::Integer { min, max } => match value.as_i64() {
            Some(n) if n < *min || n > *max => violations.push(SchemaViolation::OutOfRange {
                field: path.to_string(),
                value: n.to_string(),
                min: *min,
                max: *max,
            }),
            Some(_) => {}
            // Large unsigned values are integers too, just far out of range.
            None if value.is_u64() => violations.push(SchemaViolation::OutOfRange {
                field: path.to_string(),
                value: value.to_string(),
                min: *min,
                max: *max,
            }),
            None => invalid_type(violations),
        },
        FieldKind::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => violations.push(SchemaViolation::NotAllowed {
                field: path.to_string(),
                value: s.to_string(),
                allowed: allowed.iter().map(|a| a.to_string()).collect(),
            }),
            None => invalid_type(violations),
        },
        FieldKind::StringList { min_items } => match value.as_array() {
            Some(items) => {
                if items.len() < *min_items {
                    violations.push(SchemaViolation::ArrayTooShort {
                        field: path.to_string(),
                        min: *min_items,
                        actual: items.len(),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        violations.push(SchemaViolation::InvalidType {
                            field: format!("{}[{}]", path, i),
                            expected: "string".to_string(),
                            actual: type_name(item).to_string(),
                        });
                    }
                }
            }
            None => invalid_type(violations),
        },
        FieldKind::Object => {
            if !value.is_object() {
                invalid_type(violations);
            }
        }
        FieldKind::ObjectList { min_items, fields } => match value.as_array() {
            Some(items) => {
                if items.len() < *min_items {
                    violations.push(SchemaViolation::ArrayTooShort {
                        field: path.to_string(),
                        min: *min_items,
                        actual: items.len(),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    match item.as_object() {
                        Some(obj) => {
                            check_rules(obj, fields, &format!("{}.", item_path), violations)
                        }
                        None => violations.push(SchemaViolation::InvalidType {
                            field: item_path,
                            expected: "object".to_string(),
                            actual: type_name(item).to_string(),
                        }),
                    }
                }
            }
            None => invalid_type(violations),
        },
    }
}

fn type_name(value: &Value) -> &'static str {
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
