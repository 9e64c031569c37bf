// ABOUTME: Declarative schema validator that checks candidate JSON records field by field
// ABOUTME: Produces a normalized record or the full list of field violations, never both
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Record Validation
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s. Validating a candidate record
//! walks every declared field, collects *all* violations (not just the first), and on
//! success returns a normalized record:
//!
//! - only declared fields are kept, unknown keys are dropped
//! - `null` counts as missing; defaults fill missing optional fields
//! - numeric strings are coerced to numbers (form submissions arrive as text)
//! - timestamps (epoch ms, RFC 3339, or `YYYY-MM-DD`) become epoch milliseconds
//!
//! Nested record sequences are validated element by element and violations carry an
//! indexed path such as `exercises[1].reps`.
//!
//! ```rust
//! use flowstate_core::validation::{FieldSpec, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new("Set")
//!     .field(FieldSpec::integer("reps").min(1).message("At least 1 rep is required."));
//!
//! let record = schema.validate(&json!({ "reps": "8" })).unwrap();
//! assert_eq!(record["reps"], 8);
//!
//! let errors = schema.validate(&json!({ "reps": 0 })).unwrap_err();
//! assert_eq!(errors.message_for("reps"), Some("At least 1 rep is required."));
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Path of the offending field (`name`, `exercises[0].sets`)
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

/// Every violation found in a candidate record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Build an error list holding a single violation
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All violations in declaration order
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Consume the list, yielding the violations
    #[must_use]
    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// Whether no violation was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether the given field path has a violation
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// First message recorded for the given field path
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// The accepted type and constraints of one field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// String with a minimum character count
    Text {
        /// Minimum number of characters
        min_len: usize,
    },
    /// Whole number with an optional lower bound
    Integer {
        /// Inclusive lower bound
        min: Option<i64>,
    },
    /// Finite number with an optional lower bound
    Number {
        /// Inclusive lower bound
        min: Option<f64>,
    },
    /// Point in time, normalized to epoch milliseconds
    Timestamp,
    /// String restricted to a closed set of options
    Choice {
        /// Accepted values
        options: &'static [&'static str],
    },
    /// Sequence of strings
    TextList {
        /// Minimum number of items
        min_items: usize,
        /// Drop empty strings (unchecked form boxes) before counting
        skip_blank: bool,
    },
    /// Sequence of nested records
    Records {
        /// Shape of each element
        schema: Box<Schema>,
        /// Minimum number of elements
        min_items: usize,
    },
}

impl FieldKind {
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } | Self::Choice { .. } => "string",
            Self::Integer { .. } | Self::Timestamp => "integer",
            Self::Number { .. } => "number",
            Self::TextList { .. } | Self::Records { .. } => "array",
        }
    }
}

/// Declaration of one field: name, kind, presence rules and messages
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    message: Option<&'static str>,
    description: Option<&'static str>,
}

impl FieldSpec {
    const fn with_kind(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            message: None,
            description: None,
        }
    }

    /// Required string field
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Text { min_len: 0 })
    }

    /// Required whole-number field
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Integer { min: None })
    }

    /// Required numeric field
    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Number { min: None })
    }

    /// Required timestamp field
    #[must_use]
    pub const fn timestamp(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Timestamp)
    }

    /// Required closed-set string field
    #[must_use]
    pub const fn choice(name: &'static str, options: &'static [&'static str]) -> Self {
        Self::with_kind(name, FieldKind::Choice { options })
    }

    /// Required list-of-strings field
    #[must_use]
    pub const fn text_list(name: &'static str) -> Self {
        Self::with_kind(
            name,
            FieldKind::TextList {
                min_items: 0,
                skip_blank: false,
            },
        )
    }

    /// Required list of nested records
    #[must_use]
    pub fn records(name: &'static str, schema: Schema) -> Self {
        Self::with_kind(
            name,
            FieldKind::Records {
                schema: Box::new(schema),
                min_items: 0,
            },
        )
    }

    /// Minimum character count (text fields)
    #[must_use]
    pub fn min_len(mut self, len: usize) -> Self {
        if let FieldKind::Text { min_len } = &mut self.kind {
            *min_len = len;
        }
        self
    }

    /// Inclusive lower bound (integer fields)
    #[must_use]
    pub fn min(mut self, bound: i64) -> Self {
        if let FieldKind::Integer { min } = &mut self.kind {
            *min = Some(bound);
        }
        self
    }

    /// Inclusive lower bound (number fields)
    #[must_use]
    pub fn min_value(mut self, bound: f64) -> Self {
        if let FieldKind::Number { min } = &mut self.kind {
            *min = Some(bound);
        }
        self
    }

    /// Minimum number of items (list fields)
    #[must_use]
    pub fn min_items(mut self, count: usize) -> Self {
        match &mut self.kind {
            FieldKind::TextList { min_items, .. } | FieldKind::Records { min_items, .. } => {
                *min_items = count;
            }
            _ => {}
        }
        self
    }

    /// Drop empty strings from a list field instead of keeping them
    #[must_use]
    pub fn skip_blank_items(mut self) -> Self {
        if let FieldKind::TextList { skip_blank, .. } = &mut self.kind {
            *skip_blank = true;
        }
        self
    }

    /// Mark the field as optional
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used when the field is missing (implies optional)
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    /// Message reported when the field is missing or breaks its constraint
    #[must_use]
    pub const fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    /// Description included when the shape is shown to a language model
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Field name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field kind
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field must be present
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    fn constraint_message(&self, fallback: impl FnOnce() -> String) -> String {
        self.message.map_or_else(fallback, ToOwned::to_owned)
    }

    fn missing_message(&self) -> String {
        self.constraint_message(|| format!("{} is required", self.name))
    }

    fn check(&self, value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<Value> {
        let name = self.name;
        match &self.kind {
            FieldKind::Text { min_len } => {
                let Some(text) = value.as_str() else {
                    errors.push(path, format!("{name} must be a string"));
                    return None;
                };
                if text.chars().count() < *min_len {
                    errors.push(
                        path,
                        self.constraint_message(|| {
                            if *min_len == 1 {
                                format!("{name} must not be empty")
                            } else {
                                format!("{name} must be at least {min_len} characters")
                            }
                        }),
                    );
                    return None;
                }
                Some(Value::String(text.to_owned()))
            }
            FieldKind::Integer { min } => {
                let Some(number) = coerce_integer(value) else {
                    errors.push(path, format!("{name} must be a whole number"));
                    return None;
                };
                if let Some(bound) = min.filter(|bound| number < *bound) {
                    errors.push(
                        path,
                        self.constraint_message(|| format!("{name} must be at least {bound}")),
                    );
                    return None;
                }
                Some(Value::from(number))
            }
            FieldKind::Number { min } => {
                let Some(number) = coerce_number(value) else {
                    errors.push(path, format!("{name} must be a number"));
                    return None;
                };
                if let Some(bound) = min.filter(|bound| number < *bound) {
                    errors.push(
                        path,
                        self.constraint_message(|| format!("{name} must be at least {bound}")),
                    );
                    return None;
                }
                // Keep integral JSON numbers as they arrived
                match value {
                    Value::Number(original) => Some(Value::Number(original.clone())),
                    _ => Some(Value::from(number)),
                }
            }
            FieldKind::Timestamp => {
                let Some(millis) = coerce_timestamp(value) else {
                    errors.push(path, format!("{name} must be a valid date"));
                    return None;
                };
                Some(Value::from(millis))
            }
            FieldKind::Choice { options } => match value.as_str() {
                Some(choice) if options.contains(&choice) => Some(Value::String(choice.to_owned())),
                _ => {
                    errors.push(
                        path,
                        self.constraint_message(|| {
                            format!("{name} must be one of: {}", options.join(", "))
                        }),
                    );
                    None
                }
            },
            FieldKind::TextList {
                min_items,
                skip_blank,
            } => {
                let Some(items) = value.as_array() else {
                    errors.push(path, format!("{name} must be a list"));
                    return None;
                };
                let mut kept = Vec::with_capacity(items.len());
                let mut well_typed = true;
                for (index, item) in items.iter().enumerate() {
                    match item.as_str() {
                        Some("") if *skip_blank => {}
                        Some(text) => kept.push(Value::String(text.to_owned())),
                        None => {
                            well_typed = false;
                            errors.push(format!("{path}[{index}]"), format!("{name} items must be strings"));
                        }
                    }
                }
                if !well_typed {
                    return None;
                }
                if kept.len() < *min_items {
                    errors.push(
                        path,
                        self.constraint_message(|| {
                            format!("{name} must contain at least {min_items} item(s)")
                        }),
                    );
                    return None;
                }
                Some(Value::Array(kept))
            }
            FieldKind::Records { schema, min_items } => {
                let Some(items) = value.as_array() else {
                    errors.push(path, format!("{name} must be a list"));
                    return None;
                };
                let before = errors.len();
                let records: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        Value::Object(schema.validate_at(item, &format!("{path}[{index}]"), errors))
                    })
                    .collect();
                if records.len() < *min_items {
                    errors.push(
                        path,
                        self.constraint_message(|| {
                            format!("{name} must contain at least {min_items} item(s)")
                        }),
                    );
                }
                (errors.len() == before).then_some(Value::Array(records))
            }
        }
    }

    fn description_json(&self) -> Value {
        let mut described = match &self.kind {
            FieldKind::TextList { .. } => json!({ "type": "array", "items": { "type": "string" } }),
            FieldKind::Records { schema, .. } => json!({ "type": "array", "items": schema.describe() }),
            FieldKind::Choice { options } => json!({ "type": "string", "enum": options }),
            kind => json!({ "type": kind.type_name() }),
        };
        if let (Some(description), Some(object)) = (self.description, described.as_object_mut()) {
            object.insert("description".to_owned(), Value::String(description.to_owned()));
        }
        described
    }
}

/// Declared shape of a record
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create an empty schema
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Append a field declaration
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Schema name used in messages
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields in order
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate a candidate record and return its normalized form
    ///
    /// # Errors
    ///
    /// Returns every violation found when the candidate does not match the schema.
    pub fn validate(&self, candidate: &Value) -> Result<Value, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let normalized = self.validate_at(candidate, "", &mut errors);
        if errors.is_empty() {
            Ok(Value::Object(normalized))
        } else {
            Err(errors)
        }
    }

    /// Validate a candidate record and deserialize the normalized form
    ///
    /// # Errors
    ///
    /// Returns the violations found, or a single violation naming the schema when
    /// the normalized record does not fit the target type.
    pub fn validate_into<T: DeserializeOwned>(&self, candidate: &Value) -> Result<T, ValidationErrors> {
        let normalized = self.validate(candidate)?;
        serde_json::from_value(normalized).map_err(|e| {
            ValidationErrors::single(self.name, format!("{} could not be read: {e}", self.name))
        })
    }

    fn validate_at(&self, candidate: &Value, prefix: &str, errors: &mut ValidationErrors) -> Map<String, Value> {
        let mut normalized = Map::new();
        let Some(object) = candidate.as_object() else {
            let field = if prefix.is_empty() { self.name } else { prefix };
            errors.push(field, format!("{} must be an object", self.name));
            return normalized;
        };

        for spec in &self.fields {
            let path = if prefix.is_empty() {
                spec.name.to_owned()
            } else {
                format!("{prefix}.{}", spec.name)
            };

            match object.get(spec.name).filter(|value| !value.is_null()) {
                Some(value) => {
                    if let Some(checked) = spec.check(value, &path, errors) {
                        normalized.insert(spec.name.to_owned(), checked);
                    }
                }
                None => {
                    if let Some(default) = &spec.default {
                        normalized.insert(spec.name.to_owned(), default.clone());
                    } else if spec.required {
                        errors.push(path, spec.missing_message());
                    }
                }
            }
        }

        normalized
    }

    /// JSON description of the shape, suitable for showing to a language model
    #[must_use]
    pub fn describe(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|spec| (spec.name.to_owned(), spec.description_json()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name)
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(number: f64) -> Option<i64> {
    let in_range = number >= i64::MIN as f64 && number <= i64::MAX as f64;
    (number.is_finite() && number.fract() == 0.0 && in_range).then_some(number as i64)
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn coerce_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => coerce_integer(value),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
                return Some(parsed.timestamp_millis());
            }
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                return date
                    .and_hms_opt(0, 0, 0)
                    .map(|midnight| midnight.and_utc().timestamp_millis());
            }
            trimmed.parse::<i64>().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn set_schema() -> Schema {
        Schema::new("Set")
            .field(FieldSpec::text("name").min_len(2))
            .field(FieldSpec::integer("reps").min(1).message("At least 1 rep is required."))
            .field(FieldSpec::number("weight").min_value(0.0))
    }

    #[test]
    fn test_valid_record_is_normalized() {
        let record = set_schema()
            .validate(&json!({ "name": "Squat", "reps": "5", "weight": 100, "extra": true }))
            .unwrap();

        assert_eq!(record, json!({ "name": "Squat", "reps": 5, "weight": 100 }));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = set_schema()
            .validate(&json!({ "name": "S", "reps": 0, "weight": -1 }))
            .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.message_for("name"), Some("name must be at least 2 characters"));
        assert_eq!(errors.message_for("reps"), Some("At least 1 rep is required."));
        assert_eq!(errors.message_for("weight"), Some("weight must be at least 0"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let errors = set_schema()
            .validate(&json!({ "name": null, "reps": 3, "weight": 0 }))
            .unwrap_err();

        assert_eq!(errors.message_for("name"), Some("name is required"));
    }

    #[test]
    fn test_defaults_fill_missing_optional_fields() {
        let schema = Schema::new("Session").field(FieldSpec::integer("duration").min(0).default_value(json!(0)));

        assert_eq!(schema.validate(&json!({})).unwrap(), json!({ "duration": 0 }));
    }

    #[test]
    fn test_non_integral_numbers_are_rejected_for_integers() {
        let errors = set_schema()
            .validate(&json!({ "name": "Row", "reps": 2.5, "weight": 40 }))
            .unwrap_err();

        assert_eq!(errors.message_for("reps"), Some("reps must be a whole number"));
    }

    #[test]
    fn test_nested_records_report_indexed_paths() {
        let schema = Schema::new("Workout")
            .field(FieldSpec::records("sets", set_schema()).min_items(1).message("Add at least one set."));

        let errors = schema
            .validate(&json!({ "sets": [
                { "name": "Squat", "reps": 5, "weight": 100 },
                { "name": "Bench", "reps": 0, "weight": 60 }
            ]}))
            .unwrap_err();
        assert_eq!(errors.message_for("sets[1].reps"), Some("At least 1 rep is required."));

        let errors = schema.validate(&json!({ "sets": [] })).unwrap_err();
        assert_eq!(errors.message_for("sets"), Some("Add at least one set."));
    }

    #[test]
    fn test_timestamps_are_normalized_to_epoch_millis() {
        let schema = Schema::new("Event").field(FieldSpec::timestamp("date"));

        let from_rfc3339 = schema.validate(&json!({ "date": "2025-03-01T10:00:00Z" })).unwrap();
        assert_eq!(from_rfc3339["date"], 1_740_823_200_000_i64);

        let from_day = schema.validate(&json!({ "date": "2025-03-01" })).unwrap();
        assert_eq!(from_day["date"], 1_740_787_200_000_i64);

        let from_millis = schema.validate(&json!({ "date": 1_740_787_200_000_i64 })).unwrap();
        assert_eq!(from_millis["date"], 1_740_787_200_000_i64);

        assert!(schema.validate(&json!({ "date": "next tuesday" })).is_err());
    }

    #[test]
    fn test_text_list_skips_blank_items_when_asked() {
        let schema = Schema::new("Form").field(
            FieldSpec::text_list("equipment")
                .min_items(1)
                .skip_blank_items(),
        );

        let record = schema.validate(&json!({ "equipment": ["", "dumbbells"] })).unwrap();
        assert_eq!(record["equipment"], json!(["dumbbells"]));

        assert!(schema.validate(&json!({ "equipment": [""] })).is_err());
    }

    #[test]
    fn test_text_list_keeps_blank_items_by_default() {
        let schema = Schema::new("Result").field(FieldSpec::text_list("items"));

        let record = schema.validate(&json!({ "items": ["Bench Press", ""] })).unwrap();
        assert_eq!(record["items"], json!(["Bench Press", ""]));
    }

    #[test]
    fn test_choice_rejects_unknown_values() {
        let schema = Schema::new("Form").field(FieldSpec::choice("level", &["beginner", "advanced"]));

        let errors = schema.validate(&json!({ "level": "expert" })).unwrap_err();
        assert_eq!(errors.message_for("level"), Some("level must be one of: beginner, advanced"));
    }

    #[test]
    fn test_non_object_candidate() {
        let errors = set_schema().validate(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(errors.message_for("Set"), Some("Set must be an object"));
    }

    #[test]
    fn test_describe_lists_required_fields() {
        let description = set_schema().describe();
        assert_eq!(description["properties"]["reps"]["type"], "integer");
        assert_eq!(description["required"], json!(["name", "reps", "weight"]));
    }
}
