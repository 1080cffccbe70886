//! Recursive structural diff over parsed JSON-RPC response bodies.
//!
//! The walk is deterministic and total: every combination of shapes has a
//! defined outcome, so structural heterogeneity is never an error condition.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of divergence between the two endpoints at one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    /// Same type, different value
    ValueChanged,

    /// Key present in endpoint 1 only
    MissingInEndpoint2,

    /// Key present in endpoint 2 only
    AddedInEndpoint2,

    /// Different fundamental JSON types
    TypeMismatch,

    /// Sequences of unequal length
    LengthMismatch,

    /// Endpoint 1 returned an error while endpoint 2 succeeded
    ErrorVsSuccess,

    /// Endpoint 1 succeeded while endpoint 2 returned an error
    SuccessVsError,

    /// Both endpoints errored, with different messages
    ErrorMessageDiffers,
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ValueChanged => "value_changed",
            Self::MissingInEndpoint2 => "missing_in_endpoint2",
            Self::AddedInEndpoint2 => "added_in_endpoint2",
            Self::TypeMismatch => "type_mismatch",
            Self::LengthMismatch => "length_mismatch",
            Self::ErrorVsSuccess => "error_vs_success",
            Self::SuccessVsError => "success_vs_error",
            Self::ErrorMessageDiffers => "error_message_differs",
        };
        f.write_str(name)
    }
}

/// One detected difference
///
/// `path` locates the divergence within the response body: `.` joins
/// mapping keys, `[i]` indexes sequences. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub path: String,
    pub diff_type: DiffType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value1: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Difference {
    pub fn new(path: impl Into<String>, diff_type: DiffType) -> Self {
        Self {
            path: path.into(),
            diff_type,
            value1: None,
            value2: None,
            extra: Map::new(),
        }
    }

    pub fn with_values(mut self, value1: Option<Value>, value2: Option<Value>) -> Self {
        self.value1 = value1;
        self.value2 = value2;
        self
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

/// Extract a human-readable message from a response's `"error"` value
///
/// A string error is returned as-is; an object error yields its `"message"`
/// field if present, else its compact JSON text; anything else (including a
/// missing `"error"` key) yields the literal `"Unknown error"`.
pub fn error_message(response: &Value) -> String {
    match response.get("error") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => match obj.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => Value::Object(obj.clone()).to_string(),
        },
        _ => "Unknown error".to_string(),
    }
}

/// Pure recursive comparison of two parsed response bodies
#[derive(Debug, Default, Clone, Copy)]
pub struct DiffComputer;

impl DiffComputer {
    pub fn new() -> Self {
        Self
    }

    /// Compare two response bodies into an ordered list of differences
    ///
    /// Equal structures yield an empty list. The walk is depth-first over
    /// endpoint 1's keys first, then endpoint-2-only keys.
    pub fn compute(&self, response1: &Value, response2: &Value) -> Vec<Difference> {
        let mut diffs = Vec::new();
        self.compare("", response1, response2, &mut diffs);
        diffs
    }

    fn compare(&self, path: &str, value1: &Value, value2: &Value, diffs: &mut Vec<Difference>) {
        // Error handling short-circuits structural comparison at any
        // mapping node where at least one side carries an "error" key.
        if let (Value::Object(obj1), Value::Object(obj2)) = (value1, value2) {
            let has_error1 = obj1.contains_key("error");
            let has_error2 = obj2.contains_key("error");

            match (has_error1, has_error2) {
                (true, false) => {
                    diffs.push(
                        Difference::new(error_path(path, "(response)"), DiffType::ErrorVsSuccess)
                            .with_values(
                                Some(Value::String(error_message(value1))),
                                Some(Value::String("Success response".to_string())),
                            ),
                    );
                    return;
                }
                (false, true) => {
                    diffs.push(
                        Difference::new(error_path(path, "(response)"), DiffType::SuccessVsError)
                            .with_values(
                                Some(Value::String("Success response".to_string())),
                                Some(Value::String(error_message(value2))),
                            ),
                    );
                    return;
                }
                (true, true) => {
                    let message1 = error_message(value1);
                    let message2 = error_message(value2);
                    if message1 != message2 {
                        diffs.push(
                            Difference::new(
                                error_path(path, "(error)"),
                                DiffType::ErrorMessageDiffers,
                            )
                            .with_values(
                                Some(Value::String(message1)),
                                Some(Value::String(message2)),
                            ),
                        );
                    }
                    return;
                }
                (false, false) => {}
            }
        }

        match (value1, value2) {
            (Value::Object(obj1), Value::Object(obj2)) => {
                for (key, child1) in obj1 {
                    let child_path = join_key(path, key);
                    match obj2.get(key) {
                        Some(child2) => self.compare(&child_path, child1, child2, diffs),
                        None => diffs.push(
                            Difference::new(child_path, DiffType::MissingInEndpoint2)
                                .with_values(Some(child1.clone()), None),
                        ),
                    }
                }
                for (key, child2) in obj2 {
                    if !obj1.contains_key(key) {
                        diffs.push(
                            Difference::new(join_key(path, key), DiffType::AddedInEndpoint2)
                                .with_values(None, Some(child2.clone())),
                        );
                    }
                }
            }
            (Value::Array(arr1), Value::Array(arr2)) => {
                if arr1.len() != arr2.len() {
                    // A length mismatch suppresses element-wise diffs:
                    // index alignment is meaningless past this point.
                    diffs.push(
                        Difference::new(path, DiffType::LengthMismatch)
                            .with_extra("length1", arr1.len().into())
                            .with_extra("length2", arr2.len().into()),
                    );
                } else {
                    for (i, (child1, child2)) in arr1.iter().zip(arr2).enumerate() {
                        self.compare(&format!("{}[{}]", path, i), child1, child2, diffs);
                    }
                }
            }
            _ => {
                if json_type_name(value1) != json_type_name(value2) {
                    diffs.push(
                        Difference::new(path, DiffType::TypeMismatch)
                            .with_values(Some(value1.clone()), Some(value2.clone()))
                            .with_extra("type1", json_type_name(value1).into())
                            .with_extra("type2", json_type_name(value2).into()),
                    );
                } else if value1 != value2 {
                    diffs.push(
                        Difference::new(path, DiffType::ValueChanged)
                            .with_values(Some(value1.clone()), Some(value2.clone())),
                    );
                }
            }
        }
    }
}

/// Name of a value's fundamental JSON type
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn error_path(path: &str, root_label: &str) -> String {
    if path.is_empty() {
        root_label.to_string()
    } else {
        path.to_string()
    }
}
