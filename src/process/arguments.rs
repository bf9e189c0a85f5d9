// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Type constraints for `Builder::expected_arguments`.

use std::fmt;

use serde_json::Value;

/// A constraint a keyword argument's JSON value must satisfy.
///
/// Matching is strict: an integer never satisfies `String` and a numeric
/// string never satisfies `Integer`. `Float` accepts any JSON number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    Any,
    String,
    Integer,
    Float,
    Boolean,
    Object,
    List(Box<ArgType>),
    Optional(Box<ArgType>),
}

impl ArgType {
    pub fn list(item: ArgType) -> Self {
        ArgType::List(Box::new(item))
    }

    pub fn optional(inner: ArgType) -> Self {
        ArgType::Optional(Box::new(inner))
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ArgType::Any => true,
            ArgType::String => value.is_string(),
            ArgType::Integer => value.is_i64() || value.is_u64(),
            ArgType::Float => value.is_number(),
            ArgType::Boolean => value.is_boolean(),
            ArgType::Object => value.is_object(),
            ArgType::List(item) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| item.accepts(v))),
            ArgType::Optional(inner) => value.is_null() || inner.accepts(value),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Any => write!(f, "any"),
            ArgType::String => write!(f, "string"),
            ArgType::Integer => write!(f, "integer"),
            ArgType::Float => write!(f, "float"),
            ArgType::Boolean => write!(f, "boolean"),
            ArgType::Object => write!(f, "object"),
            ArgType::List(item) => write!(f, "list[{}]", item),
            ArgType::Optional(inner) => write!(f, "optional[{}]", inner),
        }
    }
}

/// JSON type name of a value, used in type mismatch reports.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
