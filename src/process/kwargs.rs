// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};

/// Keyword arguments handed to a task. JSON-valued so they can travel through
/// any backend unchanged.
pub type Kwargs = Map<String, Value>;

/// Read-only build options consulted by definitions through `Builder::option`.
pub type Options = Map<String, Value>;

/// What a generator (`each`) or a transform yields: a replacement kwargs bag,
/// optionally with a description for the builder it opens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskArgs {
    pub kwargs: Kwargs,
    pub description: Option<String>,
}

impl TaskArgs {
    pub fn new(kwargs: Kwargs) -> Self {
        Self {
            kwargs,
            description: None,
        }
    }

    pub fn described(kwargs: Kwargs, description: impl Into<String>) -> Self {
        Self {
            kwargs,
            description: Some(description.into()),
        }
    }
}

impl From<Kwargs> for TaskArgs {
    fn from(kwargs: Kwargs) -> Self {
        Self::new(kwargs)
    }
}

impl From<(Kwargs, String)> for TaskArgs {
    fn from((kwargs, description): (Kwargs, String)) -> Self {
        Self::described(kwargs, description)
    }
}

impl From<(Kwargs, &str)> for TaskArgs {
    fn from((kwargs, description): (Kwargs, &str)) -> Self {
        Self::described(kwargs, description)
    }
}

/// Build a [`Kwargs`] bag from `key => value` pairs.
///
/// ```
/// let kwargs = tasktronaut::kwargs! { "count" => 3, "name" => "ada" };
/// assert_eq!(kwargs["count"], 3);
/// ```
#[macro_export]
macro_rules! kwargs {
    () => {
        $crate::process::Kwargs::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::process::Kwargs::new();
        $(
            map.insert(::std::string::ToString::to_string(&$key), $crate::serde_json::json!($value));
        )+
        map
    }};
}
