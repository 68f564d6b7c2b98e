use serde_json::Value;

/// Shape of an extractor answer
///
/// Extractors answer free-form instructions, so the same request can come back
/// as a single string, a list, or something unusable. Callers normalize with
/// [`ExtractorResult::into_url_list`], [`ExtractorResult::into_text`] or
/// [`ExtractorResult::into_list_lenient`] depending on what they asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractorResult {
    /// A single value
    Scalar(String),
    /// A list of values
    List(Vec<String>),
    /// Anything else; carries a short description of what was received
    Malformed(String),
}

impl ExtractorResult {
    /// Interprets a JSON answer
    ///
    /// Accepts a `{"content": ...}` wrapper, an object with a single field, a
    /// bare array of strings (or of objects with a `url` field), a bare string,
    /// or a number.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Scalar(s.clone()),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::Array(items) => list_from_array(items),
            Value::Object(map) => {
                if let Some(content) = map.get("content") {
                    Self::from_json(content)
                } else if map.len() == 1 {
                    map.values()
                        .next()
                        .map(Self::from_json)
                        .unwrap_or_else(|| Self::Malformed("empty object".to_string()))
                } else {
                    Self::Malformed(format!(
                        "object without content field ({} keys)",
                        map.len()
                    ))
                }
            }
            Value::Bool(b) => Self::Malformed(format!("boolean {}", b)),
            Value::Null => Self::Malformed("null".to_string()),
        }
    }

    /// Short name of the variant, for logging
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Malformed(_) => "malformed",
        }
    }

    /// Normalizes a list request: a scalar becomes a one-element list
    ///
    /// A malformed answer is an error carrying its description.
    pub fn into_url_list(self) -> Result<Vec<String>, String> {
        match self {
            Self::List(items) => Ok(items),
            Self::Scalar(s) => Ok(vec![s]),
            Self::Malformed(description) => Err(description),
        }
    }

    /// Like [`ExtractorResult::into_url_list`], but a malformed answer is an empty list
    pub fn into_list_lenient(self) -> Vec<String> {
        match self {
            Self::Malformed(description) => {
                tracing::warn!("Ignoring malformed list answer: {}", description);
                Vec::new()
            }
            other => other.into_url_list().unwrap_or_default(),
        }
    }

    /// Normalizes a scalar request; `None` when there is no usable text
    pub fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Scalar(s) => s,
            Self::List(items) => items.into_iter().find(|s| !s.trim().is_empty())?,
            Self::Malformed(_) => return None,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn list_from_array(items: &[Value]) -> ExtractorResult {
    let mut values = Vec::with_capacity(items.len());

    for item in items {
        match item {
            Value::String(s) => values.push(s.clone()),
            Value::Object(map) => match map.get("url").and_then(Value::as_str) {
                Some(url) => values.push(url.to_string()),
                None => {
                    return ExtractorResult::Malformed("array of objects without url".to_string())
                }
            },
            other => {
                return ExtractorResult::Malformed(format!("array containing {}", type_name(other)))
            }
        }
    }

    ExtractorResult::List(values)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
