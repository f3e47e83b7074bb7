use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Degraded structured form, kept when a service response could not be
/// deserialized. Downstream stages treat it as valid but impoverished context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDocument {
    pub error: String,
    pub raw_response: String,
}

impl ErrorDocument {
    pub fn new(error: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw_response: raw_response.into(),
        }
    }
}

/// Output of the structuring stage.
///
/// A `Document` is an arbitrary JSON tree whose shape follows the statement
/// being structured; there is no predeclared schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredForm {
    Degraded(ErrorDocument),
    Document(Value),
}

impl StructuredForm {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Self::Document(value) => Some(value),
            Self::Degraded(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorDocument> {
        match self {
            Self::Degraded(doc) => Some(doc),
            Self::Document(_) => None,
        }
    }

    /// Tree view of the form; degraded forms become `{error, raw_response}`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Document(value) => value.clone(),
            Self::Degraded(doc) => serde_json::json!({
                "error": doc.error,
                "raw_response": doc.raw_response,
            }),
        }
    }

    /// Lossless pretty-printed JSON, used as context for later stages.
    pub fn to_pretty_json(&self) -> String {
        let value = self.to_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }
}

impl From<ErrorDocument> for StructuredForm {
    fn from(doc: ErrorDocument) -> Self {
        Self::Degraded(doc)
    }
}
