//! Structured extraction - turns a service reply into a `StructuredForm`
//!
//! Extraction never fails: anything that does not deserialize becomes an
//! `ErrorDocument` carrying the reason and the reply verbatim.

use converter_core::{ErrorDocument, StructuredForm};
use serde_json::Value;

use crate::sanitize::strip_wrapping;

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredExtractor;

impl StructuredExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> StructuredForm {
        let candidate = strip_wrapping(text);
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => StructuredForm::Document(value),
            Err(e) => StructuredForm::Degraded(ErrorDocument::new(e.to_string(), text)),
        }
    }
}
