use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::document::StructuredForm;
use crate::stage::StageKind;

/// Key under which the structured intermediate form is exposed to callers.
pub const STRUCTURED_FORM_KEY: &str = "structured_form";

/// Intermediate artifacts of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionArtifacts {
    pub structured_form: StructuredForm,
}

impl ConversionArtifacts {
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert(
            STRUCTURED_FORM_KEY.to_string(),
            self.structured_form.to_value(),
        );
        map
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub request_id: Uuid,
    pub result_text: String,
    pub artifacts: ConversionArtifacts,
    /// Whether validation replaced the transformation candidate.
    pub corrected: bool,
    /// Stages in completion order.
    pub stages: Vec<StageKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn artifacts_expose_only_structured_form() {
        let artifacts = ConversionArtifacts {
            structured_form: StructuredForm::Document(json!({"type": "select_statement"})),
        };

        let map = artifacts.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map[STRUCTURED_FORM_KEY], json!({"type": "select_statement"}));
    }
}
