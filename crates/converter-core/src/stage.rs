use std::fmt;

use serde::{Deserialize, Serialize};

/// The three semantic transformation steps of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Structuring,
    Transformation,
    Validation,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structuring => "structuring",
            Self::Transformation => "transformation",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
