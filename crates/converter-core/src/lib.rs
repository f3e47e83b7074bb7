//! converter-core - Data model for the SQL dialect converter
//!
//! Holds the per-request `ConversionState`, the schema-less structured form
//! produced by the structuring stage, the artifacts handed back to callers,
//! and the session-scoped `ConversionHistory` used by presentation layers.

pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod output;
pub mod stage;
pub mod state;

pub use config::{ConfigError, ConverterConfig, DialectPair};
pub use document::{ErrorDocument, StructuredForm};
pub use error::{ConvertError, Result};
pub use history::{ConversionHistory, HistoryEntry};
pub use output::{ConversionArtifacts, ConversionOutput, STRUCTURED_FORM_KEY};
pub use stage::StageKind;
pub use state::{ConversionState, StateError, StateField};
