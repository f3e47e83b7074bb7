//! Conversion history - append-only log of completed requests
//!
//! Owned by the presentation layer and kept for the lifetime of the session.
//! Entries are frozen once appended; readers receive shared handles.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConvertError;
use crate::output::ConversionOutput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    request: String,
    result: String,
    artifacts: BTreeMap<String, Value>,
    succeeded: bool,
    recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn success(request: impl Into<String>, output: &ConversionOutput) -> Self {
        Self {
            request: request.into(),
            result: output.result_text.clone(),
            artifacts: output.artifacts.to_map(),
            succeeded: true,
            recorded_at: Utc::now(),
        }
    }

    pub fn failure(request: impl Into<String>, error: &ConvertError) -> Self {
        Self {
            request: request.into(),
            result: format!("Error: {}", error),
            artifacts: BTreeMap::new(),
            succeeded: false,
            recorded_at: Utc::now(),
        }
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    /// Final statement on success, error description on failure.
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn artifacts(&self) -> &BTreeMap<String, Value> {
        &self.artifacts
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[derive(Debug, Default)]
pub struct ConversionHistory {
    entries: RwLock<Vec<Arc<HistoryEntry>>>,
}

impl ConversionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: HistoryEntry) -> Arc<HistoryEntry> {
        let entry = Arc::new(entry);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.push(entry.clone());
        entry
    }

    /// Append the entry for a finished request, successful or not.
    pub fn record(
        &self,
        request: impl Into<String>,
        outcome: &Result<ConversionOutput, ConvertError>,
    ) -> Arc<HistoryEntry> {
        let entry = match outcome {
            Ok(output) => HistoryEntry::success(request, output),
            Err(error) => HistoryEntry::failure(request, error),
        };
        if !entry.succeeded() {
            log::debug!("Recording failed conversion: {}", entry.result());
        }
        self.append(entry)
    }

    /// Snapshot of all entries in append order.
    pub fn entries(&self) -> Vec<Arc<HistoryEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Arc<HistoryEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
