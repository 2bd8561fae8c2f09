//! Code-translation history entry types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Active,
    Archived,
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryStatus::Active => f.write_str("active"),
            HistoryStatus::Archived => f.write_str("archived"),
        }
    }
}

/// One diagnosis coded through the EMR flow.
///
/// Serialized in camelCase so a history file is readable by any client that
/// shares the same wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHistoryEntry {
    pub id: String,
    pub diagnosis: String,
    pub tm2_code: String,
    pub icd11_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: HistoryStatus,
}

impl CodeHistoryEntry {
    /// A new active entry stamped with the current time.
    pub fn new(
        diagnosis: impl Into<String>,
        tm2_code: impl Into<String>,
        icd11_code: impl Into<String>,
        patient_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            diagnosis: diagnosis.into(),
            tm2_code: tm2_code.into(),
            icd11_code: icd11_code.into(),
            patient_id: patient_id.filter(|p| !p.trim().is_empty()),
            timestamp: Utc::now(),
            status: HistoryStatus::Active,
        }
    }

    /// Case-insensitive substring match over diagnosis, TM2 code and ICD-11 code.
    /// An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.diagnosis.to_lowercase().contains(&needle)
            || self.tm2_code.to_lowercase().contains(&needle)
            || self.icd11_code.to_lowercase().contains(&needle)
    }
}
