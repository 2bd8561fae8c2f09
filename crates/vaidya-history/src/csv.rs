//! CSV export of history entries.

use chrono::SecondsFormat;

use crate::entry::CodeHistoryEntry;

/// Header row of every export.
pub const CSV_HEADER: &str = "Diagnosis,TM2 Code,ICD-11 Code,Patient ID,Timestamp,Status";

/// Render `entries` as CSV, header first, one row per entry, `\n` separated.
///
/// A missing patient ID is written as `N/A`. Fields containing a comma, a
/// double quote or a line break are quoted with inner quotes doubled.
pub fn export_csv(entries: &[CodeHistoryEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for entry in entries {
        let timestamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        let status = entry.status.to_string();
        let row = [
            entry.diagnosis.as_str(),
            entry.tm2_code.as_str(),
            entry.icd11_code.as_str(),
            entry.patient_id.as_deref().unwrap_or("N/A"),
            timestamp.as_str(),
            status.as_str(),
        ];
        lines.push(row.iter().map(|f| escape(f)).collect::<Vec<_>>().join(","));
    }

    lines.join("\n")
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
