//! # vaidya-history
//!
//! Local record of diagnoses coded through the EMR flow.
//!
//! ## Overview
//!
//! Entries are kept most-recent-first and capped at 100; recording a new one
//! beyond the cap drops the oldest. A history can be in-memory or backed by a
//! JSON file, and can be searched and exported as CSV.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vaidya_history::{CodeHistory, CodeHistoryEntry, export_csv};
//!
//! let history = CodeHistory::open("vaidya-history.json");
//! history.record(CodeHistoryEntry::new("Agnimandya", "TM2-AGN-4821", "DA01", None))?;
//! println!("{}", export_csv(&history.search("agn")?));
//! ```

pub mod csv;
pub mod entry;
pub mod store;

pub use csv::{export_csv, CSV_HEADER};
pub use entry::{CodeHistoryEntry, HistoryStatus};
pub use store::CodeHistory;

// ── Tests ─────────────────────────────────────────────────────────────────────
