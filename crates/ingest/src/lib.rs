//! ingest: bank/UPI statement text parsers.
//!
//! Takes raw text extracted from a statement PDF and produces normalized
//! entries. PDF-to-text extraction itself happens upstream; this crate only
//! scans the text.

pub mod parsers;
pub mod types;

pub use types::{EntryKind, IngestError, StatementEntry};
