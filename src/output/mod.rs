//! Output formatting for validation records.
//!
//! This module handles rendering the validation report:
//! - [`csv`] - CSV output formatting

mod csv;

pub use csv::{escape_csv_field, print_records, record_row, CSV_HEADER};
