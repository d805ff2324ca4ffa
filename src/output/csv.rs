//! CSV output formatting for validation records.

use crate::models::ValidationRecord;
use colored::Colorize;

/// Column order of the validation report.
pub const CSV_HEADER: &str =
    "AddressSpace,Comment,Environment,Forest,EopDc,IpQuery,Prefix,IpamDc,Region,Status,Summary,Title,PrefixId";

/// Escape one CSV field per standard quoting rules.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        // Enclose in double quotes and double any quotes within the field.
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

/// Render one record as a CSV row.
pub fn record_row(record: &ValidationRecord) -> String {
    let fields = [
        record.address_space.name(),
        record.comment(),
        record.environment.as_str(),
        record.forest.as_str(),
        record.eop_dc.as_str(),
        record.ip_query.as_str(),
        record.prefix.as_str(),
        record.ipam_dc.as_str(),
        record.region.as_str(),
        &record.status.to_string(),
        record.summary.as_str(),
        record.title.as_str(),
        record.id.as_str(),
    ];
    fields
        .iter()
        .map(|f| escape_csv_field(f))
        .collect::<Vec<String>>()
        .join(",")
}

/// Print the full report to stdout, with an end-of-run note on stderr.
pub fn print_records(records: &[ValidationRecord]) {
    log::info!("#Start print_records() with {} record(s)", records.len());
    println!("{CSV_HEADER}");
    for record in records {
        println!("{}", record_row(record));
    }
    eprintln!(
        "#{}# {} validation record(s) written",
        "DONE".on_green(),
        records.len()
    );
}
