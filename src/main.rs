use ipam_allocation_validator::ipam::SnapshotIpam;
use ipam_allocation_validator::names::NameTables;
use ipam_allocation_validator::output::print_records;
use ipam_allocation_validator::{read_discovered_ips, run_validation};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!(
        "#Start main() at {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    );

    let discovered_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DISCOVERED_IPS_FILE").ok())
        .unwrap_or_else(|| "discovered_ips.json".to_string());
    let snapshot_path = std::env::args()
        .nth(2)
        .or_else(|| std::env::var("IPAM_SNAPSHOT_FILE").ok())
        .unwrap_or_else(|| "ipam_snapshot.json".to_string());
    let tables_path = std::env::args()
        .nth(3)
        .or_else(|| std::env::var("NAME_TABLES_FILE").ok());

    // Reference-data problems are fatal: nothing meaningful can run
    // without correct name tables and an IPAM backend.
    let names = match &tables_path {
        Some(path) => match NameTables::from_file(path) {
            Ok(tables) => tables,
            Err(e) => fatal(&format!("Error loading name tables from {path}: {e}")),
        },
        None => NameTables::builtin(),
    };
    let ipam = match SnapshotIpam::from_file(&snapshot_path) {
        Ok(backend) => backend,
        Err(e) => fatal(&format!("Error loading IPAM snapshot: {e}")),
    };
    let discovered = match read_discovered_ips(&discovered_path) {
        Ok(items) => items,
        Err(e) => fatal(&format!("Error loading discovered IPs: {e}")),
    };

    let outcome = match run_validation(Arc::new(ipam), Arc::new(names), discovered).await {
        Ok(outcome) => outcome,
        Err(e) => fatal(&format!("Error running validation batch: {e}")),
    };

    print_records(&outcome.records);

    // A unit that failed outright means the report is incomplete; the
    // exit code has to say so even though the CSV was still written.
    if outcome.failed_units > 0 {
        let message = format!(
            "{} validation unit(s) failed; report is incomplete",
            outcome.failed_units
        );
        log::error!("{message}");
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn fatal(message: &str) -> ! {
    log::error!("{message}");
    eprintln!("{message}");
    std::process::exit(1);
}
