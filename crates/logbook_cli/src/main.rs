//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `logbook_core` linkage and the
//!   startup routines against a throwaway store.
//! - Keep output deterministic for quick local sanity checks.

use logbook_core::LocalStore;

fn main() {
    if let Err(err) = run() {
        eprintln!("logbook_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = LocalStore::open_in_memory()?;
    store.initialize_settings()?;
    let purged = store.delete_expired_logs()?;

    println!("logbook_core version={}", logbook_core::core_version());
    println!("settings={}", store.settings()?.len());
    println!("logs_purged={purged}");
    Ok(())
}
