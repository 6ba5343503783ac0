//! Compact command implementation.

use couchlocal_store::FileDocumentStore;
use std::path::Path;
use tracing::info;

/// Runs the compact command.
pub fn run(store_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !store_path.exists() {
        return Err("Store log not found".into());
    }

    info!("Compacting store log {:?}", store_path);
    let bytes_before = std::fs::metadata(store_path)?.len();

    let store = FileDocumentStore::open_path(store_path)?;
    let records = store.compact()?;
    let bytes_after = std::fs::metadata(store_path)?.len();

    println!("Compaction complete:");
    println!("  Live documents: {}", records);
    println!("  Size before:    {} bytes", bytes_before);
    println!("  Size after:     {} bytes", bytes_after);

    Ok(())
}
