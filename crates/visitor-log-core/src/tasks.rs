//! Entry points meant to be fired by an external scheduler.

use crate::statistics;
use crate::storage::Database;
use std::path::Path;
use tracing::{error, info};

/// Daily statistics job. Never fails: errors are logged and swallowed so
/// the scheduler keeps running. Returns whether the recompute succeeded.
pub fn run_stats<P: AsRef<Path>>(database_path: P) -> bool {
    info!("Recompute stats");
    let result = Database::open(database_path.as_ref())
        .map_err(crate::Error::from)
        .and_then(|db| statistics::recompute(&db));

    match result {
        Ok(institutions) => {
            info!("Statistics updated for {} institutions", institutions);
            true
        }
        Err(err) => {
            error!("Error while computing stats: {}", err);
            false
        }
    }
}
