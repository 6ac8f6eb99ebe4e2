use crate::storage::Database;
use rusqlite::params;
use std::time::Instant;
use tracing::{debug, info};

/// Rebuild `institution_stats` from the visitor table.
///
/// The old rows are deleted and the aggregates reinserted inside a single
/// transaction, so running it twice in a row leaves the same table behind
/// (apart from `computed_at`) and readers never see a half-built table.
/// Blank visit dates are excluded from first/last visit.
pub fn recompute(db: &Database) -> Result<usize, crate::Error> {
    info!("Recomputing institution statistics...");
    let start = Instant::now();
    let now = chrono::Utc::now().to_rfc3339();

    let tx = db.connection().unchecked_transaction()?;
    tx.execute("DELETE FROM institution_stats", [])?;
    let rows = tx.execute(
        "INSERT INTO institution_stats \
         (institution, visit_count, distinct_visitors, first_visit, last_visit, computed_at) \
         SELECT institution, \
                COUNT(*), \
                COUNT(DISTINCT id_document || ':' || id_number), \
                MIN(NULLIF(date, '')), \
                MAX(NULLIF(date, '')), \
                ?1 \
         FROM visitor GROUP BY institution",
        params![now],
    )?;
    tx.commit()?;

    debug!(
        "Statistics recomputed in {:.2}s: {} institutions",
        start.elapsed().as_secs_f64(),
        rows
    );
    Ok(rows)
}
