use super::models::*;
use super::sqlite::Database;
use rusqlite::{params, OptionalExtension, Result, Row};
use tracing::debug;

const VISITOR_COLUMNS: &str = "institution, full_name, id_document, id_number, date, \
     time_start, time_end, entity, office, reason, host_name, host_title, sha1";

fn visitor_from_row(row: &Row<'_>) -> Result<VisitorRecord> {
    Ok(VisitorRecord {
        institution: row.get(0)?,
        full_name: row.get(1)?,
        id_document: row.get(2)?,
        id_number: row.get(3)?,
        date: row.get(4)?,
        time_start: row.get(5)?,
        time_end: row.get(6)?,
        entity: row.get(7)?,
        office: row.get(8)?,
        reason: row.get(9)?,
        host_name: row.get(10)?,
        host_title: row.get(11)?,
        sha1: row.get(12)?,
    })
}

impl Database {
    // ── Visitors ─────────────────────────────────────────────────

    pub fn visitor_exists(&self, sha1: &str) -> Result<bool> {
        self.connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM visitor WHERE sha1 = ?1)",
            params![sha1],
            |row| row.get(0),
        )
    }

    /// Insert all records in one transaction. Rows whose `sha1` is already
    /// stored are left out by the unique constraint; the return value counts
    /// only the rows actually written.
    pub fn insert_visitors(&self, records: &[VisitorRecord]) -> Result<usize> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.connection().unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO visitor \
                 (institution, full_name, id_document, id_number, date, time_start, time_end, \
                  entity, office, reason, host_name, host_title, sha1, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) \
                 ON CONFLICT(sha1) DO NOTHING",
            )?;
            for record in records {
                count += stmt.execute(params![
                    record.institution,
                    record.full_name,
                    record.id_document,
                    record.id_number,
                    record.date,
                    record.time_start,
                    record.time_end,
                    record.entity,
                    record.office,
                    record.reason,
                    record.host_name,
                    record.host_title,
                    record.sha1,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        debug!("Inserted {} of {} visitor records", count, records.len());
        Ok(count)
    }

    pub fn get_visitor_by_hash(&self, sha1: &str) -> Result<Option<VisitorRecord>> {
        self.connection()
            .query_row(
                &format!("SELECT {} FROM visitor WHERE sha1 = ?1", VISITOR_COLUMNS),
                params![sha1],
                visitor_from_row,
            )
            .optional()
    }

    /// Visits of one institution, newest first.
    pub fn get_visitors(&self, institution: &str, offset: i64, limit: i64) -> Result<Vec<VisitorRecord>> {
        let mut stmt = self.connection().prepare(&format!(
            "SELECT {} FROM visitor WHERE institution = ?1 \
             ORDER BY date DESC, time_start DESC, id DESC LIMIT ?2 OFFSET ?3",
            VISITOR_COLUMNS
        ))?;
        let visitors = stmt
            .query_map(params![institution, limit, offset], visitor_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(visitors)
    }

    pub fn count_visitors(&self) -> Result<i64> {
        self.connection()
            .query_row("SELECT COUNT(*) FROM visitor", [], |row| row.get(0))
    }

    pub fn count_visitors_by_institution(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.connection().prepare(
            "SELECT institution, COUNT(*) FROM visitor GROUP BY institution ORDER BY institution",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;
        Ok(counts)
    }

    // ── Import Sessions ──────────────────────────────────────────

    pub fn insert_import_session(&self, session: &ImportSession) -> Result<i64> {
        self.connection().execute(
            "INSERT INTO import_session \
             (file_path, institution, started_at, completed_at, rows_read, inserted, \
              duplicates_in_file, duplicates_in_store, conflicts, skipped_rows) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                session.file_path,
                session.institution,
                session.started_at,
                session.completed_at,
                session.rows_read,
                session.inserted,
                session.duplicates_in_file,
                session.duplicates_in_store,
                session.conflicts,
                session.skipped_rows,
            ],
        )?;
        let id = self.connection().last_insert_rowid();
        debug!("Recorded import session {} for {}", id, session.file_path);
        Ok(id)
    }

    /// List import sessions newest first.
    pub fn list_import_sessions(&self, offset: i64, limit: i64) -> Result<Vec<ImportSession>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, file_path, institution, started_at, completed_at, rows_read, inserted, \
                    duplicates_in_file, duplicates_in_store, conflicts, skipped_rows \
             FROM import_session ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let sessions = stmt
            .query_map(params![limit, offset], |row| {
                Ok(ImportSession {
                    id: row.get(0)?,
                    file_path: row.get(1)?,
                    institution: row.get(2)?,
                    started_at: row.get(3)?,
                    completed_at: row.get(4)?,
                    rows_read: row.get(5)?,
                    inserted: row.get(6)?,
                    duplicates_in_file: row.get(7)?,
                    duplicates_in_store: row.get(8)?,
                    conflicts: row.get(9)?,
                    skipped_rows: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(sessions)
    }

    // ── Institution Stats ────────────────────────────────────────

    pub fn get_institution_stats(&self) -> Result<Vec<InstitutionStats>> {
        let mut stmt = self.connection().prepare(
            "SELECT institution, visit_count, distinct_visitors, first_visit, last_visit, computed_at \
             FROM institution_stats ORDER BY visit_count DESC, institution",
        )?;
        let stats = stmt
            .query_map([], |row| {
                Ok(InstitutionStats {
                    institution: row.get(0)?,
                    visit_count: row.get(1)?,
                    distinct_visitors: row.get(2)?,
                    first_visit: row.get(3)?,
                    last_visit: row.get(4)?,
                    computed_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(stats)
    }
}
