/// A normalized visit, ready to persist. `sha1` is its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorRecord {
    pub institution: String,
    pub full_name: String,
    pub id_document: String,
    pub id_number: String,
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub entity: String,
    pub office: String,
    pub reason: String,
    pub host_name: String,
    pub host_title: String,
    pub sha1: String,
}

/// One successful import run.
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub id: i64,
    pub file_path: String,
    pub institution: String,
    pub started_at: String,
    pub completed_at: String,
    pub rows_read: i64,
    pub inserted: i64,
    pub duplicates_in_file: i64,
    pub duplicates_in_store: i64,
    pub conflicts: i64,
    pub skipped_rows: i64,
}

/// Aggregates per institution, rebuilt by `statistics::recompute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionStats {
    pub institution: String,
    pub visit_count: i64,
    pub distinct_visitors: i64,
    pub first_visit: Option<String>,
    pub last_visit: Option<String>,
    pub computed_at: String,
}
