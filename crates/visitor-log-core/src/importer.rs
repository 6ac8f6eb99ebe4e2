use crate::config::AppConfig;
use crate::error::Error;
use crate::extract::{self, ExtractedFields, RawRow};
use crate::hasher::{self, HashInput};
use crate::progress::ProgressReporter;
use crate::storage::models::ImportSession;
use crate::storage::{Database, VisitorRecord, VisitorStore};
use csv::StringRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const PROGRESS_INTERVAL: usize = 500;

/// What to do with a row that fails extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Fail the whole run; nothing is written.
    #[default]
    Abort,
    /// Log the row and its raw value, count it, move on.
    Skip,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub institution: String,
    pub on_row_error: RowErrorPolicy,
}

impl ImportOptions {
    pub fn new(institution: &str) -> Self {
        Self {
            institution: institution.to_string(),
            on_row_error: RowErrorPolicy::Abort,
        }
    }

    pub fn with_row_error_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.on_row_error = policy;
        self
    }
}

impl From<&AppConfig> for ImportOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            institution: config.institution.clone(),
            on_row_error: config.on_row_error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub staged: usize,
    /// Newly persisted records; the observable result of a run.
    pub inserted: usize,
    pub duplicates_in_file: usize,
    pub duplicates_in_store: usize,
    /// Staged records the store rejected as already present, e.g. written
    /// by a concurrent run after our lookup.
    pub conflicts: usize,
    pub skipped_rows: usize,
    pub duration: Duration,
}

enum Admission {
    DuplicateInFile,
    DuplicateInStore,
    New(VisitorRecord),
}

/// Build the canonical record for one extracted row.
///
/// The fingerprint takes the row's own `id_document` (`"dni"` only when the
/// export has no such column), so exports that do carry the column hash
/// differently from a fixed `"dni"` identity.
pub fn build_record(institution: &str, fields: ExtractedFields) -> VisitorRecord {
    let sha1 = hasher::compute_hash(&HashInput {
        institution,
        full_name: Some(&fields.full_name),
        id_document: Some(&fields.id_document),
        id_number: Some(&fields.id_number),
        date: &fields.date,
        time_start: Some(&fields.time_start),
    });

    VisitorRecord {
        institution: institution.to_string(),
        full_name: fields.full_name,
        id_document: fields.id_document,
        id_number: fields.id_number,
        date: fields.date,
        time_start: fields.time_start,
        time_end: fields.time_end,
        entity: fields.entity,
        office: fields.office,
        reason: fields.reason,
        host_name: fields.host_name,
        host_title: fields.host_title,
        sha1,
    }
}

/// Reads one CSV export and persists the visits the store does not have yet.
///
/// All rows are collected first and written with a single bulk insert, so a
/// run that fails before the end leaves the store untouched.
pub struct Importer<'s, S: VisitorStore + ?Sized> {
    store: &'s S,
    options: ImportOptions,
}

impl<'s, S: VisitorStore + ?Sized> Importer<'s, S> {
    pub fn new(store: &'s S, options: ImportOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, Error> {
        let path = path.as_ref();
        info!("Importing {} as {}", path.display(), self.options.institution);
        reporter.on_import_start(&path.to_string_lossy());
        let result = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(Error::from)
            .and_then(|reader| self.import_csv(reader, reporter));
        if let Err(err) = &result {
            reporter.on_import_failed(&err.to_string());
        }
        result
    }

    pub fn import_reader<R: io::Read>(
        &self,
        rdr: R,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, Error> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        self.import_csv(reader, reporter)
    }

    fn import_csv<R: io::Read>(
        &self,
        mut reader: csv::Reader<R>,
        reporter: &dyn ProgressReporter,
    ) -> Result<ImportSummary, Error> {
        let start = Instant::now();
        let headers = reader.headers()?.clone();
        debug!("Columns: {:?}", headers);

        let mut summary = ImportSummary::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut staged: Vec<VisitorRecord> = Vec::new();
        let mut record = StringRecord::new();

        while reader.read_record(&mut record)? {
            summary.rows_read += 1;
            let line = record.position().map(|pos| pos.line()).unwrap_or(0);
            let row = RawRow::from_record(&headers, &record);

            let fields = match extract::extract(&row) {
                Ok(fields) => fields,
                Err(source) => match self.options.on_row_error {
                    RowErrorPolicy::Abort => return Err(Error::Extract { line, source }),
                    RowErrorPolicy::Skip => {
                        warn!("Skipping row at line {}: {}", line, source);
                        reporter.on_row_skipped(line, &source.to_string());
                        summary.skipped_rows += 1;
                        continue;
                    }
                },
            };

            match self.admit(fields, &mut seen)? {
                Admission::DuplicateInFile => summary.duplicates_in_file += 1,
                Admission::DuplicateInStore => summary.duplicates_in_store += 1,
                Admission::New(visitor) => staged.push(visitor),
            }

            if summary.rows_read % PROGRESS_INTERVAL == 0 {
                reporter.on_rows_progress(summary.rows_read, staged.len());
            }
        }
        reporter.on_rows_progress(summary.rows_read, staged.len());

        summary.staged = staged.len();
        reporter.on_insert_start(staged.len());
        summary.inserted = if staged.is_empty() {
            0
        } else {
            self.store.bulk_insert(&staged)?
        };
        summary.conflicts = summary.staged.saturating_sub(summary.inserted);
        if summary.conflicts > 0 {
            warn!(
                "{} records were stored by another run before this one finished",
                summary.conflicts
            );
        }

        summary.duration = start.elapsed();
        reporter.on_import_complete(summary.inserted, summary.duration.as_secs_f64());
        info!(
            "creating {} visitors ({} rows, {} duplicates in file, {} already stored, {} skipped)",
            summary.inserted,
            summary.rows_read,
            summary.duplicates_in_file,
            summary.duplicates_in_store,
            summary.skipped_rows,
        );
        Ok(summary)
    }

    /// Decide whether a row is new. The in-run set is consulted first and,
    /// when it hits, the store is not asked at all.
    fn admit(&self, fields: ExtractedFields, seen: &mut HashSet<String>) -> Result<Admission, Error> {
        let visitor = build_record(&self.options.institution, fields);
        if seen.contains(&visitor.sha1) {
            return Ok(Admission::DuplicateInFile);
        }
        if self.store.exists_by_hash(&visitor.sha1)? {
            return Ok(Admission::DuplicateInStore);
        }
        seen.insert(visitor.sha1.clone());
        Ok(Admission::New(visitor))
    }
}

/// Import one file into `db` and record the run in `import_session`.
pub fn run_import<P: AsRef<Path>>(
    db: &Database,
    path: P,
    options: ImportOptions,
    reporter: &dyn ProgressReporter,
) -> Result<ImportSummary, Error> {
    let path = path.as_ref();
    let started_at = chrono::Utc::now().to_rfc3339();
    let importer = Importer::new(db, options);
    let summary = importer.import_file(path, reporter)?;

    db.insert_import_session(&ImportSession {
        id: 0,
        file_path: path.to_string_lossy().into_owned(),
        institution: importer.options().institution.clone(),
        started_at,
        completed_at: chrono::Utc::now().to_rfc3339(),
        rows_read: summary.rows_read as i64,
        inserted: summary.inserted as i64,
        duplicates_in_file: summary.duplicates_in_file as i64,
        duplicates_in_store: summary.duplicates_in_store as i64,
        conflicts: summary.conflicts as i64,
        skipped_rows: summary.skipped_rows as i64,
    })?;

    Ok(summary)
}
