pub mod models;
pub mod queries;
pub mod sqlite;

pub use models::VisitorRecord;
pub use sqlite::Database;

use crate::error::Error;

/// The two store operations the import pipeline needs.
pub trait VisitorStore {
    fn exists_by_hash(&self, sha1: &str) -> Result<bool, Error>;

    /// Persist `records` in one batch and return how many were written.
    /// Records rejected by the store's uniqueness rule on `sha1` are not an
    /// error; they are simply missing from the count.
    fn bulk_insert(&self, records: &[VisitorRecord]) -> Result<usize, Error>;
}

impl VisitorStore for Database {
    fn exists_by_hash(&self, sha1: &str) -> Result<bool, Error> {
        Ok(self.visitor_exists(sha1)?)
    }

    fn bulk_insert(&self, records: &[VisitorRecord]) -> Result<usize, Error> {
        Ok(self.insert_visitors(records)?)
    }
}
