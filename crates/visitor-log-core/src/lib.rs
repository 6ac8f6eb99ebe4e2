pub mod config;
pub mod error;
pub mod extract;
pub mod hasher;
pub mod importer;
pub mod normalize;
pub mod progress;
pub mod scanner;
pub mod statistics;
pub mod storage;
pub mod tasks;

pub use config::AppConfig;
pub use error::Error;
pub use importer::{ImportOptions, ImportSummary, Importer, RowErrorPolicy};
pub use progress::{ProgressReporter, SilentReporter};
pub use storage::{Database, VisitorRecord, VisitorStore};
