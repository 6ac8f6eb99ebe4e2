pub mod walk;

pub use walk::find_csv_files;
