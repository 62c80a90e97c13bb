pub mod export;
pub mod import;

pub use export::{Dataset, Exporter};
pub use import::{ImportOptions, ImportResult, Importer};
