pub mod adjustment;
pub mod cache;
pub mod config;
mod csv_table;
pub mod error;
pub mod loader;
pub mod source;

pub use adjustment::load_adjustment_table;
pub use cache::{read_cached_year, write_cached_year};
pub use config::{LoadPolicy, SourceConfig};
pub use error::LoadError;
pub use loader::{LoadedSource, load_years};
pub use source::read_source_year;
