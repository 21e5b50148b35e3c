//! Library side of the `trade-prep` command line driver.

pub mod build;
pub mod logging;
pub mod types;
