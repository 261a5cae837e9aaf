//! Durable storage of quote rows.
//!
//! - `temp_store`: append-only store that workers write into as results arrive.
//! - `finalizer`: post-run pass that sorts the store into the final artifact.
pub mod finalizer;
pub mod temp_store;

pub use finalizer::{FinalSummary, finalize};
pub use temp_store::{RecordSink, TempStore};

/// Default location of the temporary store.
pub const DEFAULT_TEMP_PATH: &str = "stock_data_temp.csv";
/// Default location of the final artifact.
pub const DEFAULT_FINAL_PATH: &str = "stock_data.csv";
