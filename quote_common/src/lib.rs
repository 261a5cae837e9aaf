//!
//! Common types and utilities shared by the quote scraper and the finalize tool.
//!
//! This crate aggregates:
//! - `error`: error taxonomy per run phase plus the umbrella `QuoteError`.
//! - `result`: handy `Result<T, QuoteError>` alias.
//! - `code`: `StockCode` identifiers, their ordering, and the fixed-list parser.
//! - `universe`: the known code universe and first-N generation.
//! - `record`: `QuoteRecord` rows and `QuoteStatus`.
//! - `store`: the temporary store and the finalizer.
//! - `logging`: logger initialisation for the binaries.
#![warn(missing_docs)]
pub mod code;
pub mod error;
pub mod logging;
pub mod record;
pub mod result;
pub mod store;
pub mod universe;

pub use code::StockCode;
pub use error::QuoteError;
pub use record::{QuoteRecord, QuoteStatus};
pub use result::Result;
