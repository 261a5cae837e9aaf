//! HKEX equity quote scraper.
//!
//! Building blocks wired together by the `quote_scraper` binary:
//!
//! - `session`: per-worker session resources and their per-code contexts.
//! - `fetcher`: the fetch contract and the HKEX page fetcher.
//! - `pool`: the bounded worker pool feeding a `RecordSink`.
//! - `cancel`: run cancellation (Ctrl+C, global deadline).
//! - `config` / `args`: command line and validated run settings.
#![warn(missing_docs)]
pub mod args;
pub mod cancel;
pub mod config;
pub mod consts;
pub mod fetcher;
pub mod pool;
pub mod session;
