//! Error types shared by the scraper and the finalize tool.
//!
//! Each run phase has its own error type so callers can tell a per-code
//! problem from a run-fatal one. `QuoteError` wraps all of them for `main`
//! and maps each to a process exit code.
use std::io;
use std::path::PathBuf;
use std::sync::PoisonError;

use thiserror::Error;

/// Invalid run input: code count or codes file.
#[derive(Error, Debug)]
pub enum InputError {
    /// A count of zero was requested.
    #[error("code count must be positive")]
    ZeroCount,

    /// More codes were requested than the universe holds.
    #[error("requested {requested} codes but only {available} are known")]
    CountExceedsUniverse {
        /// Requested number of codes.
        requested: usize,
        /// Size of the code universe.
        available: usize,
    },

    /// A codes file contained no codes.
    #[error("codes list is empty")]
    EmptyCodeList,

    /// I/O error while reading a codes file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failure to bring up a run: a worker's session resource or the temporary store.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The session provider could not launch a session for a worker.
    #[error("worker {worker_id} failed to launch its session: {reason}")]
    Launch {
        /// Index of the worker slot.
        worker_id: usize,
        /// Provider-specific reason.
        reason: String,
    },

    /// The temporary store could not be created.
    #[error("cannot create temporary store {path}: {source}")]
    TempStore {
        /// Store location.
        path: PathBuf,
        /// Underlying write failure.
        #[source]
        source: WriteError,
    },
}

/// Unanticipated per-code failure of a session (crashed engine, dead connection).
#[derive(Error, Debug)]
#[error("fatal fetch failure: {0}")]
pub struct FetchFatalError(pub String);

impl FetchFatalError {
    /// Builds an error from anything printable.
    pub fn new(reason: impl Into<String>) -> Self {
        FetchFatalError(reason.into())
    }
}

/// Failure appending one record to the temporary store.
#[derive(Error, Debug)]
pub enum WriteError {
    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The store's lock was poisoned by a panicking writer.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for WriteError {
    fn from(err: PoisonError<T>) -> Self {
        WriteError::MutexLock(err.to_string())
    }
}

/// Failure turning the temporary store into the final artifact.
#[derive(Error, Debug)]
pub enum FinalizeError {
    /// There is no temporary store to finalize.
    #[error("temporary store {0} does not exist")]
    MissingStore(PathBuf),

    /// The temporary store and the final artifact are the same file.
    #[error("temporary store and final artifact are the same file: {0}")]
    SameFile(PathBuf),

    /// The temporary store could not be read or contained a corrupt row.
    #[error("cannot read temporary store: {0}")]
    Read(#[source] csv::Error),

    /// The final artifact could not be written.
    #[error("cannot write final artifact: {0}")]
    Write(#[source] csv::Error),

    /// File system error (staging, rename, removal).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Umbrella error for the binaries.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// See [`InputError`].
    #[error(transparent)]
    Input(#[from] InputError),

    /// See [`StartupError`].
    #[error(transparent)]
    Startup(#[from] StartupError),

    /// See [`FinalizeError`].
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

impl QuoteError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            QuoteError::Input(_) => 2,
            QuoteError::Startup(_) => 3,
            QuoteError::Finalize(_) => 4,
        }
    }
}
