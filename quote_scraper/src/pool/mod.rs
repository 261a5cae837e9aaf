//! Bounded worker pool.
//!
//! The pool launches one session per worker up front, then lets workers pull
//! codes from a shared crossbeam queue until it drains or the run is
//! cancelled. Each code is fetched in its own context and the resulting
//! record goes straight to the `RecordSink`.
//!
//! Crash handling: when a fetch fails fatally the code is recorded as
//! `ERROR`, the worker drops its session and launches a new one. If that
//! launch fails the worker retires and the others keep pulling. Codes still
//! queued once every worker has retired are recorded as `ERROR` rows; codes
//! left because a worker stopped on cancellation are skipped.
use std::io;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use log::{error, info, warn};
use quote_common::error::{FetchFatalError, StartupError, WriteError};
use quote_common::store::RecordSink;
use quote_common::{QuoteRecord, StockCode};

use crate::cancel::CancelToken;
use crate::consts::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_WRITE_RETRIES};
use crate::fetcher::Fetcher;
use crate::session::{ContextOf, Session, SessionProvider};

mod report;

pub use report::RunReport;

/// Per-code behaviour of the pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound for a single fetch.
    pub fetch_timeout: Duration,
    /// Extra attempts for a failed append before dropping the row.
    pub write_retries: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            write_retries: DEFAULT_WRITE_RETRIES,
        }
    }
}

/// Fans codes out over worker threads, each owning one session.
pub struct WorkerPool<'a, P, F, S> {
    provider: &'a P,
    fetcher: &'a F,
    sink: &'a S,
    config: PoolConfig,
    cancel: CancelToken,
}

impl<'a, P, F, S> WorkerPool<'a, P, F, S>
where
    P: SessionProvider,
    F: Fetcher<ContextOf<P>>,
    S: RecordSink,
{
    /// Creates a pool over borrowed collaborators.
    pub fn new(
        provider: &'a P,
        fetcher: &'a F,
        sink: &'a S,
        config: PoolConfig,
        cancel: CancelToken,
    ) -> Self {
        Self {
            provider,
            fetcher,
            sink,
            config,
            cancel,
        }
    }

    /// Processes `codes` with up to `worker_count` workers.
    ///
    /// Fails only when a session cannot be launched, in which case no code
    /// has been dispatched.
    pub fn run(
        &self,
        codes: &[StockCode],
        worker_count: NonZeroUsize,
    ) -> Result<RunReport, StartupError> {
        if codes.is_empty() {
            return Ok(RunReport::default());
        }
        let workers = worker_count.get().min(codes.len());
        let sessions = (0..workers)
            .map(|id| self.provider.launch(id))
            .collect::<Result<Vec<_>, _>>()?;
        info!("Launched {} worker sessions for {} codes", workers, codes.len());

        let (queue_tx, queue_rx) = unbounded();
        for code in codes {
            // the receiver lives until the end of this function
            let _ = queue_tx.send(code.clone());
        }
        drop(queue_tx);

        let mut report = thread::scope(|scope| {
            let handles: Vec<_> = sessions
                .into_iter()
                .enumerate()
                .map(|(id, session)| {
                    let queue = queue_rx.clone();
                    scope.spawn(move || self.work(id, session, &queue))
                })
                .collect();

            let mut report = RunReport::default();
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(worker_report) => report.merge(worker_report),
                    Err(_) => {
                        error!("Worker {} panicked", id);
                        report.retired_workers += 1;
                    }
                }
            }
            report
        });

        let leftover: Vec<StockCode> = queue_rx.try_iter().collect();
        if leftover.is_empty() {
            report.cancelled = false;
        } else if report.cancelled {
            report.skipped = leftover.len();
            warn!("Run cancelled, {} codes not dispatched", leftover.len());
        } else {
            warn!(
                "All workers retired, recording {} queued codes as ERROR",
                leftover.len()
            );
            for code in leftover {
                report.orphaned += 1;
                self.deliver(QuoteRecord::error(code), &mut report);
            }
        }

        Ok(report)
    }

    /// Pulls codes until the worker has to stop. `cancelled` in the returned
    /// report tells whether cancellation was the reason.
    fn work(&self, worker_id: usize, session: P::Session, queue: &Receiver<StockCode>) -> RunReport {
        let mut report = RunReport::default();
        let mut session = Some(session);

        loop {
            let Some(active) = session.as_mut() else {
                break;
            };
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let Ok(code) = queue.try_recv() else {
                break;
            };
            report.dispatched += 1;

            let record = match self.fetch_one(active, &code) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Worker {}: {}; relaunching session", worker_id, e);
                    session = None;
                    match self.relaunch(worker_id) {
                        Ok(fresh) => session = Some(fresh),
                        Err(e) => {
                            error!("Worker {} retiring: {}", worker_id, e);
                            report.retired_workers += 1;
                        }
                    }
                    QuoteRecord::error(code)
                }
            };
            self.deliver(record, &mut report);
        }

        report
    }

    fn relaunch(&self, worker_id: usize) -> Result<P::Session, StartupError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.provider.launch(worker_id))).unwrap_or_else(
            |_| {
                Err(StartupError::Launch {
                    worker_id,
                    reason: "session provider panicked".into(),
                })
            },
        )
    }

    /// Fetches one code in a fresh context; the context is dropped before returning.
    fn fetch_one(
        &self,
        session: &mut P::Session,
        code: &StockCode,
    ) -> Result<QuoteRecord, FetchFatalError> {
        let timeout = self.cancel.clamp(self.config.fetch_timeout);
        let mut context = session.open_context()?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.fetcher.fetch(&mut context, code, timeout)
        }));
        drop(context);

        let record = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(FetchFatalError::new(format!("fetcher panicked on {}", code))),
        };
        if record.code != *code {
            warn!(
                "Fetcher returned {} for {}, recording ERROR",
                record.code, code
            );
            return Ok(QuoteRecord::error(code.clone()));
        }
        Ok(record)
    }

    fn deliver(&self, record: QuoteRecord, report: &mut RunReport) {
        let mut attempt = 0;
        loop {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.sink.append(&record)))
                .unwrap_or_else(|_| Err(WriteError::Io(io::Error::other("record sink panicked"))));
            match outcome {
                Ok(()) => {
                    info!(
                        "{} {} close={}",
                        record.code,
                        record.status,
                        record.close.as_deref().unwrap_or("-")
                    );
                    report.record(record.status);
                    return;
                }
                Err(e) if attempt < self.config.write_retries => {
                    attempt += 1;
                    warn!("Append of {} failed ({}), retry {}", record.code, e, attempt);
                }
                Err(e) => {
                    warn!("Dropping row for {} after write failure: {}", record.code, e);
                    report.write_dropped += 1;
                    return;
                }
            }
        }
    }
}
