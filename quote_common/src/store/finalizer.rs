//! Turns the temporary store into the sorted final artifact.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::FinalizeError;
use crate::record::{HEADERS, QuoteRecord, QuoteStatus};

/// Row counts of a finalized artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalSummary {
    /// Rows written.
    pub total: usize,
    /// Rows per status; statuses with no rows are absent.
    pub by_status: BTreeMap<String, usize>,
}

impl FinalSummary {
    fn from_records(records: &[QuoteRecord]) -> Self {
        let mut by_status = BTreeMap::new();
        for r in records {
            *by_status.entry(r.status.to_string()).or_insert(0) += 1;
        }
        Self {
            total: records.len(),
            by_status,
        }
    }

    /// Rows with the given status.
    pub fn count(&self, status: QuoteStatus) -> usize {
        self.by_status.get(&status.to_string()).copied().unwrap_or(0)
    }
}

impl fmt::Display for FinalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total={}", self.total)?;
        for status in QuoteStatus::ALL {
            write!(f, " {}={}", status, self.count(status))?;
        }
        Ok(())
    }
}

/// Reads `temp_path`, sorts rows by code and writes them to `final_path`.
///
/// The artifact is staged next to `final_path` and renamed into place, so an
/// existing artifact is replaced whole. The temporary store is removed only
/// after the rename succeeds; on any error it is left untouched.
///
/// A half-written last row, as left by a crash during an append, is skipped
/// with a warning. Any other unreadable row fails the call.
pub fn finalize(temp_path: &Path, final_path: &Path) -> Result<FinalSummary, FinalizeError> {
    if !temp_path.is_file() {
        return Err(FinalizeError::MissingStore(temp_path.to_path_buf()));
    }
    if same_file(temp_path, final_path)? {
        return Err(FinalizeError::SameFile(temp_path.to_path_buf()));
    }

    let mut records = read_store(temp_path)?;
    // stable: rows sharing a code keep store order
    records.sort_by(|a, b| a.code.cmp(&b.code));

    let staging = staging_path(final_path);
    if let Err(e) = write_artifact(&staging, &records) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    fs::rename(&staging, final_path)?;
    fs::remove_file(temp_path)?;

    let summary = FinalSummary::from_records(&records);
    info!("Finalized {}. {}", final_path.display(), summary);
    Ok(summary)
}

fn same_file(temp_path: &Path, final_path: &Path) -> io::Result<bool> {
    if !final_path.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(temp_path)? == fs::canonicalize(final_path)?)
}

fn read_store(path: &Path) -> Result<Vec<QuoteRecord>, FinalizeError> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .map_err(FinalizeError::Read)?;
    let headers = reader.headers().map_err(FinalizeError::Read)?.clone();

    let mut records = Vec::new();
    let mut rows = reader.records().peekable();
    while let Some(row) = rows.next() {
        let parsed = row.and_then(|r| r.deserialize::<QuoteRecord>(Some(&headers)));
        match parsed {
            Ok(record) => records.push(record),
            Err(e) if rows.peek().is_none() && is_torn_tail(path, &e)? => {
                warn!("Skipping half-written last row of {}: {}", path.display(), e);
            }
            Err(e) => return Err(FinalizeError::Read(e)),
        }
    }
    Ok(records)
}

/// Whether a failed last row looks like an interrupted append.
fn is_torn_tail(path: &Path, error: &csv::Error) -> io::Result<bool> {
    if matches!(error.kind(), csv::ErrorKind::UnequalLengths { .. }) {
        return Ok(true);
    }
    Ok(!ends_with_newline(path)?)
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn write_artifact(path: &Path, records: &[QuoteRecord]) -> Result<(), FinalizeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(HEADERS).map_err(FinalizeError::Write)?;
    for r in records {
        writer.serialize(r).map_err(FinalizeError::Write)?;
    }
    writer.flush()?;
    Ok(())
}

fn staging_path(final_path: &Path) -> PathBuf {
    let mut name = final_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    final_path.with_file_name(name)
}
