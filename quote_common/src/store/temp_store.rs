//! Append-only temporary store.
//!
//! Workers hand each finished record to a `RecordSink`. `TempStore` is the
//! file-backed sink: a CSV file guarded by a mutex, flushed after every
//! record so a crash loses at most the record being written.

use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;

use crate::error::WriteError;
use crate::record::{HEADERS, QuoteRecord};

/// Destination for finished records, callable from many workers at once.
pub trait RecordSink: Sync {
    /// Durably appends one record; visible to readers once this returns `Ok`.
    fn append(&self, record: &QuoteRecord) -> Result<(), WriteError>;
}

/// CSV-backed temporary store shared by all workers.
pub struct TempStore {
    path: PathBuf,
    writer: Mutex<csv::Writer<BufWriter<File>>>,
}

impl TempStore {
    /// Creates (or resets) the store at `path` and writes the header row.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        writer.write_record(HEADERS)?;
        writer.flush()?;
        debug!("Temporary store reset at {}", path.display());

        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    /// Location of the store on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for TempStore {
    fn append(&self, record: &QuoteRecord) -> Result<(), WriteError> {
        let mut writer = self.writer.lock()?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::StockCode;
    use crate::record::QuoteStatus;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn read_records(path: &Path) -> Vec<QuoteRecord> {
        csv::Reader::from_path(path)
            .unwrap()
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn create_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp.csv");
        let _store = TempStore::create(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{}\n", HEADERS.join(",")));
    }

    #[test]
    fn create_resets_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("temp.csv");
        {
            let store = TempStore::create(&path).unwrap();
            store.append(&QuoteRecord::error("00001".into())).unwrap();
        }
        let _store = TempStore::create(&path).unwrap();
        assert!(read_records(&path).is_empty());
    }

    #[test]
    fn append_is_visible_before_store_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp.csv");
        let store = TempStore::create(&path).unwrap();

        store
            .append(&QuoteRecord::failed("00005".into(), None, QuoteStatus::NotFound))
            .unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, QuoteStatus::NotFound);
    }

    #[test]
    fn concurrent_appends_keep_every_row_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temp.csv");
        let store = Arc::new(TempStore::create(&path).unwrap());

        let handles: Vec<_> = (0..5)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..10 {
                        let code = StockCode::new(format!("{:05}", worker * 10 + i + 1));
                        let mut rec = QuoteRecord::failed(code, None, QuoteStatus::Ok);
                        rec.close = Some("1.00".to_string());
                        rec.volume = Some(1_000);
                        store.append(&rec).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let records = read_records(&path);
        assert_eq!(records.len(), 50);
        let distinct: HashSet<_> = records.iter().map(|r| r.code.clone()).collect();
        assert_eq!(distinct.len(), 50);
        assert!(records.iter().all(|r| r.close.as_deref() == Some("1.00")));
    }
}
