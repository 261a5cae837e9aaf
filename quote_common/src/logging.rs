//! Logger initialisation shared by the binaries.
//!
//! Output goes to stderr and, when a log file is given, is also appended to
//! that file. The level defaults to `Info` and can be overridden with
//! `RUST_LOG`.
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::warn;

/// Writes every buffer to stderr and to an append-only file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Installs the global logger.
pub fn init(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    let open_failure = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
                None
            }
            Err(e) => Some((path.display().to_string(), e)),
        },
        None => None,
    };

    builder.init();

    if let Some((path, e)) = open_failure {
        warn!("Cannot open log file {}: {}. Logging to stderr only", path, e);
    }
}
