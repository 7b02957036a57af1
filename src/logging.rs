use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct FileLogger {
    log_file: PathBuf,
    level: Level,
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let log_entry = format!("{timestamp} {} - {}\n", record.level(), record.args());

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Installs the file logger writing to `<log_dir>/log.txt`.
pub fn init(log_dir: &Path, debug: bool) -> io::Result<()> {
    create_dir_all(log_dir)?;

    let level = if debug { Level::Debug } else { Level::Info };
    let logger = LOGGER.get_or_init(|| FileLogger {
        log_file: log_dir.join("log.txt"),
        level,
    });

    log::set_logger(logger)
        .map(|()| log::set_max_level(LevelFilter::Debug))
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))
}
