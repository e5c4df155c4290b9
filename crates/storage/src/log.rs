use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

#[allow(clippy::missing_errors_doc)]
pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

impl Entry {
    fn new(record: &Record) -> Self {
        Self {
            time: Utc::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

static LOGGER: Logger = Logger;

/// Install a logger printing to stderr and appending every record to `repository`.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(
    repository: Arc<Mutex<dyn Repository>>,
    level: LevelFilter,
) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Entry::new(record);
        eprintln!(
            "{} {:<5} {}: {}",
            entry.time,
            entry.level,
            record.target(),
            entry.message
        );

        let Ok(log) = LOG.lock() else {
            return;
        };
        if let Some(ref repository) = *log {
            if let Ok(repository) = repository.lock() {
                let _ = repository.write_entry(entry);
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::LocalStorage;

    use super::*;

    #[test]
    fn test_init() {
        let directory = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(directory.path()).unwrap();

        init(Arc::new(Mutex::new(storage.clone())), LevelFilter::Info).unwrap();
        assert!(init(Arc::new(Mutex::new(storage.clone())), LevelFilter::Debug).is_err());

        log::warn!("failed to get exercises: no connection");
        log::debug!("fetched 3 exercises");

        let entries = storage.read_entries().unwrap();
        let entry = entries
            .iter()
            .find(|e| e.message == "failed to get exercises: no connection")
            .unwrap();
        assert_eq!(entry.level, Level::Warn);
        assert!(!entries.iter().any(|e| e.message == "fetched 3 exercises"));
        assert_eq!(log::max_level(), LevelFilter::Info);
    }

    #[rstest]
    #[case(Level::Error, "Error")]
    #[case(Level::Warn, "Warn")]
    #[case(Level::Debug, "Debug")]
    fn test_entry_serialization(#[case] level: Level, #[case] expected: &str) {
        let entry = Entry {
            time: String::from("Mar 02 10:15:00"),
            level,
            message: String::from("failed to get exercises: no connection"),
        };
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({
                "time": "Mar 02 10:15:00",
                "level": expected,
                "message": "failed to get exercises: no connection",
            })
        );
        assert_eq!(serde_json::from_value::<Entry>(value).unwrap(), entry);
    }
}
