//! Session files on local disk.
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use bart_task::{EventRecord, RecordSink, SessionInfo, write_csv};
use chrono::{DateTime, Local};
use log::{info, warn};
use thiserror::Error;

/// Highest numeric suffix tried before giving up on a free file name.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not create session file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write session file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes each session log to a fresh CSV file under `data_dir`.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    data_dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl CsvFileSink {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            last_path: None,
        }
    }

    /// Absolute path of the most recent file written, if any.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    fn create_fresh(&self, stem: &str) -> Result<(PathBuf, File), StorageError> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let name = if attempt == 1 {
                format!("{stem}.csv")
            } else {
                format!("{stem}_{attempt}.csv")
            };
            let path = self.data_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    warn!("{} already exists, trying another name", path.display());
                }
                Err(source) => return Err(StorageError::CreateFile { path, source }),
            }
        }
        Err(StorageError::CreateFile {
            path: self.data_dir.join(format!("{stem}.csv")),
            source: io::Error::from(io::ErrorKind::AlreadyExists),
        })
    }
}

impl RecordSink for CsvFileSink {
    type Error = StorageError;

    fn write_records(
        &mut self,
        info: &SessionInfo,
        records: &[EventRecord],
    ) -> Result<(), Self::Error> {
        if records.is_empty() {
            info!("no records for {}, nothing written", info.participant);
            return Ok(());
        }

        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::CreateDir {
            path: self.data_dir.clone(),
            source,
        })?;
        let (path, file) = self.create_fresh(&file_stem(info, Local::now()))?;
        write_or_discard(&path, file, records)?;

        let path = fs::canonicalize(&path).unwrap_or(path);
        info!("wrote {} records to {}", records.len(), path.display());
        self.last_path = Some(path);
        Ok(())
    }
}

/// Write `records` to the file just created at `path`, deleting it again if
/// the write fails so no truncated session file is left behind.
fn write_or_discard<W: Write>(
    path: &Path,
    file: W,
    records: &[EventRecord],
) -> Result<(), StorageError> {
    let mut writer = BufWriter::new(file);
    let written = write_csv(&mut writer, records)
        .and_then(|()| writer.flush().map_err(csv::Error::from));
    if let Err(source) = written {
        drop(writer);
        if let Err(err) = fs::remove_file(path) {
            warn!("could not remove partial file {}: {err}", path.display());
        }
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// `BART_<participant>_sess<session>_<YYYYMMDD_HHMMSS>`
pub fn file_stem(info: &SessionInfo, at: DateTime<Local>) -> String {
    format!(
        "BART_{}_sess{}_{}",
        sanitize(&info.participant),
        sanitize(&info.session),
        at.format("%Y%m%d_%H%M%S")
    )
}

// Identifiers are typed by the experimenter; keep them inside the data directory.
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bart_task::{BalloonType, EventKind, RewardParams, TrialConfig};
    use chrono::TimeZone;
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bart-cli-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_records(info: &SessionInfo) -> Vec<EventRecord> {
        let trial = TrialConfig {
            balloon_index: 1,
            balloon_type: BalloonType::Safe,
            explosion_threshold: 20,
            reward: RewardParams::new(1, 4, 5),
        };
        vec![
            EventRecord::new(info, &trial, EventKind::Pump, Duration::from_millis(800))
                .with_pumps(1)
                .with_gain(1)
                .with_points(1, 0),
            EventRecord::new(info, &trial, EventKind::Collect, Duration::from_millis(1_300))
                .with_pumps(1)
                .with_points(1, 1),
        ]
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_removes_the_partial_file() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("BART_P001_sess001_20240101_000000.csv");
        File::create(&path).unwrap();
        let info = SessionInfo::default();

        let err = write_or_discard(&path, FullDisk, &sample_records(&info)).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_stem_follows_naming_scheme() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let stem = file_stem(&SessionInfo::new("P001", "001"), at);
        assert_eq!(stem, "BART_P001_sess001_20240309_140507");
    }

    #[test]
    fn file_stem_keeps_separators_out() {
        let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stem = file_stem(&SessionInfo::new("../evil", "a b"), at);
        assert_eq!(stem, "BART____evil_sessa_b_20240101_000000");
    }

    #[test]
    fn empty_log_writes_nothing() {
        let dir = scratch_dir("empty");
        let mut sink = CsvFileSink::new(&dir);
        sink.write_records(&SessionInfo::default(), &[]).unwrap();
        assert!(sink.last_path().is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn writes_fresh_files_under_data_dir() {
        let dir = scratch_dir("write");
        let info = SessionInfo::new("P009", "002");
        let records = sample_records(&info);
        let mut sink = CsvFileSink::new(&dir);

        sink.write_records(&info, &records).unwrap();
        let first = sink.last_path().unwrap().to_path_buf();
        assert!(first.is_absolute());
        let contents = fs::read_to_string(&first).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.starts_with("participant,session,balloon,"));

        sink.write_records(&info, &records).unwrap();
        let second = sink.last_path().unwrap().to_path_buf();
        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(&first).unwrap(), contents);

        let _ = fs::remove_dir_all(&dir);
    }
}
