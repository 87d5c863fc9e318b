use crate::simulation::{Direction, VehicleKind};
use log::warn;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lane files written by the external vehicle generator, one per approach.
pub const LANE_FILE_NAMES: [&str; 4] = ["lanea.txt", "laneb.txt", "lanec.txt", "laned.txt"];

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read lane file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to truncate lane file {path}: {source}")]
    Truncate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One spawn request from the file feed: `type,direction,speed` in the
/// generator's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRecord {
    pub kind: VehicleKind,
    pub direction: Direction,
    pub speed: f32,
}

/// Parses a single feed line. Returns `None` for malformed records; the
/// caller skips them and keeps processing (a bad record never aborts a tick).
pub fn parse_record(line: &str) -> Option<SpawnRecord> {
    let mut fields = line.trim().split(',');

    let kind = fields
        .next()?
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(VehicleKind::from_code)?;
    let direction = fields
        .next()?
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(Direction::from_code)?;
    let speed = fields.next()?.trim().parse::<f32>().ok()?;

    if fields.next().is_some() || speed < 0.0 {
        return None;
    }

    Some(SpawnRecord {
        kind,
        direction,
        speed,
    })
}

/// Polls the four lane files for spawn records, truncating each file after
/// reading so records are consumed exactly once.
pub struct LaneFeed {
    directory: PathBuf,
}

impl LaneFeed {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn poll(&mut self) -> Result<Vec<SpawnRecord>, FeedError> {
        let mut records = Vec::new();
        for name in LANE_FILE_NAMES {
            let path = self.directory.join(name);
            if !path.exists() {
                continue;
            }
            self.drain_file(&path, &mut records)?;
        }
        Ok(records)
    }

    fn drain_file(&self, path: &Path, records: &mut Vec<SpawnRecord>) -> Result<(), FeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        std::fs::write(path, "").map_err(|source| FeedError::Truncate {
            path: path.to_path_buf(),
            source,
        })?;

        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match parse_record(line) {
                Some(record) => records.push(record),
                None => warn!(
                    "skipping malformed spawn record {:?} in {}",
                    line,
                    path.display()
                ),
            }
        }
        Ok(())
    }
}
