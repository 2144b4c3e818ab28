//! On-disk snapshots of trained parameters.
//!
//! A snapshot is a bincode-encoded record of the parameters together with the
//! running accuracy the network had when it was written. The network only
//! overwrites a snapshot with a more accurate one.

use crate::error::Result;
use crate::params::Parameters;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Running accuracy, in percent, when the snapshot was taken.
    pub accuracy: f64,
    pub parameters: Parameters,
}

impl Snapshot {
    pub fn new(accuracy: f64, parameters: Parameters) -> Self {
        Snapshot {
            accuracy,
            parameters,
        }
    }

    /// Reads a snapshot from `path`, rejecting parameters whose shapes are
    /// inconsistent.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = bincode::deserialize_from(reader)?;
        snapshot.parameters.validate()?;
        Ok(snapshot)
    }

    /// Writes the snapshot to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Returns the accuracy stored at `path`, or 0 if there is no readable
/// snapshot.
pub fn saved_accuracy<P: AsRef<Path>>(path: P) -> f64 {
    match Snapshot::read(path) {
        Ok(snapshot) => snapshot.accuracy,
        Err(e) => {
            debug!("no saved accuracy: {}", e);
            0.0
        }
    }
}
