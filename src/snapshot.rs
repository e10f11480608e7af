//! JSON snapshots of an AirTouch system and of the host's area list.
//!
//! A snapshot stands in for the external driver's initial discovery result.

use crate::area::LocationRecord;
use crate::models::airtouch::{AcState, ConsoleState, ZoneState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub console: ConsoleState,
    pub air_conditioners: Vec<AcState>,
    pub zones: Vec<ZoneState>,
}

#[derive(Debug)]
pub enum SnapshotError {
    Io { path: String, source: std::io::Error },
    Json(serde_path_to_error::Error<serde_json::Error>),
    Invalid(String),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            SnapshotError::Json(e) => write!(f, "json error at {}: {}", e.path(), e.inner()),
            SnapshotError::Invalid(s) => write!(f, "invalid snapshot: {}", s),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SnapshotError::Io { source, .. } => Some(source),
            SnapshotError::Json(e) => Some(e.inner()),
            SnapshotError::Invalid(_) => None,
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for SnapshotError {
    fn from(value: serde_path_to_error::Error<serde_json::Error>) -> Self {
        SnapshotError::Json(value)
    }
}

impl SystemSnapshot {
    /// Checks the cross-references the driver would guarantee.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut ac_ids = BTreeSet::new();
        for ac in &self.air_conditioners {
            if !ac_ids.insert(ac.ac_id) {
                return Err(SnapshotError::Invalid(format!("duplicate ac id {}", ac.ac_id.0)));
            }
        }

        let mut zone_ids = BTreeSet::new();
        for zone in &self.zones {
            if !zone_ids.insert(zone.zone_id) {
                return Err(SnapshotError::Invalid(format!("duplicate zone id {}", zone.zone_id.0)));
            }
            if !ac_ids.contains(&zone.ac_id) {
                return Err(SnapshotError::Invalid(format!(
                    "zone {} references unknown ac {}",
                    zone.zone_id.0, zone.ac_id.0
                )));
            }
            if zone.current_damper_percentage > 100 {
                return Err(SnapshotError::Invalid(format!(
                    "zone {} damper percentage {} out of range",
                    zone.zone_id.0, zone.current_damper_percentage
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AreaEntry {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, SnapshotError> {
    let de = &mut serde_json::Deserializer::from_str(json);
    Ok(serde_path_to_error::deserialize(de)?)
}

fn read(path: &Path) -> Result<String, SnapshotError> {
    std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn parse_snapshot(json: &str) -> Result<SystemSnapshot, SnapshotError> {
    let snapshot: SystemSnapshot = parse_json(json)?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn load_snapshot(path: &Path) -> Result<SystemSnapshot, SnapshotError> {
    parse_snapshot(&read(path)?)
}

pub fn parse_areas(json: &str) -> Result<Vec<LocationRecord>, SnapshotError> {
    let entries: Vec<AreaEntry> = parse_json(json)?;
    Ok(entries
        .into_iter()
        .map(|e| LocationRecord::new(e.name, e.aliases))
        .collect())
}

pub fn load_areas(path: &Path) -> Result<Vec<LocationRecord>, SnapshotError> {
    parse_areas(&read(path)?)
}
