//! Runtime configuration.
//!
//! Integration options plus where the bridge gets its system from. Values come from
//! the process environment, optionally seeded from a `.env` file.

use crate::models::airtouch::ZoneId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const DEFAULT_MIN_TARGET_TEMPERATURE_STEP: f64 = 0.1;
pub const TARGET_TEMPERATURE_STEPS: [f64; 3] = [1.0, 0.5, 0.1];
pub const DEFAULT_SIMULATION_SEED: u64 = 5;

/// How excess airflow is handled by the installation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpillBypass {
    /// Airflow is dumped into designated spill zones.
    #[default]
    Spill,
    /// Airflow is returned through a bypass duct.
    Bypass,
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String, reason: String },
    EnvFile(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } => write!(f, "{}={:?}: {}", key, value, reason),
            ConfigError::EnvFile(s) => write!(f, "env file: {}", s),
        }
    }
}

impl Error for ConfigError {}

/// Options that shape the entities; may change while entities exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub allow_zone_hvac_mode_changes: bool,
    pub min_target_temperature_step: f64,
    pub spill_bypass: SpillBypass,
    pub spill_zones: Vec<ZoneId>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            allow_zone_hvac_mode_changes: false,
            min_target_temperature_step: DEFAULT_MIN_TARGET_TEMPERATURE_STEP,
            spill_bypass: SpillBypass::Spill,
            spill_zones: Vec::new(),
        }
    }
}

impl Options {
    /// Configured spill zones. A bypass installation has none.
    pub fn spill_zones(&self) -> &[ZoneId] {
        match self.spill_bypass {
            SpillBypass::Spill => &self.spill_zones,
            SpillBypass::Bypass => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub options: Options,
    /// System snapshot to load; a synthetic system is generated when unset.
    pub snapshot_file: Option<PathBuf>,
    pub areas_file: Option<PathBuf>,
    pub simulation_seed: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let allow_zone_hvac_mode_changes = match get("AIRTOUCH_ALLOW_ZONE_HVAC_MODE_CHANGES") {
            Some(v) => parse_bool("AIRTOUCH_ALLOW_ZONE_HVAC_MODE_CHANGES", &v)?,
            None => false,
        };

        let min_target_temperature_step = match get("AIRTOUCH_MIN_TARGET_TEMPERATURE_STEP") {
            Some(v) => parse_step("AIRTOUCH_MIN_TARGET_TEMPERATURE_STEP", &v)?,
            None => DEFAULT_MIN_TARGET_TEMPERATURE_STEP,
        };

        let spill_bypass = match get("AIRTOUCH_SPILL_BYPASS").as_deref() {
            None => SpillBypass::Spill,
            Some(v) if v.eq_ignore_ascii_case("spill") => SpillBypass::Spill,
            Some(v) if v.eq_ignore_ascii_case("bypass") => SpillBypass::Bypass,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: "AIRTOUCH_SPILL_BYPASS",
                    value: v.to_string(),
                    reason: "expected `spill` or `bypass`".to_string(),
                });
            }
        };

        let spill_zones = match get("AIRTOUCH_SPILL_ZONES") {
            Some(v) => parse_zone_list("AIRTOUCH_SPILL_ZONES", &v)?,
            None => Vec::new(),
        };
        if spill_bypass == SpillBypass::Bypass && !spill_zones.is_empty() {
            debug!("Ignoring spill zones {:?} in a bypass installation", spill_zones);
        }

        let simulation_seed = match get("AIRTOUCH_SIMULATION_SEED") {
            Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "AIRTOUCH_SIMULATION_SEED",
                value: v.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_SIMULATION_SEED,
        };

        Ok(Config {
            options: Options {
                allow_zone_hvac_mode_changes,
                min_target_temperature_step,
                spill_bypass,
                spill_zones,
            },
            snapshot_file: get("AIRTOUCH_SNAPSHOT_FILE").map(PathBuf::from),
            areas_file: get("AIRTOUCH_AREAS_FILE").map(PathBuf::from),
            simulation_seed,
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_step(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    };
    let step = value.parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    TARGET_TEMPERATURE_STEPS
        .into_iter()
        .find(|s| (s - step).abs() < 1e-9)
        .ok_or_else(|| invalid("expected one of 1.0, 0.5, 0.1".to_string()))
}

fn parse_zone_list(key: &'static str, value: &str) -> Result<Vec<ZoneId>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>().map(ZoneId).map_err(|e| ConfigError::Invalid {
                key,
                value: value.to_string(),
                reason: format!("bad zone id {:?}: {}", s, e),
            })
        })
        .collect()
}

// =====================
// .env files
// =====================

#[derive(Debug)]
pub struct LoadedEnvFile {
    pub path: PathBuf,
    /// Given on the command line rather than picked up from the working directory.
    pub explicit: bool,
}

/// Loads `explicit` if given, otherwise `./.env` when present.
pub fn load_env(explicit: Option<PathBuf>) -> Result<Option<LoadedEnvFile>, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::EnvFile(format!("not found: {}", path.display())));
        }
        apply_env_file(&path)?;
        return Ok(Some(LoadedEnvFile { path, explicit: true }));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| ConfigError::EnvFile(format!("unable to read current directory: {}", e)))?;
    let path = cwd.join(".env");
    if !path.is_file() {
        return Ok(None);
    }
    apply_env_file(&path)?;
    Ok(Some(LoadedEnvFile { path, explicit: false }))
}

fn apply_env_file(path: &Path) -> Result<(), ConfigError> {
    for (key, value) in read_env_file(path)? {
        // Variables already in the process environment win.
        if std::env::var_os(&key).is_none() {
            // Updating process-level environment variables is unsafe on some targets.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let file = File::open(path).map_err(|e| ConfigError::EnvFile(format!("failed to open {}: {}", path.display(), e)))?;
    let mut assignments = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let at = |e: String| ConfigError::EnvFile(format!("{}:{}: {}", path.display(), index + 1, e));
        let line = line.map_err(|e| at(e.to_string()))?;
        if let Some(assignment) = parse_env_line(&line).map_err(at)? {
            assignments.push(assignment);
        }
    }
    Ok(assignments)
}

/// Parses `[export] KEY=value`. Blank lines and comments yield `None`.
pub fn parse_env_line(line: &str) -> Result<Option<(String, String)>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

    let (key, raw) = line.split_once('=').ok_or_else(|| "missing '=' in assignment".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("environment variable name cannot be empty".to_string());
    }
    if key.contains(char::is_whitespace) {
        return Err(format!("environment variable name contains whitespace: {}", key));
    }

    let raw = raw.trim();
    let value = match raw.chars().next() {
        Some(quote @ ('"' | '\'')) => parse_quoted(&raw[1..], quote)?,
        _ => raw.split('#').next().unwrap_or_default().trim_end().to_string(),
    };
    Ok(Some((key.to_string(), value)))
}

/// Escapes are only interpreted inside double quotes.
fn parse_quoted(input: &str, quote: char) -> Result<String, String> {
    let mut value = String::new();
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if quote == '"' => {
                let escaped = chars.next().ok_or_else(|| "unterminated escape sequence".to_string())?;
                value.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
            }
            c if c == quote => {
                let rest = chars.as_str().trim();
                return if rest.is_empty() || rest.starts_with('#') {
                    Ok(value)
                } else {
                    Err("unexpected characters after closing quote".to_string())
                };
            }
            c => value.push(c),
        }
    }
    Err("unterminated quoted value".to_string())
}
