// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration, read from `Config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::error::{JobSweepError, Result};
use crate::types::{DeviceParams, SchedulePolicy};

/// File name looked up next to the executable when no path is given.
pub const CONFIG_FILE_NAME: &str = "Config.json";

/// Settings loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Minutes to wait between two sweeps of the fleet.
    pub time_between_checks_in_minutes: f64,
    /// Seconds to wait after deleting jobs before re-checking the same printer.
    pub check_repetition_delay_in_seconds: f64,
    /// One parameter set per configured printer, in file order.
    pub printer_devices: Vec<DeviceParams>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            time_between_checks_in_minutes: default_time_between_checks(),
            check_repetition_delay_in_seconds: default_check_repetition_delay(),
            printer_devices: Vec::new(),
        }
    }
}

fn default_time_between_checks() -> f64 {
    5.0
}

fn default_check_repetition_delay() -> f64 {
    20.0
}

/// On-disk shape. Device entries stay loosely typed so one bad entry does not
/// reject the whole file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConfig {
    #[serde(default = "default_time_between_checks")]
    time_between_checks_in_minutes: f64,
    #[serde(default = "default_check_repetition_delay")]
    check_repetition_delay_in_seconds: f64,
    #[serde(default)]
    printer_devices: Option<Value>,
}

impl AppConfig {
    /// `Config.json` in the directory containing the running executable.
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Load the configuration from `path`.
    ///
    /// A missing file is not an error: defaults are used and no printers are
    /// configured.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "config file does not exist, using defaults");
            return Ok(Self::default());
        }

        info!(path = %path.display(), "loading config file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse a configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let mut printer_devices = Vec::new();
        match raw.printer_devices {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.into_iter().enumerate() {
                    match entry {
                        Value::Object(fields) => {
                            printer_devices.push(
                                fields
                                    .into_iter()
                                    .map(|(key, value)| (key, stringify(value)))
                                    .collect(),
                            );
                        }
                        _ => error!(index, "PrinterDevices element is not an object, skipping"),
                    }
                }
            }
            Some(_) => error!("PrinterDevices is not an array, ignoring it"),
        }

        let config = Self {
            time_between_checks_in_minutes: raw.time_between_checks_in_minutes,
            check_repetition_delay_in_seconds: raw.check_repetition_delay_in_seconds,
            printer_devices,
        };
        config.schedule_policy()?;
        Ok(config)
    }

    /// Convert the configured delays into a [`SchedulePolicy`].
    pub fn schedule_policy(&self) -> Result<SchedulePolicy> {
        Ok(SchedulePolicy {
            time_between_checks: duration_from(
                "TimeBetweenChecksInMinutes",
                self.time_between_checks_in_minutes * 60.0,
            )?,
            check_repetition_delay: duration_from(
                "CheckRepetitionDelayInSeconds",
                self.check_repetition_delay_in_seconds,
            )?,
        })
    }
}

fn duration_from(setting: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| JobSweepError::Config(format!("{setting}: {e}")))
}

// Device parameters are plain strings; `"Https": true` and `"Https": "true"`
// must mean the same thing.
fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
