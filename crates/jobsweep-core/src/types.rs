// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for jobsweep.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JobSweepError, Result};

/// Identifier of a job on one printer.
///
/// Opaque: it only has meaning on the device that reported it, and only until
/// the next query of that device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Key naming the printer host (optionally with `:port`).
pub const PARAM_HOSTNAME: &str = "Hostname";
/// Key carrying the admin password used for the web console login.
pub const PARAM_ADMIN_PASSWORD: &str = "AdminPassword";
/// Key switching the device to HTTPS.
pub const PARAM_HTTPS: &str = "Https";
/// Key selecting the device implementation.
pub const PARAM_TYPE: &str = "Type";
/// Legacy key selecting the device implementation by (dotted) class name.
pub const PARAM_CLASS: &str = "Class";

/// String-keyed parameters for one configured printer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceParams(BTreeMap<String, String>);

impl DeviceParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Fetch a parameter that must be present.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| JobSweepError::MissingParameter(key.to_string()))
    }

    /// Fetch an optional boolean parameter. Absent means `false`.
    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(v) if v.trim().eq_ignore_ascii_case("true") => Ok(true),
            Some(v) if v.trim().eq_ignore_ascii_case("false") => Ok(false),
            Some(v) => Err(JobSweepError::InvalidParameter {
                key: key.to_string(),
                value: v.to_string(),
            }),
        }
    }

    /// The device type identifier.
    ///
    /// `Type` wins; otherwise the last dotted segment of `Class` is used, so
    /// `KMBizhubDeviceModule.KMC554Device` selects `KMC554Device`.
    pub fn device_type(&self) -> Option<&str> {
        self.get(PARAM_TYPE).or_else(|| {
            self.get(PARAM_CLASS)
                .map(|class| class.rsplit('.').next().unwrap_or(class))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The two delays that drive the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Wait after a full sweep of the fleet before the next one.
    pub time_between_checks: Duration,
    /// Wait after deleting jobs on a device before querying it again.
    pub check_repetition_delay: Duration,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            time_between_checks: Duration::from_secs(5 * 60),
            check_repetition_delay: Duration::from_secs(20),
        }
    }
}

/// Lifecycle state of the background scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Stopped,
    Running,
}

/// Outcome of one pass over the fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Devices whose drain was started.
    pub devices_visited: usize,
    /// Delete commands that the devices accepted.
    pub jobs_deleted: usize,
    /// Devices abandoned for this sweep because of a fault.
    pub devices_faulted: usize,
    /// A stop request cut the sweep short.
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    pub fn begin() -> Self {
        let now = Utc::now();
        Self {
            devices_visited: 0,
            jobs_deleted: 0,
            devices_faulted: 0,
            interrupted: false,
            started_at: now,
            finished_at: now,
        }
    }
}
