// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for jobsweep.

use thiserror::Error;

/// Top-level error type for all jobsweep operations.
#[derive(Debug, Error)]
pub enum JobSweepError {
    // -- Device errors --
    #[error("transport failure talking to {url}: {detail}")]
    Transport { url: String, detail: String },

    #[error("{url} returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    // -- Configuration errors --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("missing device parameter: {0}")]
    MissingParameter(String),

    #[error("invalid value {value:?} for device parameter {key}")]
    InvalidParameter { key: String, value: String },

    // -- Scheduler --
    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, JobSweepError>;

/// Broad category of a failure, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    /// The device could not be reached or answered with an HTTP error.
    Transport,
    /// The device answered, but with something we could not interpret.
    Protocol,
    /// Local misconfiguration; never caused by a device.
    Configuration,
}

impl std::fmt::Display for FaultClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Protocol => write!(f, "protocol"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Classify a `JobSweepError` for logging.
///
/// The scheduler abandons a device for the current sweep regardless of the
/// class; the class only tells the operator where to look.
pub fn classify_fault(err: &JobSweepError) -> FaultClass {
    match err {
        JobSweepError::Transport { .. } | JobSweepError::HttpStatus { .. } => {
            FaultClass::Transport
        }
        JobSweepError::MalformedResponse { .. } | JobSweepError::Serialization(_) => {
            FaultClass::Protocol
        }
        JobSweepError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe => FaultClass::Transport,
            _ => FaultClass::Configuration,
        },
        JobSweepError::Config(_)
        | JobSweepError::UnknownDeviceType(_)
        | JobSweepError::MissingParameter(_)
        | JobSweepError::InvalidParameter { .. }
        | JobSweepError::Scheduler(_) => FaultClass::Configuration,
    }
}
