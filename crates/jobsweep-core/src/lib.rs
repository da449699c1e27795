// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jobsweep — Core types, errors, configuration and the printer device
// contract shared across all crates.

pub mod config;
pub mod device;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use device::{DeviceList, PrinterDevice};
pub use error::{FaultClass, JobSweepError, Result, classify_fault};
pub use types::*;
