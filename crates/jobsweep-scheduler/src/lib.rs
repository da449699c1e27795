// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jobsweep scheduler — walks the printer fleet on a single background task,
// draining failed jobs from one device at a time and isolating devices that
// fault.

pub mod deleter;
pub mod drain;
pub mod signal;
pub mod sweep;

#[cfg(test)]
mod fake;

pub use deleter::JobDeleter;
pub use drain::{DrainOutcome, drain_device};
pub use signal::{StopHandle, StopSignal};
pub use sweep::run_sweep;
