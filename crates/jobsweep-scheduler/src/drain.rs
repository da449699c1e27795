// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-device drain: query, delete everything reported, wait, query again,
// until the printer reports no failed jobs.
//
// Printers stuck behind a jam tend to fail their queue one job at a time, so
// re-querying the same device after a short delay empties a backlog within a
// single sweep. Any fault ends the drain for this sweep; it never propagates.

use tracing::{debug, info, warn};

use jobsweep_core::device::PrinterDevice;
use jobsweep_core::error::classify_fault;
use jobsweep_core::types::SchedulePolicy;

use crate::signal::StopSignal;

/// How a drain ended. Each variant carries the number of accepted deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The device reported no failed jobs.
    Done { deleted: usize },
    /// A fault; the device is skipped for the rest of the sweep.
    Aborted { deleted: usize },
    /// A stop was requested.
    Stopped { deleted: usize },
}

impl DrainOutcome {
    pub fn deleted(&self) -> usize {
        match *self {
            Self::Done { deleted } | Self::Aborted { deleted } | Self::Stopped { deleted } => {
                deleted
            }
        }
    }
}

/// Drain one device.
pub async fn drain_device(
    device: &dyn PrinterDevice,
    policy: &SchedulePolicy,
    stop: &mut StopSignal,
) -> DrainOutcome {
    let mut deleted = 0;

    loop {
        if stop.is_set() {
            return DrainOutcome::Stopped { deleted };
        }

        debug!(device = %device, "fetching deletable jobs");
        let jobs = match device.failed_job_ids().await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(
                    device = %device,
                    fault = %classify_fault(&e),
                    error = %e,
                    "could not query printer, skipping it this sweep"
                );
                return DrainOutcome::Aborted { deleted };
            }
        };

        for job_id in &jobs {
            info!(device = %device, job_id = %job_id, "deleting job");
            if let Err(e) = device.delete_failed_job(job_id).await {
                warn!(
                    device = %device,
                    job_id = %job_id,
                    fault = %classify_fault(&e),
                    error = %e,
                    "could not delete job, skipping printer this sweep"
                );
                return DrainOutcome::Aborted { deleted };
            }
            deleted += 1;
        }

        if jobs.is_empty() {
            return DrainOutcome::Done { deleted };
        }

        debug!(
            device = %device,
            delay_secs = policy.check_repetition_delay.as_secs_f64(),
            "repetition delay"
        );
        if stop.sleep(policy.check_repetition_delay).await {
            debug!(device = %device, "repetition delay interrupted");
            return DrainOutcome::Stopped { deleted };
        }
    }
}
