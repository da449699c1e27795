// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fleet sweep: drain every device in registry order, then wait the
// inter-cycle delay and go again until stopped.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use jobsweep_core::device::PrinterDevice;
use jobsweep_core::types::{SchedulePolicy, SweepReport};

use crate::drain::{DrainOutcome, drain_device};
use crate::signal::StopSignal;

/// One pass over `devices`, strictly in order.
pub async fn run_sweep(
    devices: &[Box<dyn PrinterDevice>],
    policy: &SchedulePolicy,
    stop: &mut StopSignal,
) -> SweepReport {
    let mut report = SweepReport::begin();

    for device in devices {
        if stop.is_set() {
            report.interrupted = true;
            break;
        }

        report.devices_visited += 1;
        let outcome = drain_device(device.as_ref(), policy, stop).await;
        report.jobs_deleted += outcome.deleted();
        match outcome {
            DrainOutcome::Done { .. } => {}
            DrainOutcome::Aborted { .. } => report.devices_faulted += 1,
            DrainOutcome::Stopped { .. } => {
                report.interrupted = true;
                break;
            }
        }
    }

    report.finished_at = Utc::now();
    report
}

/// Sweep until `stop` is raised. Body of the `JobDeleter` worker task.
pub(crate) async fn run(
    devices: Arc<Vec<Box<dyn PrinterDevice>>>,
    policy: SchedulePolicy,
    mut stop: StopSignal,
    last_sweep: Arc<Mutex<Option<SweepReport>>>,
) {
    info!(devices = devices.len(), "job deleter running");

    while !stop.is_set() {
        let report = run_sweep(&devices, &policy, &mut stop).await;
        info!(
            visited = report.devices_visited,
            deleted = report.jobs_deleted,
            faulted = report.devices_faulted,
            interrupted = report.interrupted,
            "sweep finished"
        );
        let interrupted = report.interrupted;
        *last_sweep.lock().unwrap_or_else(PoisonError::into_inner) = Some(report);
        if interrupted {
            break;
        }

        debug!(
            delay_secs = policy.time_between_checks.as_secs(),
            "sleeping until next sweep"
        );
        if stop.sleep(policy.time_between_checks).await {
            debug!("sleep interrupted");
            break;
        }
    }

    info!("job deleter stopped");
}
