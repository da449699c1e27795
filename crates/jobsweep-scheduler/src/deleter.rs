// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background job deleter.
//
// Owns the device registry and the schedule, and runs the sweep loop on a
// single Tokio task. `stop` raises the stop signal and awaits the task, so
// once it returns no device is being touched any more. The task handle stays
// in place until that join completes, so a cancelled `stop` never lets a
// second worker start next to the first.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use jobsweep_core::device::DeviceList;
use jobsweep_core::error::{JobSweepError, Result};
use jobsweep_core::types::{SchedulePolicy, SchedulerStatus, SweepReport};

use crate::signal::{StopHandle, StopSignal};
use crate::sweep;

/// Periodically deletes failed jobs from every configured printer.
pub struct JobDeleter {
    /// Printers in sweep order. Shared read-only with the worker task.
    devices: Arc<DeviceList>,
    /// Delays between sweeps and between drain rounds.
    policy: SchedulePolicy,
    /// Stop signal for the running worker; re-armed on every start.
    stop_handle: Option<StopHandle>,
    /// Handle to the Tokio task running the sweep loop. Cleared only once the
    /// task has been joined.
    task_handle: Option<JoinHandle<()>>,
    /// Report of the most recently completed sweep.
    last_sweep: Arc<Mutex<Option<SweepReport>>>,
}

impl JobDeleter {
    /// Create a deleter in `Stopped` state. Call [`start`](Self::start) to
    /// begin sweeping.
    pub fn new(devices: DeviceList, policy: SchedulePolicy) -> Self {
        Self {
            devices: Arc::new(devices),
            policy,
            stop_handle: None,
            task_handle: None,
            last_sweep: Arc::new(Mutex::new(None)),
        }
    }

    /// `Running` from `start` until a `stop` has joined the worker.
    pub fn status(&self) -> SchedulerStatus {
        if self.task_handle.is_some() {
            SchedulerStatus::Running
        } else {
            SchedulerStatus::Stopped
        }
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Report of the last sweep that ran to completion or was interrupted.
    pub fn last_sweep(&self) -> Option<SweepReport> {
        self.last_sweep
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Spawn the worker task. Starting a running deleter does nothing.
    ///
    /// # Errors
    ///
    /// Fails when called outside a Tokio runtime, or while a worker whose
    /// stop was requested has not exited yet (finish it with `stop`).
    pub fn start(&mut self) -> Result<()> {
        if let Some(handle) = &self.task_handle {
            if !handle.is_finished() {
                if self.stop_handle.as_ref().is_some_and(StopHandle::is_raised) {
                    return Err(JobSweepError::Scheduler(
                        "previous worker is still stopping".to_string(),
                    ));
                }
                debug!("job deleter already running");
                return Ok(());
            }
            warn!("job deleter worker exited without being joined");
            self.task_handle = None;
            self.stop_handle = None;
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| JobSweepError::Scheduler(format!("no Tokio runtime: {e}")))?;

        let (stop_handle, stop_signal) = StopSignal::pair();
        let devices = Arc::clone(&self.devices);
        let last_sweep = Arc::clone(&self.last_sweep);
        let policy = self.policy;

        info!(
            devices = devices.len(),
            between_checks_secs = policy.time_between_checks.as_secs(),
            repetition_delay_secs = policy.check_repetition_delay.as_secs(),
            "starting job deleter"
        );

        let handle = runtime.spawn(sweep::run(devices, policy, stop_signal, last_sweep));

        self.stop_handle = Some(stop_handle);
        self.task_handle = Some(handle);
        Ok(())
    }

    /// Stop the worker and wait for it to exit. Stopping a stopped deleter
    /// does nothing.
    ///
    /// Safe to cancel: the deleter stays `Running` until a later `stop`
    /// completes the join.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.task_handle.as_mut() else {
            return Ok(());
        };

        info!("stopping job deleter");
        if let Some(stop_handle) = &self.stop_handle {
            stop_handle.stop();
        }

        let joined = handle.await;
        self.task_handle = None;
        self.stop_handle = None;
        joined.map_err(|e| JobSweepError::Scheduler(format!("task join: {e}")))?;

        info!("job deleter stopped");
        Ok(())
    }
}
