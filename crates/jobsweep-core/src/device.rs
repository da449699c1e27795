// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The contract every printer family implements.
//
// The scheduler only ever sees `dyn PrinterDevice`. Implementations own their
// HTTP session and are driven strictly one call at a time.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::JobId;

/// A printer whose failed jobs can be listed and deleted.
#[async_trait]
pub trait PrinterDevice: Send + Sync + std::fmt::Display {
    /// Query the device for jobs currently in an error state.
    ///
    /// IDs come back in the order the device reports them. Implementations
    /// must (re-)authenticate before querying: sessions expire silently.
    async fn failed_job_ids(&self) -> Result<Vec<JobId>>;

    /// Delete one job.
    ///
    /// The job's state is not re-checked; callers only pass IDs obtained from
    /// [`failed_job_ids`](PrinterDevice::failed_job_ids).
    async fn delete_failed_job(&self, job_id: &JobId) -> Result<()>;
}

/// The ordered, read-only set of configured printers.
pub type DeviceList = Vec<Box<dyn PrinterDevice>>;
