// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted printer used by the scheduler tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use jobsweep_core::device::PrinterDevice;
use jobsweep_core::error::{JobSweepError, Result};
use jobsweep_core::types::JobId;

/// One scripted answer to `failed_job_ids`.
#[derive(Debug, Clone)]
pub enum Reply {
    Jobs(Vec<&'static str>),
    /// Same answer on every remaining call.
    Forever(Vec<&'static str>),
    Fault,
    /// Hang for this long, then report no jobs.
    Stall(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query(&'static str),
    Delete(&'static str, String),
}

/// Calls made against all fakes sharing this log, in order.
pub struct CallLog {
    tx: mpsc::UnboundedSender<(Instant, Call)>,
    rx: mpsc::UnboundedReceiver<(Instant, Call)>,
}

impl CallLog {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Wait for the next call.
    pub async fn next(&mut self) -> (Instant, Call) {
        self.rx.recv().await.expect("log sender kept alive by CallLog")
    }

    /// Every call recorded so far.
    pub fn drain(&mut self) -> Vec<Call> {
        let mut calls = Vec::new();
        while let Ok((_, call)) = self.rx.try_recv() {
            calls.push(call);
        }
        calls
    }

    pub fn device(&self, name: &'static str, script: Vec<Reply>) -> FakeDevice {
        FakeDevice {
            name,
            script: Mutex::new(script.into()),
            failing_delete: None,
            log: self.tx.clone(),
        }
    }
}

pub struct FakeDevice {
    name: &'static str,
    script: Mutex<VecDeque<Reply>>,
    failing_delete: Option<&'static str>,
    log: mpsc::UnboundedSender<(Instant, Call)>,
}

impl FakeDevice {
    /// Make deleting `job_id` fail with a transport fault.
    pub fn failing_delete(mut self, job_id: &'static str) -> Self {
        self.failing_delete = Some(job_id);
        self
    }

    fn record(&self, call: Call) {
        let _ = self.log.send((Instant::now(), call));
    }

    fn fault(&self) -> JobSweepError {
        JobSweepError::Transport {
            url: format!("http://{}/", self.name),
            detail: "connection refused".into(),
        }
    }
}

#[async_trait]
impl PrinterDevice for FakeDevice {
    async fn failed_job_ids(&self) -> Result<Vec<JobId>> {
        self.record(Call::Query(self.name));
        let reply = {
            let mut script = self.script.lock().unwrap();
            match script.front() {
                Some(Reply::Forever(jobs)) => Reply::Jobs(jobs.clone()),
                Some(_) => script.pop_front().unwrap(),
                None => Reply::Jobs(Vec::new()),
            }
        };
        match reply {
            Reply::Jobs(jobs) | Reply::Forever(jobs) => {
                Ok(jobs.into_iter().map(JobId::from).collect())
            }
            Reply::Fault => Err(self.fault()),
            Reply::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete_failed_job(&self, job_id: &JobId) -> Result<()> {
        self.record(Call::Delete(self.name, job_id.to_string()));
        if self.failing_delete == Some(job_id.as_str()) {
            return Err(self.fault());
        }
        Ok(())
    }
}

impl std::fmt::Display for FakeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fake({})", self.name)
    }
}
