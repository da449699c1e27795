// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cooperative stop signal shared between `JobDeleter` and its worker task.

use std::time::Duration;

use tokio::sync::watch;

/// Sending half, owned by whoever may request a stop.
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Ask the worker to stop at its next yield point.
    pub fn stop(&self) {
        // Nobody listening means the worker already exited.
        let _ = self.tx.send(true);
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiving half, polled by the worker at every loop boundary and wait.
///
/// If the [`StopHandle`] is dropped the signal counts as raised.
pub struct StopSignal {
    rx: watch::Receiver<bool>,
    // Held by `never()` so the channel cannot close.
    keepalive: Option<watch::Sender<bool>>,
}

impl StopSignal {
    /// A connected handle/signal pair.
    pub fn pair() -> (StopHandle, StopSignal) {
        let (tx, rx) = watch::channel(false);
        (
            StopHandle { tx },
            StopSignal {
                rx,
                keepalive: None,
            },
        )
    }

    /// A signal that is never raised, for one-shot runs.
    pub fn never() -> StopSignal {
        let (tx, rx) = watch::channel(false);
        StopSignal {
            rx,
            keepalive: Some(tx),
        }
    }

    /// Whether a stop has been requested.
    pub fn is_set(&self) -> bool {
        *self.rx.borrow() || (self.keepalive.is_none() && self.rx.has_changed().is_err())
    }

    /// Sleep for `delay` unless a stop arrives first.
    ///
    /// Returns `true` if the sleep was cut short (or a stop was already
    /// pending).
    pub async fn sleep(&mut self, delay: Duration) -> bool {
        if self.is_set() {
            return true;
        }
        let interrupted = tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = raised(&mut self.rx) => true,
        };
        interrupted || self.is_set()
    }
}

/// Resolves once the flag is set or the sender is gone.
async fn raised(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
