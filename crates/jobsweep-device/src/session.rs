// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cookie-aware HTTP session bound to one printer's web console.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::{Client, Url};
use tracing::debug;

use jobsweep_core::error::{JobSweepError, Result};
use jobsweep_core::types::PARAM_HOSTNAME;

/// Connect timeout for every request to a printer.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Overall timeout for every request to a printer.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// HTTP client plus the cookie jar holding the printer's session cookie.
///
/// The session is never validated locally; callers log in again before each
/// privileged action.
pub struct DeviceSession {
    base: Url,
    jar: Arc<Jar>,
    client: Client,
}

impl DeviceSession {
    /// Build a session for `hostname` (optionally `host:port`).
    pub fn new(hostname: &str, https: bool, accept_invalid_certs: bool) -> Result<Self> {
        let scheme = if https { "https" } else { "http" };
        let base: Url = format!("{scheme}://{hostname}")
            .parse()
            .map_err(|_| JobSweepError::InvalidParameter {
                key: PARAM_HOSTNAME.to_string(),
                value: hostname.to_string(),
            })?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| JobSweepError::Config(format!("HTTP client for {hostname}: {e}")))?;

        Ok(Self { base, jar, client })
    }

    /// Absolute URL of `endpoint` on this printer.
    pub fn url(&self, endpoint: &str) -> Result<Url> {
        self.base
            .join(endpoint)
            .map_err(|e| JobSweepError::Config(format!("endpoint {endpoint}: {e}")))
    }

    /// Store a cookie for the whole printer host.
    pub fn set_cookie(&self, name: &str, value: &str) {
        self.jar
            .add_cookie_str(&format!("{name}={value}; Path=/"), &self.base);
    }

    /// GET `endpoint` and return the body as text.
    pub async fn get_text(&self, endpoint: &str) -> Result<String> {
        let url = self.url(endpoint)?;
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        check_status(&url, response.status())?;

        response.text().await.map_err(|e| transport(&url, e))
    }

    /// POST a urlencoded form to `endpoint`. The response body is discarded.
    pub async fn post_form(&self, endpoint: &str, fields: &[(&str, &str)]) -> Result<()> {
        let url = self.url(endpoint)?;
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        check_status(&url, response.status())
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

fn transport(url: &Url, err: reqwest::Error) -> JobSweepError {
    JobSweepError::Transport {
        url: url.to_string(),
        detail: err.to_string(),
    }
}

fn check_status(url: &Url, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(JobSweepError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
