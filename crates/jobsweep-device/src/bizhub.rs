// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared adapter for Konica Minolta bizhub web consoles.
//
// Every bizhub model logs in, probes status and deletes jobs the same way;
// models only differ in where the active job list lives and how it is nested
// (see `BizhubModel`).

use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use jobsweep_core::device::PrinterDevice;
use jobsweep_core::error::{JobSweepError, Result};
use jobsweep_core::types::{
    DeviceParams, JobId, PARAM_ADMIN_PASSWORD, PARAM_HOSTNAME, PARAM_HTTPS,
};

use crate::session::DeviceSession;
use crate::xml;

/// Endpoint receiving the admin login form.
pub const LOGIN_ENDPOINT: &str = "/wcd/ulogin.cgi";

/// Endpoint receiving job management commands.
pub const DELETE_JOB_ENDPOINT: &str = "/wcd/user.cgi";

/// General device status document.
pub const COMMON_STATUS_ENDPOINT: &str = "/wcd/common.xml";

/// Printer status reported while paper is jammed.
pub const PAPER_JAM_CODE: &str = "140005";

/// Optional parameter accepting self-signed printer certificates.
pub const PARAM_ACCEPT_INVALID_CERTS: &str = "AcceptInvalidCerts";

/// What distinguishes one bizhub model from another.
pub trait BizhubModel: Send + Sync + 'static {
    /// Type identifier used in configuration and logs.
    const NAME: &'static str;

    /// Document listing active (including failed) jobs.
    const ACTIVE_JOBS_ENDPOINT: &'static str;

    /// Document carrying `/MFP/DeviceStatus`.
    const STATUS_ENDPOINT: &'static str = COMMON_STATUS_ENDPOINT;

    /// Printer status codes during which nothing is deleted.
    const NON_ERROR_CODES: &'static [&'static str] = &[PAPER_JAM_CODE];

    /// Select the IDs of failed jobs from the active job document.
    fn error_job_ids(document: &str) -> std::result::Result<Vec<JobId>, roxmltree::Error>;
}

/// A bizhub printer driven through its web console.
pub struct BizhubDevice<M> {
    hostname: String,
    admin_password: String,
    https: bool,
    session: DeviceSession,
    model: PhantomData<fn() -> M>,
}

impl<M: BizhubModel> BizhubDevice<M> {
    /// Build from configuration parameters.
    ///
    /// Requires `Hostname` and `AdminPassword`; `Https` and
    /// `AcceptInvalidCerts` default to `false`.
    pub fn from_params(params: &DeviceParams) -> Result<Self> {
        let hostname = params.require(PARAM_HOSTNAME)?.to_string();
        let admin_password = params.require(PARAM_ADMIN_PASSWORD)?.to_string();
        let https = params.flag(PARAM_HTTPS)?;
        let accept_invalid_certs = params.flag(PARAM_ACCEPT_INVALID_CERTS)?;

        let session = DeviceSession::new(&hostname, https, accept_invalid_certs)?;
        Ok(Self {
            hostname,
            admin_password,
            https,
            session,
            model: PhantomData,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn https(&self) -> bool {
        self.https
    }

    /// Log in as administrator.
    ///
    /// Sent before every privileged request: the printer drops sessions
    /// without telling us.
    async fn login(&self) -> Result<()> {
        // Ask for the HTML edition of the console.
        self.session.set_cookie("vm", "Html");
        self.session
            .post_form(
                LOGIN_ENDPOINT,
                &[
                    ("func", "PSL_LP0_TOP"),
                    ("R_ADM", "Admin"),
                    ("password", self.admin_password.as_str()),
                ],
            )
            .await
    }

    /// The printer status if it is one of the model's non-error codes.
    async fn non_error_status(&self) -> Result<Option<String>> {
        let body = self.session.get_text(M::STATUS_ENDPOINT).await?;
        let status = xml::device_status(&body)
            .map_err(|e| self.malformed(M::STATUS_ENDPOINT, e))?;

        let Some(status) = status else {
            return Ok(None);
        };

        let print_status = status.print_status.as_deref().unwrap_or("unknown");
        let scan_status = status.scan_status.as_deref().unwrap_or("unknown");
        debug!(
            device = %self,
            print_status,
            scan_status,
            "device status"
        );

        Ok(M::NON_ERROR_CODES
            .iter()
            .any(|code| *code == print_status)
            .then(|| print_status.to_string()))
    }

    fn malformed(&self, endpoint: &str, err: roxmltree::Error) -> JobSweepError {
        JobSweepError::MalformedResponse {
            url: self
                .session
                .url(endpoint)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| endpoint.to_string()),
            detail: err.to_string(),
        }
    }
}

#[async_trait]
impl<M: BizhubModel> PrinterDevice for BizhubDevice<M> {
    #[instrument(skip(self), fields(device = %self))]
    async fn failed_job_ids(&self) -> Result<Vec<JobId>> {
        self.login().await?;

        if let Some(code) = self.non_error_status().await? {
            info!(status = %code, "non-delete status, not deleting anything");
            return Ok(Vec::new());
        }

        let body = self.session.get_text(M::ACTIVE_JOBS_ENDPOINT).await?;
        M::error_job_ids(&body).map_err(|e| self.malformed(M::ACTIVE_JOBS_ENDPOINT, e))
    }

    #[instrument(skip(self, job_id), fields(device = %self, job_id = %job_id))]
    async fn delete_failed_job(&self, job_id: &JobId) -> Result<()> {
        self.login().await?;
        self.session
            .post_form(
                DELETE_JOB_ENDPOINT,
                &[("func", "PSL_J_DEL"), ("H_JID", job_id.as_str())],
            )
            .await
    }
}

impl<M: BizhubModel> std::fmt::Display for BizhubDevice<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", M::NAME, self.hostname)
    }
}

impl<M: BizhubModel> std::fmt::Debug for BizhubDevice<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(M::NAME)
            .field("hostname", &self.hostname)
            .field("https", &self.https)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KMC554Device;
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IDLE_STATUS: &str =
        "<MFP><DeviceStatus><PrintStatus>0</PrintStatus><ScanStatus>0</ScanStatus></DeviceStatus></MFP>";
    const JAMMED_STATUS: &str =
        "<MFP><DeviceStatus><PrintStatus>140005</PrintStatus></DeviceStatus></MFP>";
    const ACTIVE_JOBS: &str = r#"<MFP><JobList>
        <Job><JobID>31</JobID><JobStatus><Status>ErrorPrinting</Status></JobStatus></Job>
        <Job><JobID>32</JobID><JobStatus><Status>Printing</Status></JobStatus></Job>
        <Job><JobID>33</JobID><JobStatus><Status>ErrorPrinting</Status></JobStatus></Job>
    </JobList></MFP>"#;

    fn device_for(server: &MockServer) -> KMC554Device {
        let params = DeviceParams::new()
            .with(PARAM_HOSTNAME, server.address().to_string())
            .with(PARAM_ADMIN_PASSWORD, "s3cret");
        KMC554Device::from_params(&params).unwrap()
    }

    async fn mount_login(server: &MockServer, expected_logins: u64) {
        Mock::given(method("POST"))
            .and(path(LOGIN_ENDPOINT))
            .and(body_string_contains("func=PSL_LP0_TOP"))
            .and(body_string_contains("R_ADM=Admin"))
            .and(body_string_contains("password=s3cret"))
            .and(header_regex("cookie", "vm=Html"))
            .respond_with(ResponseTemplate::new(200))
            .expect(expected_logins)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn lists_error_jobs_after_login() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(COMMON_STATUS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string(IDLE_STATUS))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wcd/job_active.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACTIVE_JOBS))
            .expect(1)
            .mount(&server)
            .await;

        let device = device_for(&server);
        let ids = device.failed_job_ids().await.unwrap();
        assert_eq!(ids, vec![JobId::from("31"), JobId::from("33")]);
    }

    #[tokio::test]
    async fn paper_jam_skips_job_list() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(COMMON_STATUS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string(JAMMED_STATUS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wcd/job_active.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACTIVE_JOBS))
            .expect(0)
            .mount(&server)
            .await;

        let device = device_for(&server);
        assert!(device.failed_job_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_status_element_still_lists_jobs() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(COMMON_STATUS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<MFP/>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wcd/job_active.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACTIVE_JOBS))
            .mount(&server)
            .await;

        let device = device_for(&server);
        assert_eq!(device.failed_job_ids().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn server_error_on_job_list_is_http_status_fault() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(COMMON_STATUS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string(IDLE_STATUS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wcd/job_active.xml"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let device = device_for(&server);
        let err = device.failed_job_ids().await.unwrap_err();
        assert!(matches!(err, JobSweepError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn unparseable_job_list_is_malformed() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(COMMON_STATUS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string(IDLE_STATUS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wcd/job_active.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<MFP><JobList>"))
            .mount(&server)
            .await;

        let device = device_for(&server);
        let err = device.failed_job_ids().await.unwrap_err();
        assert!(matches!(err, JobSweepError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn delete_logs_in_again_every_time() {
        let server = MockServer::start().await;
        mount_login(&server, 2).await;
        Mock::given(method("POST"))
            .and(path(DELETE_JOB_ENDPOINT))
            .and(body_string_contains("func=PSL_J_DEL"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let device = device_for(&server);
        device.delete_failed_job(&JobId::from("31")).await.unwrap();
        device.delete_failed_job(&JobId::from("33")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let deletes: Vec<String> = requests
            .iter()
            .filter(|r| r.url.path() == DELETE_JOB_ENDPOINT)
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect();
        assert_eq!(deletes.len(), 2);
        assert!(deletes[0].contains("H_JID=31"));
        assert!(deletes[1].contains("H_JID=33"));
    }

    #[test]
    fn requires_hostname_and_password() {
        let params = DeviceParams::new().with(PARAM_HOSTNAME, "printer1");
        let err = KMC554Device::from_params(&params).err().unwrap();
        assert!(matches!(err, JobSweepError::MissingParameter(k) if k == "AdminPassword"));
    }

    #[test]
    fn display_names_model_and_host() {
        let params = DeviceParams::new()
            .with(PARAM_HOSTNAME, "printer1")
            .with(PARAM_ADMIN_PASSWORD, "x")
            .with(PARAM_HTTPS, "true");
        let device = KMC554Device::from_params(&params).unwrap();
        assert!(device.https());
        assert_eq!(device.hostname(), "printer1");
        assert_eq!(device.to_string(), "KMC554Device(printer1)");
    }
}
