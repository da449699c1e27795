// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Concrete bizhub models.

use jobsweep_core::types::JobId;

use crate::bizhub::{BizhubDevice, BizhubModel};
use crate::xml;

/// bizhub C454, C554 and C554e.
pub struct KMC554;

impl BizhubModel for KMC554 {
    const NAME: &'static str = "KMC554Device";
    const ACTIVE_JOBS_ENDPOINT: &'static str = "/wcd/job_active.xml";

    fn error_job_ids(document: &str) -> Result<Vec<JobId>, roxmltree::Error> {
        xml::error_job_ids(document, &["MFP", "JobList", "Job"])
    }
}

/// bizhub C203. Print jobs sit one level deeper, under `Print`.
pub struct KMC203;

impl BizhubModel for KMC203 {
    const NAME: &'static str = "KMC203Device";
    const ACTIVE_JOBS_ENDPOINT: &'static str = "/wcd/job.xml";

    fn error_job_ids(document: &str) -> Result<Vec<JobId>, roxmltree::Error> {
        xml::error_job_ids(document, &["MFP", "JobList", "Print", "Job"])
    }
}

pub type KMC554Device = BizhubDevice<KMC554>;
pub type KMC203Device = BizhubDevice<KMC203>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bizhub::COMMON_STATUS_ENDPOINT;
    use jobsweep_core::device::PrinterDevice;
    use jobsweep_core::types::{DeviceParams, PARAM_ADMIN_PASSWORD, PARAM_HOSTNAME};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Captured from a C203 with one jammed and one waiting job.
    const C203_JOBS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MFP>
  <JobList>
    <Print>
      <Job>
        <JobID>2048</JobID>
        <JobStatus><Status>ErrorPrinting</Status></JobStatus>
      </Job>
      <Job>
        <JobID>2049</JobID>
        <JobStatus><Status>Waiting</Status></JobStatus>
      </Job>
    </Print>
    <Send>
      <Job>
        <JobID>77</JobID>
        <JobStatus><Status>ErrorPrinting</Status></JobStatus>
      </Job>
    </Send>
  </JobList>
</MFP>"#;

    #[test]
    fn c203_selects_only_print_jobs() {
        assert_eq!(
            KMC203::error_job_ids(C203_JOBS).unwrap(),
            vec![JobId::from("2048")]
        );
    }

    #[test]
    fn c554_does_not_see_c203_layout() {
        assert!(KMC554::error_job_ids(C203_JOBS).unwrap().is_empty());
    }

    #[tokio::test]
    async fn c203_reads_its_own_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(COMMON_STATUS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<MFP/>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wcd/job.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(C203_JOBS))
            .expect(1)
            .mount(&server)
            .await;

        let params = DeviceParams::new()
            .with(PARAM_HOSTNAME, server.address().to_string())
            .with(PARAM_ADMIN_PASSWORD, "x");
        let device = KMC203Device::from_params(&params).unwrap();
        assert_eq!(device.to_string(), format!("KMC203Device({})", server.address()));
        assert_eq!(
            device.failed_job_ids().await.unwrap(),
            vec![JobId::from("2048")]
        );
    }
}
