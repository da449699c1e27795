// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jobsweep — keeps network printer queues moving by deleting failed jobs
//
// Entry point. Initialises logging, loads the configuration, builds the
// device registry and runs the selected command.

mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use jobsweep_core::config::AppConfig;
use jobsweep_core::device::DeviceList;
use jobsweep_core::error::Result;
use jobsweep_core::types::SchedulePolicy;
use jobsweep_device::DeviceFactory;
use jobsweep_scheduler::{JobDeleter, StopSignal, run_sweep};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("jobsweep: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    info!("jobsweep starting");

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "jobsweep failed");
            eprintln!("jobsweep: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)?;
    let policy = config.schedule_policy()?;

    let devices = DeviceFactory::builtin().build_registry(&config.printer_devices);
    if devices.is_empty() {
        warn!(config = %config_path.display(), "no printer devices configured");
    }

    match cli.command_or_default() {
        Command::Run => run_until_interrupted(devices, policy).await,
        Command::Once => {
            let report = run_sweep(&devices, &policy, &mut StopSignal::never()).await;
            println!(
                "visited {} device(s), deleted {} job(s), {} device(s) faulted",
                report.devices_visited, report.jobs_deleted, report.devices_faulted
            );
            Ok(())
        }
        Command::List => {
            list_failed_jobs(&devices).await;
            Ok(())
        }
    }
}

/// Run the deleter until Enter or Ctrl-C.
async fn run_until_interrupted(devices: DeviceList, policy: SchedulePolicy) -> Result<()> {
    let mut deleter = JobDeleter::new(devices, policy);
    deleter.start()?;

    println!("Starting. Press Enter or Ctrl-C to stop.");

    // A blocking stdin read on the runtime would hold up shutdown, so the
    // Enter key is watched from a plain thread. A closed stdin leaves Ctrl-C
    // as the only way out.
    let (enter_tx, enter_rx) = oneshot::channel::<()>();
    std::thread::spawn(move || {
        let mut line = String::new();
        if matches!(std::io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            let _ = enter_tx.send(());
        }
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "cannot listen for Ctrl-C");
            }
        }
        Ok(()) = enter_rx => {}
    }

    println!("Stopping...");
    deleter.stop().await?;
    info!("jobsweep stopped");
    Ok(())
}

async fn list_failed_jobs(devices: &DeviceList) {
    for device in devices {
        match device.failed_job_ids().await {
            Ok(ids) if ids.is_empty() => println!("{device}: no failed jobs"),
            Ok(ids) => {
                let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                println!("{device}: {}", ids.join(", "));
            }
            Err(e) => println!("{device}: error: {e}"),
        }
    }
}
