// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device factory table.
//
// Maps a device type identifier from the configuration to a constructor
// taking the device's parameter map. Entries that cannot be built are logged
// and left out, so the scheduler only ever receives working adapters.

use std::collections::BTreeMap;

use tracing::{error, info};

use jobsweep_core::device::{DeviceList, PrinterDevice};
use jobsweep_core::error::{JobSweepError, Result};
use jobsweep_core::types::{DeviceParams, PARAM_TYPE};

use crate::bizhub::BizhubModel;
use crate::models::{KMC203, KMC203Device, KMC554, KMC554Device};

/// Builds one adapter from its configuration parameters.
pub type DeviceConstructor = fn(&DeviceParams) -> Result<Box<dyn PrinterDevice>>;

/// Lookup table from type identifier to constructor.
pub struct DeviceFactory {
    constructors: BTreeMap<&'static str, DeviceConstructor>,
}

impl Default for DeviceFactory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DeviceFactory {
    /// A factory that knows no device types.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A factory with every device type shipped in this crate.
    pub fn builtin() -> Self {
        let mut factory = Self::empty();
        factory.register(KMC554::NAME, kmc554);
        factory.register(KMC203::NAME, kmc203);
        factory
    }

    /// Register (or replace) a device type.
    pub fn register(&mut self, type_name: &'static str, constructor: DeviceConstructor) {
        self.constructors.insert(type_name, constructor);
    }

    /// Known type identifiers, sorted.
    pub fn known_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Construct the adapter described by `params`.
    pub fn create(&self, params: &DeviceParams) -> Result<Box<dyn PrinterDevice>> {
        let type_name = params
            .device_type()
            .ok_or_else(|| JobSweepError::MissingParameter(PARAM_TYPE.to_string()))?;
        let constructor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| JobSweepError::UnknownDeviceType(type_name.to_string()))?;
        constructor(params)
    }

    /// Construct every configured device, in configuration order.
    ///
    /// Failing entries are logged and skipped.
    pub fn build_registry(&self, configs: &[DeviceParams]) -> DeviceList {
        let mut devices = DeviceList::with_capacity(configs.len());
        for (index, params) in configs.iter().enumerate() {
            match self.create(params) {
                Ok(device) => {
                    info!(index, device = %device, "printer device configured");
                    devices.push(device);
                }
                Err(e) => {
                    error!(index, error = %e, "skipping printer device");
                }
            }
        }
        devices
    }
}

fn kmc554(params: &DeviceParams) -> Result<Box<dyn PrinterDevice>> {
    Ok(Box::new(KMC554Device::from_params(params)?))
}

fn kmc203(params: &DeviceParams) -> Result<Box<dyn PrinterDevice>> {
    Ok(Box::new(KMC203Device::from_params(params)?))
}
