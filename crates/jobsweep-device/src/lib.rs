// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jobsweep devices — adapters that list and delete failed jobs through a
// printer's web console, plus the factory table that builds them from
// configuration.

pub mod bizhub;
pub mod models;
pub mod registry;
pub mod session;
pub mod xml;

pub use bizhub::{BizhubDevice, BizhubModel};
pub use models::{KMC203Device, KMC554Device};
pub use registry::DeviceFactory;
