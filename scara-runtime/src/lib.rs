// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Kinematic core of a planar SCARA manipulator.
//!
//! The `robot` module holds the kinematic chain: joints and links stored in
//! arenas inside the [`robot::Chain`], with forward kinematics propagated
//! outward from any joint that is rotated or moved. Chains are constructed
//! in sequence with the [`robot::ChainBuilder`].
//!
//! The `algorithm` module provides the analytic inverse kinematics of a two
//! link arm, its forward counterpart and the constant rate motion planner.
//! The [`runtime::Controller`] combines these: it solves a Cartesian
//! target, plans the joint motion and advances the chain one step per tick.
//!
//! All angles at the API boundary are in degrees.

pub mod algorithm;
pub mod core;
pub mod math;
pub mod robot;
pub mod runtime;

mod config;

pub use self::config::*;

pub use self::runtime::Controller;
pub use self::runtime::Error;

pub use nalgebra;

/// Runtime constants.
pub mod consts {
    /// Runtime version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Configuration file name.
    pub const CONFIG_FILE: &str = "scara.toml";

    /// System wide configuration path.
    pub const DEFAULT_CONFIG_PATH: &str = "/etc/scara/scara.toml";
}
