// Copyright 2024-2026 PARK-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for PARK-CORE commands.
//!
//! Each subcommand builds its own engine from environment configuration;
//! nothing outlives the process.
//!
//! ## Usage
//!
//! ```bash
//! park-core-cli demo       # Park, unpark and locate three sample vehicles
//! park-core-cli status     # Show lot availability
//! park-core-cli simulate   # Concurrent park/unpark load with audit
//! park-core-cli config     # Show, list defaults or validate configuration
//! ```

pub mod config_cmd;
pub mod demo;
pub mod simulate;
pub mod status;

pub use demo::{run_demo, DemoOutcome};
pub use simulate::{run_simulate, simulate, SimulationReport};
pub use status::run_status;

/// Exit code for configuration problems.
pub const EXIT_CONFIG_ERROR: i32 = 2;
