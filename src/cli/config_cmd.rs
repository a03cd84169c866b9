// Copyright 2024-2026 PARK-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These read configuration directly from environment variables.

use std::path::Path;

use crate::config::{
    self, EffectiveConfig, EnvConfig, LayoutSource, DEFAULT_FLOORS, DEFAULT_LAYOUT,
    DEFAULT_SIM_OPS,
};
use crate::grid::{CellSpec, Grid};

/// Print effective config as key-value pairs to stdout.
pub fn run_show(config: &EnvConfig) {
    print_config(&config.effective_config());
    println!("# layout source: {}", layout_origin(config));
}

/// Print documented default values to stdout.
pub fn run_defaults() {
    println!("PARK_CORE_FLOORS={}", DEFAULT_FLOORS);
    println!("PARK_CORE_LAYOUT={}", DEFAULT_LAYOUT);
    println!("PARK_CORE_LAYOUT_FILE=");
    println!("PARK_CORE_LOG_LEVEL=info");
    println!("PARK_CORE_LOG_FORMAT=pretty");
    println!("PARK_CORE_SIM_WORKERS=0");
    println!("PARK_CORE_SIM_OPS={}", DEFAULT_SIM_OPS);
}

/// Collect warnings about the configuration and the layout file it names.
pub fn validate(config: &EnvConfig, layout_file: Option<&Path>) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(path) = layout_file {
        if let Err(e) = config::load_layout_file(path) {
            warnings.push(e.to_string());
        }
    }

    let (rows, columns) = (config.rows(), config.columns());
    if rows == 0 || columns == 0 {
        warnings.push("layout has no cells; no vehicle can park".to_string());
    }
    for r in 0..rows {
        for c in 0..columns {
            match config.layout.cell(r, c) {
                None => warnings.push(format!(
                    "row {} has no cell at column {}; spot is inactive",
                    r, c
                )),
                Some(code) if marked_active_without_class(code) => warnings.push(format!(
                    "cell {}-{} code {:?} is flagged active but has no known class; spot is inactive",
                    r, c, code
                )),
                Some(_) => {}
            }
        }
    }

    if let Err(e) = Grid::new(config.floors, rows, columns, &config.layout) {
        warnings.push(e.to_string());
    }
    warnings
}

fn marked_active_without_class(code: &str) -> bool {
    CellSpec::parse(code).class.is_none() && code.split('-').nth(1) == Some("1")
}

/// Validate configuration. Returns 0 if valid, 1 if any warnings are found.
pub fn run_validate(config: &EnvConfig) -> i32 {
    let layout_file = std::env::var_os("PARK_CORE_LAYOUT_FILE");
    let warnings = validate(config, layout_file.as_deref().map(Path::new));
    for warning in &warnings {
        eprintln!("WARNING: {}", warning);
    }
    if warnings.is_empty() {
        println!("Configuration is valid.");
        0
    } else {
        1
    }
}

fn print_config(cfg: &EffectiveConfig) {
    println!("PARK_CORE_FLOORS={}", cfg.floors);
    println!("PARK_CORE_LAYOUT={}", cfg.layout);
    println!(
        "PARK_CORE_LAYOUT_FILE={}",
        cfg.layout_file.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
    );
    println!("PARK_CORE_LOG_LEVEL={}", cfg.log_level);
    println!("PARK_CORE_LOG_FORMAT={}", cfg.log_format);
    println!("PARK_CORE_SIM_WORKERS={}", cfg.sim_workers);
    println!("PARK_CORE_SIM_OPS={}", cfg.sim_ops);
    println!("# grid: {}x{}x{}", cfg.floors, cfg.rows, cfg.columns);
}

/// Describe where the layout came from.
pub fn layout_origin(config: &EnvConfig) -> String {
    match &config.layout_source {
        LayoutSource::Default => "built-in default".to_string(),
        LayoutSource::Inline => "PARK_CORE_LAYOUT".to_string(),
        LayoutSource::File(path) => path.display().to_string(),
    }
}
