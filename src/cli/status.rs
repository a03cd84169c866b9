// Copyright 2024-2026 PARK-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Status command: availability of a freshly configured lot.

use crate::config::EnvConfig;
use crate::engine::LotSnapshot;

/// Render a snapshot as aligned text.
pub fn format_snapshot(snapshot: &LotSnapshot) -> String {
    let mut out = format!(
        "Lot: {} floor(s) x {} row(s) x {} column(s)\n",
        snapshot.floors, snapshot.rows, snapshot.columns
    );
    for class in &snapshot.classes {
        out.push_str(&format!(
            "  {:<11} {:>5} free / {:>5} total\n",
            class.class.name(),
            class.free,
            class.total
        ));
    }
    out.push_str(&format!("Parked vehicles: {}\n", snapshot.parked));
    out
}

/// Print lot status. Returns the process exit code.
pub fn run_status(config: &EnvConfig, json_output: bool) -> i32 {
    let engine = match crate::engine_from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid layout: {}", e);
            return super::EXIT_CONFIG_ERROR;
        }
    };
    let snapshot = engine.snapshot();

    if json_output {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize status: {}", e);
                return 1;
            }
        }
    } else {
        print!("{}", format_snapshot(&snapshot));
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ParkingEngine;
    use crate::grid::LayoutTemplate;

    #[test]
    fn test_format_lists_every_class() {
        let template = LayoutTemplate::new([["B-1", "M-1", "A-1"], ["B-0", "M-1", "A-0"]]);
        let engine = ParkingEngine::with_layout(1, 2, 3, &template).unwrap();
        let text = format_snapshot(&engine.snapshot());

        assert!(text.starts_with("Lot: 1 floor(s) x 2 row(s) x 3 column(s)"));
        assert!(text.contains("bicycle"));
        assert!(text.contains("motorcycle"));
        assert!(text.contains("automobile"));
        assert!(text.contains("Parked vehicles: 0"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let engine = ParkingEngine::with_layout(1, 1, 1, &LayoutTemplate::new([["M-1"]])).unwrap();
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["parked"], 0);
        assert_eq!(json["classes"][1]["class"], "Motorcycle");
        assert_eq!(json["classes"][1]["free"], 1);
    }
}
