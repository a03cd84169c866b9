//! Fuzz target for layout parsing and engine operations.
//!
//! Builds a small lot from an arbitrary inline layout, then replays an
//! arbitrary operation sequence. The engine must never panic and must pass
//! its audit afterwards.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use park_core::engine::ParkingEngine;
use park_core::grid::{LayoutTemplate, VehicleClass};

#[derive(Debug, Arbitrary)]
enum Op {
    Park { class: u8, vehicle: u8 },
    Unpark { key: String, vehicle: u8 },
    Search { vehicle: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    layout: String,
    floors: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let template = LayoutTemplate::parse_inline(&input.layout);
    let rows = template.row_count().min(16);
    let columns = template.column_count().min(16);
    let floors = usize::from(input.floors % 4);

    let Ok(engine) = ParkingEngine::with_layout(floors, rows, columns, &template) else {
        return;
    };

    for op in input.ops.iter().take(256) {
        match op {
            Op::Park { class, vehicle } => {
                let class = VehicleClass::ALL[usize::from(*class) % VehicleClass::ALL.len()];
                let _ = engine.park(class, &format!("V{vehicle}"));
            }
            Op::Unpark { key, vehicle } => {
                let _ = engine.unpark(key, &format!("V{vehicle}"));
            }
            Op::Search { vehicle } => {
                let _ = engine.search_vehicle(&format!("V{vehicle}"));
            }
        }
    }

    assert!(engine.audit().is_empty());
});
