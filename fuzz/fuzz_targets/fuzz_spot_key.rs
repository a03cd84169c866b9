//! Fuzz target for spot key parsing.
//!
//! Any key that parses must render to a key that parses to the same
//! coordinate. The rendered text may differ from the input (`"00-0-1"`).

#![no_main]

use libfuzzer_sys::fuzz_target;
use park_core::grid::SpotCoord;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(coord) = text.parse::<SpotCoord>() {
        let key = coord.key();
        assert_eq!(key.parse::<SpotCoord>(), Ok(coord));
    }
});
