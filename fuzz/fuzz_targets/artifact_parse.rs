#![no_main]

use fatigue_scoring::{IsolationForest, StandardScaler};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing + validation must reject arbitrary input without panicking.
    let _ = IsolationForest::from_json(text);
    let _ = StandardScaler::from_json(text);
});
