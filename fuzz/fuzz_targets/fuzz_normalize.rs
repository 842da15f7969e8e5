#![no_main]

use crossborder::soap::{Operation, locate_result, normalize, parse_xml};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = parse_xml(s) else {
        return;
    };
    for op in Operation::ALL {
        if let Ok(result) = locate_result(&doc, op) {
            let _ = normalize(op, result);
        }
    }
});
