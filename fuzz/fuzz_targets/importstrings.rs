#![no_main]

use libfuzzer_sys::fuzz_target;
use cdiscope::{try_parse_csharp_import_string, try_parse_visual_basic_import_string};

fuzz_target!(|data: &str| {
    let _ = try_parse_csharp_import_string(data);
    let _ = try_parse_visual_basic_import_string(data);
});
