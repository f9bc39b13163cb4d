#![no_main]

use libfuzzer_sys::fuzz_target;
use cdiscope::metadata::customdebuginfo::{decode_record, parse_records, write_custom_debug_info_xml};

fuzz_target!(|data: &[u8]| {
    if let Ok(records) = parse_records(data) {
        for record in records.flatten() {
            let _ = decode_record(&record);
        }
    }
    let _ = write_custom_debug_info_xml(data);
});
