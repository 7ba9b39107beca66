#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let _ = ftp_deploy::infrastructure::transport::parse_listing(&lines);
    }
});
