#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing must never panic
        let _ = toml::from_str::<ftp_deploy::Config>(content);
        let _ = ftp_deploy::config::parse_with_warnings(content, Path::new("ftp-deploy.toml"));
    }
});
