#![no_main]

use libfuzzer_sys::fuzz_target;

use ftp_deploy::{leaf_directories, RelativePath};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let paths: Vec<RelativePath> = content.lines().map(RelativePath::new).collect();
        let leaves = leaf_directories(&paths);

        for (i, a) in leaves.iter().enumerate() {
            for b in &leaves[i + 1..] {
                assert!(!a.contains(b) && !b.contains(a), "{} and {} nest", a, b);
            }
        }
    }
});
