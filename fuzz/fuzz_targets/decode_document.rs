#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtstream::binary::{self, ReadOptions};

fuzz_target!(|data: &[u8]| {
    let root = binary::from_bytes_with_opts(data, ReadOptions::new().max_seq_len(100));
    if let Ok(root) = root {
        let bs = root.to_bytes().unwrap();
        assert_eq!(binary::from_bytes(&bs).unwrap(), root);
    }
});
