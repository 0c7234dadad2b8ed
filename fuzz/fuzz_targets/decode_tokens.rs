#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtstream::binary::{self, ReadOptions};
use nbtstream::stream::TokenStream;

fuzz_target!(|data: &[u8]| {
    let opts = ReadOptions::new()
        .max_seq_len(100)
        .allow_jnbt_string_encoding(true);
    let mut reader = binary::read_with_opts(data, opts);
    while let Ok(Some(_)) = reader.next_token() {}
});
