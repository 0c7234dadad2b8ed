#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtstream::{binary, Compound, RootEntry, Tag};

fuzz_target!(|v: Tag| {
    let root = RootEntry::new("", Compound::builder().put("", v).build());

    // Strings too long for their length prefix are refused, anything else
    // must come back unchanged.
    if let Ok(bs) = root.to_bytes() {
        assert_eq!(binary::from_bytes(&bs).unwrap(), root);
    }
});
