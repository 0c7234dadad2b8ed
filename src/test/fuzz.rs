use crate::binary::{self, ReadOptions};
use crate::test::builder::Builder;
use crate::TagKind;

/// Inputs in the shape of those the fuzz targets throw at the decoder.

#[test]
fn partial_input_in_string() {
    let input = Builder::new().start_compound("some long name").build();
    assert!(binary::from_bytes(&input[0..3]).is_err());
}

#[test]
fn list_of_end() {
    let input = Builder::new()
        .start_compound("")
        .start_list("", TagKind::End, 1)
        .tag(TagKind::End)
        .end_compound()
        .build();

    assert!(binary::from_bytes(&input).is_err());
}

#[test]
fn huge_list_of_compounds_with_little_data() {
    let input = Builder::new()
        .start_compound("")
        .start_list("", TagKind::Compound, i32::MAX)
        .end_compound()
        .build();

    assert!(binary::from_bytes(&input).is_err());
}

#[test]
fn huge_size_over_fuzz_limit() {
    let input = Builder::new()
        .start_compound("")
        .tag(TagKind::ByteArray)
        .name("")
        .int_payload(101)
        .build();

    let opts = ReadOptions::new().max_seq_len(100);
    assert!(binary::from_bytes_with_opts(&input, opts)
        .unwrap_err()
        .is_malformed());
}

#[test]
fn trailing_bytes_are_left_alone() {
    let mut input = Builder::new().start_compound("").end_compound().build();
    input.extend_from_slice(&[0xFF, 0xFF]);

    let root = binary::from_bytes(&input).unwrap();
    assert!(root.value().is_empty());
}

#[test]
fn every_single_byte_prefix_fails_cleanly() {
    let input = Builder::new()
        .start_compound("r")
        .int("a", 1)
        .start_list("l", TagKind::String, 2)
        .string_payload("x")
        .string_payload("y")
        .long_array("arr", &[1, 2])
        .end_compound()
        .build();

    for len in 0..input.len() {
        assert!(binary::from_bytes(&input[..len]).is_err(), "prefix {}", len);
    }
    assert!(binary::from_bytes(&input).is_ok());
}
