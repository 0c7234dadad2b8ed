//! String encodings found in NBT strings.
//!
//! Conforming NBT uses Java's modified UTF-8: NUL is written as the overlong
//! pair `C0 80`, and characters outside the BMP are written as two 3-byte
//! surrogates rather than one 4-byte sequence. The `cesu8` crate's Java
//! variant handles exactly this.
//!
//! The JNBT library wrote plain UTF-8 instead. The two agree on most text, so
//! a reader that wants to accept both has to look at the bytes until it sees
//! something only one of them can produce.

use std::borrow::Cow;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringEncoding {
    Modified,
    Normal,
    /// Not proven either way yet.
    Unknown,
}

const TWO_BYTE_NULL_START: u8 = 0b1100_0000;
const TWO_BYTE_NULL_END: u8 = 0b1000_0000;
const TOP_5_BITS: u8 = 0b1111_1000;
const FOUR_BYTE_START: u8 = 0b1111_0000;
/// `1110` for a 3-byte sequence, then `1101`, the start of a surrogate.
const THREE_BYTE_SURROGATE_START: u8 = 0b1110_1101;
const TOP_3_BITS: u8 = 0b1110_0000;
/// Continuation of a surrogate's second byte.
const THREE_BYTE_SURROGATE_CONTINUATION: u8 = 0b1010_0000;

/// Find which encoding `bytes` must be in, if the bytes settle it.
pub(crate) fn guaranteed_encoding(bytes: &[u8]) -> StringEncoding {
    let mut saw_two_byte_null_start = false;
    let mut saw_surrogate_start = false;

    for &b in bytes {
        if b == TWO_BYTE_NULL_START {
            saw_two_byte_null_start = true;
        } else if saw_two_byte_null_start {
            if b == TWO_BYTE_NULL_END {
                return StringEncoding::Modified;
            }
            saw_two_byte_null_start = false;
        }

        if b & TOP_5_BITS == FOUR_BYTE_START {
            return StringEncoding::Normal;
        }

        if b == THREE_BYTE_SURROGATE_START {
            saw_surrogate_start = true;
        } else if saw_surrogate_start {
            if b & TOP_3_BITS == THREE_BYTE_SURROGATE_CONTINUATION {
                return StringEncoding::Modified;
            }
            saw_surrogate_start = false;
        }
    }

    StringEncoding::Unknown
}

pub(crate) fn decode(bytes: Vec<u8>, encoding: StringEncoding) -> Result<String> {
    match encoding {
        // cesu8 accepts plain UTF-8 when it happens to be valid, but modified
        // UTF-8 never contains a 4-byte sequence.
        StringEncoding::Modified if has_four_byte_start(&bytes) => Err(Error::nonunicode(bytes)),
        StringEncoding::Modified => match cesu8::from_java_cesu8(&bytes) {
            Ok(s) => Ok(s.into_owned()),
            Err(_) => Err(Error::nonunicode(bytes)),
        },
        StringEncoding::Normal | StringEncoding::Unknown => {
            String::from_utf8(bytes).map_err(|e| Error::nonunicode(e.into_bytes()))
        }
    }
}

fn has_four_byte_start(bytes: &[u8]) -> bool {
    bytes.iter().any(|&b| b & TOP_5_BITS == FOUR_BYTE_START)
}

pub(crate) fn encode(s: &str) -> Cow<'_, [u8]> {
    cesu8::to_java_cesu8(s)
}
