//! Contains the Error and Result type used throughout the crate.
use std::fmt::Display;

use crate::TagKind;

/// Various errors that can occur while decoding, encoding or assembling NBT.
///
/// Every error is fatal to the operation that raised it. Nothing in this crate
/// attempts to skip past bad input and carry on.
#[derive(Debug)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The token sequence broke the structural contract. An unexpected token
    /// where a specific one was required, a missing End for an opened Start,
    /// or an array or list whose delivered element count did not match its
    /// declared size.
    MalformedStream,

    /// A kind id outside `0..=12`, or END used where a value kind is needed.
    InvalidTag,

    /// A value that cannot be built, such as a list holding an element of the
    /// wrong kind, or a string too long to be length prefixed.
    InvalidConstruction,

    /// Expected unicode data but was not valid. Contained bytes are the
    /// invalid data.
    Nonunicode(Vec<u8>),

    /// The underlying reader or writer failed. The original error is kept
    /// untouched.
    Io(std::io::Error),
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedStream)
    }

    pub fn is_invalid_tag(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidTag)
    }

    pub fn is_invalid_construction(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidConstruction)
    }

    pub fn is_nonunicode(&self) -> bool {
        matches!(self.kind, ErrorKind::Nonunicode(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io(_))
    }

    /// The IO error that caused this error, if any.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match &self.kind {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::MalformedStream,
        }
    }

    pub(crate) fn invalid_construction(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::InvalidConstruction,
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self {
            msg: format!("invalid nbt tag value: {}", tag),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn end_as_value() -> Self {
        Self {
            msg: "END is not a valid value kind".to_owned(),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn unexpected(expected: impl Display, got: impl std::fmt::Debug) -> Self {
        Self::malformed(format!("expected {}, got {:?}", expected, got))
    }

    pub(crate) fn unexpected_end(expected: impl Display) -> Self {
        Self::malformed(format!("expected {}, got end of stream", expected))
    }

    pub(crate) fn wrong_kind(expected: TagKind, got: TagKind) -> Self {
        Self::invalid_construction(format!("expected {} tag, got {}", expected, got))
    }

    pub(crate) fn nonunicode(d: Vec<u8>) -> Self {
        Self {
            msg: format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(&d),
            ),
            kind: ErrorKind::Nonunicode(d),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self {
            msg: format!("io error: {}", e),
            kind: ErrorKind::Io(e),
        }
    }
}
