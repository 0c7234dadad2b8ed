//! nbtstream reads and writes NBT data from *Minecraft: Java Edition* as a
//! lazy stream of structural tokens, and assembles those tokens into an
//! immutable, ordered tree of tags.
//!
//! * For the token vocabulary see [`Token`].
//! * For the pull-based stream and its combinators see [`stream`].
//! * For the bit-exact binary codec see [`binary`].
//! * For the tree types see [`Tag`], [`Compound`] and [`List`].
//! * For turning tokens into trees see [`tree`].
//!
//! Data flows `bytes -> tokens -> tree` and back again. Nothing in between
//! requires the whole document to be in memory: a [`binary::NbtReader`] can be
//! pulled token by token, and large arrays arrive in bounded chunks.
//!
//! # Quick example
//!
//! ```
//! use nbtstream::{compound, binary, RootEntry, Tag};
//!
//! # fn main() -> nbtstream::error::Result<()> {
//! let root = RootEntry::new("level", compound!({
//!     "DataVersion": 3465,
//!     "LevelName": "world",
//!     "Data": {
//!         "hardcore": 0i8,
//!     },
//! }));
//!
//! let bytes = root.to_bytes()?;
//! let back = binary::from_bytes(&bytes)?;
//!
//! assert_eq!(back, root);
//! assert_eq!(back.value().get("DataVersion"), Some(&Tag::Int(3465)));
//! # Ok(())
//! # }
//! ```
//!
//! # Compression
//!
//! Most NBT files on disk are GZip compressed. This crate neither detects nor
//! applies compression. Wrap the reader or writer yourself, for example with
//! `flate2::read::GzDecoder`.

use serde::{Deserialize, Serialize};

pub mod binary;
pub mod error;
pub mod stream;
pub mod tree;

mod arrays;
mod macros;
mod root;
mod tag;
mod token;

pub use arrays::*;
pub use root::RootEntry;
pub use tag::*;
pub use token::*;

#[cfg(test)]
mod test;

use std::fmt;

use error::{Error, Result};

/// The kind of an NBT tag. This does not carry the value or the name of the
/// data, it is the single byte discriminator found on the wire.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum TagKind {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same kind.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl TagKind {
    /// Every kind, in id order.
    pub const ALL: [TagKind; 13] = [
        TagKind::End,
        TagKind::Byte,
        TagKind::Short,
        TagKind::Int,
        TagKind::Long,
        TagKind::Float,
        TagKind::Double,
        TagKind::ByteArray,
        TagKind::String,
        TagKind::List,
        TagKind::Compound,
        TagKind::IntArray,
        TagKind::LongArray,
    ];

    /// The wire id of this kind.
    pub fn id(self) -> u8 {
        self.into()
    }

    /// Look up the kind for a wire id, failing for anything outside `0..=12`.
    pub fn from_id(id: u8) -> Result<TagKind> {
        TagKind::try_from(id).map_err(|_| Error::invalid_tag(id))
    }

    /// The conventional upper-case name of this kind, eg `BYTE_ARRAY`.
    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "END",
            TagKind::Byte => "BYTE",
            TagKind::Short => "SHORT",
            TagKind::Int => "INT",
            TagKind::Long => "LONG",
            TagKind::Float => "FLOAT",
            TagKind::Double => "DOUBLE",
            TagKind::ByteArray => "BYTE_ARRAY",
            TagKind::String => "STRING",
            TagKind::List => "LIST",
            TagKind::Compound => "COMPOUND",
            TagKind::IntArray => "INT_ARRAY",
            TagKind::LongArray => "LONG_ARRAY",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually. The kinds will very rarely change.
impl TryFrom<u8> for TagKind {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use TagKind::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<TagKind> for u8 {
    fn from(kind: TagKind) -> Self {
        kind as u8
    }
}
