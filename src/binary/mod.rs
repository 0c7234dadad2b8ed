//! The binary NBT wire format.
//!
//! Everything is big-endian. A document is the COMPOUND kind byte, the root
//! name, then the root compound's payload. Compound entries are
//! `[kind][name][payload]` terminated by a lone END byte. Lists are
//! `[element kind][i32 count]` followed by that many unnamed payloads. Arrays
//! are an `i32` count followed by the elements. Strings are a `u16` byte length
//! followed by Java's modified UTF-8.
//!
//! [`NbtReader`] turns bytes into [`Token`][crate::Token]s and [`NbtWriter`]
//! turns tokens back into bytes. The functions in this module glue those to
//! the tree types.
//!
//! ```
//! use nbtstream::{binary, compound, RootEntry};
//!
//! # fn main() -> nbtstream::error::Result<()> {
//! let root = RootEntry::new("", compound!({ "name": "Steve" }));
//! let bytes = binary::to_bytes(&root)?;
//! assert_eq!(bytes[0], 10);
//!
//! let back = binary::from_bytes(&bytes)?;
//! assert_eq!(back, root);
//! # Ok(())
//! # }
//! ```

mod mutf8;
mod reader;
mod writer;

use std::io::{Read, Write};

pub use reader::NbtReader;
pub use writer::NbtWriter;

use crate::error::Result;
use crate::stream::TokenStream;
use crate::{tree, RootEntry, TagKind, ToTokens};

/// Options for reading binary NBT.
///
/// ```
/// use nbtstream::binary::ReadOptions;
///
/// let opts = ReadOptions::new()
///     .allow_jnbt_string_encoding(true)
///     .max_seq_len(1 << 20)
///     .max_depth(64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    pub(crate) allow_jnbt_string_encoding: bool,
    pub(crate) max_seq_len: usize,
    pub(crate) max_depth: usize,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self {
            allow_jnbt_string_encoding: false,
            max_seq_len: i32::MAX as usize,
            max_depth: tree::DEFAULT_MAX_DEPTH,
        }
    }

    /// Accept strings written as plain UTF-8 by the JNBT library, as well as
    /// the standard modified UTF-8.
    ///
    /// The reader has to inspect string bytes until it sees something only
    /// one encoding can produce, which makes reading slower. Once an encoding
    /// is proven it is used for the rest of the document.
    pub fn allow_jnbt_string_encoding(mut self, allow: bool) -> Self {
        self.allow_jnbt_string_encoding = allow;
        self
    }

    /// Maximum number of elements a list or array may declare. Larger sizes
    /// are rejected before anything is allocated for them.
    pub fn max_seq_len(mut self, len: usize) -> Self {
        self.max_seq_len = len;
        self
    }

    /// Maximum nesting of compounds and lists, counting the root compound.
    /// Deeper documents are rejected as malformed. Defaults to
    /// [`tree::DEFAULT_MAX_DEPTH`].
    ///
    /// A reader that only pulls tokens can raise this as far as it likes. Trees
    /// are dropped, cloned, compared and written recursively, so anything that
    /// assembles them should keep a limit its stack can take.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a document as a stream of tokens.
///
/// The reader is not buffered. Wrap it in a [`std::io::BufReader`] if it is
/// a file or socket.
pub fn read<R: Read>(reader: R) -> NbtReader<R> {
    NbtReader::new(reader)
}

/// Read a document as a stream of tokens, with options.
pub fn read_with_opts<R: Read>(reader: R, opts: ReadOptions) -> NbtReader<R> {
    NbtReader::with_opts(reader, opts)
}

/// Read a single unnamed payload of `kind` as a stream of tokens.
pub fn read_value<R: Read>(reader: R, kind: TagKind, opts: ReadOptions) -> NbtReader<R> {
    NbtReader::for_value(reader, kind, opts)
}

/// Write the document in `tokens`, which must start with the root name.
/// Returns the writer once the document is complete.
pub fn write<W: Write, S: TokenStream>(writer: W, tokens: S) -> Result<W> {
    let mut writer = NbtWriter::new(writer);
    writer.write_stream(tokens)?;
    writer.finish()
}

/// Write a single unnamed value, as it would appear inside a list.
pub fn write_value<W: Write, S: TokenStream>(writer: W, tokens: S) -> Result<W> {
    let mut writer = NbtWriter::for_value(writer);
    writer.write_stream(tokens)?;
    writer.finish()
}

/// Encode a whole document.
pub fn to_bytes(root: &RootEntry) -> Result<Vec<u8>> {
    write(Vec::new(), root.tokens())
}

/// Encode any value as an unnamed payload.
pub fn value_to_bytes<T: ToTokens + ?Sized>(value: &T) -> Result<Vec<u8>> {
    write_value(Vec::new(), value.tokens())
}

/// Decode a whole document.
pub fn from_bytes(bytes: &[u8]) -> Result<RootEntry> {
    tree::read_root(read(bytes))
}

/// Decode a whole document, with options. The assembler uses the same depth
/// limit as the reader.
pub fn from_bytes_with_opts(bytes: &[u8], opts: ReadOptions) -> Result<RootEntry> {
    let max_depth = opts.max_depth;
    tree::read_root_with_max_depth(read_with_opts(bytes, opts), max_depth)
}
