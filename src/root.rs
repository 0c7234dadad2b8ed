use std::io::{Read, Write};

use serde::Serialize;

use crate::binary::{self, ReadOptions};
use crate::error::Result;
use crate::stream::{BoxStream, Surround, TokenStream};
use crate::{tree, Compound, Tag, TagKind, ToTokens, Token};

/// A whole NBT document: the root compound and its name.
///
/// The root name is usually empty, but some files such as `level.dat` from
/// older versions carry one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RootEntry {
    name: String,
    value: Compound,
}

impl RootEntry {
    pub fn new(name: impl Into<String>, value: Compound) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Compound {
        &self.value
    }

    pub fn into_parts(self) -> (String, Compound) {
        (self.name, self.value)
    }

    /// Wrap the document in a compound with a single entry, so that the root
    /// name survives being placed inside another tree.
    pub fn into_compound(self) -> Compound {
        Compound::builder()
            .put(self.name, Tag::Compound(self.value))
            .build()
    }

    /// Decode a document from binary NBT. The input must not be compressed.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        tree::read_root(binary::read(reader))
    }

    pub fn read_from_with_opts<R: Read>(reader: R, opts: ReadOptions) -> Result<Self> {
        let max_depth = opts.max_depth;
        tree::read_root_with_max_depth(binary::read_with_opts(reader, opts), max_depth)
    }

    /// Assemble a document from tokens, starting at the root name.
    pub fn read_from_stream<S: TokenStream>(tokens: S) -> Result<Self> {
        tree::read_root(tokens)
    }

    /// Encode as binary NBT, returning the writer once everything is written.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<W> {
        binary::write(writer, self.tokens())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        binary::to_bytes(self)
    }
}

impl ToTokens for RootEntry {
    fn tokens(&self) -> BoxStream<'_> {
        Box::new(Surround::prefix(
            Token::Name(self.name.clone(), TagKind::Compound),
            self.value.tokens(),
        ))
    }
}
