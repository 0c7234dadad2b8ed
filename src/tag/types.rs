use std::fmt;
use std::io::{Read, Write};

use super::{Tag, ToTokens};
use crate::binary::{self, NbtWriter, ReadOptions};
use crate::error::{Error, Result};
use crate::stream::BoxStream;
use crate::{tree, TagKind};

/// Describes one tag kind, and can read, write and stream unnamed payloads of
/// that kind.
///
/// There is exactly one descriptor per kind, found with [`TagType::of`].
///
/// Descriptors handle one unnamed payload at a time. The streaming reader,
/// writer and assembler match on [`TagKind`] directly instead, since they work
/// token by token rather than value by value.
///
/// ```
/// use nbtstream::{Tag, TagKind, TagType};
///
/// # fn main() -> nbtstream::error::Result<()> {
/// let int = TagType::of(TagKind::Int);
///
/// let mut bytes = Vec::new();
/// int.write(&Tag::Int(258), &mut bytes)?;
/// assert_eq!(bytes, [0, 0, 1, 2]);
///
/// let back = int.read(&mut &bytes[..], &Default::default())?;
/// assert_eq!(back, Tag::Int(258));
/// # Ok(())
/// # }
/// ```
#[derive(PartialEq, Eq)]
pub struct TagType {
    kind: TagKind,
}

static TAG_TYPES: [TagType; 13] = [
    TagType { kind: TagKind::End },
    TagType { kind: TagKind::Byte },
    TagType { kind: TagKind::Short },
    TagType { kind: TagKind::Int },
    TagType { kind: TagKind::Long },
    TagType { kind: TagKind::Float },
    TagType { kind: TagKind::Double },
    TagType { kind: TagKind::ByteArray },
    TagType { kind: TagKind::String },
    TagType { kind: TagKind::List },
    TagType { kind: TagKind::Compound },
    TagType { kind: TagKind::IntArray },
    TagType { kind: TagKind::LongArray },
];

impl TagType {
    pub fn of(kind: TagKind) -> &'static TagType {
        &TAG_TYPES[kind.id() as usize]
    }

    /// Every descriptor, in id order.
    pub fn all() -> &'static [TagType] {
        &TAG_TYPES
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn id(&self) -> u8 {
        self.kind.id()
    }

    /// Read one unnamed payload of this kind.
    pub fn read(&self, reader: &mut dyn Read, opts: &ReadOptions) -> Result<Tag> {
        self.check_value_kind()?;
        let mut tokens = binary::read_value(reader, self.kind, opts.clone());
        tree::read_value_with_max_depth(&mut tokens, self.kind, opts.max_depth)
    }

    /// Write `tag` as an unnamed payload of this kind.
    pub fn write(&self, tag: &Tag, writer: &mut dyn Write) -> Result<()> {
        self.check(tag)?;
        let mut nbt = NbtWriter::for_kind(writer, self.kind);
        nbt.write_stream(tag.tokens())?;
        nbt.finish()?;
        Ok(())
    }

    /// The tokens of `tag`, which must be of this kind.
    pub fn tokens<'a>(&self, tag: &'a Tag) -> Result<BoxStream<'a>> {
        self.check(tag)?;
        Ok(tag.tokens())
    }

    fn check_value_kind(&self) -> Result<()> {
        if self.kind == TagKind::End {
            return Err(Error::end_as_value());
        }
        Ok(())
    }

    /// Check that `tag` is a value of this kind. Lists use this for every
    /// element they are given.
    pub fn check(&self, tag: &Tag) -> Result<()> {
        self.check_value_kind()?;
        if tag.kind() != self.kind {
            return Err(Error::wrong_kind(self.kind, tag.kind()));
        }
        Ok(())
    }
}

impl fmt::Debug for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagType({})", self.kind)
    }
}
