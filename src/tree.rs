//! Assemble token streams into trees.
//!
//! The assembler is the inverse of [`ToTokens`][crate::ToTokens]: it pulls
//! tokens and builds the [`Tag`] they describe, checking the structure as it
//! goes. Open containers are kept on an explicit stack, so assembling never
//! recurses.
//!
//! The trees themselves are recursive: dropping, cloning, comparing, hashing
//! and disassembling a tree all use one call per level of nesting. The
//! assembler therefore refuses to build anything nested deeper than a maximum
//! depth, [`DEFAULT_MAX_DEPTH`] unless given another limit. Trees built by
//! hand are not checked.
//!
//! ```
//! use nbtstream::stream::Tokens;
//! use nbtstream::{tree, Tag, TagKind, Token};
//!
//! # fn main() -> nbtstream::error::Result<()> {
//! let tokens = Tokens::from(vec![
//!     Token::ListStart { size: 2, element_kind: TagKind::Short },
//!     Token::Short(1),
//!     Token::Short(2),
//!     Token::ListEnd,
//! ]);
//!
//! let list = tree::read_value(tokens, TagKind::List)?;
//! assert_eq!(list.as_list().map(|l| l.len()), Some(2));
//! # Ok(())
//! # }
//! ```

use log::trace;

use crate::error::{Error, Result};
use crate::stream::TokenStream;
use crate::{
    ByteArray, Compound, CompoundBuilder, IntArray, ListBuilder, LongArray, RootEntry, Tag,
    TagKind, Token,
};

// Upper bound on what is reserved up front from a declared size. Sizes come
// from the stream and may be far larger than what actually follows.
const MAX_PREALLOC: usize = 1 << 16;

/// How deep compounds and lists may nest, counting the outermost one. This is
/// the limit Minecraft itself applies when reading NBT.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Read a whole document: the root name, then the root compound.
pub fn read_root<S: TokenStream>(tokens: S) -> Result<RootEntry> {
    read_root_with_max_depth(tokens, DEFAULT_MAX_DEPTH)
}

/// Like [`read_root`], with a nesting limit other than [`DEFAULT_MAX_DEPTH`].
pub fn read_root_with_max_depth<S: TokenStream>(
    mut tokens: S,
    max_depth: usize,
) -> Result<RootEntry> {
    let name = match tokens.next_token()? {
        Some(Token::Name(name, TagKind::Compound)) => name,
        Some(Token::Name(_, kind)) => {
            return Err(Error::malformed(format!(
                "root must be a compound, got {}",
                kind
            )))
        }
        Some(other) => return Err(Error::unexpected("root name", other)),
        None => return Err(Error::unexpected_end("root name")),
    };
    let value = match read_value_with_max_depth(&mut tokens, TagKind::Compound, max_depth)? {
        Tag::Compound(compound) => compound,
        other => return Err(Error::wrong_kind(TagKind::Compound, other.kind())),
    };
    Ok(RootEntry::new(name, value))
}

/// Read one compound, starting at its CompoundStart token.
pub fn read_compound<S: TokenStream>(tokens: S) -> Result<Compound> {
    match read_value(tokens, TagKind::Compound)? {
        Tag::Compound(compound) => Ok(compound),
        other => Err(Error::wrong_kind(TagKind::Compound, other.kind())),
    }
}

/// Read one value of `kind`. For containers and arrays this consumes
/// everything up to and including the matching End token, and nothing more.
pub fn read_value<S: TokenStream>(tokens: S, kind: TagKind) -> Result<Tag> {
    read_value_with_max_depth(tokens, kind, DEFAULT_MAX_DEPTH)
}

/// Like [`read_value`], with a nesting limit other than [`DEFAULT_MAX_DEPTH`].
pub fn read_value_with_max_depth<S: TokenStream>(
    mut tokens: S,
    kind: TagKind,
    max_depth: usize,
) -> Result<Tag> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut step = Step::Value(kind);

    loop {
        let done = match step {
            Step::Value(kind) => match start_value(&mut tokens, kind)? {
                Started::Done(tag) => tag,
                Started::Open(frame) => {
                    if stack.len() >= max_depth {
                        return Err(Error::malformed(format!(
                            "nbt nested deeper than max depth ({})",
                            max_depth
                        )));
                    }
                    stack.push(frame);
                    step = Step::Continue;
                    continue;
                }
            },
            Step::Continue => {
                let frame = match stack.last_mut() {
                    Some(frame) => frame,
                    None => return Err(Error::malformed("no open container to continue")),
                };
                match frame.advance(&mut tokens)? {
                    Some(kind) => {
                        step = Step::Value(kind);
                        continue;
                    }
                    None => match stack.pop() {
                        Some(frame) => frame.finish(),
                        None => return Err(Error::malformed("no open container to close")),
                    },
                }
            }
        };

        match stack.last_mut() {
            None => return Ok(done),
            Some(parent) => {
                parent.accept(done)?;
                step = Step::Continue;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    /// Read a value of this kind.
    Value(TagKind),
    /// Move the innermost open container along.
    Continue,
}

enum Started {
    Done(Tag),
    Open(Frame),
}

enum Frame {
    Compound {
        builder: CompoundBuilder,
        /// Name of the entry whose value is being read.
        pending_name: Option<String>,
    },
    List {
        builder: ListBuilder,
        remaining: u32,
    },
}

impl Frame {
    /// Pull the next token for this container. Returns the kind of the next
    /// value to read, or `None` once the container has ended.
    fn advance<S: TokenStream>(&mut self, tokens: &mut S) -> Result<Option<TagKind>> {
        match self {
            Frame::Compound { pending_name, .. } => match tokens.next_token()? {
                Some(Token::CompoundEnd) => Ok(None),
                Some(Token::Name(_, TagKind::End)) => Err(Error::end_as_value()),
                Some(Token::Name(name, kind)) => {
                    *pending_name = Some(name);
                    Ok(Some(kind))
                }
                Some(other) => Err(Error::unexpected("entry name or compound end", other)),
                None => Err(Error::unexpected_end("entry name or compound end")),
            },
            Frame::List { builder, remaining } => {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Ok(Some(builder.element_kind()));
                }
                match tokens.next_token()? {
                    Some(Token::ListEnd) => Ok(None),
                    Some(other) => Err(Error::unexpected("list end", other)),
                    None => Err(Error::unexpected_end("list end")),
                }
            }
        }
    }

    fn accept(&mut self, tag: Tag) -> Result<()> {
        match self {
            Frame::Compound {
                builder,
                pending_name,
            } => match pending_name.take() {
                Some(name) => {
                    builder.insert(name, tag);
                    Ok(())
                }
                None => Err(Error::malformed("compound value without a name")),
            },
            Frame::List { builder, .. } => builder.push(tag),
        }
    }

    fn finish(self) -> Tag {
        match self {
            Frame::Compound { builder, .. } => Tag::Compound(builder.build()),
            Frame::List { builder, .. } => Tag::List(builder.build()),
        }
    }
}

fn start_value<S: TokenStream>(tokens: &mut S, kind: TagKind) -> Result<Started> {
    if kind == TagKind::End {
        return Err(Error::end_as_value());
    }

    let token = match tokens.next_token()? {
        Some(token) => token,
        None => return Err(Error::unexpected_end(format_args!("{} value", kind))),
    };
    if token.tag_kind() != Some(kind) {
        return Err(Error::unexpected(format_args!("{} value", kind), token));
    }

    Ok(Started::Done(match token {
        Token::Byte(v) => Tag::Byte(v),
        Token::Short(v) => Tag::Short(v),
        Token::Int(v) => Tag::Int(v),
        Token::Long(v) => Tag::Long(v),
        Token::Float(v) => Tag::Float(v),
        Token::Double(v) => Tag::Double(v),
        Token::String(v) => Tag::String(v),
        Token::CompoundStart => {
            return Ok(Started::Open(Frame::Compound {
                builder: Compound::builder(),
                pending_name: None,
            }))
        }
        Token::ListStart { size, element_kind } => {
            if size > 0 && element_kind == TagKind::End {
                return Err(Error::malformed(format!(
                    "list of END cannot hold {} elements",
                    size
                )));
            }
            trace!("assembling list of {} {}", size, element_kind);
            return Ok(Started::Open(Frame::List {
                builder: ListBuilder::with_capacity(element_kind, prealloc(size)),
                remaining: size,
            }));
        }
        Token::ByteArrayStart(size) => Tag::ByteArray(ByteArray::new(read_array(
            tokens,
            "byte",
            size,
            |token| match token {
                Token::ByteArrayContent(view) => Chunk::Content(view),
                Token::ByteArrayEnd => Chunk::End,
                other => Chunk::Other(other),
            },
        )?)),
        Token::IntArrayStart(size) => Tag::IntArray(IntArray::new(read_array(
            tokens,
            "int",
            size,
            |token| match token {
                Token::IntArrayContent(view) => Chunk::Content(view),
                Token::IntArrayEnd => Chunk::End,
                other => Chunk::Other(other),
            },
        )?)),
        Token::LongArrayStart(size) => Tag::LongArray(LongArray::new(read_array(
            tokens,
            "long",
            size,
            |token| match token {
                Token::LongArrayContent(view) => Chunk::Content(view),
                Token::LongArrayEnd => Chunk::End,
                other => Chunk::Other(other),
            },
        )?)),
        other => return Err(Error::unexpected(format_args!("{} value", kind), other)),
    }))
}

enum Chunk<T> {
    Content(crate::ArrayView<T>),
    End,
    Other(Token),
}

/// Collect array content tokens until the array's End, checking the total
/// against the declared size.
fn read_array<S, T, F>(tokens: &mut S, what: &str, size: u32, classify: F) -> Result<Vec<T>>
where
    S: TokenStream,
    T: Copy,
    F: Fn(Token) -> Chunk<T>,
{
    let size = size as usize;
    let mut data = Vec::with_capacity(size.min(MAX_PREALLOC));

    loop {
        let token = match tokens.next_token()? {
            Some(token) => token,
            None => return Err(Error::unexpected_end(format_args!("{} array end", what))),
        };
        match classify(token) {
            Chunk::Content(view) => {
                if data.len() + view.len() > size {
                    return Err(Error::malformed(format!(
                        "{} array overfilled: declared {}, received at least {}",
                        what,
                        size,
                        data.len() + view.len()
                    )));
                }
                data.extend_from_slice(&view);
            }
            Chunk::End => {
                if data.len() != size {
                    return Err(Error::malformed(format!(
                        "{} array ended early: declared {}, received {}",
                        what,
                        size,
                        data.len()
                    )));
                }
                return Ok(data);
            }
            Chunk::Other(other) => {
                return Err(Error::unexpected(
                    format_args!("{} array content or end", what),
                    other,
                ))
            }
        }
    }
}

fn prealloc(size: u32) -> usize {
    (size as usize).min(MAX_PREALLOC)
}
