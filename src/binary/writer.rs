use std::borrow::Cow;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use log::trace;

use super::mutf8;
use crate::error::{Error, Result};
use crate::stream::TokenStream;
use crate::{TagKind, Token};

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, kind: TagKind) -> Result<()> {
        self.write_u8(kind.id())?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str) -> Result<()> {
        let (len, encoded) = prefixed_str(s)?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&encoded)?;
        Ok(())
    }

    /// The kind byte and name that open a compound entry. Nothing is written
    /// if the name cannot be encoded.
    fn write_named_tag(&mut self, kind: TagKind, name: &str) -> Result<()> {
        let (len, encoded) = prefixed_str(name)?;
        self.write_tag(kind)?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&encoded)?;
        Ok(())
    }

    fn write_len(&mut self, len: u32) -> Result<()> {
        let len: i32 = len
            .try_into()
            .map_err(|_| Error::invalid_construction(format!("len too large: {}", len)))?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}

fn prefixed_str(s: &str) -> Result<(u16, Cow<'_, [u8]>)> {
    let encoded = mutf8::encode(s);
    let len: u16 = encoded.len().try_into().map_err(|_| {
        Error::invalid_construction(format!(
            "string too long to encode: {} bytes, maximum is {}",
            encoded.len(),
            u16::MAX
        ))
    })?;
    Ok((len, encoded))
}

/// What the writer will accept next. The top of the stack is the current
/// expectation.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// The name of the root compound.
    RootName,
    /// Any single value, its kind taken from the token itself.
    AnyValue,
    /// A single value of the given kind.
    Value(TagKind),
    /// An entry name, or the end of the compound.
    Compound,
    List {
        remaining: u32,
        element_kind: TagKind,
    },
    ByteArray {
        remaining: u32,
    },
    IntArray {
        remaining: u32,
    },
    LongArray {
        remaining: u32,
    },
}

/// Encodes tokens as binary NBT.
///
/// The writer checks the structure of the tokens as it goes: names must be
/// followed by a value of the declared kind, lists and arrays must receive
/// exactly as many elements as they declared, and every Start must be closed
/// by its End. A token that breaks these rules is rejected with a
/// [`MalformedStream`][crate::error::ErrorKind::MalformedStream] error before
/// any of its bytes are written.
///
/// Once a token has been rejected the writer is failed: every later token and
/// [`finish`][NbtWriter::finish] is refused as well.
pub struct NbtWriter<W: Write> {
    writer: W,
    frames: Vec<Frame>,
    failed: bool,
}

impl<W: Write> NbtWriter<W> {
    /// A writer for a whole document: a root name followed by a compound.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames: vec![Frame::RootName],
            failed: false,
        }
    }

    /// A writer for one unnamed value of any kind.
    pub fn for_value(writer: W) -> Self {
        Self {
            writer,
            frames: vec![Frame::AnyValue],
            failed: false,
        }
    }

    /// A writer for one unnamed value of the given kind.
    pub fn for_kind(writer: W, kind: TagKind) -> Self {
        Self {
            writer,
            frames: vec![Frame::Value(kind)],
            failed: false,
        }
    }

    /// Write every token of `tokens`.
    pub fn write_stream<S: TokenStream>(&mut self, mut tokens: S) -> Result<()> {
        while let Some(token) = tokens.next_token()? {
            self.write_token(token)?;
        }
        Ok(())
    }

    /// Encode a single token.
    pub fn write_token(&mut self, token: Token) -> Result<()> {
        if self.failed {
            return Err(Error::malformed(format!(
                "unexpected {:?} after the writer failed",
                token
            )));
        }
        self.write_token_inner(token).map_err(|e| {
            trace!("nbt write failed: {}", e);
            self.failed = true;
            self.frames.clear();
            e
        })
    }

    fn write_token_inner(&mut self, token: Token) -> Result<()> {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => {
                return Err(Error::malformed(format!(
                    "unexpected {:?} after end of value",
                    token
                )))
            }
        };

        match frame {
            Frame::RootName => match token {
                Token::Name(name, TagKind::Compound) => {
                    trace!("writing root compound {:?}", name);
                    self.writer.write_named_tag(TagKind::Compound, &name)?;
                    self.frames.push(Frame::Value(TagKind::Compound));
                    Ok(())
                }
                other => Err(Error::unexpected("root compound name", other)),
            },
            Frame::AnyValue => match token.tag_kind() {
                Some(kind) => self.write_value(kind, token),
                None => Err(Error::unexpected("a value", token)),
            },
            Frame::Value(kind) => self.write_value(kind, token),
            Frame::Compound => match token {
                Token::CompoundEnd => {
                    self.writer.write_tag(TagKind::End)?;
                    Ok(())
                }
                Token::Name(_, TagKind::End) => Err(Error::end_as_value()),
                Token::Name(name, kind) => {
                    self.writer.write_named_tag(kind, &name)?;
                    self.frames.push(Frame::Compound);
                    self.frames.push(Frame::Value(kind));
                    Ok(())
                }
                other => Err(Error::unexpected("name or compound end", other)),
            },
            Frame::List {
                remaining,
                element_kind,
            } => match token {
                Token::ListEnd if remaining == 0 => Ok(()),
                Token::ListEnd => Err(Error::malformed(format!(
                    "list ended early: {} elements missing",
                    remaining
                ))),
                _ if remaining == 0 => Err(Error::malformed(format!(
                    "list overfilled: expected list end, got {:?}",
                    token
                ))),
                value => {
                    self.frames.push(Frame::List {
                        remaining: remaining - 1,
                        element_kind,
                    });
                    self.write_value(element_kind, value)
                }
            },
            Frame::ByteArray { remaining } => match token {
                Token::ByteArrayEnd => check_array_full("byte", remaining),
                Token::ByteArrayContent(view) => {
                    let remaining = take_from_array("byte", remaining, view.len())?;
                    let bytes: Vec<u8> = view.iter().map(|&b| b as u8).collect();
                    self.writer.write_all(&bytes)?;
                    self.frames.push(Frame::ByteArray { remaining });
                    Ok(())
                }
                other => Err(Error::unexpected("byte array content or end", other)),
            },
            Frame::IntArray { remaining } => match token {
                Token::IntArrayEnd => check_array_full("int", remaining),
                Token::IntArrayContent(view) => {
                    let remaining = take_from_array("int", remaining, view.len())?;
                    for &i in view.iter() {
                        self.writer.write_i32::<BigEndian>(i)?;
                    }
                    self.frames.push(Frame::IntArray { remaining });
                    Ok(())
                }
                other => Err(Error::unexpected("int array content or end", other)),
            },
            Frame::LongArray { remaining } => match token {
                Token::LongArrayEnd => check_array_full("long", remaining),
                Token::LongArrayContent(view) => {
                    let remaining = take_from_array("long", remaining, view.len())?;
                    for &l in view.iter() {
                        self.writer.write_i64::<BigEndian>(l)?;
                    }
                    self.frames.push(Frame::LongArray { remaining });
                    Ok(())
                }
                other => Err(Error::unexpected("long array content or end", other)),
            },
        }
    }

    /// Check the document or value is complete, flush, and hand back the
    /// underlying writer.
    pub fn finish(mut self) -> Result<W> {
        if self.failed {
            return Err(Error::malformed("cannot finish after a rejected token"));
        }
        if let Some(frame) = self.frames.last() {
            return Err(Error::malformed(format!(
                "token stream ended early, still expecting {:?} ({} levels open)",
                frame,
                self.frames.len()
            )));
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_value(&mut self, kind: TagKind, token: Token) -> Result<()> {
        if token.tag_kind() != Some(kind) {
            return Err(Error::unexpected(format_args!("{} value", kind), token));
        }

        match token {
            Token::Byte(v) => self.writer.write_i8(v)?,
            Token::Short(v) => self.writer.write_i16::<BigEndian>(v)?,
            Token::Int(v) => self.writer.write_i32::<BigEndian>(v)?,
            Token::Long(v) => self.writer.write_i64::<BigEndian>(v)?,
            Token::Float(v) => self.writer.write_f32::<BigEndian>(v)?,
            Token::Double(v) => self.writer.write_f64::<BigEndian>(v)?,
            Token::String(s) => self.writer.write_size_prefixed_str(&s)?,
            Token::CompoundStart => self.frames.push(Frame::Compound),
            Token::ListStart { size, element_kind } => {
                if size > 0 && element_kind == TagKind::End {
                    return Err(Error::malformed(format!(
                        "list of END cannot hold {} elements",
                        size
                    )));
                }
                self.writer.write_tag(element_kind)?;
                self.writer.write_len(size)?;
                self.frames.push(Frame::List {
                    remaining: size,
                    element_kind,
                });
            }
            Token::ByteArrayStart(size) => {
                self.writer.write_len(size)?;
                self.frames.push(Frame::ByteArray { remaining: size });
            }
            Token::IntArrayStart(size) => {
                self.writer.write_len(size)?;
                self.frames.push(Frame::IntArray { remaining: size });
            }
            Token::LongArrayStart(size) => {
                self.writer.write_len(size)?;
                self.frames.push(Frame::LongArray { remaining: size });
            }
            other => return Err(Error::unexpected(format_args!("{} value", kind), other)),
        }
        Ok(())
    }
}

fn check_array_full(what: &str, remaining: u32) -> Result<()> {
    if remaining != 0 {
        return Err(Error::malformed(format!(
            "{} array ended early: {} elements missing",
            what, remaining
        )));
    }
    Ok(())
}

fn take_from_array(what: &str, remaining: u32, len: usize) -> Result<u32> {
    if len > remaining as usize {
        return Err(Error::malformed(format!(
            "{} array overfilled: {} elements left, received {}",
            what, remaining, len
        )));
    }
    Ok(remaining - len as u32)
}
