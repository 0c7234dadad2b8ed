use std::io::Read;
use std::sync::Arc;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};

use super::mutf8::{self, StringEncoding};
use super::ReadOptions;
use crate::error::{Error, Result};
use crate::stream::TokenStream;
use crate::{ArrayView, TagKind, Token};

/// Largest payload, in bytes, carried by one array content token.
pub(crate) const CHUNK_BYTES: usize = 8192;

/// What the reader has to do next. The top of the stack is the current job.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Read the root kind and name.
    Initial,
    /// Emit the start of the root compound.
    CompoundStart,
    /// Read the kind and name of the next entry, or the END that closes the
    /// compound.
    CompoundEntryName,
    /// Read a single value. Containers and arrays push further states.
    ReadValue(TagKind),
    /// Read the remaining elements of a list. Rather than pushing a state per
    /// element we count them down here.
    ListEntry {
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

/// Reader can take any [`Read`] and decode it as NBT tokens. Does not do
/// decompression.
///
/// Nesting is tracked on an explicit stack rather than the call stack, so the
/// reader itself never risks a stack overflow. Compounds and lists may still
/// only nest [`ReadOptions::max_depth`] deep, since trees built from the tokens
/// are dropped, compared and written recursively. Arrays are delivered in
/// content tokens of at most 8KiB each, so huge arrays never need to be held
/// in memory by the reader.
///
/// # Examples
///
/// The following takes a stream of GZip compressed data and dumps it out in
/// Rust's `Debug` format, indented to show the structure.
///
/// ```no_run
/// use nbtstream::binary::NbtReader;
/// use nbtstream::stream::TokenStream;
/// use nbtstream::Token;
/// use flate2::read::GzDecoder;
///
/// # fn main() -> nbtstream::error::Result<()> {
/// let file = std::fs::File::open("level.dat")?;
/// let mut reader = NbtReader::new(GzDecoder::new(file));
/// let mut indent = 0;
///
/// while let Some(token) = reader.next_token()? {
///     match token {
///         Token::CompoundEnd | Token::ListEnd => indent -= 4,
///         _ => {}
///     }
///
///     println!("{:indent$}{:?}", "", token, indent = indent);
///
///     match token {
///         Token::CompoundStart | Token::ListStart { .. } => indent += 4,
///         _ => {}
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct NbtReader<R: Read> {
    reader: R,
    stack: Vec<State>,
    /// Open compounds and lists.
    depth: usize,
    opts: ReadOptions,
    encoding: StringEncoding,
}

impl<R: Read> NbtReader<R> {
    /// Create a reader for a whole document with default options.
    pub fn new(reader: R) -> Self {
        Self::with_opts(reader, ReadOptions::default())
    }

    /// Create a reader for a whole document.
    pub fn with_opts(reader: R, opts: ReadOptions) -> Self {
        Self::with_initial_state(reader, State::Initial, opts)
    }

    /// Create a reader for a single unnamed payload of the given kind, as
    /// found inside a list.
    pub fn for_value(reader: R, kind: TagKind, opts: ReadOptions) -> Self {
        Self::with_initial_state(reader, State::ReadValue(kind), opts)
    }

    fn with_initial_state(reader: R, state: State, opts: ReadOptions) -> Self {
        // Only JNBT tolerant reading needs to inspect strings.
        let encoding = if opts.allow_jnbt_string_encoding {
            StringEncoding::Unknown
        } else {
            StringEncoding::Modified
        };

        Self {
            reader,
            stack: vec![state],
            depth: 0,
            opts,
            encoding,
        }
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this reader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_inner(&mut self) -> Result<Option<Token>> {
        let state = match self.stack.pop() {
            Some(state) => state,
            None => return Ok(None),
        };

        let token = match state {
            State::Initial => {
                let id = self.reader.read_u8()?;
                if id != TagKind::Compound.id() {
                    return Err(Error::malformed(format!(
                        "nbt stream does not start with a compound tag, found tag id {}",
                        id
                    )));
                }
                self.stack.push(State::CompoundStart);
                let name = self.read_size_prefixed_string()?;
                trace!("reading root compound {:?}", name);
                Token::Name(name, TagKind::Compound)
            }
            State::CompoundStart => {
                self.enter()?;
                self.stack.push(State::CompoundEntryName);
                Token::CompoundStart
            }
            State::CompoundEntryName => {
                let kind = TagKind::from_id(self.reader.read_u8()?)?;
                if kind == TagKind::End {
                    self.leave();
                    return Ok(Some(Token::CompoundEnd));
                }
                // After the value we will be back to reading a name.
                self.stack.push(State::CompoundEntryName);
                self.stack.push(State::ReadValue(kind));
                Token::Name(self.read_size_prefixed_string()?, kind)
            }
            State::ReadValue(kind) => self.read_payload(kind)?,
            State::ListEntry {
                remaining,
                element_kind,
            } => {
                if remaining == 0 {
                    self.leave();
                    return Ok(Some(Token::ListEnd));
                }
                self.stack.push(State::ListEntry {
                    remaining: remaining - 1,
                    element_kind,
                });
                self.read_payload(element_kind)?
            }
            State::ByteArray { remaining } => {
                if remaining == 0 {
                    return Ok(Some(Token::ByteArrayEnd));
                }
                let len = chunk_len(remaining, 1);
                let mut buf = vec![0i8; len];
                self.reader.read_i8_into(&mut buf)?;
                self.push_array_remaining(State::ByteArray {
                    remaining: remaining - len as u32,
                });
                Token::ByteArrayContent(ArrayView::new(Arc::from(buf)))
            }
            State::IntArray { remaining } => {
                if remaining == 0 {
                    return Ok(Some(Token::IntArrayEnd));
                }
                let len = chunk_len(remaining, 4);
                let mut buf = vec![0i32; len];
                self.reader.read_i32_into::<BigEndian>(&mut buf)?;
                self.push_array_remaining(State::IntArray {
                    remaining: remaining - len as u32,
                });
                Token::IntArrayContent(ArrayView::new(Arc::from(buf)))
            }
            State::LongArray { remaining } => {
                if remaining == 0 {
                    return Ok(Some(Token::LongArrayEnd));
                }
                let len = chunk_len(remaining, 8);
                let mut buf = vec![0i64; len];
                self.reader.read_i64_into::<BigEndian>(&mut buf)?;
                self.push_array_remaining(State::LongArray {
                    remaining: remaining - len as u32,
                });
                Token::LongArrayContent(ArrayView::new(Arc::from(buf)))
            }
        };

        Ok(Some(token))
    }

    fn push_array_remaining(&mut self, state: State) {
        trace!("read array chunk, now {:?}", state);
        self.stack.push(state);
    }

    fn read_payload(&mut self, kind: TagKind) -> Result<Token> {
        Ok(match kind {
            TagKind::End => return Err(Error::end_as_value()),
            TagKind::Byte => Token::Byte(self.reader.read_i8()?),
            TagKind::Short => Token::Short(self.reader.read_i16::<BigEndian>()?),
            TagKind::Int => Token::Int(self.reader.read_i32::<BigEndian>()?),
            TagKind::Long => Token::Long(self.reader.read_i64::<BigEndian>()?),
            TagKind::Float => Token::Float(self.reader.read_f32::<BigEndian>()?),
            TagKind::Double => Token::Double(self.reader.read_f64::<BigEndian>()?),
            TagKind::String => Token::String(self.read_size_prefixed_string()?),
            TagKind::Compound => {
                self.enter()?;
                self.stack.push(State::CompoundEntryName);
                Token::CompoundStart
            }
            TagKind::List => {
                let element_kind = TagKind::from_id(self.reader.read_u8()?)?;
                let size = self.read_size("list")?;
                self.enter()?;
                self.stack.push(State::ListEntry {
                    remaining: size,
                    element_kind,
                });
                Token::ListStart { size, element_kind }
            }
            TagKind::ByteArray => {
                let size = self.read_size("byte array")?;
                self.stack.push(State::ByteArray { remaining: size });
                Token::ByteArrayStart(size)
            }
            TagKind::IntArray => {
                let size = self.read_size("int array")?;
                self.stack.push(State::IntArray { remaining: size });
                Token::IntArrayStart(size)
            }
            TagKind::LongArray => {
                let size = self.read_size("long array")?;
                self.stack.push(State::LongArray { remaining: size });
                Token::LongArrayStart(size)
            }
        })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            return Err(Error::malformed(format!(
                "nbt nested deeper than max depth ({})",
                self.opts.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn read_size(&mut self, what: &str) -> Result<u32> {
        let size = self.reader.read_i32::<BigEndian>()?;
        if size < 0 {
            return Err(Error::malformed(format!(
                "negative {} size: {}",
                what, size
            )));
        }
        if size as usize > self.opts.max_seq_len {
            return Err(Error::malformed(format!(
                "{} size ({}) greater than max sequence length ({})",
                what, size, self.opts.max_seq_len,
            )));
        }
        Ok(size as u32)
    }

    fn read_size_prefixed_string(&mut self) -> Result<String> {
        let len = self.reader.read_u16::<BigEndian>()? as usize;

        let mut buf = vec![0; len];
        self.reader.read_exact(&mut buf)?;

        if self.encoding == StringEncoding::Unknown {
            let found = mutf8::guaranteed_encoding(&buf);
            if found != StringEncoding::Unknown {
                debug!("string encoding determined as {:?}", found);
                self.encoding = found;
            }
        }

        mutf8::decode(buf, self.encoding)
    }
}

impl<R: Read> TokenStream for NbtReader<R> {
    /// After an error the reader is left at its end, every later call
    /// returns `Ok(None)`.
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.next_inner().map_err(|e| {
            debug!("nbt read failed, ending stream: {}", e);
            self.stack.clear();
            e
        })
    }
}

/// How many elements of `width` bytes to put in the next chunk.
fn chunk_len(remaining: u32, width: usize) -> usize {
    (remaining as usize).min(CHUNK_BYTES / width)
}
