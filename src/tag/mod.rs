mod compound;
mod list;
mod ser;
mod types;

use std::hash::{Hash, Hasher};

pub use compound::{Compound, CompoundBuilder};
pub use list::{List, ListBuilder};
pub use types::TagType;

use crate::stream::{self, BoxStream, Flatten, Surround, Tokens};
use crate::{ByteArray, IntArray, LongArray, TagKind, Token};

/// A complete NBT value. It owns its data, and is never modified after it is
/// built: to change a tree, build a new one, for example with
/// [`Compound::to_builder`].
///
/// Floats compare and hash by their bit patterns, so a tree containing NaN is
/// equal to itself and to its own round-trip through bytes, while `0.0` and
/// `-0.0` are different values.
///
/// ```
/// use nbtstream::{Tag, TagKind};
///
/// let tag = Tag::from(3.5f32);
/// assert_eq!(tag.kind(), TagKind::Float);
/// assert_eq!(tag.as_f64(), Some(3.5));
/// ```
#[derive(Debug, Clone)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(ByteArray),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(IntArray),
    LongArray(LongArray),
}

/// Anything that can present itself as a stream of tokens, in the pre-order
/// that [`tree::read_value`][crate::tree::read_value] and the binary writer
/// expect.
pub trait ToTokens {
    fn tokens(&self) -> BoxStream<'_>;
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            Tag::Float(v) => Some(v as i64),
            Tag::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Byte(v) => Some(v as f64),
            Tag::Short(v) => Some(v as f64),
            Tag::Int(v) => Some(v as f64),
            Tag::Long(v) => Some(v as f64),
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        use Tag::*;
        match (self, other) {
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (ByteArray(a), ByteArray(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Compound(a), Compound(b)) => a == b,
            (IntArray(a), IntArray(b)) => a == b,
            (LongArray(a), LongArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Tag::Byte(v) => v.hash(state),
            Tag::Short(v) => v.hash(state),
            Tag::Int(v) => v.hash(state),
            Tag::Long(v) => v.hash(state),
            Tag::Float(v) => v.to_bits().hash(state),
            Tag::Double(v) => v.to_bits().hash(state),
            Tag::ByteArray(v) => v.hash(state),
            Tag::String(v) => v.hash(state),
            Tag::List(v) => v.hash(state),
            Tag::Compound(v) => v.hash(state),
            Tag::IntArray(v) => v.hash(state),
            Tag::LongArray(v) => v.hash(state),
        }
    }
}

impl ToTokens for Tag {
    fn tokens(&self) -> BoxStream<'_> {
        match self {
            Tag::Byte(v) => Box::new(stream::once(Token::Byte(*v))),
            Tag::Short(v) => Box::new(stream::once(Token::Short(*v))),
            Tag::Int(v) => Box::new(stream::once(Token::Int(*v))),
            Tag::Long(v) => Box::new(stream::once(Token::Long(*v))),
            Tag::Float(v) => Box::new(stream::once(Token::Float(*v))),
            Tag::Double(v) => Box::new(stream::once(Token::Double(*v))),
            Tag::String(v) => Box::new(stream::once(Token::String(v.clone()))),
            Tag::ByteArray(v) => v.tokens(),
            Tag::IntArray(v) => v.tokens(),
            Tag::LongArray(v) => v.tokens(),
            Tag::List(v) => v.tokens(),
            Tag::Compound(v) => v.tokens(),
        }
    }
}

impl ToTokens for Compound {
    fn tokens(&self) -> BoxStream<'_> {
        let entries = self.iter().map(|(name, tag)| {
            Surround::prefix(Token::Name(name.clone(), tag.kind()), tag.tokens())
        });
        Box::new(Surround::new(
            Token::CompoundStart,
            Flatten::new(entries),
            Token::CompoundEnd,
        ))
    }
}

impl ToTokens for List {
    fn tokens(&self) -> BoxStream<'_> {
        let start = Token::ListStart {
            size: len_u32(self.len()),
            element_kind: self.element_kind(),
        };
        let elements = self.iter().map(|tag| tag.tokens());
        Box::new(Surround::new(start, Flatten::new(elements), Token::ListEnd))
    }
}

macro_rules! array_tokens {
    ($array:ident, $start:ident, $content:ident, $end:ident) => {
        impl ToTokens for $array {
            fn tokens(&self) -> BoxStream<'_> {
                let mut tokens = vec![Token::$start(len_u32(self.len()))];
                if !self.is_empty() {
                    tokens.push(Token::$content(self.view()));
                }
                tokens.push(Token::$end);
                Box::new(Tokens::from(tokens))
            }
        }
    };
}

array_tokens!(ByteArray, ByteArrayStart, ByteArrayContent, ByteArrayEnd);
array_tokens!(IntArray, IntArrayStart, IntArrayContent, IntArrayEnd);
array_tokens!(LongArray, LongArrayStart, LongArrayContent, LongArrayEnd);

// Anything beyond u32 cannot be written anyway, the writer reports it as a
// size mismatch.
fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Tag {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
        impl From<&$type> for Tag {
            fn from(val: &$type) -> Self {
                Self::$variant(val.to_owned()$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(ByteArray, ByteArray);
from!(IntArray, IntArray);
from!(LongArray, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Tag {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
