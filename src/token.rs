use std::fmt;
use std::ops::{Deref, Range};
use std::sync::Arc;

use crate::TagKind;

/// One structural event in a flattened pre-order walk of an NBT tree.
///
/// A compound entry is a [`Token::Name`] followed by the tokens of its value.
/// Scalars are a single token. Compounds, lists and arrays are a Start token,
/// their content, then the matching End token.
///
/// ```text
/// Name("root", COMPOUND)
/// CompoundStart
///     Name("count", INT)
///     Int(3)
///     Name("heights", INT_ARRAY)
///     IntArrayStart(2)
///     IntArrayContent([64, 65])
///     IntArrayEnd
/// CompoundEnd
/// ```
#[derive(Debug, Clone)]
pub enum Token {
    /// The name of the next compound entry, and the kind of its value.
    Name(String, TagKind),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    CompoundStart,
    CompoundEnd,
    /// Exactly `size` unnamed values of `element_kind` follow before the
    /// matching [`Token::ListEnd`].
    ListStart {
        size: u32,
        element_kind: TagKind,
    },
    ListEnd,
    ByteArrayStart(u32),
    ByteArrayContent(ArrayView<i8>),
    ByteArrayEnd,
    IntArrayStart(u32),
    IntArrayContent(ArrayView<i32>),
    IntArrayEnd,
    LongArrayStart(u32),
    LongArrayContent(ArrayView<i64>),
    LongArrayEnd,
}

impl Token {
    /// The kind of tag this token directly represents. Scalars and Start
    /// tokens have one. Names, array content and End tokens do not.
    pub fn tag_kind(&self) -> Option<TagKind> {
        Some(match self {
            Token::Byte(_) => TagKind::Byte,
            Token::Short(_) => TagKind::Short,
            Token::Int(_) => TagKind::Int,
            Token::Long(_) => TagKind::Long,
            Token::Float(_) => TagKind::Float,
            Token::Double(_) => TagKind::Double,
            Token::String(_) => TagKind::String,
            Token::CompoundStart => TagKind::Compound,
            Token::ListStart { .. } => TagKind::List,
            Token::ByteArrayStart(_) => TagKind::ByteArray,
            Token::IntArrayStart(_) => TagKind::IntArray,
            Token::LongArrayStart(_) => TagKind::LongArray,
            _ => return None,
        })
    }

    /// Whether this token is a complete value on its own.
    pub fn is_simple_value(&self) -> bool {
        matches!(
            self,
            Token::Byte(_)
                | Token::Short(_)
                | Token::Int(_)
                | Token::Long(_)
                | Token::Float(_)
                | Token::Double(_)
                | Token::String(_)
        )
    }
}

// Floats compare by bits so that a decoded NaN is equal to the NaN that was
// encoded.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        use Token::*;
        match (self, other) {
            (Name(a, ak), Name(b, bk)) => a == b && ak == bk,
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (CompoundStart, CompoundStart) => true,
            (CompoundEnd, CompoundEnd) => true,
            (
                ListStart {
                    size: a,
                    element_kind: ak,
                },
                ListStart {
                    size: b,
                    element_kind: bk,
                },
            ) => a == b && ak == bk,
            (ListEnd, ListEnd) => true,
            (ByteArrayStart(a), ByteArrayStart(b)) => a == b,
            (ByteArrayContent(a), ByteArrayContent(b)) => a == b,
            (ByteArrayEnd, ByteArrayEnd) => true,
            (IntArrayStart(a), IntArrayStart(b)) => a == b,
            (IntArrayContent(a), IntArrayContent(b)) => a == b,
            (IntArrayEnd, IntArrayEnd) => true,
            (LongArrayStart(a), LongArrayStart(b)) => a == b,
            (LongArrayContent(a), LongArrayContent(b)) => a == b,
            (LongArrayEnd, LongArrayEnd) => true,
            _ => false,
        }
    }
}

/// A read-only window onto a shared buffer of array elements.
///
/// Cloning a view is cheap and never copies the elements. There is no way to
/// get mutable access to the elements through a view.
#[derive(Clone)]
pub struct ArrayView<T> {
    data: Arc<[T]>,
    range: Range<usize>,
}

impl<T> ArrayView<T> {
    /// View the whole of `data`.
    pub fn new(data: Arc<[T]>) -> Self {
        let range = 0..data.len();
        Self { data, range }
    }

    /// View part of `data`. Panics if the range is out of bounds, like slice
    /// indexing does.
    pub fn with_range(data: Arc<[T]>, range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end && range.end <= data.len(),
            "range {:?} out of bounds for buffer of length {}",
            range,
            data.len()
        );
        Self { data, range }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data[self.range.clone()]
    }
}

impl<T> From<Vec<T>> for ArrayView<T> {
    fn from(v: Vec<T>) -> Self {
        Self::new(v.into())
    }
}

impl<T> Deref for ArrayView<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: PartialEq> PartialEq for ArrayView<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ArrayView<T> {}

impl<T: fmt::Debug> fmt::Debug for ArrayView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
