use serde::Serialize;

use super::{Compound, List, Tag};

// Tags serialize as their plain values, so a tree can be dumped to JSON or any
// other serde format. Kinds are not preserved: a Short and an Int with the
// same value look the same.
impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::ByteArray(v) => v.serialize(serializer),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::List(v) => v.serialize(serializer),
            Tag::Compound(v) => v.serialize(serializer),
            Tag::IntArray(v) => v.serialize(serializer),
            Tag::LongArray(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for Compound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "arbitrary1")]
mod arbitrary_impls {
    use arbitrary::{Arbitrary, Result, Unstructured};

    use crate::{ByteArray, Compound, IntArray, List, LongArray, Tag, TagKind};

    // Containers get one less level each time, so generated trees stay
    // shallow.
    const MAX_DEPTH: u32 = 8;

    fn arbitrary_tag(u: &mut Unstructured<'_>, kind: TagKind, depth: u32) -> Result<Tag> {
        Ok(match kind {
            TagKind::End | TagKind::Byte => Tag::Byte(u.arbitrary()?),
            TagKind::Short => Tag::Short(u.arbitrary()?),
            TagKind::Int => Tag::Int(u.arbitrary()?),
            TagKind::Long => Tag::Long(u.arbitrary()?),
            TagKind::Float => Tag::Float(u.arbitrary()?),
            TagKind::Double => Tag::Double(u.arbitrary()?),
            TagKind::ByteArray => Tag::ByteArray(ByteArray::new(u.arbitrary()?)),
            TagKind::String => Tag::String(u.arbitrary()?),
            TagKind::IntArray => Tag::IntArray(IntArray::new(u.arbitrary()?)),
            TagKind::LongArray => Tag::LongArray(LongArray::new(u.arbitrary()?)),
            TagKind::List if depth == 0 => Tag::List(List::empty(TagKind::End)),
            TagKind::Compound if depth == 0 => Tag::Compound(Compound::new()),
            TagKind::List => {
                let element_kind = value_kind(u)?;
                let mut builder = List::builder(element_kind);
                for _ in 0..u.arbitrary_len::<u8>()? {
                    let tag = arbitrary_tag(u, element_kind, depth - 1)?;
                    builder
                        .push(tag)
                        .map_err(|_| arbitrary::Error::IncorrectFormat)?;
                }
                Tag::List(builder.build())
            }
            TagKind::Compound => {
                let mut builder = Compound::builder();
                for _ in 0..u.arbitrary_len::<u8>()? {
                    let name: String = u.arbitrary()?;
                    let kind = value_kind(u)?;
                    builder.insert(name, arbitrary_tag(u, kind, depth - 1)?);
                }
                Tag::Compound(builder.build())
            }
        })
    }

    fn value_kind(u: &mut Unstructured<'_>) -> Result<TagKind> {
        Ok(*u.choose(&TagKind::ALL[1..])?)
    }

    impl<'a> Arbitrary<'a> for Tag {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            let kind = value_kind(u)?;
            arbitrary_tag(u, kind, MAX_DEPTH)
        }
    }

    impl<'a> Arbitrary<'a> for Compound {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            match arbitrary_tag(u, TagKind::Compound, MAX_DEPTH)? {
                Tag::Compound(c) => Ok(c),
                _ => Err(arbitrary::Error::IncorrectFormat),
            }
        }
    }
}
