use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;
use serde_bytes::Bytes;

use crate::{ArrayView, TagKind};

/// NBT ByteArray. The elements are immutable and shared, so cloning the array
/// or streaming it as tokens never copies them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByteArray {
    data: Arc<[i8]>,
}

/// NBT IntArray.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntArray {
    data: Arc<[i32]>,
}

/// NBT LongArray.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LongArray {
    data: Arc<[i64]>,
}

macro_rules! array_common {
    ($array:ident, $elem:ty, $kind:expr) => {
        impl $array {
            pub const KIND: TagKind = $kind;

            pub fn new(data: Vec<$elem>) -> Self {
                Self { data: data.into() }
            }

            /// A read-only view of all the elements, sharing this array's
            /// buffer.
            pub fn view(&self) -> ArrayView<$elem> {
                ArrayView::new(Arc::clone(&self.data))
            }

            pub fn to_vec(&self) -> Vec<$elem> {
                self.data.to_vec()
            }
        }

        impl Default for $array {
            fn default() -> Self {
                Self::new(Vec::new())
            }
        }

        impl Deref for $array {
            type Target = [$elem];

            fn deref(&self) -> &Self::Target {
                &self.data
            }
        }

        impl From<Vec<$elem>> for $array {
            fn from(data: Vec<$elem>) -> Self {
                Self::new(data)
            }
        }

        impl From<&[$elem]> for $array {
            fn from(data: &[$elem]) -> Self {
                Self { data: data.into() }
            }
        }
    };
}

array_common!(ByteArray, i8, TagKind::ByteArray);
array_common!(IntArray, i32, TagKind::IntArray);
array_common!(LongArray, i64, TagKind::LongArray);

impl Serialize for ByteArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Safe to treat [i8] as [u8].
        let data = unsafe { &*(&*self.data as *const [i8] as *const [u8]) };
        Bytes::new(data).serialize(serializer)
    }
}

impl Serialize for IntArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.data.iter())
    }
}

impl Serialize for LongArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.data.iter())
    }
}
