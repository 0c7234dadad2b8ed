use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use super::Tag;
use crate::error::{Error, Result};
use crate::TagKind;

/// An ordered mapping from names to tags.
///
/// Entries iterate in the order they were first inserted. Putting a name that
/// is already present replaces its value but keeps its original position.
/// Two compounds are equal when they hold the same entries, whatever their
/// order.
///
/// ```
/// use nbtstream::{Compound, Tag, TagKind};
///
/// let compound = Compound::builder()
///     .put("a", 1)
///     .put("b", "two")
///     .put("a", 3)
///     .build();
///
/// let names: Vec<&str> = compound.keys().collect();
/// assert_eq!(names, ["a", "b"]);
/// assert_eq!(compound.get("a"), Some(&Tag::Int(3)));
/// assert!(compound.get_typed("b", TagKind::Int).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    entries: IndexMap<String, Tag>,
}

impl Compound {
    /// An empty compound.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CompoundBuilder {
        CompoundBuilder::default()
    }

    /// A builder seeded with this compound's entries, in order.
    pub fn to_builder(&self) -> CompoundBuilder {
        CompoundBuilder {
            entries: self.entries.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.get(name)
    }

    /// Get the tag under `name`, failing if it is missing or of another kind.
    pub fn get_typed(&self, name: &str, kind: TagKind) -> Result<&Tag> {
        match self.entries.get(name) {
            Some(tag) if tag.kind() == kind => Ok(tag),
            Some(tag) => Err(Error::invalid_construction(format!(
                "entry {:?} is {}, expected {}",
                name,
                tag.kind(),
                kind
            ))),
            None => Err(Error::invalid_construction(format!(
                "no entry named {:?}",
                name
            ))),
        }
    }

    /// Get the tag under `name` only if it is of the given kind.
    pub fn find_typed(&self, name: &str, kind: TagKind) -> Option<&Tag> {
        self.entries.get(name).filter(|tag| tag.kind() == kind)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Tag> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Equality ignores order, so the hash of each entry is combined with an
// order independent sum.
impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum: u64 = 0;
        for entry in &self.entries {
            let mut hasher = DefaultHasher::new();
            entry.hash(&mut hasher);
            sum = sum.wrapping_add(hasher.finish());
        }
        self.entries.len().hash(state);
        sum.hash(state);
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Tag>> FromIterator<(K, V)> for Compound {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut builder = Compound::builder();
        for (name, tag) in iter {
            builder.insert(name, tag);
        }
        builder.build()
    }
}

/// Accumulates entries for a [`Compound`].
#[derive(Debug, Clone, Default)]
pub struct CompoundBuilder {
    entries: IndexMap<String, Tag>,
}

impl CompoundBuilder {
    /// Add an entry, replacing the value of an existing entry with the same
    /// name in place.
    pub fn put(mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Self {
        self.insert(name, tag);
        self
    }

    /// Like [`put`][CompoundBuilder::put], but through a reference. Returns
    /// the value that was replaced.
    pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(name.into(), tag.into())
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.entries.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> Compound {
        Compound {
            entries: self.entries,
        }
    }
}
