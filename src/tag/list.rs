use super::{Tag, TagType};
use crate::error::{Error, Result};
use crate::TagKind;

/// An ordered sequence of tags that all share one kind.
///
/// The element kind is part of the list's value: an empty list of INT is not
/// equal to an empty list of STRING. A list whose element kind is END is
/// always empty.
///
/// ```
/// use nbtstream::{List, Tag, TagKind};
///
/// # fn main() -> nbtstream::error::Result<()> {
/// let list = List::new(TagKind::Int, vec![Tag::Int(1), Tag::Int(2)])?;
/// assert_eq!(list.len(), 2);
///
/// let mixed = List::from_tags(vec![Tag::Int(1), Tag::Long(2)]);
/// assert!(mixed.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct List {
    element_kind: TagKind,
    elements: Vec<Tag>,
}

impl List {
    /// Make a list of `element_kind`. Fails if any element has another kind.
    pub fn new(element_kind: TagKind, elements: Vec<Tag>) -> Result<Self> {
        for tag in &elements {
            check_element(element_kind, tag)?;
        }
        Ok(Self {
            element_kind,
            elements,
        })
    }

    /// Make a list taking its element kind from the first element. An empty
    /// vector gives an empty list of END.
    pub fn from_tags(elements: Vec<Tag>) -> Result<Self> {
        let kind = elements.first().map_or(TagKind::End, Tag::kind);
        Self::new(kind, elements)
    }

    pub fn empty(element_kind: TagKind) -> Self {
        Self {
            element_kind,
            elements: Vec::new(),
        }
    }

    pub fn builder(element_kind: TagKind) -> ListBuilder {
        ListBuilder {
            element_kind,
            elements: Vec::new(),
        }
    }

    /// A builder seeded with this list's kind and elements.
    pub fn to_builder(&self) -> ListBuilder {
        ListBuilder {
            element_kind: self.element_kind,
            elements: self.elements.clone(),
        }
    }

    pub fn element_kind(&self) -> TagKind {
        self.element_kind
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// This list, if its elements are of `kind`. An empty list of END passes
    /// for an empty list of any kind.
    pub fn as_type_checked(&self, kind: TagKind) -> Result<&Self> {
        if self.element_kind == kind || (self.element_kind == TagKind::End && self.is_empty()) {
            Ok(self)
        } else {
            Err(Error::wrong_kind(kind, self.element_kind))
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Accumulates elements for a [`List`], checking each one as it is added.
#[derive(Debug, Clone)]
pub struct ListBuilder {
    element_kind: TagKind,
    elements: Vec<Tag>,
}

impl ListBuilder {
    pub(crate) fn with_capacity(element_kind: TagKind, capacity: usize) -> Self {
        Self {
            element_kind,
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn element_kind(&self) -> TagKind {
        self.element_kind
    }

    /// Append an element, failing if it is not of the list's kind.
    pub fn add(mut self, tag: impl Into<Tag>) -> Result<Self> {
        self.push(tag)?;
        Ok(self)
    }

    /// Like [`add`][ListBuilder::add], but through a reference.
    pub fn push(&mut self, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        check_element(self.element_kind, &tag)?;
        self.elements.push(tag);
        Ok(())
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, tag: impl Into<Tag>) -> Result<Tag> {
        let tag = tag.into();
        check_element(self.element_kind, &tag)?;
        let len = self.elements.len();
        match self.elements.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, tag)),
            None => Err(Error::invalid_construction(format!(
                "index {} out of bounds for list of {} elements",
                index, len
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn build(self) -> List {
        List {
            element_kind: self.element_kind,
            elements: self.elements,
        }
    }
}

fn check_element(element_kind: TagKind, tag: &Tag) -> Result<()> {
    if element_kind == TagKind::End {
        return Err(Error::invalid_construction(format!(
            "list of END cannot hold a {} element",
            tag.kind()
        )));
    }
    TagType::of(element_kind).check(tag)
}
