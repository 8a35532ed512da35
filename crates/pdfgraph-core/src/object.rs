//! Object model types.
//!
//! Provides [`ObjRef`] (an indirect-reference handle), [`PdfObject`] (any
//! value that can be stored in the registry or nested inside another value),
//! [`ObjectKind`] for typed lookups, and [`Dictionary`], an insertion-ordered
//! map keyed by interned names.

use std::fmt;

use crate::name::PdfName;
use crate::outline::OutlineNode;

/// Opaque handle naming a registry slot.
///
/// The wrapped value is the object number used when the graph is written;
/// the generation number is always 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjRef(u32);

impl ObjRef {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// The object number.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

/// Discriminant of a [`PdfObject`], used for typed lookups and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Name,
    Array,
    Dictionary,
    Reference,
    /// A dictionary with outline tree semantics.
    Outline,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Null => "null",
            ObjectKind::Boolean => "boolean",
            ObjectKind::Integer => "integer",
            ObjectKind::Real => "real",
            ObjectKind::String => "string",
            ObjectKind::Name => "name",
            ObjectKind::Array => "array",
            ObjectKind::Dictionary => "dictionary",
            ObjectKind::Reference => "reference",
            ObjectKind::Outline => "outline",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value of the object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// A text string; the writer picks the byte encoding.
    String(String),
    Name(PdfName),
    Array(Vec<PdfObject>),
    Dictionary(Dictionary),
    Reference(ObjRef),
    /// An outline item or the outline root. Serialized as its dictionary.
    Outline(OutlineNode),
}

impl PdfObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            PdfObject::Null => ObjectKind::Null,
            PdfObject::Boolean(_) => ObjectKind::Boolean,
            PdfObject::Integer(_) => ObjectKind::Integer,
            PdfObject::Real(_) => ObjectKind::Real,
            PdfObject::String(_) => ObjectKind::String,
            PdfObject::Name(_) => ObjectKind::Name,
            PdfObject::Array(_) => ObjectKind::Array,
            PdfObject::Dictionary(_) => ObjectKind::Dictionary,
            PdfObject::Reference(_) => ObjectKind::Reference,
            PdfObject::Outline(_) => ObjectKind::Outline,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PdfObject::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<PdfName> {
        match self {
            PdfObject::Name(name) => Some(*name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PdfObject::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjRef> {
        match self {
            PdfObject::Reference(reference) => Some(*reference),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PdfObject]> {
        match self {
            PdfObject::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<PdfObject>> {
        match self {
            PdfObject::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            PdfObject::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            PdfObject::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_outline(&self) -> Option<&OutlineNode> {
        match self {
            PdfObject::Outline(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_outline_mut(&mut self) -> Option<&mut OutlineNode> {
        match self {
            PdfObject::Outline(node) => Some(node),
            _ => None,
        }
    }
}

impl From<bool> for PdfObject {
    fn from(value: bool) -> Self {
        PdfObject::Boolean(value)
    }
}

impl From<i64> for PdfObject {
    fn from(value: i64) -> Self {
        PdfObject::Integer(value)
    }
}

impl From<f64> for PdfObject {
    fn from(value: f64) -> Self {
        PdfObject::Real(value)
    }
}

impl From<&str> for PdfObject {
    fn from(value: &str) -> Self {
        PdfObject::String(value.to_string())
    }
}

impl From<String> for PdfObject {
    fn from(value: String) -> Self {
        PdfObject::String(value)
    }
}

impl From<PdfName> for PdfObject {
    fn from(value: PdfName) -> Self {
        PdfObject::Name(value)
    }
}

impl From<ObjRef> for PdfObject {
    fn from(value: ObjRef) -> Self {
        PdfObject::Reference(value)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(value: Vec<PdfObject>) -> Self {
        PdfObject::Array(value)
    }
}

impl From<Dictionary> for PdfObject {
    fn from(value: Dictionary) -> Self {
        PdfObject::Dictionary(value)
    }
}

impl From<OutlineNode> for PdfObject {
    fn from(value: OutlineNode) -> Self {
        PdfObject::Outline(value)
    }
}

/// Insertion-ordered dictionary keyed by interned names.
///
/// Key comparison is an identifier comparison. Setting an existing key
/// replaces its value in place, keeping the original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: Vec<(PdfName, PdfObject)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: PdfName) -> Option<&PdfObject> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: PdfName) -> Option<&mut PdfObject> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// The reference stored under `key`, if the value is a reference.
    pub fn get_reference(&self, key: PdfName) -> Option<ObjRef> {
        self.get(key).and_then(PdfObject::as_reference)
    }

    pub fn get_integer(&self, key: PdfName) -> Option<i64> {
        self.get(key).and_then(PdfObject::as_integer)
    }

    /// Insert or replace `key`, returning the previous value.
    pub fn set(&mut self, key: PdfName, value: impl Into<PdfObject>) -> Option<PdfObject> {
        let value = value.into();
        match self.get_mut(key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: PdfName) -> Option<PdfObject> {
        let idx = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn has(&self, key: PdfName) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PdfName, &PdfObject)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}
