//! The object registry.
//!
//! [`PdfContext`] is the sole owner of every object in a document's graph.
//! Objects refer to each other through [`ObjRef`] handles, never through
//! Rust references, so parent/child back-links carry no ownership.
//!
//! The registry has no delete operation. Objects that become unreachable
//! (e.g., removed outline items) stay allocated until the context is dropped,
//! and their handles are never reused.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PdfError;
use crate::name::{NameTable, PdfName};
use crate::object::{Dictionary, ObjRef, ObjectKind, PdfObject};
use crate::outline::OutlineNode;

/// Document-scoped object registry and name table.
#[derive(Debug)]
pub struct PdfContext {
    id: u64,
    /// `slots[n - 1]` holds object number `n`; `None` marks a reserved handle.
    slots: Vec<Option<PdfObject>>,
    names: NameTable,
}

impl PdfContext {
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            names: NameTable::new(),
        }
    }

    /// Stable per-instance identifier, used to reject handles minted by a
    /// different document.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameTable {
        &mut self.names
    }

    /// Intern a name in this context's table.
    pub fn intern(&mut self, raw: &str) -> Result<PdfName, PdfError> {
        self.names.intern(raw)
    }

    fn next_ref(&self) -> Result<ObjRef, PdfError> {
        let number = u32::try_from(self.slots.len() + 1).map_err(|_| {
            PdfError::ResourceLimitExceeded {
                limit_name: "max_objects".to_string(),
                limit_value: u32::MAX as usize,
                actual_value: self.slots.len() + 1,
            }
        })?;
        Ok(ObjRef::new(number))
    }

    /// Allocate a fresh handle without storing an object under it yet.
    pub fn reserve(&mut self) -> Result<ObjRef, PdfError> {
        let reference = self.next_ref()?;
        self.slots.push(None);
        Ok(reference)
    }

    /// Store `object` under a fresh, never-reused handle.
    pub fn register(&mut self, object: impl Into<PdfObject>) -> Result<ObjRef, PdfError> {
        let reference = self.next_ref()?;
        let object = object.into();
        #[cfg(feature = "tracing")]
        tracing::trace!(%reference, kind = %object.kind(), "registered object");
        self.slots.push(Some(object));
        Ok(reference)
    }

    /// Store `object` under a previously allocated handle, replacing any
    /// object already there.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::BrokenReference`] if the handle was never allocated
    /// by this context.
    pub fn assign(&mut self, reference: ObjRef, object: impl Into<PdfObject>) -> Result<(), PdfError> {
        let slot = Self::index(reference)
            .and_then(|idx| self.slots.get_mut(idx))
            .ok_or(PdfError::BrokenReference(reference))?;
        *slot = Some(object.into());
        Ok(())
    }

    fn index(reference: ObjRef) -> Option<usize> {
        (reference.number() as usize).checked_sub(1)
    }

    fn get(&self, reference: ObjRef) -> Option<&PdfObject> {
        Self::index(reference)
            .and_then(|idx| self.slots.get(idx))
            .and_then(Option::as_ref)
    }

    fn get_mut(&mut self, reference: ObjRef) -> Option<&mut PdfObject> {
        Self::index(reference)
            .and_then(|idx| self.slots.get_mut(idx))
            .and_then(Option::as_mut)
    }

    fn check_kind(
        reference: ObjRef,
        object: &PdfObject,
        expected: Option<ObjectKind>,
    ) -> Result<(), PdfError> {
        match expected {
            Some(expected) if object.kind() != expected => Err(PdfError::TypeMismatch {
                reference,
                expected,
                found: object.kind(),
            }),
            _ => Ok(()),
        }
    }

    /// Resolve a handle, optionally requiring a specific kind.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::BrokenReference`] if nothing is stored under the
    /// handle, or [`PdfError::TypeMismatch`] if `expected` is given and the
    /// stored object is of another kind.
    pub fn lookup(&self, reference: ObjRef, expected: Option<ObjectKind>) -> Result<&PdfObject, PdfError> {
        let object = self
            .get(reference)
            .ok_or(PdfError::BrokenReference(reference))?;
        Self::check_kind(reference, object, expected)?;
        Ok(object)
    }

    /// Mutable counterpart of [`lookup`](Self::lookup).
    pub fn lookup_mut(
        &mut self,
        reference: ObjRef,
        expected: Option<ObjectKind>,
    ) -> Result<&mut PdfObject, PdfError> {
        let object = self
            .get_mut(reference)
            .ok_or(PdfError::BrokenReference(reference))?;
        Self::check_kind(reference, object, expected)?;
        Ok(object)
    }

    /// Like [`lookup`](Self::lookup), but an unset handle or a foreign kind
    /// yields `None` instead of an error.
    pub fn lookup_optional(&self, reference: ObjRef, expected: Option<ObjectKind>) -> Option<&PdfObject> {
        self.lookup(reference, expected).ok()
    }

    pub fn lookup_dict(&self, reference: ObjRef) -> Result<&Dictionary, PdfError> {
        match self.lookup(reference, Some(ObjectKind::Dictionary))? {
            PdfObject::Dictionary(dict) => Ok(dict),
            other => Err(PdfError::TypeMismatch {
                reference,
                expected: ObjectKind::Dictionary,
                found: other.kind(),
            }),
        }
    }

    pub fn lookup_dict_mut(&mut self, reference: ObjRef) -> Result<&mut Dictionary, PdfError> {
        match self.lookup_mut(reference, Some(ObjectKind::Dictionary))? {
            PdfObject::Dictionary(dict) => Ok(dict),
            other => Err(PdfError::TypeMismatch {
                reference,
                expected: ObjectKind::Dictionary,
                found: other.kind(),
            }),
        }
    }

    pub fn lookup_outline(&self, reference: ObjRef) -> Result<&OutlineNode, PdfError> {
        match self.lookup(reference, Some(ObjectKind::Outline))? {
            PdfObject::Outline(node) => Ok(node),
            other => Err(PdfError::TypeMismatch {
                reference,
                expected: ObjectKind::Outline,
                found: other.kind(),
            }),
        }
    }

    pub fn lookup_outline_mut(&mut self, reference: ObjRef) -> Result<&mut OutlineNode, PdfError> {
        match self.lookup_mut(reference, Some(ObjectKind::Outline))? {
            PdfObject::Outline(node) => Ok(node),
            other => Err(PdfError::TypeMismatch {
                reference,
                expected: ObjectKind::Outline,
                found: other.kind(),
            }),
        }
    }

    /// Returns true if an object is stored under `reference`.
    pub fn contains(&self, reference: ObjRef) -> bool {
        self.get(reference).is_some()
    }

    /// Number of allocated handles, reserved ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The highest handle allocated so far.
    pub fn max_ref(&self) -> Option<ObjRef> {
        u32::try_from(self.slots.len())
            .ok()
            .filter(|&n| n > 0)
            .map(ObjRef::new)
    }

    /// Iterate stored objects in handle order, skipping reserved handles.
    pub fn iter(&self) -> impl Iterator<Item = (ObjRef, &PdfObject)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let object = slot.as_ref()?;
            let number = u32::try_from(idx + 1).ok()?;
            Some((ObjRef::new(number), object))
        })
    }
}

impl Default for PdfContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_allocates_sequential_handles_from_one() {
        let mut ctx = PdfContext::new();
        let a = ctx.register(1_i64).unwrap();
        let b = ctx.register(2_i64).unwrap();
        assert_eq!(a, ObjRef::new(1));
        assert_eq!(b, ObjRef::new(2));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.max_ref(), Some(ObjRef::new(2)));
    }

    #[test]
    fn handles_are_unique() {
        let mut ctx = PdfContext::new();
        let mut seen = std::collections::HashSet::new();
        for i in 0..100_i64 {
            assert!(seen.insert(ctx.register(i).unwrap()));
        }
    }

    #[test]
    fn lookup_returns_registered_object() {
        let mut ctx = PdfContext::new();
        let r = ctx.register("hello").unwrap();
        assert_eq!(ctx.lookup(r, None).unwrap(), &PdfObject::String("hello".to_string()));
        assert_eq!(
            ctx.lookup(r, Some(ObjectKind::String)).unwrap().as_str(),
            Some("hello")
        );
    }

    #[test]
    fn lookup_unset_handle_is_broken_reference() {
        let ctx = PdfContext::new();
        assert_eq!(
            ctx.lookup(ObjRef::new(1), None),
            Err(PdfError::BrokenReference(ObjRef::new(1)))
        );
        assert_eq!(
            ctx.lookup(ObjRef::new(0), None),
            Err(PdfError::BrokenReference(ObjRef::new(0)))
        );
    }

    #[test]
    fn lookup_wrong_kind_is_type_mismatch() {
        let mut ctx = PdfContext::new();
        let r = ctx.register(Dictionary::new()).unwrap();
        assert_eq!(
            ctx.lookup(r, Some(ObjectKind::Outline)),
            Err(PdfError::TypeMismatch {
                reference: r,
                expected: ObjectKind::Outline,
                found: ObjectKind::Dictionary,
            })
        );
        assert!(matches!(
            ctx.lookup_outline(r),
            Err(PdfError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn lookup_optional_swallows_both_failures() {
        let mut ctx = PdfContext::new();
        let r = ctx.register(3_i64).unwrap();
        assert!(ctx.lookup_optional(r, Some(ObjectKind::Integer)).is_some());
        assert!(ctx.lookup_optional(r, Some(ObjectKind::Dictionary)).is_none());
        assert!(ctx.lookup_optional(ObjRef::new(99), None).is_none());
    }

    #[test]
    fn reserved_handle_is_unset_until_assigned() {
        let mut ctx = PdfContext::new();
        let r = ctx.reserve().unwrap();
        assert!(!ctx.contains(r));
        assert_eq!(ctx.lookup(r, None), Err(PdfError::BrokenReference(r)));
        assert_eq!(ctx.iter().count(), 0);

        ctx.assign(r, Dictionary::new()).unwrap();
        assert!(ctx.contains(r));
        assert!(ctx.lookup_dict(r).is_ok());
        assert_eq!(ctx.iter().count(), 1);
    }

    #[test]
    fn assign_rejects_unallocated_handle() {
        let mut ctx = PdfContext::new();
        assert_eq!(
            ctx.assign(ObjRef::new(5), PdfObject::Null),
            Err(PdfError::BrokenReference(ObjRef::new(5)))
        );
        assert!(ctx.is_empty());
    }

    #[test]
    fn lookup_mut_allows_in_place_edits() {
        let mut ctx = PdfContext::new();
        let r = ctx.register(Dictionary::new()).unwrap();
        ctx.lookup_dict_mut(r).unwrap().set(PdfName::COUNT, 4_i64);
        assert_eq!(ctx.lookup_dict(r).unwrap().get_integer(PdfName::COUNT), Some(4));
    }

    #[test]
    fn iter_yields_handle_order() {
        let mut ctx = PdfContext::new();
        let a = ctx.register(1_i64).unwrap();
        let _reserved = ctx.reserve().unwrap();
        let c = ctx.register(3_i64).unwrap();
        let refs: Vec<ObjRef> = ctx.iter().map(|(r, _)| r).collect();
        assert_eq!(refs, vec![a, c]);
    }

    #[test]
    fn contexts_have_distinct_ids() {
        let a = PdfContext::new();
        let b = PdfContext::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn intern_goes_through_context_table() {
        let mut ctx = PdfContext::new();
        let name = ctx.intern("Custom").unwrap();
        assert_eq!(ctx.names().resolve(name), Some(b"Custom".as_slice()));
        assert_eq!(ctx.intern("Custom").unwrap(), name);
    }
}
