//! Outline (bookmark) tree nodes and tree algorithms.
//!
//! An [`OutlineNode`] is a dictionary with tree semantics. The authoritative
//! structure is each node's ordered `children` list; `/First`, `/Last`,
//! `/Prev`, `/Next` and `/Count` are derived fields that only [`finalize`]
//! writes, so they must not be trusted between mutations and a save.
//!
//! Every traversal here runs over an explicit stack and is bounded by
//! [`DocumentOptions::max_outline_depth`].

use std::collections::{HashMap, HashSet};

use crate::context::PdfContext;
use crate::error::PdfError;
use crate::name::PdfName;
use crate::object::{Dictionary, ObjRef, PdfObject};
use crate::options::{CollapsedCount, DocumentOptions};

/// A single outline item, or the outline root.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    dict: Dictionary,
    children: Vec<ObjRef>,
    expanded: bool,
}

impl OutlineNode {
    /// The outline root: `/Type /Outlines`, no title, no parent. The root
    /// always counts as expanded.
    pub fn root() -> Self {
        let mut dict = Dictionary::new();
        dict.set(PdfName::TYPE, PdfName::OUTLINES);
        Self {
            dict,
            children: Vec::new(),
            expanded: true,
        }
    }

    /// A childless outline item attached (on the parent side) by the caller.
    pub fn item(title: impl Into<String>, parent: ObjRef, expanded: bool) -> Self {
        let title: String = title.into();
        let mut dict = Dictionary::new();
        dict.set(PdfName::TITLE, title);
        dict.set(PdfName::PARENT, parent);
        Self {
            dict,
            children: Vec::new(),
            expanded,
        }
    }

    /// The dictionary written for this node.
    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn title(&self) -> Option<&str> {
        self.dict.get(PdfName::TITLE).and_then(PdfObject::as_str)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title: String = title.into();
        self.dict.set(PdfName::TITLE, title);
    }

    pub fn parent(&self) -> Option<ObjRef> {
        self.dict.get_reference(PdfName::PARENT)
    }

    pub fn set_parent(&mut self, parent: ObjRef) {
        self.dict.set(PdfName::PARENT, parent);
    }

    /// Child handles in display order.
    pub fn children(&self) -> &[ObjRef] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Target page handle of `/Dest`, if set.
    pub fn dest(&self) -> Option<ObjRef> {
        self.dict
            .get(PdfName::DEST)
            .and_then(PdfObject::as_array)
            .and_then(|dest| dest.first())
            .and_then(PdfObject::as_reference)
    }

    /// Store `/Dest [page /Fit]`.
    ///
    /// The `/Fit` marker is required; Apple Preview ignores destinations
    /// that carry only the page reference.
    pub fn set_dest(&mut self, page: ObjRef) {
        self.dict.set(
            PdfName::DEST,
            vec![PdfObject::Reference(page), PdfObject::Name(PdfName::FIT)],
        );
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn first(&self) -> Option<ObjRef> {
        self.dict.get_reference(PdfName::FIRST)
    }

    pub fn last(&self) -> Option<ObjRef> {
        self.dict.get_reference(PdfName::LAST)
    }

    pub fn prev(&self) -> Option<ObjRef> {
        self.dict.get_reference(PdfName::PREV)
    }

    pub fn next(&self) -> Option<ObjRef> {
        self.dict.get_reference(PdfName::NEXT)
    }

    /// The `/Count` written by the last [`finalize`], if any.
    pub fn count(&self) -> Option<i64> {
        self.dict.get_integer(PdfName::COUNT)
    }

    /// Splice `child` into this node's children at `index`.
    ///
    /// Derived fields are left untouched. Returns `parent_ref` (this node's
    /// own handle) for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IndexOutOfRange`] if `index > child_count()`.
    pub fn insert_child(
        &mut self,
        parent_ref: ObjRef,
        child: ObjRef,
        index: usize,
    ) -> Result<ObjRef, PdfError> {
        if index > self.children.len() {
            return Err(PdfError::index_out_of_range(
                "outline",
                index,
                0,
                self.children.len() + 1,
            ));
        }
        self.children.insert(index, child);
        Ok(parent_ref)
    }

    pub fn push_child(&mut self, child: ObjRef) {
        self.children.push(child);
    }

    /// Remove `child` by value. Returns false if it was not a child.
    pub fn remove_child(&mut self, child: ObjRef) -> bool {
        match self.children.iter().position(|&c| c == child) {
            Some(idx) => {
                self.children.remove(idx);
                true
            }
            None => false,
        }
    }

    fn set_or_remove(&mut self, key: PdfName, value: Option<ObjRef>) {
        match value {
            Some(reference) => {
                self.dict.set(key, reference);
            }
            None => {
                self.dict.remove(key);
            }
        }
    }

    fn set_siblings(&mut self, prev: Option<ObjRef>, next: Option<ObjRef>) {
        self.set_or_remove(PdfName::PREV, prev);
        self.set_or_remove(PdfName::NEXT, next);
    }
}

/// Register a new childless outline item under `parent`.
///
/// Only the child side of the link is written; the caller splices the
/// returned handle into the parent's children.
pub fn create_item(
    ctx: &mut PdfContext,
    title: impl Into<String>,
    parent: ObjRef,
    expanded: bool,
) -> Result<ObjRef, PdfError> {
    ctx.register(OutlineNode::item(title, parent, expanded))
}

fn depth_exceeded(max_depth: usize, depth: usize) -> PdfError {
    PdfError::ResourceLimitExceeded {
        limit_name: "max_outline_depth".to_string(),
        limit_value: max_depth,
        actual_value: depth,
    }
}

/// Number of ancestors of `node` (0 for the root).
pub fn depth_of(ctx: &PdfContext, node: ObjRef, max_depth: usize) -> Result<usize, PdfError> {
    let mut depth = 0;
    let mut current = ctx.lookup_outline(node)?.parent();
    while let Some(parent) = current {
        depth += 1;
        if depth > max_depth {
            return Err(depth_exceeded(max_depth, depth));
        }
        current = ctx.lookup_outline(parent)?.parent();
    }
    Ok(depth)
}

/// Handles of `root`'s subtree in post-order: every node after all of its
/// descendants, siblings in children order, `root` last.
///
/// # Errors
///
/// - [`PdfError::BrokenReference`] / [`PdfError::TypeMismatch`] for a child
///   handle that does not resolve to an outline node.
/// - [`PdfError::InvalidInput`] if a node is reachable twice.
/// - [`PdfError::ResourceLimitExceeded`] if the subtree is deeper than `max_depth`.
pub fn post_order(ctx: &PdfContext, root: ObjRef, max_depth: usize) -> Result<Vec<ObjRef>, PdfError> {
    ctx.lookup_outline(root)?;
    let mut order = Vec::new();
    let mut visited = HashSet::from([root]);
    let mut stack: Vec<(ObjRef, usize)> = vec![(root, 0)];

    while let Some(&(node, next)) = stack.last() {
        let child = ctx.lookup_outline(node)?.children().get(next).copied();
        match child {
            Some(child) => {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let depth = stack.len();
                if depth > max_depth {
                    return Err(depth_exceeded(max_depth, depth));
                }
                if !visited.insert(child) {
                    return Err(PdfError::InvalidInput(format!(
                        "outline item {child} is reachable more than once"
                    )));
                }
                ctx.lookup_outline(child)?;
                stack.push((child, 0));
            }
            None => {
                stack.pop();
                order.push(node);
            }
        }
    }
    Ok(order)
}

/// Visit every node of `root`'s subtree in post-order.
pub fn traverse_post_order<F>(
    ctx: &PdfContext,
    root: ObjRef,
    max_depth: usize,
    mut visitor: F,
) -> Result<(), PdfError>
where
    F: FnMut(ObjRef, &OutlineNode),
{
    for node in post_order(ctx, root, max_depth)? {
        visitor(node, ctx.lookup_outline(node)?);
    }
    Ok(())
}

/// Descendants of `root` in display (pre-)order with their level, top-level
/// items at level 0. `root` itself is not included.
pub fn pre_order(
    ctx: &PdfContext,
    root: ObjRef,
    max_depth: usize,
) -> Result<Vec<(ObjRef, usize)>, PdfError> {
    let mut order = Vec::new();
    let mut visited = HashSet::from([root]);
    let mut stack: Vec<(ObjRef, usize)> = ctx
        .lookup_outline(root)?
        .children()
        .iter()
        .rev()
        .map(|&child| (child, 0))
        .collect();

    while let Some((node, level)) = stack.pop() {
        if level >= max_depth {
            return Err(depth_exceeded(max_depth, level + 1));
        }
        if !visited.insert(node) {
            return Err(PdfError::InvalidInput(format!(
                "outline item {node} is reachable more than once"
            )));
        }
        order.push((node, level));
        let children = ctx.lookup_outline(node)?.children();
        stack.extend(children.iter().rev().map(|&child| (child, level + 1)));
    }
    Ok(order)
}

/// Remove `node` and its whole subtree from the tree.
///
/// Descendants are excised from their parents' children before `node`
/// itself is excised from its own parent. Removing an already removed node
/// is a no-op. The registry keeps the removed objects allocated.
pub fn remove_subtree(ctx: &mut PdfContext, node: ObjRef) -> Result<(), PdfError> {
    for removed in post_order(ctx, node, usize::MAX)? {
        let Some(parent) = ctx.lookup_outline(removed)?.parent() else {
            continue;
        };
        if let Ok(parent_node) = ctx.lookup_outline_mut(parent) {
            parent_node.remove_child(removed);
        }
    }
    Ok(())
}

/// Derive `/First`, `/Last`, `/Prev`, `/Next` and `/Count` for every node
/// under `root` from the children lists. Returns the root's visible count.
///
/// Runs in post-order so each node sees its children's contributions:
/// a node's aggregate is its direct child count plus the contributions of
/// its children. An expanded node stores the aggregate as `/Count` and
/// contributes it upward; a collapsed node contributes 0 and its `/Count`
/// follows [`DocumentOptions::collapsed_count`]. Stale derived fields are
/// removed, so repeated calls are idempotent.
pub fn finalize(ctx: &mut PdfContext, root: ObjRef, options: &DocumentOptions) -> Result<usize, PdfError> {
    let order = post_order(ctx, root, options.max_outline_depth)?;
    let mut contributions: HashMap<ObjRef, usize> = HashMap::with_capacity(order.len());

    for &node_ref in &order {
        let (children, expanded) = {
            let node = ctx.lookup_outline(node_ref)?;
            (node.children().to_vec(), node.is_expanded())
        };

        let mut aggregate = children.len();
        for (idx, &child) in children.iter().enumerate() {
            let prev = idx.checked_sub(1).map(|p| children[p]);
            let next = children.get(idx + 1).copied();
            ctx.lookup_outline_mut(child)?.set_siblings(prev, next);
            aggregate += contributions.get(&child).copied().unwrap_or(0);
        }

        let node = ctx.lookup_outline_mut(node_ref)?;
        node.set_or_remove(PdfName::FIRST, children.first().copied());
        node.set_or_remove(PdfName::LAST, children.last().copied());

        let count = i64::try_from(aggregate).unwrap_or(i64::MAX);
        match (expanded, options.collapsed_count) {
            (true, _) => {
                node.dict.set(PdfName::COUNT, count);
            }
            (false, CollapsedCount::Signed) if aggregate > 0 => {
                node.dict.set(PdfName::COUNT, -count);
            }
            (false, _) => {
                node.dict.remove(PdfName::COUNT);
            }
        }

        contributions.insert(node_ref, if expanded { aggregate } else { 0 });
    }

    let visible = contributions.get(&root).copied().unwrap_or(0);
    #[cfg(feature = "tracing")]
    tracing::debug!(nodes = order.len(), visible, "finalized outline tree");
    Ok(visible)
}
