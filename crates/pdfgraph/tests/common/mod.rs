//! Shared helpers for reading saved documents back with lopdf.
//!
//! The walkers follow `/First` and `/Next` links only, the way a viewer
//! does, so they check the serialized tree rather than the in-memory one.

#![allow(dead_code)]

use lopdf::{Dictionary, Object, ObjectId};

pub fn load(bytes: &[u8]) -> lopdf::Document {
    lopdf::Document::load_mem(bytes).expect("saved document should load")
}

pub fn dict(doc: &lopdf::Document, id: ObjectId) -> &Dictionary {
    doc.get_object(id)
        .and_then(Object::as_dict)
        .unwrap_or_else(|e| panic!("object {id:?} is not a dictionary: {e}"))
}

pub fn catalog(doc: &lopdf::Document) -> &Dictionary {
    let id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("trailer /Root");
    dict(doc, id)
}

pub fn outline_root(doc: &lopdf::Document) -> (ObjectId, &Dictionary) {
    let id = catalog(doc)
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .expect("catalog /Outlines");
    (id, dict(doc, id))
}

pub fn reference(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    dict.get(key).and_then(Object::as_reference).ok()
}

pub fn count(dict: &Dictionary) -> Option<i64> {
    dict.get(b"Count").and_then(Object::as_i64).ok()
}

/// Decode a text string, honoring a UTF-16BE byte order mark.
pub fn text(object: &Object) -> String {
    match object {
        Object::String(bytes, _) if bytes.starts_with(&[0xFE, 0xFF]) => {
            let units: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
        other => panic!("expected a string, got {other:?}"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkedItem {
    pub id: ObjectId,
    pub title: String,
    pub level: usize,
}

/// Every outline item reachable from the root, in display order.
pub fn walk_outlines(doc: &lopdf::Document) -> Vec<WalkedItem> {
    let (_, root) = outline_root(doc);
    let mut items = Vec::new();
    let mut stack = vec![(reference(root, b"First"), 0)];
    while let Some((current, level)) = stack.pop() {
        let Some(id) = current else { continue };
        let item = dict(doc, id);
        items.push(WalkedItem {
            id,
            title: text(item.get(b"Title").expect("item /Title")),
            level,
        });
        stack.push((reference(item, b"Next"), level));
        stack.push((reference(item, b"First"), level + 1));
    }
    items
}

pub fn titles(doc: &lopdf::Document) -> Vec<(String, usize)> {
    walk_outlines(doc)
        .into_iter()
        .map(|item| (item.title, item.level))
        .collect()
}

pub fn item_by_title<'a>(doc: &'a lopdf::Document, title: &str) -> &'a Dictionary {
    let item = walk_outlines(doc)
        .into_iter()
        .find(|item| item.title == title)
        .unwrap_or_else(|| panic!("no outline item titled {title:?}"));
    dict(doc, item.id)
}

/// Check `/Parent`, `/Prev` and `/Last` against the `/First`-`/Next` chains
/// of every node in the tree.
pub fn assert_links_consistent(doc: &lopdf::Document) {
    let (root_id, _) = outline_root(doc);
    let mut pending = vec![root_id];
    while let Some(parent_id) = pending.pop() {
        let parent = dict(doc, parent_id);
        let mut prev = None;
        let mut current = reference(parent, b"First");
        while let Some(id) = current {
            let item = dict(doc, id);
            assert_eq!(reference(item, b"Parent"), Some(parent_id), "parent of {id:?}");
            assert_eq!(reference(item, b"Prev"), prev, "prev of {id:?}");
            prev = Some(id);
            current = reference(item, b"Next");
            pending.push(id);
        }
        assert_eq!(reference(parent, b"Last"), prev, "last of {parent_id:?}");
    }
}

/// 1-based page number of the page an item's `/Dest` points at.
pub fn dest_page_number(doc: &lopdf::Document, item: &Dictionary) -> Option<u32> {
    let dest = item.get(b"Dest").and_then(Object::as_array).ok()?;
    let target = dest.first()?.as_reference().ok()?;
    doc.get_pages()
        .into_iter()
        .find(|(_, id)| *id == target)
        .map(|(number, _)| number)
}
