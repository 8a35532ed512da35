//! lopdf-based serialization backend.
//!
//! Implements [`PdfWriter`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. Every registered object keeps its handle as its object number, so
//! references written by the graph resolve unchanged in the output file.

use pdfgraph_core::{Dictionary, DocumentOptions, NameTable, ObjRef, PdfContext, PdfObject};

use crate::error::WriterError;
use crate::writer::PdfWriter;

/// lopdf-backed writer.
pub struct LopdfWriter;

fn object_id(reference: ObjRef) -> lopdf::ObjectId {
    (reference.number(), 0)
}

fn name_bytes(names: &NameTable, name: pdfgraph_core::PdfName) -> Result<Vec<u8>, WriterError> {
    names
        .resolve(name)
        .map(<[u8]>::to_vec)
        .ok_or(WriterError::UnknownName(name.id()))
}

/// Encode a text string: ASCII as a literal string, anything else as
/// UTF-16BE with a byte order mark.
fn text_string(text: &str) -> lopdf::Object {
    if text.is_ascii() {
        return lopdf::Object::string_literal(text);
    }
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    lopdf::Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}

fn convert_dict(names: &NameTable, dict: &Dictionary) -> Result<lopdf::Dictionary, WriterError> {
    let mut out = lopdf::Dictionary::new();
    for (key, value) in dict.iter() {
        out.set(name_bytes(names, key)?, convert_object(names, value)?);
    }
    Ok(out)
}

fn convert_object(names: &NameTable, object: &PdfObject) -> Result<lopdf::Object, WriterError> {
    let converted = match object {
        PdfObject::Null => lopdf::Object::Null,
        PdfObject::Boolean(value) => lopdf::Object::Boolean(*value),
        PdfObject::Integer(value) => lopdf::Object::Integer(*value),
        PdfObject::Real(value) => lopdf::Object::Real(*value as f32),
        PdfObject::String(text) => text_string(text),
        PdfObject::Name(name) => lopdf::Object::Name(name_bytes(names, *name)?),
        PdfObject::Array(items) => lopdf::Object::Array(
            items
                .iter()
                .map(|item| convert_object(names, item))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        PdfObject::Dictionary(dict) => lopdf::Object::Dictionary(convert_dict(names, dict)?),
        PdfObject::Reference(reference) => lopdf::Object::Reference(object_id(*reference)),
        PdfObject::Outline(node) => lopdf::Object::Dictionary(convert_dict(names, node.dict())?),
    };
    Ok(converted)
}

/// Build an in-memory lopdf document holding every object in `ctx`, with
/// `catalog` as the trailer's `/Root`.
///
/// # Errors
///
/// Returns [`WriterError::Core`] if `catalog` is not a dictionary, or
/// [`WriterError::UnknownName`] if an object uses a name missing from the
/// context's table.
pub fn to_lopdf_document(
    ctx: &PdfContext,
    catalog: ObjRef,
    options: &DocumentOptions,
) -> Result<lopdf::Document, WriterError> {
    ctx.lookup_dict(catalog)?;

    let mut doc = lopdf::Document::with_version(options.pdf_version.as_str());
    for (reference, object) in ctx.iter() {
        doc.objects
            .insert(object_id(reference), convert_object(ctx.names(), object)?);
    }
    doc.max_id = ctx.max_ref().map_or(0, ObjRef::number);
    doc.trailer
        .set("Root", lopdf::Object::Reference(object_id(catalog)));
    Ok(doc)
}

impl PdfWriter for LopdfWriter {
    type Error = WriterError;

    fn write(ctx: &PdfContext, catalog: ObjRef, options: &DocumentOptions) -> Result<Vec<u8>, Self::Error> {
        let mut doc = to_lopdf_document(ctx, catalog, options)?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| WriterError::Serialize(format!("failed to write PDF: {e}")))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            objects = doc.objects.len(),
            bytes = bytes.len(),
            "wrote document"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfgraph_core::{OutlineNode, PdfError, PdfName};

    /// Catalog -> Pages -> one Page, plus an outline root with one item.
    fn minimal_graph() -> (PdfContext, ObjRef, ObjRef, ObjRef) {
        let mut ctx = PdfContext::new();
        let pages = ctx.reserve().unwrap();
        let mut page = Dictionary::new();
        page.set(PdfName::TYPE, PdfName::PAGE);
        page.set(PdfName::PARENT, pages);
        page.set(
            PdfName::MEDIA_BOX,
            vec![
                PdfObject::Integer(0),
                PdfObject::Integer(0),
                PdfObject::Integer(612),
                PdfObject::Integer(792),
            ],
        );
        let page = ctx.register(page).unwrap();

        let mut pages_dict = Dictionary::new();
        pages_dict.set(PdfName::TYPE, PdfName::PAGES);
        pages_dict.set(PdfName::KIDS, vec![PdfObject::Reference(page)]);
        pages_dict.set(PdfName::COUNT, 1_i64);
        ctx.assign(pages, pages_dict).unwrap();

        let root = ctx.register(OutlineNode::root()).unwrap();
        let mut item = OutlineNode::item("Chapter 1", root, false);
        item.set_dest(page);
        let item = ctx.register(item).unwrap();
        ctx.lookup_outline_mut(root).unwrap().push_child(item);

        let mut catalog = Dictionary::new();
        catalog.set(PdfName::TYPE, PdfName::CATALOG);
        catalog.set(PdfName::PAGES, pages);
        catalog.set(PdfName::OUTLINES, root);
        let catalog = ctx.register(catalog).unwrap();
        (ctx, catalog, page, item)
    }

    #[test]
    fn document_keeps_object_numbers() {
        let (ctx, catalog, page, item) = minimal_graph();
        let doc = to_lopdf_document(&ctx, catalog, &DocumentOptions::default()).unwrap();
        assert_eq!(doc.objects.len(), ctx.len());
        assert_eq!(doc.max_id, ctx.max_ref().unwrap().number());

        let item_dict = doc.get_object(object_id(item)).unwrap().as_dict().unwrap();
        let dest = item_dict.get(b"Dest").unwrap().as_array().unwrap();
        assert!(matches!(&dest[0], lopdf::Object::Reference(id) if *id == object_id(page)));
        assert!(matches!(&dest[1], lopdf::Object::Name(name) if name == b"Fit"));
    }

    #[test]
    fn trailer_root_points_at_catalog() {
        let (ctx, catalog, _, _) = minimal_graph();
        let doc = to_lopdf_document(&ctx, catalog, &DocumentOptions::default()).unwrap();
        assert_eq!(
            doc.trailer.get(b"Root").unwrap().as_reference().unwrap(),
            object_id(catalog)
        );
        assert_eq!(doc.version, "1.7");
    }

    #[test]
    fn catalog_must_be_a_dictionary() {
        let (ctx, _, _, item) = minimal_graph();
        let Err(err) = to_lopdf_document(&ctx, item, &DocumentOptions::default()) else {
            panic!("expected a non-dictionary catalog to be rejected");
        };
        assert!(matches!(err, WriterError::Core(PdfError::TypeMismatch { .. })));
    }

    #[test]
    fn unknown_name_is_reported() {
        let mut ctx = PdfContext::new();
        let mut other = NameTable::new();
        let foreign = other.intern("OnlyElsewhere").unwrap();
        let mut catalog = Dictionary::new();
        catalog.set(PdfName::TYPE, foreign);
        let catalog = ctx.register(catalog).unwrap();

        let Err(err) = to_lopdf_document(&ctx, catalog, &DocumentOptions::default()) else {
            panic!("expected a foreign name to be rejected");
        };
        assert!(matches!(err, WriterError::UnknownName(id) if id == foreign.id()));
    }

    #[test]
    fn ascii_titles_are_literal_strings() {
        assert!(matches!(
            text_string("Intro"),
            lopdf::Object::String(bytes, lopdf::StringFormat::Literal) if bytes == b"Intro"
        ));
    }

    #[test]
    fn non_ascii_titles_are_utf16be_with_bom() {
        let expected = [0xFE, 0xFF, 0x00, 0xC9, 0x00, 0x74, 0x00, 0xE9];
        assert!(matches!(
            text_string("Été"),
            lopdf::Object::String(bytes, lopdf::StringFormat::Hexadecimal) if bytes == expected
        ));
    }

    #[test]
    fn escaped_names_keep_decoded_bytes() {
        let mut ctx = PdfContext::new();
        let spaced = ctx.intern("Lime#20Green").unwrap();
        let mut catalog = Dictionary::new();
        catalog.set(PdfName::TYPE, PdfName::CATALOG);
        catalog.set(PdfName::PAGE_MODE, spaced);
        let catalog = ctx.register(catalog).unwrap();

        let doc = to_lopdf_document(&ctx, catalog, &DocumentOptions::default()).unwrap();
        let dict = doc.get_object(object_id(catalog)).unwrap().as_dict().unwrap();
        assert!(matches!(
            dict.get(b"PageMode").unwrap(),
            lopdf::Object::Name(name) if name == b"Lime Green"
        ));
    }

    #[test]
    fn write_produces_loadable_bytes() {
        let (ctx, catalog, _, item) = minimal_graph();
        let bytes = LopdfWriter::write(&ctx, catalog, &DocumentOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let title = doc
            .get_object(object_id(item))
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Title")
            .unwrap();
        assert!(matches!(title, lopdf::Object::String(bytes, _) if bytes == b"Chapter 1"));
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn write_to_appends_to_target() {
        let (ctx, catalog, _, _) = minimal_graph();
        let mut out = Vec::new();
        LopdfWriter::write_to(&ctx, catalog, &DocumentOptions::default(), &mut out).unwrap();
        assert!(out.starts_with(b"%PDF-"));
    }

    #[test]
    fn reserved_handles_are_skipped() {
        let (mut ctx, catalog, _, _) = minimal_graph();
        let dangling = ctx.reserve().unwrap();
        let doc = to_lopdf_document(&ctx, catalog, &DocumentOptions::default()).unwrap();
        assert!(doc.get_object(object_id(dangling)).is_err());
        assert_eq!(doc.max_id, dangling.number());
    }
}
