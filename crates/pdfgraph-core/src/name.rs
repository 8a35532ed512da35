//! Name interning.
//!
//! Provides [`PdfName`], an interned name identifier, and [`NameTable`], the
//! document-scoped cache that canonicalizes names. Two names are equal iff
//! their decoded bytes are equal, so comparing [`PdfName`] values is a plain
//! integer comparison.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::PdfError;

/// Names every table is seeded with, in identifier order.
const WELL_KNOWN: [&str; 19] = [
    "Type",
    "Outlines",
    "Title",
    "Parent",
    "First",
    "Last",
    "Prev",
    "Next",
    "Count",
    "Dest",
    "Fit",
    "PageMode",
    "UseOutlines",
    "Catalog",
    "Pages",
    "Page",
    "Kids",
    "MediaBox",
    "Root",
];

/// Interned name identifier.
///
/// Only meaningful together with the [`NameTable`] that produced it; the
/// associated constants resolve identically in every table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PdfName(u32);

impl PdfName {
    pub const TYPE: PdfName = PdfName(0);
    pub const OUTLINES: PdfName = PdfName(1);
    pub const TITLE: PdfName = PdfName(2);
    pub const PARENT: PdfName = PdfName(3);
    pub const FIRST: PdfName = PdfName(4);
    pub const LAST: PdfName = PdfName(5);
    pub const PREV: PdfName = PdfName(6);
    pub const NEXT: PdfName = PdfName(7);
    pub const COUNT: PdfName = PdfName(8);
    pub const DEST: PdfName = PdfName(9);
    /// Fit-mode marker stored alongside outline destinations.
    pub const FIT: PdfName = PdfName(10);
    pub const PAGE_MODE: PdfName = PdfName(11);
    pub const USE_OUTLINES: PdfName = PdfName(12);
    pub const CATALOG: PdfName = PdfName(13);
    pub const PAGES: PdfName = PdfName(14);
    pub const PAGE: PdfName = PdfName(15);
    pub const KIDS: PdfName = PdfName(16);
    pub const MEDIA_BOX: PdfName = PdfName(17);
    pub const ROOT: PdfName = PdfName(18);

    /// Raw identifier within the owning table.
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Returns true for bytes that must be written as `#XX` inside a name:
/// whitespace, delimiters and the escape character itself.
fn is_irregular(byte: u8) -> bool {
    matches!(
        byte,
        0x00 | b'\t'
            | b'\n'
            | 0x0C
            | b'\r'
            | b' '
            | b'('
            | b')'
            | b'<'
            | b'>'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b'/'
            | b'%'
            | b'#'
    )
}

/// Returns true if `byte` can appear verbatim in an encoded name.
pub fn is_regular_byte(byte: u8) -> bool {
    (b'!'..=b'~').contains(&byte) && !is_irregular(byte)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decode `#XX` escapes. A `#` not followed by two hex digits is kept as-is.
pub fn decode_name(raw: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'#' && i + 2 < raw.len() {
            if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(raw[i]);
        i += 1;
    }
    decoded
}

/// Encode decoded name bytes, escaping every non-regular byte as `#XX`.
///
/// The result carries no leading `/`.
pub fn encode_name(decoded: &[u8]) -> String {
    let mut encoded = String::with_capacity(decoded.len());
    for &byte in decoded {
        if is_regular_byte(byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("#{byte:02X}"));
        }
    }
    encoded
}

/// Document-scoped name cache.
///
/// Invariant: every decoded byte string maps to exactly one [`PdfName`], and
/// `names[id]` / `encoded[id]` hold its decoded and escaped forms.
#[derive(Debug)]
pub struct NameTable {
    names: Vec<Arc<[u8]>>,
    encoded: Vec<Box<str>>,
    map: HashMap<Arc<[u8]>, PdfName>,
}

impl NameTable {
    /// Create a table seeded with the well-known names.
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::with_capacity(WELL_KNOWN.len()),
            encoded: Vec::with_capacity(WELL_KNOWN.len()),
            map: HashMap::with_capacity(WELL_KNOWN.len()),
        };
        for name in WELL_KNOWN {
            let id = PdfName(table.names.len() as u32);
            table.insert_decoded(name.as_bytes().to_vec(), id);
        }
        table
    }

    fn next_id(&self) -> Result<PdfName, PdfError> {
        let idx: u32 = self
            .names
            .len()
            .try_into()
            .map_err(|_| PdfError::ResourceLimitExceeded {
                limit_name: "max_interned_names".to_string(),
                limit_value: u32::MAX as usize,
                actual_value: self.names.len(),
            })?;
        Ok(PdfName(idx))
    }

    fn insert_decoded(&mut self, decoded: Vec<u8>, id: PdfName) {
        let key = Arc::<[u8]>::from(decoded);
        self.encoded.push(encode_name(&key).into_boxed_str());
        self.names.push(Arc::clone(&key));
        self.map.insert(key, id);
    }

    /// Intern a name given in raw (possibly escaped) textual form.
    ///
    /// Escapes are decoded first, so `"A#20B"` and `"A B"` yield the same name.
    pub fn intern(&mut self, raw: &str) -> Result<PdfName, PdfError> {
        self.intern_bytes(raw.as_bytes())
    }

    /// Intern a name given as raw (possibly escaped) bytes.
    pub fn intern_bytes(&mut self, raw: &[u8]) -> Result<PdfName, PdfError> {
        let decoded = decode_name(raw);
        if let Some(id) = self.map.get(decoded.as_slice()) {
            return Ok(*id);
        }
        let id = self.next_id()?;
        self.insert_decoded(decoded, id);
        Ok(id)
    }

    /// Look up a name without interning it.
    pub fn get(&self, raw: &str) -> Option<PdfName> {
        let decoded = decode_name(raw.as_bytes());
        self.map.get(decoded.as_slice()).copied()
    }

    /// Decoded bytes of `name`.
    pub fn resolve(&self, name: PdfName) -> Option<&[u8]> {
        self.names.get(name.0 as usize).map(|s| s.as_ref())
    }

    /// Escaped form of `name`, without the leading `/`.
    pub fn encoded(&self, name: PdfName) -> Option<&str> {
        self.encoded.get(name.0 as usize).map(|s| s.as_ref())
    }

    /// Serialized form of `name`, including the leading `/`.
    pub fn write_name(&self, name: PdfName) -> Option<String> {
        self.encoded(name).map(|encoded| format!("/{encoded}"))
    }

    /// Number of interned names, well-known names included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}
