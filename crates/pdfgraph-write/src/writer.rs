//! Serialization backend trait.
//!
//! Defines the [`PdfWriter`] trait that abstracts the byte-level encoding of
//! a registry. This keeps the object graph independent of the encoder.

use pdfgraph_core::{DocumentOptions, ObjRef, PdfContext, PdfError};

/// Trait abstracting document serialization.
///
/// A writer walks every object stored in a [`PdfContext`] and encodes it,
/// with `catalog` as the trailer's `/Root`. Callers finalize derived
/// fields (e.g., outline links) before invoking it; the writer does not
/// modify the graph.
///
/// # Usage
///
/// ```ignore
/// let bytes = MyWriter::write(&ctx, catalog, &DocumentOptions::default())?;
/// ```
pub trait PdfWriter {
    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError> + From<std::io::Error>;

    /// Encode the whole registry into document bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `catalog` does not resolve to a dictionary or the
    /// backend cannot encode an object.
    fn write(ctx: &PdfContext, catalog: ObjRef, options: &DocumentOptions) -> Result<Vec<u8>, Self::Error>;

    /// Encode the registry and write the bytes to `target`.
    fn write_to<W: std::io::Write>(
        ctx: &PdfContext,
        catalog: ObjRef,
        options: &DocumentOptions,
        target: &mut W,
    ) -> Result<(), Self::Error> {
        let bytes = Self::write(ctx, catalog, options)?;
        target.write_all(&bytes)?;
        Ok(())
    }
}
