//! The document-merging capability contract and its lopdf implementation.
//!
//! The merge pipeline depends only on [`DocumentBackend`]: create an
//! empty output document, parse candidate bytes, copy pages across,
//! append them in order, serialize. Swapping the PDF library means
//! implementing this trait, nothing more.

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::error::{PdfDeckError, Result};

/// Contract between the merge pipeline and a document library.
pub trait DocumentBackend: Send + Sync {
    /// In-memory document representation.
    type Document: Send;

    /// Handle to a page copied into a target document, ready to append.
    type Page: Send;

    /// Create an empty output document.
    fn create_empty(&self) -> Self::Document;

    /// Parse a document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::FailedToLoadDocument`] naming `name` when
    /// the bytes are not a readable document.
    fn load(&self, name: &str, bytes: &[u8]) -> Result<Self::Document>;

    /// Page indices of a document, in intra-document order.
    fn page_indices(&self, doc: &Self::Document) -> Vec<usize>;

    /// Copy the given pages of `source` into `target`.
    ///
    /// Returned handles are in the order of `indices` and are not yet
    /// part of the target's page sequence; [`Self::append_page`] does
    /// that.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::MergeFailed`] if an index is out of range
    /// or the copy fails.
    fn copy_pages(
        &self,
        target: &mut Self::Document,
        source: &Self::Document,
        indices: &[usize],
    ) -> Result<Vec<Self::Page>>;

    /// Append a previously copied page to the end of `target`'s page
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::MergeFailed`] if the target's page tree
    /// cannot be updated.
    fn append_page(&self, target: &mut Self::Document, page: Self::Page) -> Result<()>;

    /// Serialize a document to bytes, optionally with a compact encoding.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::SerializeFailed`] if encoding fails.
    fn serialize(&self, doc: &mut Self::Document, optimize: bool) -> Result<Vec<u8>>;

    /// Number of pages in a document.
    fn page_count(&self, doc: &Self::Document) -> usize;
}

/// [`DocumentBackend`] implemented with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for LopdfBackend {
    type Document = Document;
    type Page = ObjectId;

    fn create_empty(&self) -> Document {
        let mut doc = Document::with_version("1.5");

        let catalog_id = doc.new_object_id();
        let pages_id = doc.new_object_id();

        let catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        };

        doc.objects.insert(catalog_id, catalog.into());
        doc.objects.insert(pages_id, pages.into());
        doc.trailer.set("Root", catalog_id);

        doc
    }

    fn load(&self, name: &str, bytes: &[u8]) -> Result<Document> {
        Document::load_mem(bytes).map_err(|e| PdfDeckError::failed_to_load(name, e.to_string()))
    }

    fn page_indices(&self, doc: &Document) -> Vec<usize> {
        (0..doc.get_pages().len()).collect()
    }

    fn copy_pages(
        &self,
        target: &mut Document,
        source: &Document,
        indices: &[usize],
    ) -> Result<Vec<ObjectId>> {
        // Renumber the incoming objects past the target's ids so the two
        // object tables cannot collide.
        let mut imported = source.clone();
        imported.renumber_objects_with(target.max_id + 1);
        target.max_id = imported.max_id;

        let page_ids: Vec<ObjectId> = imported.get_pages().into_values().collect();

        let mut pages = Vec::with_capacity(indices.len());
        for &index in indices {
            let id = page_ids.get(index).copied().ok_or_else(|| {
                PdfDeckError::merge_failed(format!(
                    "page index {index} beyond document with {} page(s)",
                    page_ids.len()
                ))
            })?;
            pages.push(id);
        }

        target.objects.extend(imported.objects);

        Ok(pages)
    }

    fn append_page(&self, target: &mut Document, page: ObjectId) -> Result<()> {
        let pages_id = {
            let catalog = target
                .catalog_mut()
                .map_err(|e| PdfDeckError::merge_failed(format!("failed to get catalog: {e}")))?;

            catalog
                .get(b"Pages")
                .and_then(|p| p.as_reference())
                .map_err(|e| {
                    PdfDeckError::merge_failed(format!("failed to get pages reference: {e}"))
                })?
        };

        // Re-point the page at the output page tree; it still references
        // the tree node it was imported with.
        match target.get_object_mut(page) {
            Ok(Object::Dictionary(dict)) => dict.set("Parent", pages_id),
            Ok(_) => {
                return Err(PdfDeckError::merge_failed("page object is not a dictionary"));
            }
            Err(e) => {
                return Err(PdfDeckError::merge_failed(format!(
                    "failed to get page object: {e}"
                )));
            }
        }

        let pages_obj = target
            .get_object_mut(pages_id)
            .map_err(|e| PdfDeckError::merge_failed(format!("failed to get pages object: {e}")))?;

        if let Object::Dictionary(dict) = pages_obj {
            let kids = dict
                .get_mut(b"Kids")
                .map_err(|_| PdfDeckError::merge_failed("pages dictionary missing Kids array"))?;

            if let Object::Array(kids_array) = kids {
                kids_array.push(Object::Reference(page));
            } else {
                return Err(PdfDeckError::merge_failed("Kids is not an array"));
            }

            let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
            dict.set("Count", Object::Integer(current_count + 1));
        } else {
            return Err(PdfDeckError::merge_failed("pages object is not a dictionary"));
        }

        Ok(())
    }

    fn serialize(&self, doc: &mut Document, optimize: bool) -> Result<Vec<u8>> {
        if optimize {
            doc.compress();
            doc.prune_objects();
        }

        // Always renumber for consistency.
        doc.renumber_objects();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| PdfDeckError::serialize_failed(e.to_string()))?;

        Ok(bytes)
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }
}
