//! Integration tests for pdfdeck.
//!
//! These tests exercise the full flow against in-memory PDF documents
//! built with lopdf, so no fixture files are needed.

use std::sync::Arc;
use std::time::Duration;

use lopdf::{Document, Object, dictionary};

use pdfdeck::config::Settings;
use pdfdeck::io::{FileSource, MemorySource};

/// Build the bytes of a valid PDF with the given number of pages.
pub fn document_bytes(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let catalog_id = doc.new_object_id();
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for _ in 0..pages {
        let page_id = doc.new_object_id();
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(page_id, page.into());
        page_ids.push(page_id);
    }

    let catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(|id| id.into()).collect::<Vec<Object>>(),
        "Count" => pages as i64,
    };

    doc.objects.insert(catalog_id, catalog.into());
    doc.objects.insert(pages_id, pages_dict.into());
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// An in-memory PDF source with real, parseable contents.
pub fn pdf_source(name: &str, pages: usize) -> Arc<dyn FileSource> {
    Arc::new(MemorySource::pdf(name, document_bytes(pages)))
}

/// An in-memory source with arbitrary contents and type.
pub fn raw_source(name: &str, content_type: &str, bytes: Vec<u8>) -> Arc<dyn FileSource> {
    Arc::new(MemorySource::new(name, content_type, bytes))
}

/// Default settings with the post-merge display window removed, so tests
/// don't sleep.
pub fn quick_settings() -> Settings {
    Settings {
        reset_delay: Duration::ZERO,
        ..Default::default()
    }
}

/// Count the pages of a serialized document.
pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}
