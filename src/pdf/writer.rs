use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::booklet::PageUnit;
use crate::pdf::reader::inherited_attr;

/// Filler page size when the input has no pages to take dimensions from
/// (US Letter in points).
pub const DEFAULT_FILLER_DIMS: (f64, f64) = (612.0, 792.0);

/// Page attributes that must be materialized onto each page dictionary
/// before it is re-parented into the output page tree, since the old
/// ancestors they could be inherited from are dropped.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Assembles one output document from an ordered page sequence drawn from
/// a single source document, synthesizing blank filler pages in place.
pub struct BookletWriter {
    doc: Document,
}

impl BookletWriter {
    /// Build the output document for one group.
    ///
    /// The source is cloned, the selected pages are re-parented under a
    /// fresh page tree in sequence order, filler pages are synthesized at
    /// `filler_dims`, and everything unreachable from the new catalog is
    /// pruned. Filler pages share a single empty content stream.
    pub fn assemble(
        source: &Document,
        pages: &[PageUnit],
        filler_dims: (f64, f64),
    ) -> crate::error::Result<Self> {
        let mut doc = source.clone();
        let page_map = doc.get_pages();

        let pages_id = doc.new_object_id();
        let filler_content_id =
            doc.add_object(Object::Stream(Stream::new(dictionary! {}, Vec::new())));

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for unit in pages {
            match unit {
                PageUnit::Scanned(scan) => {
                    let page_id = *page_map.get(&scan.source_page).ok_or_else(|| {
                        crate::error::ExamNormError::pdf_write(format!(
                            "page {} not found in source document",
                            scan.source_page
                        ))
                    })?;
                    Self::reparent_page(&mut doc, page_id, pages_id)?;
                    kids.push(Object::Reference(page_id));
                }
                PageUnit::Filler => {
                    let page_id =
                        Self::add_filler_page(&mut doc, pages_id, filler_content_id, filler_dims);
                    kids.push(Object::Reference(page_id));
                }
            }
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.prune_objects();
        doc.renumber_objects();

        Ok(Self { doc })
    }

    /// Move a source page under the new page tree, first copying down any
    /// attributes it inherited from ancestors that are about to be pruned.
    fn reparent_page(
        doc: &mut Document,
        page_id: ObjectId,
        pages_id: ObjectId,
    ) -> crate::error::Result<()> {
        let page_dict = doc.get_dictionary(page_id)?.clone();

        let mut materialized: Vec<(&[u8], Object)> = Vec::new();
        for key in INHERITABLE_KEYS {
            if !page_dict.has(key)
                && let Some(value) = inherited_attr(doc, &page_dict, key)?
            {
                materialized.push((key, value));
            }
        }

        let dict = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| crate::error::ExamNormError::pdf_write(e.to_string()))?;
        for (key, value) in materialized {
            dict.set(key, value);
        }
        dict.set("Parent", Object::Reference(pages_id));
        Ok(())
    }

    /// Synthesize one blank filler page referencing the shared empty
    /// content stream.
    fn add_filler_page(
        doc: &mut Document,
        pages_id: ObjectId,
        content_id: ObjectId,
        (width, height): (f64, f64),
    ) -> ObjectId {
        doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ],
            "Resources" => Object::Dictionary(Dictionary::new()),
            "Contents" => Object::Reference(content_id),
        })
    }

    /// Number of pages in the assembled document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Serialize the output PDF to bytes.
    pub fn save_to_bytes(&self) -> crate::error::Result<Vec<u8>> {
        let mut buf = Vec::new();
        // clone to avoid borrowing issues with save_to (takes &mut self in lopdf)
        self.doc
            .clone()
            .save_to(&mut buf)
            .map_err(|e| crate::error::ExamNormError::pdf_write(e.to_string()))?;
        Ok(buf)
    }
}
