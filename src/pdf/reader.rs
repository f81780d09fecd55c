use std::path::Path;

use lopdf::{Dictionary, Document, Object};

/// Page dictionary attributes a page may inherit from its ancestors in
/// the page tree. Resolves through `Parent` references.
pub(crate) fn inherited_attr(
    doc: &Document,
    dict: &Dictionary,
    key: &[u8],
) -> crate::error::Result<Option<Object>> {
    if let Ok(obj) = dict.get(key) {
        let obj = match obj {
            Object::Reference(id) => doc.get_object(*id)?.clone(),
            other => other.clone(),
        };
        return Ok(Some(obj));
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        let parent_dict = doc.get_dictionary(*parent_id)?;
        return inherited_attr(doc, parent_dict, key);
    }

    Ok(None)
}

pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    /// Open the scanned input PDF.
    pub fn open(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let doc = Document::load(path)?;
        Ok(Self { doc })
    }

    /// Reference to the underlying lopdf Document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Number of physical pages in the input.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page dimensions (width_pts, height_pts) of the given 1-based page,
    /// from its MediaBox (inherited entries included). Used to size the
    /// synthetic filler pages to match the scans.
    pub fn page_dimensions(&self, page_num: u32) -> crate::error::Result<(f64, f64)> {
        let page_id = self.get_page_id(page_num)?;
        let page_dict = self.doc.get_dictionary(page_id)?;

        let media_box = inherited_attr(&self.doc, page_dict, b"MediaBox")?
            .ok_or_else(|| crate::error::ExamNormError::pdf_read("MediaBox not found"))?;

        let media_box_array = media_box.as_array()?;
        if media_box_array.len() < 4 {
            return Err(crate::error::ExamNormError::pdf_read("Invalid MediaBox"));
        }

        // MediaBox values may be integers or reals
        let to_f64 = |obj: &Object| -> crate::error::Result<f64> {
            match obj {
                Object::Integer(i) => Ok(*i as f64),
                Object::Real(f) => Ok(*f as f64),
                _ => Err(crate::error::ExamNormError::pdf_read(
                    "Invalid MediaBox value",
                )),
            }
        };

        let x0 = to_f64(&media_box_array[0])?;
        let y0 = to_f64(&media_box_array[1])?;
        let x1 = to_f64(&media_box_array[2])?;
        let y1 = to_f64(&media_box_array[3])?;

        let width = (x1 - x0).abs();
        let height = (y1 - y0).abs();

        if width <= 0.0 || height <= 0.0 {
            return Err(crate::error::ExamNormError::pdf_read(
                "Invalid MediaBox: non-positive page dimensions",
            ));
        }

        Ok((width, height))
    }

    /// ObjectId of a page by 1-based page number.
    pub(crate) fn get_page_id(&self, page_num: u32) -> crate::error::Result<lopdf::ObjectId> {
        let pages = self.doc.get_pages();
        pages.get(&page_num).copied().ok_or_else(|| {
            crate::error::ExamNormError::pdf_read(format!("page {} not found", page_num))
        })
    }
}
