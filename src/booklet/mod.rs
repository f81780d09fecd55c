pub mod accumulator;
pub mod padding;

use crate::marker::Marker;

/// One physical page of the scanned input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedPage {
    /// 1-based page number in the input document. Used only to preserve
    /// order; pages are never reordered.
    pub source_page: u32,
    /// Marker decoded from the page, if any. Decoded once, immutable.
    pub marker: Option<Marker>,
}

/// A page in a booklet's final sequence. Filler pages are synthesized
/// directly and carry no marker field at all, so they can never be
/// mistaken for a decodable page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUnit {
    Scanned(ScannedPage),
    Filler,
}

/// Number of pages needed to bring `len` up to the next multiple of
/// `target`. Always in `[0, target)`; `len + result` is a multiple of
/// `target`.
pub fn padding_to_multiple(len: usize, target: usize) -> usize {
    (target - len % target) % target
}

/// The run of pages between one cover marker (inclusive) and the next
/// (exclusive): one scanned exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booklet {
    target_length: usize,
    scanned: Vec<ScannedPage>,
    has_heap_page: bool,
}

impl Booklet {
    /// Create an empty booklet. `target_length` must be validated (> 0)
    /// by the caller before any booklet is constructed.
    pub(crate) fn new(target_length: usize) -> Self {
        Booklet {
            target_length,
            scanned: Vec::new(),
            has_heap_page: false,
        }
    }

    /// Append a page in stream order, flagging the heap section when its
    /// marker identifies one.
    pub(crate) fn push(&mut self, page: ScannedPage) {
        if page.marker == Some(Marker::HeapPage) {
            self.has_heap_page = true;
        }
        self.scanned.push(page);
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Pages attributed to this booklet, in original scan order.
    pub fn scanned_pages(&self) -> &[ScannedPage] {
        &self.scanned
    }

    pub fn scanned_len(&self) -> usize {
        self.scanned.len()
    }

    pub fn has_heap_page(&self) -> bool {
        self.has_heap_page
    }

    /// Filler pages required to reach the next multiple of the target
    /// length, before any heap-section splice.
    pub fn padding_len(&self) -> usize {
        padding_to_multiple(self.scanned.len(), self.target_length)
    }

    pub fn is_padded(&self) -> bool {
        self.padding_len() > 0
    }
}
