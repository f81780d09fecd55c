use crate::booklet::{Booklet, PageUnit, padding_to_multiple};
use crate::config::settings::Settings;

/// Computes the final page sequence of a finalized booklet: the scanned
/// pages plus any synthetic filler.
///
/// When a short booklet carries no heap marker, its physical scratch
/// section is assumed missing from the scan. Stand-in filler pages are
/// spliced at the scratch section's fixed position in the exam template,
/// keeping every later page at a constant offset from the booklet start
/// across all booklets.
#[derive(Debug, Clone)]
pub struct PaddingPolicy {
    splice_offset: usize,
    splice_count: usize,
}

impl PaddingPolicy {
    pub fn new(splice_offset: usize, splice_count: usize) -> Self {
        PaddingPolicy {
            splice_offset,
            splice_count,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.heap_splice_offset, settings.heap_splice_count)
    }

    /// Expand a finalized booklet into its final ordered page sequence.
    ///
    /// Pure function of the booklet and the policy: no side effects, and
    /// the booklet's scanned pages are never mutated.
    ///
    /// - Already a multiple of the target length: scanned pages unchanged.
    /// - Short with a heap page: trailing filler only.
    /// - Short without a heap page: splice `splice_count` fillers after
    ///   scanned index `splice_offset` (clamped to the scanned length),
    ///   then trailing filler up to the next multiple of the target.
    pub fn expand(&self, booklet: &Booklet) -> Vec<PageUnit> {
        let mut pages: Vec<PageUnit> = booklet
            .scanned_pages()
            .iter()
            .cloned()
            .map(PageUnit::Scanned)
            .collect();

        let padding = booklet.padding_len();
        if padding == 0 {
            return pages;
        }

        if booklet.has_heap_page() {
            pages.extend(std::iter::repeat_n(PageUnit::Filler, padding));
            return pages;
        }

        let splice_at = self.splice_offset.min(pages.len());
        pages.splice(
            splice_at..splice_at,
            std::iter::repeat_n(PageUnit::Filler, self.splice_count),
        );

        let trailing = padding_to_multiple(pages.len(), booklet.target_length());
        pages.extend(std::iter::repeat_n(PageUnit::Filler, trailing));
        pages
    }
}
