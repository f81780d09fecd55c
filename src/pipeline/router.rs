use crate::booklet::padding::PaddingPolicy;
use crate::booklet::{Booklet, PageUnit};

/// Finalized booklets partitioned by whether they required padding.
/// Relative booklet order is preserved within each group.
#[derive(Debug)]
pub struct RoutedBooklets<'a> {
    pub unpadded: Vec<&'a Booklet>,
    pub padded: Vec<&'a Booklet>,
}

/// Partition booklets into the unpadded and padded output groups.
pub fn route(booklets: &[Booklet]) -> RoutedBooklets<'_> {
    let (padded, unpadded): (Vec<&Booklet>, Vec<&Booklet>) =
        booklets.iter().partition(|b| b.is_padded());
    RoutedBooklets { unpadded, padded }
}

/// Flatten one group into a single ordered page sequence, expanding each
/// booklet through the padding policy. An empty result means the group's
/// output document is skipped entirely.
pub fn flatten(group: &[&Booklet], policy: &PaddingPolicy) -> Vec<PageUnit> {
    group.iter().flat_map(|b| policy.expand(b)).collect()
}
