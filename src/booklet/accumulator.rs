use crate::booklet::{Booklet, ScannedPage};
use crate::marker::Marker;

/// Accumulation state for the booklet currently being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccumState {
    /// No page has been attributed to the current booklet yet. A cover
    /// marker in this state must not emit the (empty) current booklet.
    Empty,
    /// At least one page attributed; the next cover marker closes it out.
    NonEmpty,
}

/// Streaming state machine that groups an ordered `(page, marker)` stream
/// into booklets.
///
/// The pass is strictly sequential: marker-driven transitions depend on
/// processing order. Every page ends up in exactly one booklet, in its
/// original relative position.
pub struct BookletAccumulator {
    target_length: usize,
    state: AccumState,
    current: Booklet,
    finished: Vec<Booklet>,
}

impl BookletAccumulator {
    /// Create an accumulator for booklets of `target_length` pages.
    ///
    /// # Errors
    /// Returns a configuration error when `target_length` is zero.
    pub fn new(target_length: usize) -> crate::error::Result<Self> {
        if target_length == 0 {
            return Err(crate::error::ExamNormError::config(
                "target page count must be a positive integer",
            ));
        }
        Ok(BookletAccumulator {
            target_length,
            state: AccumState::Empty,
            current: Booklet::new(target_length),
            finished: Vec::new(),
        })
    }

    /// Consume the next page of the stream.
    ///
    /// A cover marker closes out the current booklet only when it already
    /// holds at least one page; this suppresses a spurious empty booklet
    /// ahead of the very first cover. The cover page itself is content and
    /// is always retained as the first page of the new booklet.
    pub fn push(&mut self, page: ScannedPage) {
        if page.marker == Some(Marker::FrontPage) && self.state == AccumState::NonEmpty {
            let closed = std::mem::replace(&mut self.current, Booklet::new(self.target_length));
            self.finished.push(closed);
            self.state = AccumState::Empty;
        }
        self.current.push(page);
        self.state = AccumState::NonEmpty;
    }

    /// End of stream: emit the current booklet unconditionally, even when
    /// empty, and return all booklets in input order.
    ///
    /// The unconditional terminal emission differs from the mid-stream
    /// rule on purpose: it captures the degenerate all-remaining-pages
    /// case, so a stream with zero cover markers still yields exactly one
    /// booklet holding the entire input.
    pub fn finish(mut self) -> Vec<Booklet> {
        self.finished.push(self.current);
        self.finished
    }
}
