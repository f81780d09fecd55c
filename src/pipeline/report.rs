use std::fmt;

use tracing::warn;

use crate::pipeline::router::RoutedBooklets;

/// Aggregate statistics over one normalization run. Advisory output only;
/// building a summary never alters any page sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_booklets: usize,
    pub unpadded_booklets: usize,
    pub padded_booklets: usize,
    /// Mean padding length over padded booklets, 0.0 when none were padded.
    pub mean_padding: f64,
    /// Unpadded booklets whose scanned length already exceeds the target:
    /// a likely missed or obscured cover marker. A warning, not an error;
    /// the detected grouping is still honored.
    pub oversize_unpadded: usize,
}

impl Summary {
    pub fn from_groups(groups: &RoutedBooklets<'_>) -> Summary {
        let padded_total: usize = groups.padded.iter().map(|b| b.padding_len()).sum();
        let mean_padding = if groups.padded.is_empty() {
            0.0
        } else {
            padded_total as f64 / groups.padded.len() as f64
        };

        let oversize_unpadded = groups
            .unpadded
            .iter()
            .filter(|b| b.scanned_len() > b.target_length())
            .count();

        Summary {
            total_booklets: groups.unpadded.len() + groups.padded.len(),
            unpadded_booklets: groups.unpadded.len(),
            padded_booklets: groups.padded.len(),
            mean_padding,
            oversize_unpadded,
        }
    }

    /// Log the data anomalies this summary carries, if any.
    pub fn log_warnings(&self) {
        if self.oversize_unpadded > 0 {
            warn!(
                count = self.oversize_unpadded,
                "booklets longer than the target length; a cover marker was probably missed"
            );
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} booklets detected", self.total_booklets)?;
        writeln!(
            f,
            "  {} already at a multiple of the target length",
            self.unpadded_booklets
        )?;
        write!(
            f,
            "  {} padded (mean {:.1} filler pages)",
            self.padded_booklets, self.mean_padding
        )?;
        if self.oversize_unpadded > 0 {
            write!(
                f,
                "\nWARNING: {} booklets exceed the target length; check for missed cover markers",
                self.oversize_unpadded
            )?;
        }
        Ok(())
    }
}
