use image::DynamicImage;

use crate::config::settings::Settings;

/// Classified machine-readable marker found on a scanned page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Cover page of a booklet; opens a new grouping boundary.
    FrontPage,
    /// Scratch ("heap") page inside a booklet.
    HeapPage,
    /// A readable code that matches neither configured payload.
    Other(String),
}

impl Marker {
    /// Classify a decoded payload against the configured code strings.
    /// Comparison is plain string equality.
    pub fn classify(payload: &str, settings: &Settings) -> Marker {
        if payload == settings.front_page_code {
            Marker::FrontPage
        } else if payload == settings.heap_page_code {
            Marker::HeapPage
        } else {
            Marker::Other(payload.to_string())
        }
    }
}

/// Scan a rasterized page for a QR code and return its payload.
///
/// Returns `None` when no code is present or the code is unreadable.
/// An unreadable marker is never an error; the page simply carries no
/// marker as far as segmentation is concerned.
pub fn decode_payload(image: &DynamicImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare(image.to_luma8());
    for grid in prepared.detect_grids() {
        if let Ok((_meta, content)) = grid.decode() {
            return Some(content);
        }
    }
    None
}
