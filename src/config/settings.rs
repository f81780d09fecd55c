use std::path::Path;

use serde::Deserialize;

/// Run settings with defaults matching the exam template this tool was
/// built for. Every field can be overridden from `settings.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// QR payload identifying a booklet cover page.
    pub front_page_code: String,
    /// QR payload identifying the scratch ("heap") page inside a booklet.
    pub heap_page_code: String,
    /// Rasterization resolution for marker scanning. Markers are large;
    /// a low DPI keeps the scan cheap.
    pub dpi: u32,
    /// Scanned-page index after which stand-in scratch pages are spliced
    /// when a short booklet has no heap marker.
    pub heap_splice_offset: usize,
    /// Number of filler pages spliced in place of a missing heap section.
    pub heap_splice_count: usize,
    /// Worker threads for marker decoding. 0 uses the rayon default.
    pub parallel_workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            front_page_code: String::from("exam-normalizer-1"),
            heap_page_code: String::from("exam-normalizer-heap"),
            dpi: 60,
            heap_splice_offset: 12,
            heap_splice_count: 2,
            parallel_workers: 4,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
