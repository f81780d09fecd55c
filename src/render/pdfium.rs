use std::path::{Path, PathBuf};

use image::DynamicImage;
use pdfium_render::prelude::*;

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::ExamNormError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::ExamNormError::render(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::ExamNormError::render("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))?;
    Ok(Pdfium::new(bindings))
}

/// Rasterizes every page of a PDF at the specified DPI, in page order.
///
/// pdfium is bound once and the document traversed in a single pass; all
/// bitmaps are kept in memory, no intermediate files are created.
///
/// The outer `Result` is fatal: the library could not be loaded or the
/// document could not be opened. The per-page results are not: a page
/// that fails to render is reported individually so the caller can treat
/// it as carrying no marker.
///
/// # Arguments
/// * `pdf_path` - Path to the PDF file
/// * `dpi` - Resolution in dots per inch (72 DPI = 1 point per pixel)
pub fn rasterize_document(
    pdf_path: &Path,
    dpi: u32,
) -> crate::error::Result<Vec<crate::error::Result<DynamicImage>>> {
    let pdfium = create_pdfium()?;

    let document = pdfium.load_pdf_from_file(pdf_path, None)?;

    let mut bitmaps = Vec::with_capacity(document.pages().len() as usize);
    for page in document.pages().iter() {
        // PDF default user unit: 1 point = 1/72 inch
        // At the given DPI, each point maps to (dpi / 72) pixels
        let width_pts = page.width().value;
        let height_pts = page.height().value;
        let width_px = (width_pts * dpi as f32 / 72.0).round() as i32;
        let height_px = (height_pts * dpi as f32 / 72.0).round() as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let rendered = page
            .render_with_config(&config)
            .map(|bitmap| bitmap.as_image())
            .map_err(crate::error::ExamNormError::from);
        bitmaps.push(rendered);
    }

    Ok(bitmaps)
}
