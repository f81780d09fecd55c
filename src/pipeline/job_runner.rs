use std::path::PathBuf;

use lopdf::Document;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::booklet::accumulator::BookletAccumulator;
use crate::booklet::padding::PaddingPolicy;
use crate::booklet::{Booklet, ScannedPage};
use crate::config::settings::Settings;
use crate::marker::{self, Marker};
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::{BookletWriter, DEFAULT_FILLER_DIMS};
use crate::pipeline::report::Summary;
use crate::pipeline::router::{self, RoutedBooklets};

/// Output filename suffix for booklets that were already the right length.
pub const UNPADDED_SUFFIX: &str = "_good.pdf";
/// Output filename suffix for booklets that required filler pages.
pub const PADDED_SUFFIX: &str = "_padded.pdf";

/// Configuration for a single normalization run.
pub struct JobConfig {
    pub input_path: PathBuf,
    pub output_prefix: String,
    pub target_length: usize,
    pub settings: Settings,
}

/// Result of a completed run.
pub struct JobResult {
    pub input_path: PathBuf,
    pub unpadded_output: Option<PathBuf>,
    pub padded_output: Option<PathBuf>,
    pub summary: Summary,
}

/// Run one normalization job through the 4-phase pipeline.
///
/// Phase A: rasterize every page (sequential; the pdfium session is not
///          thread-safe)
/// Phase B: decode QR markers (rayon parallel, merged back into source
///          order by ordinal)
/// Phase C: booklet segmentation (sequential state machine)
/// Phase D: padding expansion, routing, output assembly, summary
pub fn run_job(config: &JobConfig) -> crate::error::Result<JobResult> {
    // Validates the target length before any input is touched.
    let mut accumulator = BookletAccumulator::new(config.target_length)?;

    let reader = PdfReader::open(&config.input_path)?;
    let page_count = reader.page_count();
    info!(
        input = %config.input_path.display(),
        pages = page_count,
        target_length = config.target_length,
        "input opened"
    );

    // --- Phase A: rasterization ---
    let bitmaps =
        crate::render::pdfium::rasterize_document(&config.input_path, config.settings.dpi)?;
    ensure_page_counts_match(bitmaps.len(), page_count)?;

    // --- Phase B: marker decoding (bounded worker pool) ---
    let pool = build_pool(config.settings.parallel_workers)?;
    let mut decoded: Vec<(usize, Option<String>)> = pool.install(|| {
        bitmaps
            .par_iter()
            .enumerate()
            .map(|(ordinal, bitmap)| {
                let payload = match bitmap {
                    Ok(image) => marker::decode_payload(image),
                    // A page that failed to rasterize simply carries no
                    // marker; it still belongs to the current booklet.
                    Err(e) => {
                        warn!(page = ordinal + 1, error = %e, "rasterization failed, treating page as unmarked");
                        None
                    }
                };
                (ordinal, payload)
            })
            .collect()
    });
    // The pool gives no ordering guarantee; restore source order.
    decoded.sort_by_key(|&(ordinal, _)| ordinal);

    // --- Phase C: segmentation (strictly sequential) ---
    for (ordinal, payload) in decoded {
        let marker = payload.map(|p| Marker::classify(&p, &config.settings));
        accumulator.push(ScannedPage {
            source_page: ordinal as u32 + 1,
            marker,
        });
    }
    let booklets = accumulator.finish();
    info!(booklets = booklets.len(), "segmentation complete");

    // --- Phase D: padding, routing, output assembly ---
    let groups = router::route(&booklets);
    let summary = Summary::from_groups(&groups);
    summary.log_warnings();

    let policy = PaddingPolicy::from_settings(&config.settings);
    let filler_dims = if page_count > 0 {
        reader.page_dimensions(1).unwrap_or(DEFAULT_FILLER_DIMS)
    } else {
        DEFAULT_FILLER_DIMS
    };

    let (unpadded_output, padded_output) = write_outputs(
        reader.document(),
        &groups,
        &policy,
        filler_dims,
        &config.output_prefix,
    )?;

    Ok(JobResult {
        input_path: config.input_path.clone(),
        unpadded_output,
        padded_output,
        summary,
    })
}

/// The rasterizer and the reader must agree on how many pages the input
/// has; a shorter bitmap list would silently drop the trailing pages
/// from every booklet.
pub fn ensure_page_counts_match(
    rasterized: usize,
    document_pages: u32,
) -> crate::error::Result<()> {
    if rasterized != document_pages as usize {
        return Err(crate::error::ExamNormError::render(format!(
            "rasterized {} pages but the document has {}",
            rasterized, document_pages
        )));
    }
    Ok(())
}

/// Write both output groups, all-or-nothing.
///
/// Both documents are assembled and fully serialized in memory before
/// the first file is created, so any assembly or serialization failure
/// aborts the run with nothing on disk. A failed write removes whatever
/// this run already produced before the error propagates.
pub fn write_outputs(
    source: &Document,
    groups: &RoutedBooklets<'_>,
    policy: &PaddingPolicy,
    filler_dims: (f64, f64),
    prefix: &str,
) -> crate::error::Result<(Option<PathBuf>, Option<PathBuf>)> {
    let unpadded_bytes = serialize_group(source, &groups.unpadded, policy, filler_dims)?;
    let padded_bytes = serialize_group(source, &groups.padded, policy, filler_dims)?;

    let mut written: Vec<PathBuf> = Vec::new();
    let commit = |bytes: &Option<Vec<u8>>,
                  suffix: &str,
                  written: &mut Vec<PathBuf>|
     -> crate::error::Result<Option<PathBuf>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        let path = PathBuf::from(format!("{prefix}{suffix}"));
        if let Err(e) = std::fs::write(&path, bytes) {
            // do not leave a truncated file or a half-produced run behind
            let _ = std::fs::remove_file(&path);
            for earlier in written.iter() {
                let _ = std::fs::remove_file(earlier);
            }
            return Err(e.into());
        }
        info!(output = %path.display(), "output written");
        written.push(path.clone());
        Ok(Some(path))
    };

    let unpadded_output = commit(&unpadded_bytes, UNPADDED_SUFFIX, &mut written)?;
    let padded_output = commit(&padded_bytes, PADDED_SUFFIX, &mut written)?;
    Ok((unpadded_output, padded_output))
}

/// Flatten one routed group and serialize its output document. An empty
/// group produces no document at all.
fn serialize_group(
    source: &Document,
    group: &[&Booklet],
    policy: &PaddingPolicy,
    filler_dims: (f64, f64),
) -> crate::error::Result<Option<Vec<u8>>> {
    let pages = router::flatten(group, policy);
    if pages.is_empty() {
        return Ok(None);
    }

    let writer = BookletWriter::assemble(source, &pages, filler_dims)?;
    info!(
        booklets = group.len(),
        pages = writer.page_count(),
        "output group assembled"
    );
    writer.save_to_bytes().map(Some)
}

/// Bounded pool for marker decoding. `workers == 0` defers to the rayon
/// default.
fn build_pool(workers: usize) -> crate::error::Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if workers > 0 {
        builder = builder.num_threads(workers);
    }
    builder
        .build()
        .map_err(|e| crate::error::ExamNormError::config(e.to_string()))
}
