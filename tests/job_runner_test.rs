use exam_normalizer::booklet::ScannedPage;
use exam_normalizer::booklet::accumulator::BookletAccumulator;
use exam_normalizer::booklet::padding::PaddingPolicy;
use exam_normalizer::marker::Marker;
use exam_normalizer::pdf::writer::DEFAULT_FILLER_DIMS;
use exam_normalizer::pipeline::job_runner::{
    PADDED_SUFFIX, UNPADDED_SUFFIX, ensure_page_counts_match, write_outputs,
};
use exam_normalizer::pipeline::router;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// In-memory source document with `n` pages, page attributes inherited
/// from the Pages node.
fn sample_document(n: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..n {
        let content = Stream::new(dictionary! {}, format!("% page {}", i + 1).into_bytes());
        let content_id = doc.add_object(Object::Stream(content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => n as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
            "Resources" => Object::Dictionary(Dictionary::new()),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Build booklets from a marker stream: each entry is the 1-based source
/// page number paired with an optional marker.
fn booklets_from_stream(
    target: usize,
    stream: &[(u32, Option<Marker>)],
) -> Vec<exam_normalizer::booklet::Booklet> {
    let mut accumulator = BookletAccumulator::new(target).expect("valid target");
    for (source_page, marker) in stream {
        accumulator.push(ScannedPage {
            source_page: *source_page,
            marker: marker.clone(),
        });
    }
    accumulator.finish()
}

fn cover() -> Option<Marker> {
    Some(Marker::FrontPage)
}

// ============================================================
// 1. Both output groups written on success
// ============================================================

#[test]
fn test_write_outputs_produces_both_groups() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let prefix = dir.path().join("out");
    let prefix = prefix.to_str().expect("utf-8 temp path");

    // booklet 1: pages 1-5 (complete), booklet 2: pages 6-8 (short)
    let stream: Vec<(u32, Option<Marker>)> = (1u32..=8)
        .map(|p| (p, if p == 1 || p == 6 { cover() } else { None }))
        .collect();
    let booklets = booklets_from_stream(5, &stream);
    let groups = router::route(&booklets);
    let policy = PaddingPolicy::new(12, 2);

    let source = sample_document(8);
    let (unpadded, padded) = write_outputs(&source, &groups, &policy, DEFAULT_FILLER_DIMS, prefix)
        .expect("write outputs");

    let unpadded = unpadded.expect("complete booklet group written");
    let padded = padded.expect("padded booklet group written");
    assert!(unpadded.to_str().unwrap().ends_with(UNPADDED_SUFFIX));
    assert!(padded.to_str().unwrap().ends_with(PADDED_SUFFIX));

    let good = Document::load(&unpadded).expect("reload unpadded output");
    assert_eq!(good.get_pages().len(), 5);

    // 3 scanned pages spliced with 2 fillers reach the target of 5
    let short = Document::load(&padded).expect("reload padded output");
    assert_eq!(short.get_pages().len(), 5);
}

// ============================================================
// 2. A failure while producing one group leaves no output at all
// ============================================================

#[test]
fn test_failed_group_leaves_no_partial_output() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let prefix = dir.path().join("out");
    let prefix = prefix.to_str().expect("utf-8 temp path");

    // Same stream as above, but the source document stops at page 5, so
    // assembling the second (padded) group must fail.
    let stream: Vec<(u32, Option<Marker>)> = (1u32..=8)
        .map(|p| (p, if p == 1 || p == 6 { cover() } else { None }))
        .collect();
    let booklets = booklets_from_stream(5, &stream);
    let groups = router::route(&booklets);
    let policy = PaddingPolicy::new(12, 2);

    let source = sample_document(5);
    let result = write_outputs(&source, &groups, &policy, DEFAULT_FILLER_DIMS, prefix);
    assert!(result.is_err(), "missing source pages must fail the run");

    // The first group serialized cleanly, but nothing may be on disk.
    let good_path = format!("{prefix}{UNPADDED_SUFFIX}");
    let padded_path = format!("{prefix}{PADDED_SUFFIX}");
    assert!(
        !std::path::Path::new(&good_path).exists(),
        "a failed run must not leave {good_path} behind"
    );
    assert!(!std::path::Path::new(&padded_path).exists());
}

// ============================================================
// 3. An empty group writes no file
// ============================================================

#[test]
fn test_empty_padded_group_writes_no_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let prefix = dir.path().join("out");
    let prefix = prefix.to_str().expect("utf-8 temp path");

    // two complete booklets, nothing to pad
    let stream: Vec<(u32, Option<Marker>)> = (1u32..=10)
        .map(|p| (p, if p == 1 || p == 6 { cover() } else { None }))
        .collect();
    let booklets = booklets_from_stream(5, &stream);
    let groups = router::route(&booklets);
    let policy = PaddingPolicy::new(12, 2);

    let source = sample_document(10);
    let (unpadded, padded) = write_outputs(&source, &groups, &policy, DEFAULT_FILLER_DIMS, prefix)
        .expect("write outputs");

    let unpadded = unpadded.expect("complete group written");
    assert!(padded.is_none(), "no padded booklets, no padded file");

    let good = Document::load(&unpadded).expect("reload unpadded output");
    assert_eq!(good.get_pages().len(), 10);
    assert!(!std::path::Path::new(&format!("{prefix}{PADDED_SUFFIX}")).exists());
}

// ============================================================
// 4. Rasterizer output must cover every document page
// ============================================================

#[test]
fn test_page_count_mismatch_is_fatal() {
    assert!(ensure_page_counts_match(6, 6).is_ok());
    assert!(ensure_page_counts_match(0, 0).is_ok());

    let err = ensure_page_counts_match(5, 6).expect_err("short rasterization must fail");
    let msg = err.to_string();
    assert!(
        msg.contains("Render error"),
        "expected a render error, got: {msg}"
    );
    assert!(msg.contains('5') && msg.contains('6'), "got: {msg}");

    assert!(ensure_page_counts_match(7, 6).is_err());
}
