use exam_normalizer::config::settings::Settings;
use exam_normalizer::marker::{Marker, decode_payload};
use image::{DynamicImage, GrayImage};

#[test]
fn test_classify_front_page_code() {
    let settings = Settings::default();
    assert_eq!(
        Marker::classify("exam-normalizer-1", &settings),
        Marker::FrontPage
    );
}

#[test]
fn test_classify_heap_page_code() {
    let settings = Settings::default();
    assert_eq!(
        Marker::classify("exam-normalizer-heap", &settings),
        Marker::HeapPage
    );
}

#[test]
fn test_classify_unknown_payload() {
    let settings = Settings::default();
    assert_eq!(
        Marker::classify("https://example.com", &settings),
        Marker::Other("https://example.com".to_string())
    );
}

#[test]
fn test_classify_is_exact_string_equality() {
    // No trimming, no case folding, no prefix matching.
    let settings = Settings::default();
    for payload in ["exam-normalizer-1 ", "EXAM-NORMALIZER-1", "exam-normalizer-10"] {
        assert!(
            matches!(Marker::classify(payload, &settings), Marker::Other(_)),
            "payload '{payload}' must not classify as a known marker"
        );
    }
}

#[test]
fn test_classify_follows_configured_codes() {
    let settings = Settings::from_yaml(
        "front_page_code: \"cover-v2\"\nheap_page_code: \"scratch-v2\"\n",
    )
    .expect("valid yaml");
    assert_eq!(Marker::classify("cover-v2", &settings), Marker::FrontPage);
    assert_eq!(Marker::classify("scratch-v2", &settings), Marker::HeapPage);
    assert!(matches!(
        Marker::classify("exam-normalizer-1", &settings),
        Marker::Other(_)
    ));
}

#[test]
fn test_decode_payload_absent_on_blank_page() {
    let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 200, image::Luma([255u8])));
    assert_eq!(decode_payload(&blank), None);
}

#[test]
fn test_decode_payload_absent_on_noise() {
    // A decode failure is "no marker", never an error.
    let mut noisy = GrayImage::new(120, 120);
    for (x, y, px) in noisy.enumerate_pixels_mut() {
        px.0 = [((x * 31 + y * 17) % 251) as u8];
    }
    assert_eq!(decode_payload(&DynamicImage::ImageLuma8(noisy)), None);
}
