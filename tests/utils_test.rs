use chrono::{Duration, TimeZone, Utc};
use fragcli::types::Fragment;
use fragcli::utils::*;

// Helper function to create a test fragment
fn create_test_fragment(id: &str, content_type: &str, size: u64, updated_offset: i64) -> Fragment {
    let created = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
    Fragment {
        id: id.to_string(),
        owner_id: None,
        content_type: content_type.to_string(),
        size,
        created,
        updated: created + Duration::minutes(updated_offset),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    assert_eq!(challenge, generate_code_challenge(verifier));

    // Different input should produce different output
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_code_challenge_matches_rfc7636_example() {
    assert_eq!(
        generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_generate_state() {
    let state = generate_state();
    assert_eq!(state.len(), 32);
    assert_ne!(state, generate_state());
}

#[test]
fn test_detect_content_type() {
    assert_eq!(detect_content_type("notes.txt"), "text/plain");
    assert_eq!(detect_content_type("README.md"), "text/markdown");
    assert_eq!(detect_content_type("post.markdown"), "text/markdown");
    assert_eq!(detect_content_type("index.HTM"), "text/html");
    assert_eq!(detect_content_type("data.csv"), "text/csv");
    assert_eq!(detect_content_type("config.json"), "application/json");
    assert_eq!(detect_content_type("ci.yml"), "application/yaml");
    assert_eq!(detect_content_type("photo.JPEG"), "image/jpeg");
    assert_eq!(detect_content_type("/tmp/pics/cat.webp"), "image/webp");
    assert_eq!(detect_content_type("anim.gif"), "image/gif");
    assert_eq!(detect_content_type("shot.avif"), "image/avif");
    assert_eq!(detect_content_type("logo.png"), "image/png");
}

#[test]
fn test_detect_content_type_defaults_to_plain_text() {
    assert_eq!(detect_content_type("Makefile"), "text/plain");
    assert_eq!(detect_content_type("archive.tar.gz"), "text/plain");
    assert_eq!(detect_content_type(""), "text/plain");
}

#[test]
fn test_format_size() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(1023), "1023 B");
    assert_eq!(format_size(1024), "1.0 KB");
    assert_eq!(format_size(1536), "1.5 KB");
    assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
}

#[test]
fn test_fragment_table_rows_sorted_by_updated_desc() {
    let fragments = vec![
        create_test_fragment("old", "text/plain", 5, 0),
        create_test_fragment("newest", "image/png", 2048, 30),
        create_test_fragment("middle", "text/markdown", 12, 10),
    ];

    let rows = fragment_table_rows(&fragments);

    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["newest", "middle", "old"]);
    assert_eq!(rows[0].content_type, "image/png");
    assert_eq!(rows[0].size, "2.0 KB");
    assert_eq!(rows[2].size, "5 B");
}

#[test]
fn test_fragment_table_rows_ties_broken_by_id() {
    let fragments = vec![
        create_test_fragment("b", "text/plain", 1, 0),
        create_test_fragment("a", "text/plain", 1, 0),
    ];

    let rows = fragment_table_rows(&fragments);
    assert_eq!(rows[0].id, "a");
    assert_eq!(rows[1].id, "b");
}

#[test]
fn test_fragment_table_rows_empty() {
    assert!(fragment_table_rows(&[]).is_empty());
}

#[test]
fn test_download_filename() {
    assert_eq!(download_filename("abc", "png"), "fragment-abc.png");
    assert_eq!(download_filename("abc", ".html"), "fragment-abc.html");
}
