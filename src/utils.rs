use std::path::Path;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{Fragment, FragmentTableRow};

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value echoed back by the identity provider to tie the callback to this sign-in.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Guesses a content type from a file name's extension.
///
/// Unknown or missing extensions are uploaded as `text/plain`.
pub fn detect_content_type(filename: impl AsRef<Path>) -> &'static str {
    let ext = filename
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        _ => "text/plain",
    }
}

pub fn format_size(bytes: u64) -> String {
    match bytes {
        0..1024 => format!("{bytes} B"),
        1024..1_048_576 => format!("{:.1} KB", bytes as f64 / 1024.0),
        _ => format!("{:.1} MB", bytes as f64 / 1_048_576.0),
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Table rows for a listing, most recently updated first.
pub fn fragment_table_rows(fragments: &[Fragment]) -> Vec<FragmentTableRow> {
    let mut sorted: Vec<&Fragment> = fragments.iter().collect();
    sorted.sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| a.id.cmp(&b.id)));

    sorted
        .into_iter()
        .map(|f| FragmentTableRow {
            id: f.id.clone(),
            content_type: f.content_type.clone(),
            size: format_size(f.size),
            created: format_timestamp(&f.created),
            updated: format_timestamp(&f.updated),
        })
        .collect()
}

/// Default file name for a downloaded conversion.
pub fn download_filename(fragment_id: &str, extension: &str) -> String {
    format!(
        "fragment-{}.{}",
        fragment_id,
        extension.trim_start_matches('.')
    )
}
