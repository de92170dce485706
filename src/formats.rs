//! Fragment content types and the conversions the service offers for them.
//!
//! These are caller-side rules: the fragments client passes content types
//! through untouched, while the CLI uses this module to pick a type for an
//! upload, validate content before sending it and list the target formats
//! a fragment can be converted to.

use std::fmt;

/// A target format a fragment can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub extension: &'static str,
    pub label: &'static str,
    pub mime: &'static str,
}

const fn conv(extension: &'static str, label: &'static str, mime: &'static str) -> Conversion {
    Conversion {
        extension,
        label,
        mime,
    }
}

const TXT: Conversion = conv("txt", "Plain Text", "text/plain");
const MD: Conversion = conv("md", "Markdown", "text/markdown");
const HTML: Conversion = conv("html", "HTML", "text/html");
const CSV: Conversion = conv("csv", "CSV", "text/csv");
const JSON: Conversion = conv("json", "JSON", "application/json");
const YAML: Conversion = conv("yaml", "YAML", "application/yaml");
const PNG: Conversion = conv("png", "PNG", "image/png");
const JPG: Conversion = conv("jpg", "JPEG", "image/jpeg");
const WEBP: Conversion = conv("webp", "WebP", "image/webp");
const GIF: Conversion = conv("gif", "GIF", "image/gif");
const AVIF: Conversion = conv("avif", "AVIF", "image/avif");

/// Content types the service accepts, with a display label.
pub const SUPPORTED_TYPES: &[(&str, &str)] = &[
    ("text/plain", "Plain Text"),
    ("text/markdown", "Markdown"),
    ("text/html", "HTML"),
    ("text/csv", "CSV"),
    ("application/json", "JSON"),
    ("application/yaml", "YAML"),
    ("image/png", "PNG Image"),
    ("image/jpeg", "JPEG Image"),
    ("image/webp", "WebP Image"),
    ("image/gif", "GIF Image"),
    ("image/avif", "AVIF Image"),
];

/// Whether `content_type` converts to anything besides its own format.
pub fn has_conversions(content_type: &str) -> bool {
    conversion_options(content_type).len() > 1
}

/// Conversions available for a fragment of `content_type`.
///
/// The fragment's own format comes first. Unknown types have none.
pub fn conversion_options(content_type: &str) -> &'static [Conversion] {
    match base_type(content_type).as_str() {
        "text/plain" => &[TXT],
        "text/markdown" => &[MD, HTML, TXT],
        "text/html" => &[HTML, TXT],
        "text/csv" => &[CSV, TXT, JSON],
        "application/json" => &[JSON, YAML, TXT],
        "application/yaml" => &[YAML, TXT],
        "image/png" => &[PNG, JPG, WEBP, GIF, AVIF],
        "image/jpeg" => &[JPG, PNG, WEBP, GIF, AVIF],
        "image/webp" => &[WEBP, PNG, JPG, GIF, AVIF],
        "image/gif" => &[GIF, PNG, JPG, WEBP, AVIF],
        "image/avif" => &[AVIF, PNG, JPG, WEBP, GIF],
        _ => &[],
    }
}

pub fn is_supported(content_type: &str) -> bool {
    let base = base_type(content_type);
    SUPPORTED_TYPES.iter().any(|(t, _)| *t == base)
}

pub fn is_image(content_type: &str) -> bool {
    base_type(content_type).starts_with("image/")
}

/// Lowercased media type without parameters (`text/plain; charset=utf-8` → `text/plain`).
pub fn base_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty,
    MissingImage,
    NotUtf8,
    InvalidJson(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty => f.write_str("Please enter some content."),
            ValidationError::MissingImage => f.write_str("Please upload an image file."),
            ValidationError::NotUtf8 => f.write_str("Text content must be valid UTF-8."),
            ValidationError::InvalidJson(err) => {
                write!(f, "Invalid JSON format. Please check your syntax. ({err})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks content before it is uploaded as `content_type`.
///
/// Images only need a payload. Everything else must be non-blank UTF-8,
/// and `application/json` must also parse.
pub fn validate_content(content_type: &str, content: &[u8]) -> Result<(), ValidationError> {
    if is_image(content_type) {
        if content.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        return Ok(());
    }

    let text = std::str::from_utf8(content).map_err(|_| ValidationError::NotUtf8)?;
    if text.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    if base_type(content_type) == "application/json" {
        serde_json::from_str::<serde_json::Value>(text)
            .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_format_comes_first() {
        for (content_type, _) in SUPPORTED_TYPES {
            let options = conversion_options(content_type);
            assert!(!options.is_empty(), "{content_type} has no conversions");
            assert_eq!(options[0].mime, *content_type);
        }
    }

    #[test]
    fn base_type_ignores_case_and_parameters() {
        assert_eq!(base_type("Text/HTML; charset=UTF-8"), "text/html");
        assert_eq!(base_type(""), "");
    }
}
