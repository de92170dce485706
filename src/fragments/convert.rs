/// MIME type reported for binary bodies that arrive without a `Content-Type`.
pub const FALLBACK_BINARY_MIME: &str = "application/octet-stream";

/// Decides whether a converted body is kept as bytes or decoded as text.
///
/// The decision is made on the response's declared content type only, so it
/// is as good as the server's headers. Swap the policy to test with fixtures
/// or to treat more types as binary.
pub trait BodyPolicy: Send + Sync {
    fn is_binary(&self, content_type: Option<&str>) -> bool;
}

/// Default policy: `image/*` is binary, everything else is text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagesAsBinary;

impl BodyPolicy for ImagesAsBinary {
    fn is_binary(&self, content_type: Option<&str>) -> bool {
        content_type.is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("image/"))
    }
}

/// Result of `GET /v1/fragments/{id}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertedArtifact {
    Text { content: String, mime_type: String },
    Binary { data: Vec<u8>, mime_type: String },
}

impl ConvertedArtifact {
    pub fn is_binary(&self) -> bool {
        matches!(self, ConvertedArtifact::Binary { .. })
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ConvertedArtifact::Text { mime_type, .. } | ConvertedArtifact::Binary { mime_type, .. } => {
                mime_type
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ConvertedArtifact::Text { content, .. } => content.as_bytes(),
            ConvertedArtifact::Binary { data, .. } => data,
        }
    }

    /// Key a caller can use to cache artifacts per fragment and target format.
    pub fn cache_key(fragment_id: &str, extension: &str) -> String {
        format!("{fragment_id}_{extension}")
    }
}
