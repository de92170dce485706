use std::{fmt, sync::Arc};

use reqwest::{
    Body, Client, Method, RequestBuilder, Response, StatusCode,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config, debug,
    types::{Acknowledgement, ErrorEnvelope, Fragment, FragmentEnvelope, FragmentList},
    warning,
};

use super::{
    BodyPolicy, ConvertedArtifact, Credential, DEFAULT_HEADER_CONTENT_TYPE, FALLBACK_BINARY_MIME,
    FragmentsError, ImagesAsBinary,
};

/// Content type used by [`FragmentsClient::create_fragment`] when none is given.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Typed client for the fragments microservice.
///
/// The client only holds its base URL, a pooled `reqwest::Client` and the
/// convert body policy, none of which change after construction. Each
/// operation is one request/response round trip authorized by the
/// credential passed to that call. Cloning is cheap and clones share the
/// connection pool, so several operations can be in flight at once.
///
/// # Error conventions
///
/// Listing is best effort: [`list_fragments`](Self::list_fragments) turns any
/// failure into an empty [`FragmentList`]. Use
/// [`try_list_fragments`](Self::try_list_fragments) to tell a failure apart
/// from an empty collection. Every other operation returns
/// [`FragmentsError`].
///
/// # Example
///
/// ```
/// let client = FragmentsClient::new("http://localhost:8080");
/// let user = BearerCredential::new(id_token);
///
/// let created = client.create_fragment(&user, "hello", None).await?;
/// let body = client.get_fragment(&user, &created.id).await?;
/// assert_eq!(body, "hello");
/// ```
#[derive(Clone)]
pub struct FragmentsClient {
    base_url: String,
    http: Client,
    policy: Arc<dyn BodyPolicy>,
}

impl fmt::Debug for FragmentsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FragmentsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: config::resolve_api_url(Some(base_url.into())),
            http: Client::new(),
            policy: Arc::new(ImagesAsBinary),
        }
    }

    /// Client for the base URL configured through `FRAGMENTS_API_URL`.
    pub fn from_env() -> Self {
        Self::new(config::api_url())
    }

    /// Reuses an existing `reqwest::Client` (proxies, TLS roots, timeouts).
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Replaces the policy that classifies converted bodies as binary or text.
    pub fn with_policy(mut self, policy: impl BodyPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists the caller's fragments with expanded metadata.
    ///
    /// Never fails: transport errors, non-2xx statuses and malformed bodies
    /// are reported with a warning and yield an empty list, so a listing
    /// view always has something to render.
    pub async fn list_fragments(&self, credential: &dyn Credential) -> FragmentList {
        match self.try_list_fragments(credential).await {
            Ok(list) => list,
            Err(err) => {
                warning!("Unable to call GET /v1/fragments: {}", err);
                FragmentList::default()
            }
        }
    }

    /// Lists the caller's fragments, reporting failures instead of hiding them.
    pub async fn try_list_fragments(
        &self,
        credential: &dyn Credential,
    ) -> Result<FragmentList, FragmentsError> {
        debug!("Requesting user fragments data...");
        let mut url = self.endpoint(&["v1", "fragments"])?;
        url.query_pairs_mut().append_pair("expand", "1");
        let request = self.request(Method::GET, url, credential, None)?;
        let list: FragmentList = decode(send(request).await?).await?;
        debug!("Got {} fragments", list.fragments.len());
        Ok(list)
    }

    /// Creates a fragment from raw content.
    ///
    /// `content_type` is sent as is; `None` means [`DEFAULT_CONTENT_TYPE`].
    pub async fn create_fragment(
        &self,
        credential: &dyn Credential,
        content: impl Into<Body>,
        content_type: Option<&str>,
    ) -> Result<Fragment, FragmentsError> {
        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        debug!("Creating {} fragment...", content_type);
        let url = self.endpoint(&["v1", "fragments"])?;
        let request = self
            .request(Method::POST, url, credential, Some(content_type))?
            .body(content);
        let envelope: FragmentEnvelope = decode(send(request).await?).await?;
        debug!("Created fragment {}", envelope.fragment.id);
        Ok(envelope.fragment)
    }

    /// Reads a fragment's data, always decoded as text.
    pub async fn get_fragment(
        &self,
        credential: &dyn Credential,
        id: &str,
    ) -> Result<String, FragmentsError> {
        debug!("Requesting fragment {}...", id);
        let request = self.request(Method::GET, self.fragment_url(id)?, credential, None)?;
        send(request)
            .await?
            .text()
            .await
            .map_err(FragmentsError::Body)
    }

    /// Replaces a fragment's data.
    ///
    /// The service rejects a `content_type` that differs from the fragment's
    /// current type; this client does not check it beforehand.
    pub async fn update_fragment(
        &self,
        credential: &dyn Credential,
        id: &str,
        content: impl Into<Body>,
        content_type: &str,
    ) -> Result<Fragment, FragmentsError> {
        debug!("Updating fragment {}...", id);
        let request = self
            .request(
                Method::PUT,
                self.fragment_url(id)?,
                credential,
                Some(content_type),
            )?
            .body(content);
        let envelope: FragmentEnvelope = decode(send(request).await?).await?;
        Ok(envelope.fragment)
    }

    pub async fn delete_fragment(
        &self,
        credential: &dyn Credential,
        id: &str,
    ) -> Result<Acknowledgement, FragmentsError> {
        debug!("Deleting fragment {}...", id);
        let request = self.request(Method::DELETE, self.fragment_url(id)?, credential, None)?;
        decode(send(request).await?).await
    }

    /// Fetches a fragment converted to `extension` (`html`, `txt`, `jpg`, ...).
    ///
    /// Whether the body comes back as bytes or text is decided by the body
    /// policy from the response's `Content-Type`, not from `extension`.
    pub async fn convert_fragment(
        &self,
        credential: &dyn Credential,
        id: &str,
        extension: &str,
    ) -> Result<ConvertedArtifact, FragmentsError> {
        debug!("Converting fragment {} to .{}...", id, extension);
        check_id(id)?;
        let converted = format!("{}.{}", id, extension.trim_start_matches('.'));
        let url = self.endpoint(&["v1", "fragments", converted.as_str()])?;
        let request = self.request(Method::GET, url, credential, None)?;
        let response = send(request).await?;

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if self.policy.is_binary(declared.as_deref()) {
            let data = response.bytes().await.map_err(FragmentsError::Body)?;
            Ok(ConvertedArtifact::Binary {
                data: data.to_vec(),
                mime_type: essence(declared.as_deref()).unwrap_or(FALLBACK_BINARY_MIME).to_string(),
            })
        } else {
            let content = response.text().await.map_err(FragmentsError::Body)?;
            Ok(ConvertedArtifact::Text {
                content,
                mime_type: essence(declared.as_deref()).unwrap_or(DEFAULT_CONTENT_TYPE).to_string(),
            })
        }
    }

    fn fragment_url(&self, id: &str) -> Result<Url, FragmentsError> {
        check_id(id)?;
        self.endpoint(&["v1", "fragments", id])
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment so ids cannot add segments, a query or a fragment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FragmentsError> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FragmentsError::Url(format!("{} cannot be a base", self.base_url)))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Starts a request carrying the credential's headers.
    ///
    /// With a body content type, `Content-Type` is forced to it even if the
    /// credential answered with something else.
    fn request(
        &self,
        method: Method,
        url: Url,
        credential: &dyn Credential,
        body_type: Option<&str>,
    ) -> Result<RequestBuilder, FragmentsError> {
        let mut headers =
            credential.authorization_headers(body_type.unwrap_or(DEFAULT_HEADER_CONTENT_TYPE))?;
        if let Some(content_type) = body_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        }
        Ok(self.http.request(method, url).headers(headers))
    }
}

fn check_id(id: &str) -> Result<(), FragmentsError> {
    match id {
        "" | "." | ".." => Err(FragmentsError::Url(format!("{id:?} is not a fragment id"))),
        _ => Ok(()),
    }
}

/// Sends the request and turns any non-2xx status into an error before the
/// body is looked at.
async fn send(request: RequestBuilder) -> Result<Response, FragmentsError> {
    let response = request.send().await.map_err(FragmentsError::Transport)?;
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FragmentsError> {
    response.json::<T>().await.map_err(FragmentsError::Body)
}

async fn error_from_response(response: Response) -> FragmentsError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    FragmentsError::Status {
        status,
        message: error_message(status, &body),
    }
}

/// Server `error.message` if the body is an error envelope, else the status line.
pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| status_line(status))
}

/// `"404 Not Found"`, or just the code when it has no registered reason.
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn essence(content_type: Option<&str>) -> Option<&str> {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_message() {
        let body = br#"{"status":"error","error":{"code":415,"message":"Content-Type mismatch"}}"#;
        assert_eq!(
            error_message(StatusCode::UNSUPPORTED_MEDIA_TYPE, body),
            "Content-Type mismatch"
        );
    }

    #[test]
    fn error_message_falls_back_to_status_line() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, b"<html>nope</html>"),
            "404 Not Found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, br#"{"error":{}}"#),
            "502 Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, b""),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn error_message_for_unregistered_status_is_bare_code() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(error_message(status, b"oops"), "599");
    }

    #[test]
    fn ids_are_encoded_as_one_path_segment() {
        let client = FragmentsClient::new("http://localhost:8080/api/");

        assert_eq!(
            client.fragment_url("a?b#c/d").unwrap().as_str(),
            "http://localhost:8080/api/v1/fragments/a%3Fb%23c%2Fd"
        );
        assert_eq!(
            client.fragment_url("frag-1").unwrap().as_str(),
            "http://localhost:8080/api/v1/fragments/frag-1"
        );
        assert!(matches!(client.fragment_url(".."), Err(FragmentsError::Url(_))));
        assert!(matches!(client.fragment_url(""), Err(FragmentsError::Url(_))));
    }

    #[test]
    fn essence_strips_parameters() {
        assert_eq!(essence(Some("text/html; charset=utf-8")), Some("text/html"));
        assert_eq!(essence(Some("image/png")), Some("image/png"));
        assert_eq!(essence(Some("  ")), None);
        assert_eq!(essence(None), None);
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            FragmentsClient::new("http://localhost:8080/").base_url(),
            "http://localhost:8080"
        );
        assert_eq!(
            FragmentsClient::new("").base_url(),
            config::DEFAULT_API_URL
        );
    }
}
