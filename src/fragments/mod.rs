//! # Fragments Client Module
//!
//! Typed access to the fragments microservice REST API. Every HTTP interaction
//! with the service goes through [`FragmentsClient`]: authorization header
//! injection, content negotiation and response-shape handling live here and
//! nowhere else.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (commands)
//!          ↓
//! Fragments Client  ←── Credential (per call, e.g. identity::User)
//!     ├── list / create / read / update / delete
//!     └── convert  ←── BodyPolicy (binary or text)
//!          ↓
//! HTTP Layer (reqwest)
//!          ↓
//! Fragments microservice
//! ```
//!
//! ## API Coverage
//!
//! - `GET /v1/fragments?expand=1` - [`FragmentsClient::list_fragments`],
//!   [`FragmentsClient::try_list_fragments`]
//! - `POST /v1/fragments` - [`FragmentsClient::create_fragment`]
//! - `GET /v1/fragments/{id}` - [`FragmentsClient::get_fragment`]
//! - `PUT /v1/fragments/{id}` - [`FragmentsClient::update_fragment`]
//! - `DELETE /v1/fragments/{id}` - [`FragmentsClient::delete_fragment`]
//! - `GET /v1/fragments/{id}.{ext}` - [`FragmentsClient::convert_fragment`]
//!
//! ## Error Handling
//!
//! A non-2xx status is always an error and the body is only read to extract
//! the server's `error.message`. When the body has no such field the message
//! is the status line, e.g. `404 Not Found`. Listing is the exception: the
//! plain `list_fragments` call degrades to an empty list.
//!
//! There are no retries, no client-side timeouts and no cancellation. Wrap
//! calls with a policy of your own if you need them.

mod client;
mod convert;
mod credential;
mod error;

pub use client::{DEFAULT_CONTENT_TYPE, FragmentsClient};
pub use convert::{BodyPolicy, ConvertedArtifact, FALLBACK_BINARY_MIME, ImagesAsBinary};
pub use credential::{BearerCredential, Credential, DEFAULT_HEADER_CONTENT_TYPE, bearer_headers};
pub use error::FragmentsError;
