//! In-process stand-in for the fragments service.
//!
//! Serves the `/v1/fragments` routes from an in-memory map, requires
//! `Authorization: Bearer test-token` and records every Authorization header
//! it sees so tests can assert on them.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

pub const TOKEN: &str = "test-token";

#[derive(Clone)]
pub struct StoredFragment {
    pub content_type: String,
    pub data: Vec<u8>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct StubState {
    pub fragments: Arc<Mutex<HashMap<String, StoredFragment>>>,
    pub auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    next_id: Arc<AtomicU64>,
}

impl StubState {
    pub fn recorded_auth(&self) -> Vec<Option<String>> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub fn stored(&self, id: &str) -> Option<StoredFragment> {
        self.fragments.lock().unwrap().get(id).cloned()
    }
}

pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Starts the stub fragments service and returns its base URL and state.
pub async fn fragments_service() -> (String, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/v1/fragments", get(list).post(create))
        .route(
            "/v1/fragments/{id}",
            get(read_or_convert).put(update).delete(remove),
        )
        .with_state(state.clone());
    (spawn(app).await, state)
}

/// A service that answers every request with `500` and a plain-text body.
pub async fn failing_service() -> String {
    let app = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
    });
    spawn(app).await
}

/// A service that answers every request with `200` and a body that is not JSON.
pub async fn garbage_service() -> String {
    let app = Router::new().fallback(|| async {
        ([(header::CONTENT_TYPE, "application/json")], "{not json").into_response()
    });
    spawn(app).await
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "status": "error",
            "error": { "code": status.as_u16(), "message": message },
        })),
    )
        .into_response()
}

fn authorize(state: &StubState, headers: &HeaderMap) -> Result<(), Response> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth_headers.lock().unwrap().push(auth.clone());

    if auth.as_deref() == Some(format!("Bearer {TOKEN}").as_str()) {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "unauthorized"))
    }
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn metadata(id: &str, fragment: &StoredFragment) -> Value {
    json!({
        "id": id,
        "ownerId": "11d4c22e42c8f61feaba154683dea407b101cfd90987dda9e342843263ca420a",
        "created": fragment.created,
        "updated": fragment.updated,
        "type": fragment.content_type,
        "size": fragment.data.len(),
    })
}

async fn list(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if query.get("expand").map(String::as_str) != Some("1") {
        return error(StatusCode::BAD_REQUEST, "expected expand=1");
    }

    let fragments = state.fragments.lock().unwrap();
    let items: Vec<Value> = fragments.iter().map(|(id, f)| metadata(id, f)).collect();
    Json(json!({ "status": "ok", "fragments": items })).into_response()
}

async fn create(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }

    let id = format!("frag-{}", state.next_id.fetch_add(1, Ordering::SeqCst));
    let now = Utc::now();
    let fragment = StoredFragment {
        content_type: content_type(&headers),
        data: body.to_vec(),
        created: now,
        updated: now,
    };
    let meta = metadata(&id, &fragment);
    state.fragments.lock().unwrap().insert(id, fragment);

    (
        StatusCode::CREATED,
        Json(json!({ "status": "ok", "fragment": meta })),
    )
        .into_response()
}

async fn read_or_convert(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }

    let (id, extension) = match id.split_once('.') {
        Some((id, ext)) => (id.to_string(), Some(ext.to_string())),
        None => (id, None),
    };
    let Some(fragment) = state.stored(&id) else {
        return error(StatusCode::NOT_FOUND, "fragment not found");
    };

    let source_is_image = fragment.content_type.starts_with("image/");
    match extension.as_deref() {
        None => ([(header::CONTENT_TYPE, fragment.content_type)], fragment.data).into_response(),
        Some("png") if source_is_image => {
            ([(header::CONTENT_TYPE, "image/png")], fragment.data).into_response()
        }
        Some("jpg") if source_is_image => {
            ([(header::CONTENT_TYPE, "image/jpeg")], fragment.data).into_response()
        }
        Some("txt") if !source_is_image => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            fragment.data,
        )
            .into_response(),
        Some("html") if fragment.content_type == "text/markdown" => {
            let text = String::from_utf8_lossy(&fragment.data);
            (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                format!("<p>{}</p>", text.trim_start_matches("# ")),
            )
                .into_response()
        }
        Some(_) => error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported conversion"),
    }
}

async fn update(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }

    let mut fragments = state.fragments.lock().unwrap();
    let Some(fragment) = fragments.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "fragment not found");
    };
    if fragment.content_type != content_type(&headers) {
        return error(
            StatusCode::BAD_REQUEST,
            "Content-Type of the request does not match the existing fragment's type",
        );
    }

    fragment.data = body.to_vec();
    fragment.updated = Utc::now();
    let meta = metadata(&id, fragment);
    Json(json!({ "status": "ok", "fragment": meta })).into_response()
}

async fn remove(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }

    match state.fragments.lock().unwrap().remove(&id) {
        Some(_) => Json(json!({ "status": "ok" })).into_response(),
        None => error(StatusCode::NOT_FOUND, "fragment not found"),
    }
}
