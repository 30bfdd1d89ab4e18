//! # Event artifact routes
//!
//! - GET /events/:id/*cache — read an artifact, stored headers are replayed
//! - PUT /events/:id/*cache — write an artifact, 202 with an empty body

use axum::Extension;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use axum::routing::get;
use eventstash_core::{ArtifactName, EventId, Headers, Principal};

use crate::error::ApiError;
use crate::state::AppState;

/// Body limit is set at the transport so oversized uploads are cut off
/// before they are buffered; the facade checks again.
pub fn router(max_byte_size: u64) -> Router<AppState> {
    let limit = usize::try_from(max_byte_size).unwrap_or(usize::MAX);
    Router::new()
        .route("/events/:id/*cache", get(read_artifact).put(write_artifact))
        .layer(DefaultBodyLimit::max(limit))
}

fn parse_path(id: &str, cache: &str) -> Result<(EventId, ArtifactName), ApiError> {
    let event_id = id.parse::<EventId>()?;
    let artifact = ArtifactName::new(cache)?;
    Ok((event_id, artifact))
}

/// Flatten request headers into the map the cache understands.
///
/// Repeated headers are joined with `", "`; values that are not visible
/// ASCII are skipped.
fn request_headers(headers: &HeaderMap) -> Headers {
    let mut out = Headers::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            tracing::debug!(header = %name, "skipping non-ascii header value");
            continue;
        };
        out.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    out
}

fn response_headers(stored: &Headers) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in stored {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                out.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping stored header that is not valid HTTP"),
        }
    }
    out
}

async fn read_artifact(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, cache)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (event_id, artifact) = parse_path(&id, &cache)?;
    let found = state.cache.read(event_id, &artifact, &principal).await?;

    // Exactly the stored headers; no default content-type is filled in.
    let mut response = Response::new(Body::from(found.body));
    *response.headers_mut() = response_headers(&found.headers);
    Ok(response)
}

async fn write_artifact(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((id, cache)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let (event_id, artifact) = parse_path(&id, &cache)?;
    state
        .cache
        .write(event_id, &artifact, body, &request_headers(&headers), &principal)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let flat = request_headers(&headers);
        assert_eq!(flat.get("x-tag").map(String::as_str), Some("a, b"));
        assert_eq!(flat.get("content-type").map(String::as_str), Some("text/plain"));
    }

    #[test]
    fn invalid_stored_headers_are_dropped() {
        let mut stored = Headers::new();
        stored.insert("x-ok".into(), "1".into());
        stored.insert("bad header".into(), "1".into());
        stored.insert("x-newline".into(), "a\nb".into());

        let out = response_headers(&stored);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("x-ok").unwrap(), "1");
    }

    #[test]
    fn path_validation() {
        assert!(parse_path("42", "logs/build.log").is_ok());
        assert!(matches!(parse_path("0", "a"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_path("abc", "a"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_path("42", ""), Err(ApiError::BadRequest(_))));
    }
}
