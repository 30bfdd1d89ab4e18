//! # Authentication Middleware
//!
//! Bearer tokens are resolved against a static token table loaded at
//! startup. The resolved [`Principal`] is injected into the request
//! extensions; route handlers never see the token itself.
//!
//! Token file format:
//!
//! ```json
//! {
//!   "s3cr3t-build-42": { "identity": "42", "eventId": 42, "scopes": ["build"] },
//!   "s3cr3t-viewer":   { "identity": "alice", "scopes": ["user", "event"] }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use eventstash_core::Principal;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum TokenFileError {
    #[error("failed to read token file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse token file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// SHA-256 of a bearer token. Only digests are kept in memory.
type TokenDigest = [u8; 32];

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

/// Token -> principal table.
///
/// Custom `Debug` only reports the size so tokens never end up in logs.
#[derive(Clone, Default)]
pub struct TokenTable {
    entries: Vec<(TokenDigest, Principal)>,
}

impl std::fmt::Debug for TokenTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl AsRef<str>, principal: Principal) -> Self {
        self.entries.push((digest(token.as_ref()), principal));
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let map: HashMap<String, Principal> = serde_json::from_str(raw)?;
        Ok(map
            .into_iter()
            .fold(Self::new(), |table, (token, principal)| table.with_token(token, principal)))
    }

    pub fn load(path: &Path) -> Result<Self, TokenFileError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| TokenFileError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| TokenFileError::Parse {
            path: display,
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the principal for `token`.
    ///
    /// Digests are fixed-length and compared in constant time, and the scan
    /// never stops early: timing reveals neither the token length nor which
    /// entry matched.
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        let provided = digest(token);
        let mut found = None;
        for (expected, principal) in &self.entries {
            let equal: bool = provided.as_slice().ct_eq(expected.as_slice()).into();
            if equal && found.is_none() {
                found = Some(principal.clone());
            }
        }
        found
    }
}

/// Resolve the `Authorization: Bearer ..` header into a [`Principal`].
///
/// Expects a [`TokenTable`] extension on the router.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(table) = request.extensions().get::<TokenTable>().cloned() else {
        tracing::error!("token table missing from request extensions");
        return ApiError::Unauthorized("authentication is not configured".into()).into_response();
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => token.trim(),
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                return ApiError::Unauthorized("authorization header must use Bearer scheme".into())
                    .into_response();
            }
        },
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            return ApiError::Unauthorized("missing authorization header".into()).into_response();
        }
    };

    match table.resolve(token) {
        Some(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        None => {
            tracing::warn!("authentication failed: unknown bearer token");
            ApiError::Unauthorized("invalid bearer token".into()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Extension;
    use eventstash_core::EventId;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn table() -> TokenTable {
        TokenTable::new()
            .with_token("build-42", Principal::for_event(EventId::new(42).unwrap()))
            .with_token("viewer", Principal::new("alice").with_scope("event"))
    }

    fn test_app() -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(p): Extension<Principal>| async move { p.identity }),
            )
            .layer(from_fn(auth_middleware))
            .layer(Extension(table()))
    }

    async fn call(auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        let response = test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn resolves_known_tokens_only() {
        let table = table();
        assert_eq!(table.resolve("build-42").unwrap().identity, "42");
        assert_eq!(table.resolve("viewer").unwrap().identity, "alice");
        assert!(table.resolve("build-4").is_none());
        assert!(table.resolve("").is_none());
    }

    #[test]
    fn tokens_of_any_length_resolve_via_fixed_size_digests() {
        let long = "x".repeat(300);
        let table = TokenTable::new()
            .with_token("a", Principal::new("short"))
            .with_token(&long, Principal::new("long"));

        assert_eq!(table.resolve("a").unwrap().identity, "short");
        assert_eq!(table.resolve(&long).unwrap().identity, "long");
        assert!(table.resolve(&long[..299]).is_none());
        assert!(table.resolve("aa").is_none());
    }

    #[test]
    fn parses_token_file_json() {
        let table = TokenTable::from_json(
            r#"{ "t1": { "identity": "42", "eventId": 42, "scopes": ["build"] } }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        let p = table.resolve("t1").unwrap();
        assert_eq!(p.event_id.map(|e| e.get()), Some(42));
        assert!(p.has_scope("build"));
    }

    #[test]
    fn debug_output_hides_tokens() {
        let rendered = format!("{:?}", table());
        assert!(!rendered.contains("build-42"));
        assert!(rendered.contains('2'));
    }

    #[tokio::test]
    async fn valid_bearer_token_injects_principal() {
        assert_eq!(call(Some("Bearer build-42")).await, (StatusCode::OK, "42".into()));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(call(None).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        assert_eq!(call(Some("Basic Zm9vOmJhcg==")).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        assert_eq!(call(Some("Bearer nope")).await.0, StatusCode::UNAUTHORIZED);
    }
}
