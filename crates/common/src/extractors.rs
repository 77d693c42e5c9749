//! Custom axum extractors for Heritage

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body extractor that never rejects a request.
///
/// The body must be a JSON object to be parsed. An empty body, invalid JSON,
/// a non-object value, or an object that does not deserialize into `T`
/// all yield `Fallback(T::default())`.
#[derive(Debug, Clone, PartialEq)]
pub enum LenientJson<T> {
    /// Body parsed successfully
    Parsed(T),
    /// Body was absent or unusable; defaults were substituted
    Fallback(T),
}

impl<T> LenientJson<T> {
    /// Take the wrapped value regardless of how it was obtained
    pub fn into_inner(self) -> T {
        match self {
            LenientJson::Parsed(value) | LenientJson::Fallback(value) => value,
        }
    }

    /// Whether defaults were substituted for the body
    pub fn is_fallback(&self) -> bool {
        matches!(self, LenientJson::Fallback(_))
    }
}

impl<T> LenientJson<T>
where
    T: DeserializeOwned + Default,
{
    /// Parse raw body bytes, falling back to `T::default()` on any problem
    pub fn from_bytes(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return LenientJson::Fallback(T::default());
        }

        let value = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable JSON body, using defaults");
                return LenientJson::Fallback(T::default());
            }
        };

        if !value.is_object() {
            tracing::warn!("JSON body is not an object, using defaults");
            return LenientJson::Fallback(T::default());
        }

        match serde_json::from_value::<T>(value) {
            Ok(parsed) => LenientJson::Parsed(parsed),
            Err(e) => {
                tracing::warn!(error = %e, "JSON body has unusable fields, using defaults");
                LenientJson::Fallback(T::default())
            }
        }
    }
}

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Bytes::from_request(req, state).await {
            Ok(body) => Ok(Self::from_bytes(&body)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read request body, using defaults");
                Ok(LenientJson::Fallback(T::default()))
            }
        }
    }
}
