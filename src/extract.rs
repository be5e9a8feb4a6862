//! Request extractors that reject with [`ApiError`] instead of axum's
//! default rejections, so every client error is a plain-text 400.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::api::PageQuery;
use crate::error::ApiError;

/// Integer id taken from the trailing `:id` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

impl ResourceId {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        raw.parse().map(ResourceId).map_err(|_| ApiError::invalid_id())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_id())?;
        ResourceId::parse(&raw)
    }
}

/// Optional `bookId` filter for page listings. Absent or empty means no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFilter(pub Option<i64>);

impl PageFilter {
    pub fn from_query(query: PageQuery) -> Result<Self, ApiError> {
        match query.book_id.as_deref() {
            None | Some("") => Ok(PageFilter(None)),
            Some(raw) => raw
                .parse()
                .map(|id| PageFilter(Some(id)))
                .map_err(|_| ApiError::BadRequest(format!("Invalid bookId: {raw}"))),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        PageFilter::from_query(query)
    }
}

/// JSON body decoded regardless of `Content-Type`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Body {
                status: e.status(),
                message: e.body_text(),
            })?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}
