//! Tenant scoping extractor.
//!
//! Every route is scoped to one organization. The id arrives in the
//! `Organization-Id` header and is threaded explicitly into repository
//! calls; there is no ambient tenant context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;
use bodega_shared::AppError;

/// Name of the tenant header.
pub const ORGANIZATION_ID_HEADER: &str = "organization-id";

/// Extractor for the organization a request operates on.
///
/// Rejects requests with a missing or malformed `Organization-Id` header
/// with a 400 before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationId(pub Uuid);

impl OrganizationId {
    /// Returns the inner UUID.
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }
}

fn parse_header(parts: &Parts) -> Result<Uuid, ApiError> {
    let raw = parts
        .headers
        .get(ORGANIZATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError(AppError::Validation(
                "Organization-Id header is required".to_string(),
            ))
        })?;
    Uuid::parse_str(raw).map_err(|_| {
        ApiError(AppError::Validation(
            "Organization-Id header must be a UUID".to_string(),
        ))
    })
}

impl<S> FromRequestParts<S> for OrganizationId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_header(parts).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(ORGANIZATION_ID_HEADER, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extracts_valid_uuid() {
        let id = Uuid::new_v4();
        let parts = parts_with_header(Some(&id.to_string()));
        assert_eq!(parse_header(&parts).unwrap(), id);
    }

    #[test]
    fn test_rejects_missing_header() {
        let parts = parts_with_header(None);
        assert!(parse_header(&parts).is_err());
    }

    #[test]
    fn test_rejects_malformed_uuid() {
        let parts = parts_with_header(Some("not-a-uuid"));
        assert!(parse_header(&parts).is_err());
    }
}
