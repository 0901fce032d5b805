//! Custom Axum extractors
//!
//! Every rejection goes through [`ApiError`] so malformed input gets the
//! same JSON 400 body as any other validation failure.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::ValidationError;

/// Parse an identifier, mapping malformed input to a 400.
pub fn parse_uuid(field: &'static str, value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field,
            reason: "invalid UUID format",
        })
    })
}

/// Extract and validate a UUID from a single-parameter path
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        Ok(Self(parse_uuid("id", &id)?))
    }
}

/// `Json<T>` whose rejection is a JSON 400
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Query<T>` whose rejection is a JSON 400
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Owner {
        owner_id: Uuid,
    }

    #[derive(Debug, Deserialize)]
    struct Level {
        level: u32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[test]
    fn parses_valid_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid("id", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_uuid() {
        let err = parse_uuid("id", "abc123").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::InvalidFormat { field: "id", .. })
        ));
    }

    #[tokio::test]
    async fn json_body_decodes() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"owner_id": "{id}"}}"#);
        let ValidJson(owner) = ValidJson::<Owner>::from_request(json_request(&body), &())
            .await
            .unwrap();
        assert_eq!(owner.owner_id, id);
    }

    #[tokio::test]
    async fn bad_uuid_in_body_is_malformed() {
        let err = ValidJson::<Owner>::from_request(json_request(r#"{"owner_id": "nope"}"#), &())
            .await
            .err()
            .unwrap();
        match err {
            ApiError::Malformed(message) => assert!(message.contains("owner_id")),
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_query_is_malformed() {
        let (mut parts, _) = Request::builder()
            .uri("/?level=-1")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let err = ValidQuery::<Level>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::Malformed(_)));
    }
}
