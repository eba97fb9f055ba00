//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs `Validate::validate` on the decoded body.
///
/// Rejections are rendered through [`AppError`]: malformed or mistyped JSON is
/// a 400 `JSON_EXTRACTION`, a missing content type stays 415, and a body that
/// fails validation becomes a 400 `VALIDATION_ERROR` with per-field details.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.name)
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Person {
        #[validate(length(min = 1))]
        name: String,
        #[validate(range(max = 150))]
        age: Option<u8>,
    }

    async fn create(ValidatedJson(person): ValidatedJson<Person>) -> String {
        format!("{} {:?}", person.name, person.age)
    }

    async fn post_body(body: &str, content_type: Option<&str>) -> StatusCode {
        let mut request = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let app = Router::new().route("/", post(create));
        app.oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
            .status()
    }

    async fn post_json(body: &str) -> StatusCode {
        post_body(body, Some("application/json")).await
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        assert_eq!(post_json(r#"{"name":"Ann","age":30}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_types_are_400() {
        assert_eq!(post_json(r#"{"name":5}"#).await, StatusCode::BAD_REQUEST);
        assert_eq!(
            post_json(r#"{"name":"Ann","age":"old"}"#).await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_out_of_range_is_400_whether_or_not_it_fits_the_type() {
        assert_eq!(
            post_json(r#"{"name":"Ann","age":200}"#).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            post_json(r#"{"name":"Ann","age":300}"#).await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        assert_eq!(post_json(r#"{"name":"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_415() {
        assert_eq!(
            post_body(r#"{"name":"Ann"}"#, None).await,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }
}
