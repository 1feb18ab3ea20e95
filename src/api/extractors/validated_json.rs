//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use sweet_shop_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct LoginRequest {
///     #[validate(email)]
///     email: String,
///     #[validate(length(min = 1))]
///     password: String,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string, in a stable field order
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Please provide a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "Password is required"))]
        password: String,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let req = json_request(r#"{"email":"a@b.co","password":"x"}"#);
        let ValidatedJson(parsed) = ValidatedJson::<Signup>::from_request(req, &()).await.unwrap();
        assert_eq!(parsed.email, "a@b.co");
    }

    #[tokio::test]
    async fn test_rule_violations_are_validation_errors() {
        let req = json_request(r#"{"email":"nope","password":""}"#);
        let err = ValidatedJson::<Signup>::from_request(req, &()).await.err().unwrap();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Please provide a valid email, Password is required")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let req = json_request("{not json");
        let err = ValidatedJson::<Signup>::from_request(req, &()).await.err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
