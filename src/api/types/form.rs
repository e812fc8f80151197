//! URL-encoded form extractor that reports rejections in the API error format

use axum::{
    extract::{rejection::FormRejection, FromRequest, Request},
    Form as AxumForm,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Wrapper around `axum::Form` whose rejection is an [`ApiError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Form<T>(pub T);

impl<S, T> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumForm::<T>::from_request(req, state)
            .await
            .map(|AxumForm(value)| Form(value))
            .map_err(|rejection: FormRejection| {
                let status = rejection.status();
                ApiError::new(
                    status,
                    ApiErrorType::InvalidRequestError,
                    format!("Invalid form data: {}", rejection.body_text()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        username: String,
        password: String,
    }

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_parses_form() {
        let Form(login) = Form::<Login>::from_request(request("username=a%40b.c&password=pw"), &())
            .await
            .unwrap();

        assert_eq!(login.username, "a@b.c");
        assert_eq!(login.password, "pw");
    }

    #[tokio::test]
    async fn test_missing_field() {
        let err = Form::<Login>::from_request(request("username=alice"), &())
            .await
            .unwrap_err();

        assert!(err.status.is_client_error());
        assert!(err.detail().starts_with("Invalid form data"));
    }
}
