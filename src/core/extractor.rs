use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON body extractor whose rejections use the `ApiResponse` error envelope
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(AppJsonRejection)
    }
}

pub struct AppJsonRejection(JsonRejection);

impl AppJsonRejection {
    fn message(&self) -> String {
        match &self.0 {
            JsonRejection::JsonDataError(err) => {
                format!("Request body has missing or invalid fields: {}", err.body_text())
            }
            JsonRejection::JsonSyntaxError(err) => {
                format!("Request body is not valid JSON: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Expected Content-Type: application/json".to_string()
            }
            _ => "Could not read request body".to_string(),
        }
    }
}

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        AppError::BadRequest(self.message()).into_response()
    }
}

/// The user resolved by `auth_middleware`. Absent on routes outside it.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;
    use uuid::Uuid;

    use crate::features::users::models::UserRole;

    #[derive(Debug, Deserialize)]
    struct Note {
        description: String,
    }

    fn json_request(content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_app_json_reads_body() {
        let req = json_request(Some("application/json"), r#"{"description":"Sudah dicek"}"#);

        let AppJson(note) = AppJson::<Note>::from_request(req, &()).await.ok().unwrap();

        assert_eq!(note.description, "Sudah dicek");
    }

    #[tokio::test]
    async fn test_app_json_rejections_are_bad_request() {
        for req in [
            json_request(None, r#"{"description":"x"}"#),
            json_request(Some("application/json"), "{not json"),
            json_request(Some("application/json"), r#"{"other":1}"#),
        ] {
            let Err(rejection) = AppJson::<Note>::from_request(req, &()).await else {
                panic!("body should be rejected");
            };
            assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_authenticated_user_comes_from_extensions() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(
            AuthenticatedUser::from_request_parts(&mut parts, &()).await,
            Err(AppError::Unauthorized(_))
        ));

        let user = AuthenticatedUser {
            id: Uuid::now_v7(),
            full_name: "Bu Sari".to_string(),
            email: "sari@desa.id".to_string(),
            role: UserRole::VillageStaff,
        };
        parts.extensions.insert(user.clone());

        let resolved = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.role, UserRole::VillageStaff);
    }
}
