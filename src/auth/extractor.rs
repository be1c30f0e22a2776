//! Actix-web extractor for session authentication.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};

use super::SessionVerifier;
use crate::error::ErrorResponse;
use crate::models::Principal;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a valid session token.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: SessionAuth) -> impl Responder {
///     // auth.principal carries the caller's identity and roles
/// }
/// ```
pub struct SessionAuth {
    pub principal: Principal,
}

impl FromRequest for SessionAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let verifier = match req.app_data::<web::Data<SessionVerifier>>() {
            Some(verifier) => verifier,
            None => {
                return ready(Err(AuthError {
                    message: "Internal configuration error".to_string(),
                }));
            }
        };

        let bearer = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match bearer {
            Some(token) => match verifier.verify(token) {
                Ok(principal) => ready(Ok(SessionAuth { principal })),
                Err(message) => ready(Err(AuthError { message })),
            },
            None => ready(Err(AuthError {
                message: "Missing session token. Provide an Authorization: Bearer header."
                    .to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use secrecy::SecretString;

    use crate::models::SessionClaims;

    async fn whoami(auth: SessionAuth) -> HttpResponse {
        HttpResponse::Ok().json(auth.principal.email)
    }

    fn verifier() -> SessionVerifier {
        SessionVerifier::new(SecretString::from("test-secret".to_string()), "sso".to_string())
    }

    fn student_token() -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            iss: "sso".to_string(),
            exp: (now + 3600) as usize,
            iat: now as usize,
            email: "student@example.edu".to_string(),
            name: "Test Student".to_string(),
            roles: vec!["student".to_string()],
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_valid_bearer_token_is_accepted() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(verifier()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", student_token())))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_rt::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(verifier()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::try_call_service(&app, req).await;
        match resp {
            Ok(resp) => assert_eq!(resp.status().as_u16(), 401),
            Err(e) => assert_eq!(e.error_response().status().as_u16(), 401),
        }
    }

    #[actix_rt::test]
    async fn test_garbage_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(verifier()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        match resp {
            Ok(resp) => assert_eq!(resp.status().as_u16(), 401),
            Err(e) => assert_eq!(e.error_response().status().as_u16(), 401),
        }
    }
}
