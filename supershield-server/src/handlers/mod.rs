pub mod admin;
pub mod enquiry;
pub mod health;

pub mod error {
    use actix_web::http::{header, StatusCode};
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use serde_json::json;
    use std::fmt;

    pub const ADMIN_REALM: &str = "Supershield Admin";

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(String),

        // 401
        AuthenticationRequired(String),

        // 405
        MethodNotAllowed(String),

        // 500
        NotConfigured(String),
        DeliveryFailed(String),
    }

    impl HttpErrorResponse {
        fn message(&self) -> &str {
            match self {
                HttpErrorResponse::IncorrectlyFormed(msg)
                | HttpErrorResponse::AuthenticationRequired(msg)
                | HttpErrorResponse::MethodNotAllowed(msg)
                | HttpErrorResponse::NotConfigured(msg)
                | HttpErrorResponse::DeliveryFailed(msg) => msg,
            }
        }
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                HttpErrorResponse::IncorrectlyFormed(msg) => {
                    write!(f, "Incorrectly formed request: {msg}")
                }
                HttpErrorResponse::AuthenticationRequired(msg) => {
                    write!(f, "Authentication required: {msg}")
                }
                HttpErrorResponse::MethodNotAllowed(msg) => write!(f, "Method not allowed: {msg}"),
                HttpErrorResponse::NotConfigured(msg) => write!(f, "Not configured: {msg}"),
                HttpErrorResponse::DeliveryFailed(msg) => write!(f, "Delivery failed: {msg}"),
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            let mut builder = HttpResponseBuilder::new(self.status_code());

            match self {
                HttpErrorResponse::AuthenticationRequired(msg) => builder
                    .insert_header((
                        header::WWW_AUTHENTICATE,
                        format!("Basic realm=\"{ADMIN_REALM}\""),
                    ))
                    .content_type("text/plain; charset=utf-8")
                    .body(msg.clone()),
                HttpErrorResponse::MethodNotAllowed(_) => builder
                    .insert_header((header::ALLOW, "POST"))
                    .json(json!({ "ok": false, "error": self.message() })),
                _ => builder.json(json!({ "ok": false, "error": self.message() })),
            }
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
                HttpErrorResponse::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
                HttpErrorResponse::NotConfigured(_) | HttpErrorResponse::DeliveryFailed(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

}
