use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use supershield_common::credentials::BasicCredentials;

use super::error::HttpErrorResponse;
use crate::env::Config;

pub async fn admin_protect(
    req: HttpRequest,
    config: web::Data<Config>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let Some(credentials) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(BasicCredentials::from_header)
    else {
        return Err(HttpErrorResponse::AuthenticationRequired(String::from(
            "Authentication required.",
        )));
    };

    if !credentials.matches(&config.admin_user, &config.admin_pass) {
        log::warn!("Rejected admin login attempt for user {:?}", credentials.username);
        return Err(HttpErrorResponse::AuthenticationRequired(String::from(
            "Unauthorized",
        )));
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, config.admin_redirect_path.as_str()))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::web::Data;
    use actix_web::App;
    use base64::engine::general_purpose::STANDARD as b64;
    use base64::Engine;

    use crate::env::testing::{complete_config, config_with, ADMIN_PASS, ADMIN_USER};

    async fn call(
        config: Config,
        authorization: Option<String>,
    ) -> (StatusCode, HttpResponseParts) {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(config))
                .route("/admin-protect", web::get().to(admin_protect)),
        )
        .await;

        let mut req = TestRequest::get().uri("/admin-protect");
        if let Some(authorization) = authorization {
            req = req.insert_header((header::AUTHORIZATION, authorization));
        }

        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .map(|h| h.to_str().unwrap().to_owned());
        let challenge = resp
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|h| h.to_str().unwrap().to_owned());
        let body = test::read_body(resp).await;

        (
            status,
            HttpResponseParts {
                location,
                challenge,
                body: String::from_utf8(body.to_vec()).unwrap(),
            },
        )
    }

    struct HttpResponseParts {
        location: Option<String>,
        challenge: Option<String>,
        body: String,
    }

    fn basic(user_pass: &str) -> Option<String> {
        Some(format!("Basic {}", b64.encode(user_pass)))
    }

    #[actix_web::test]
    async fn test_correct_credentials_redirect() {
        let (status, parts) =
            call(complete_config(), basic(&format!("{ADMIN_USER}:{ADMIN_PASS}"))).await;

        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(parts.location.as_deref(), Some("/admin-plain.html"));
        assert!(parts.challenge.is_none());
    }

    #[actix_web::test]
    async fn test_default_credentials_apply_when_unconfigured() {
        let (status, parts) = call(config_with(&[]), basic("supershield:ChangeMeNow")).await;

        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(parts.location.as_deref(), Some("/admin-plain.html"));

        // Defaults stop working once real credentials are configured
        let (status, _) = call(complete_config(), basic("supershield:ChangeMeNow")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_missing_header_gets_challenge() {
        let (status, parts) = call(complete_config(), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            parts.challenge.as_deref(),
            Some("Basic realm=\"Supershield Admin\"")
        );
        assert_eq!(parts.body, "Authentication required.");
        assert!(parts.location.is_none());
    }

    #[actix_web::test]
    async fn test_wrong_scheme_gets_challenge() {
        let (status, parts) =
            call(complete_config(), Some(String::from("Bearer some.jwt.token"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(parts.challenge.is_some());
        assert_eq!(parts.body, "Authentication required.");
    }

    #[actix_web::test]
    async fn test_wrong_credentials_rejected() {
        let attempts = [
            basic(&format!("{ADMIN_USER}:wrong")),
            basic(&format!("{}:{ADMIN_PASS}", ADMIN_USER.to_uppercase())),
            basic(ADMIN_USER),
            basic(""),
            basic(&format!("{ADMIN_USER}\nINFO | forged entry:{ADMIN_PASS}")),
            Some(String::from("Basic %%%")),
        ];

        for attempt in attempts {
            let (status, parts) = call(complete_config(), attempt).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(
                parts.challenge.as_deref(),
                Some("Basic realm=\"Supershield Admin\"")
            );
            assert_eq!(parts.body, "Unauthorized");
            assert!(parts.location.is_none());
        }
    }

    #[actix_web::test]
    async fn test_unpadded_credentials_redirect() {
        let (status, parts) = call(
            config_with(&[]),
            Some(String::from("Basic c3VwZXJzaGllbGQ6Q2hhbmdlTWVOb3c")),
        )
        .await;

        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(parts.location.as_deref(), Some("/admin-plain.html"));
    }

    #[actix_web::test]
    async fn test_custom_redirect_path() {
        let mut config = complete_config();
        config.admin_redirect_path = String::from("/private/dashboard.html");

        let (status, parts) = call(config, basic(&format!("{ADMIN_USER}:{ADMIN_PASS}"))).await;

        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(parts.location.as_deref(), Some("/private/dashboard.html"));
    }
}
