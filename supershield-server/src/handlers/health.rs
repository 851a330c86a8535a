use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use supershield_common::email::delivery::verify_with_fallback;
use supershield_common::email::{Connector, SmtpConnector};

use crate::env::Config;

#[derive(Deserialize)]
pub struct HealthQuery {
    pub verify: Option<String>,
}

pub async fn heartbeat() -> impl Responder {
    HttpResponse::Ok()
}

pub async fn health(
    req: HttpRequest,
    config: web::Data<Config>,
    connector: web::Data<Connector>,
) -> impl Responder {
    let snapshot = config.snapshot();

    let do_verify = web::Query::<HealthQuery>::from_query(req.query_string())
        .ok()
        .and_then(|q| q.into_inner().verify)
        .is_some_and(|v| v == "1");

    if !do_verify {
        return HttpResponse::Ok().json(json!({
            "ok": snapshot.is_complete(),
            "present": snapshot.present,
            "missing": snapshot.missing,
        }));
    }

    if !snapshot.is_complete() {
        return HttpResponse::Ok().json(json!({
            "ok": false,
            "present": snapshot.present,
            "missing": snapshot.missing,
            "smtp": { "ok": false, "reason": "missing env" },
        }));
    }

    let connector: &dyn SmtpConnector = connector.get_ref().as_ref();
    let candidates = config.smtp_candidates();
    let credentials = config.smtp_credentials();

    match verify_with_fallback(connector, &candidates, &credentials).await {
        Ok(delivery) => HttpResponse::Ok().json(json!({
            "ok": true,
            "present": snapshot.present,
            "missing": [],
            "smtp": { "ok": true, "using": delivery.candidate },
        })),
        Err(e) => {
            log::warn!("SMTP health verification failed: {e}");

            HttpResponse::Ok().json(json!({
                "ok": false,
                "present": snapshot.present,
                "missing": [],
                "smtp": {
                    "ok": false,
                    "tried": e.tried,
                    "error": {
                        "code": e.last_error.code(),
                        "responseCode": e.last_error.response_code(),
                        "message": e.last_error.message(),
                    },
                },
            }))
        }
    }
}
