use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use supershield_common::email::delivery::send_with_fallback;
use supershield_common::email::templates::{
    AdminNotificationMessage, AdminRouting, ClientAutoReplyMessage,
};
use supershield_common::email::{Connector, SmtpConnector};
use supershield_common::models::enquiry::FormSubmission;

use super::error::HttpErrorResponse;
use crate::env::Config;

pub async fn submit(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<Config>,
    connector: web::Data<Connector>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if *req.method() != Method::POST {
        return Err(HttpErrorResponse::MethodNotAllowed(String::from("Use POST")));
    }

    let enquiry = FormSubmission::from_body(&body)
        .validate()
        .map_err(|e| HttpErrorResponse::IncorrectlyFormed(e.to_string()))?;

    let settings = match config.mail_settings() {
        Ok(s) => s,
        Err(e) => {
            log::error!("Cannot send enquiry email: {e}");
            return Err(HttpErrorResponse::NotConfigured(String::from(
                "SMTP is not configured on the server",
            )));
        }
    };

    let connector: &dyn SmtpConnector = connector.get_ref().as_ref();

    let admin_message = AdminNotificationMessage::compose(
        &enquiry,
        &AdminRouting {
            from_name: &settings.from_name,
            sender: &settings.sender,
            admin: &settings.admin,
            reply_to: settings.reply_to.as_ref(),
        },
    );

    if let Err(e) = send_with_fallback(
        connector,
        &settings.candidates,
        &settings.credentials,
        &admin_message,
    )
    .await
    {
        log::error!("Admin mail error: {e}");
        return Err(HttpErrorResponse::DeliveryFailed(String::from(
            "Failed to send admin email",
        )));
    }

    let client_message = ClientAutoReplyMessage::compose(&enquiry, &settings.sender);

    let client_auto_reply = match send_with_fallback(
        connector,
        &settings.candidates,
        &settings.credentials,
        &client_message,
    )
    .await
    {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Client auto-reply failed: {e}");
            false
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "clientAutoReply": client_auto_reply,
    })))
}
