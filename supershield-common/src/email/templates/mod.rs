use lettre::message::{Mailbox, Mailboxes};
use lettre::Address;

use crate::email::EmailMessage;
use crate::html::escape;
use crate::models::enquiry::Enquiry;

pub const COMPANY_NAME: &str = "Supershield Glazing";
pub const COMPANY_ADDRESS: &str = "4 Fairfield Road, Southall, UB1 2DQ";
pub const MAX_SUBJECT_CHARS: usize = 140;

const LOGO_SVG: &str = r##"<svg width="120" height="28" viewBox="0 0 420 80" xmlns="http://www.w3.org/2000/svg" role="img" aria-label="Supershield Glazing">
  <defs><linearGradient id="g" x1="0" x2="1"><stop offset="0" stop-color="#0ea5e9"/><stop offset="1" stop-color="#0369a1"/></linearGradient></defs>
  <rect x="10" y="10" width="60" height="60" rx="12" fill="url(#g)"/>
  <path d="M30 50 l10 -20 l10 20" stroke="white" stroke-width="4" fill="none" stroke-linecap="round" stroke-linejoin="round"/>
  <text x="90" y="55" font-family="Arial,Helvetica,sans-serif" font-weight="700" font-size="26" fill="#0f172a">Supershield Glazing</text>
</svg>"##;

pub struct AdminNotificationMessage {}
pub struct ClientAutoReplyMessage {}

/// Where the admin notification is addressed and who it claims to be from.
pub struct AdminRouting<'a> {
    pub from_name: &'a str,
    pub sender: &'a Address,
    pub admin: &'a Mailboxes,
    pub reply_to: Option<&'a Mailbox>,
}

impl AdminNotificationMessage {
    pub fn compose(enquiry: &Enquiry, routing: &AdminRouting) -> EmailMessage {
        let subject = Self::subject(enquiry);

        EmailMessage {
            from: Mailbox::new(Some(String::from(routing.from_name)), routing.sender.clone()),
            to: routing.admin.clone(),
            reply_to: Some(
                routing
                    .reply_to
                    .cloned()
                    .unwrap_or_else(|| Mailbox::new(None, enquiry.email.clone())),
            ),
            text_body: Self::generate_text(enquiry),
            html_body: Self::generate_html(enquiry, &subject),
            subject,
        }
    }

    pub fn subject(enquiry: &Enquiry) -> String {
        truncate_chars(
            &format!("Enquiry from {}", enquiry.full_name()),
            MAX_SUBJECT_CHARS,
        )
    }

    pub fn generate_text(enquiry: &Enquiry) -> String {
        format!(
            "Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             \n\
             Message:\n\
             {}",
            enquiry.full_name(),
            enquiry.email,
            enquiry.phone_or_placeholder(),
            enquiry.message_or_placeholder(),
        )
    }

    pub fn generate_html(enquiry: &Enquiry, subject: &str) -> String {
        let body = format!(
            "<h2 style=\"margin:0 0 8px\">{}</h2>
     <p><strong>Email:</strong> {}</p>
     <p><strong>Phone:</strong> {}</p>
     <div style=\"margin-top:10px\">
       <div style=\"color:#64748b;font-size:12px;margin-bottom:4px\">Message</div>
       <pre style=\"white-space:pre-wrap;margin:0\">{}</pre>
     </div>",
            escape(subject),
            escape(&enquiry.email.to_string()),
            escape(enquiry.phone_or_placeholder()),
            escape(enquiry.message_or_placeholder()),
        );

        wrap_html(subject, &body)
    }
}

impl ClientAutoReplyMessage {
    pub const SUBJECT: &'static str = "Thanks, we received your enquiry";

    pub fn compose(enquiry: &Enquiry, sender: &Address) -> EmailMessage {
        EmailMessage {
            from: Mailbox::new(Some(String::from(COMPANY_NAME)), sender.clone()),
            to: Mailbox::new(None, enquiry.email.clone()).into(),
            reply_to: None,
            subject: truncate_chars(Self::SUBJECT, MAX_SUBJECT_CHARS),
            text_body: Self::generate_text(enquiry),
            html_body: Self::generate_html(enquiry),
        }
    }

    pub fn generate_text(enquiry: &Enquiry) -> String {
        format!(
            "Hi {},\n\
             \n\
             Thanks for contacting {COMPANY_NAME}. We’ve received your enquiry and will call \
             you back within 1 business day.\n\
             \n\
             Copy of your message:\n\
             {}\n\
             \n\
             — {COMPANY_NAME}\n\
             {COMPANY_ADDRESS}",
            enquiry.first_name,
            enquiry.message_or_placeholder(),
        )
    }

    pub fn generate_html(enquiry: &Enquiry) -> String {
        let body = format!(
            "<h2 style=\"margin:0 0 8px\">Thanks, {} — we’ve received your enquiry</h2>
       <p>We’ll call you back within 1 business day. Below is a copy of what you sent us:</p>
       <div style=\"margin-top:10px\">
         <div style=\"color:#64748b;font-size:12px;margin-bottom:4px\">Your message</div>
         <pre style=\"white-space:pre-wrap;margin:0\">{}</pre>
       </div>",
            escape(&enquiry.first_name),
            escape(enquiry.message_or_placeholder()),
        );

        wrap_html("Thanks for your enquiry", &body)
    }
}

/// Branded email shell. `body_html` must already be escaped.
fn wrap_html(title: &str, body_html: &str) -> String {
    format!(
        "<!doctype html>
<html><head><meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">
<title>{title}</title></head>
<body style=\"margin:0;padding:0;background:#f8fafc\">
  <div style=\"max-width:660px;margin:0 auto;padding:16px;font-family:system-ui,Segoe UI,Roboto,Arial,sans-serif;color:#0f172a\">
    <div style=\"background:#ffffff;border:1px solid #e5e7eb;border-radius:12px;padding:18px\">
      {body_html}
      <hr style=\"margin:18px 0;border:none;border-top:1px solid #e5e7eb\">
      <div style=\"display:flex;align-items:center;gap:10px\">
        <div style=\"display:inline-block;vertical-align:middle\">{LOGO_SVG}</div>
      </div>
      <div style=\"margin-top:8px;color:#64748b;font-size:12px;line-height:1.5\">
        {COMPANY_ADDRESS}
      </div>
    </div>
    <div style=\"color:#94a3b8;font-size:11px;text-align:center;margin-top:10px\">
      This message was sent by {COMPANY_NAME} in response to your enquiry.
    </div>
  </div>
</body></html>",
        title = escape(title),
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enquiry::FormSubmission;

    fn enquiry(body: &str) -> Enquiry {
        FormSubmission::from_body(body.as_bytes()).validate().unwrap()
    }

    fn jo_lee() -> Enquiry {
        enquiry(r#"{"firstName":"Jo","lastName":"Lee","email":"jo@example.com"}"#)
    }

    #[test]
    fn test_admin_text_renders_placeholders() {
        let text = AdminNotificationMessage::generate_text(&jo_lee());

        assert_eq!(
            text,
            "Name: Jo Lee\nEmail: jo@example.com\nPhone: -\n\nMessage:\n-"
        );
    }

    #[test]
    fn test_admin_html_renders_placeholders() {
        let enquiry = jo_lee();
        let subject = AdminNotificationMessage::subject(&enquiry);
        let html = AdminNotificationMessage::generate_html(&enquiry, &subject);

        assert!(html.contains("<p><strong>Phone:</strong> -</p>"));
        assert!(html.contains("<pre style=\"white-space:pre-wrap;margin:0\">-</pre>"));
        assert!(html.contains("<title>Enquiry from Jo Lee</title>"));
        assert!(html.contains(COMPANY_ADDRESS));
    }

    #[test]
    fn test_user_fields_are_escaped_in_html() {
        let enquiry = enquiry(
            r#"{"firstName":"<b>Jo</b>","lastName":"Lee","email":"jo@example.com",
                "phone":"<i>1</i>","message":"a < b & c > d"}"#,
        );
        let subject = AdminNotificationMessage::subject(&enquiry);

        let admin_html = AdminNotificationMessage::generate_html(&enquiry, &subject);
        assert!(!admin_html.contains("<b>Jo</b>"));
        assert!(!admin_html.contains("<i>1</i>"));
        assert!(admin_html.contains("&lt;b&gt;Jo&lt;/b&gt; Lee"));
        assert!(admin_html.contains("a &lt; b &amp; c &gt; d"));

        let client_html = ClientAutoReplyMessage::generate_html(&enquiry);
        assert!(!client_html.contains("<b>Jo</b>"));
        assert!(client_html.contains("Thanks, &lt;b&gt;Jo&lt;/b&gt;"));
    }

    #[test]
    fn test_subject_is_truncated() {
        let long_name = "x".repeat(200);
        let enquiry = enquiry(&format!(
            r#"{{"firstName":"{long_name}","lastName":"Lee","email":"jo@example.com"}}"#
        ));

        let subject = AdminNotificationMessage::subject(&enquiry);
        assert_eq!(subject.chars().count(), MAX_SUBJECT_CHARS);
        assert!(subject.starts_with("Enquiry from xxx"));
    }

    #[test]
    fn test_admin_compose_reply_to() {
        let enquiry = jo_lee();
        let sender: Address = "site@example.com".parse().unwrap();
        let admin: Mailboxes = "owner@example.com, sales@example.com".parse().unwrap();

        let message = AdminNotificationMessage::compose(
            &enquiry,
            &AdminRouting {
                from_name: "Supershield Website",
                sender: &sender,
                admin: &admin,
                reply_to: None,
            },
        );
        assert_eq!(message.to, admin);
        assert_eq!(
            message.recipient_addresses(),
            vec!["owner@example.com", "sales@example.com"]
        );
        assert_eq!(message.from.name.as_deref(), Some("Supershield Website"));
        assert_eq!(message.from.email, sender);
        assert_eq!(message.reply_to.unwrap().email.to_string(), "jo@example.com");

        let override_reply_to: Mailbox = "office@example.com".parse().unwrap();
        let message = AdminNotificationMessage::compose(
            &enquiry,
            &AdminRouting {
                from_name: "Supershield Website",
                sender: &sender,
                admin: &admin,
                reply_to: Some(&override_reply_to),
            },
        );
        assert_eq!(message.reply_to, Some(override_reply_to));
    }

    #[test]
    fn test_client_auto_reply() {
        let enquiry = enquiry(
            r#"{"firstName":"Jo","lastName":"Lee","email":"jo@example.com",
                "message":"Need a quote"}"#,
        );
        let sender: Address = "site@example.com".parse().unwrap();

        let message = ClientAutoReplyMessage::compose(&enquiry, &sender);
        assert_eq!(message.subject, "Thanks, we received your enquiry");
        assert_eq!(message.from.name.as_deref(), Some(COMPANY_NAME));
        assert_eq!(message.recipient_addresses(), vec!["jo@example.com"]);
        assert!(message.reply_to.is_none());
        assert!(message.text_body.starts_with("Hi Jo,\n\n"));
        assert!(message.text_body.contains("Copy of your message:\nNeed a quote\n"));
        assert!(message.text_body.ends_with(COMPANY_ADDRESS));
        assert!(message.html_body.contains("Need a quote"));
    }
}
