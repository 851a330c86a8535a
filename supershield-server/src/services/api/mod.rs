use actix_web::web::*;

use crate::handlers::{admin, enquiry, health};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("")
            .route("/heartbeat", get().to(health::heartbeat))
            .configure(routes)
            // Paths used by the website before it moved off serverless functions
            .service(
                scope("/api")
                    .route("/send-enquiry", route().to(enquiry::submit))
                    .configure(routes),
            ),
    );
}

fn routes(cfg: &mut ServiceConfig) {
    cfg.route("/enquiry", route().to(enquiry::submit))
        .route("/health", get().to(health::health))
        .route("/admin-protect", get().to(admin::admin_protect));
}
