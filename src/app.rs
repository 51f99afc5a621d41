//! app.rs
use crate::handlers::{campaign_handler, student_handler, template_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/campaigns")
                    .route(
                        "/send",
                        web::post().to(campaign_handler::send_campaign_endpoint),
                    )
                    .route("/logs", web::get().to(campaign_handler::list_logs_endpoint))
                    .route(
                        "/logs/{id}",
                        web::get().to(campaign_handler::get_log_endpoint),
                    ),
            )
            .service(
                web::scope("/templates")
                    .route(
                        "",
                        web::get().to(template_handler::list_templates_endpoint),
                    )
                    .route(
                        "",
                        web::post().to(template_handler::create_template_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(template_handler::get_template_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(template_handler::delete_template_endpoint),
                    )
                    .route(
                        "/{id}/preview",
                        web::get().to(template_handler::preview_template_endpoint),
                    ),
            )
            .service(
                web::scope("/workshops/{workshop}/students")
                    .route("", web::get().to(student_handler::list_students_endpoint))
                    .route("", web::post().to(student_handler::create_student_endpoint))
                    .route("/{id}", web::get().to(student_handler::get_student_endpoint))
                    .route(
                        "/{id}",
                        web::put().to(student_handler::update_student_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(student_handler::delete_student_endpoint),
                    ),
            ),
    );
}
