use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::template_model::CreateTemplateRequest;
use crate::services::template_service::TemplateService;

/// GET /api/templates
pub async fn list_templates_endpoint(
    template_service: web::Data<TemplateService>,
) -> HttpResponse {
    match template_service.list_templates().await {
        Ok(templates) => HttpResponse::Ok().json(json!({ "templates": templates })),
        Err(e) => {
            log::error!("Error listando plantillas: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// POST /api/templates
pub async fn create_template_endpoint(
    template_service: web::Data<TemplateService>,
    body: web::Json<CreateTemplateRequest>,
) -> HttpResponse {
    let req = body.into_inner();

    if req.name.trim().is_empty() || req.subject.trim().is_empty() || req.html.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Missing required fields"
        }));
    }

    match template_service.create_template(req).await {
        Ok(template) => HttpResponse::Ok().json(json!({
            "success": true,
            "template": template
        })),
        Err(e) => {
            log::error!("Error creando plantilla: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// GET /api/templates/{id}
pub async fn get_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
) -> HttpResponse {
    match template_service.get_template(&path.into_inner()).await {
        Ok(Some(template)) => HttpResponse::Ok().json(template),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Template not found" })),
        Err(e) => {
            log::error!("Error buscando plantilla: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// DELETE /api/templates/{id}
pub async fn delete_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
) -> HttpResponse {
    match template_service.delete_template(&path.into_inner()).await {
        Ok(true) => HttpResponse::Ok().json(json!({ "success": true })),
        Ok(false) => HttpResponse::NotFound().json(json!({ "error": "Template not found" })),
        Err(e) => {
            log::error!("Error borrando plantilla: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// GET /api/templates/{id}/preview
pub async fn preview_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
) -> HttpResponse {
    match template_service.preview_template(&path.into_inner()).await {
        Ok(Some(html)) => HttpResponse::Ok().json(json!({ "html": html })),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Template not found" })),
        Err(e) => {
            log::error!("Error generando vista previa: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
