use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::student_model::{CreateStudentRequest, UpdateStudentRequest};
use crate::services::student_service::StudentService;

/// GET /api/workshops/{workshop}/students
pub async fn list_students_endpoint(
    student_service: web::Data<StudentService>,
    path: web::Path<String>,
) -> HttpResponse {
    let workshop = path.into_inner();

    match student_service.list_students(&workshop).await {
        Ok(students) => HttpResponse::Ok().json(students),
        Err(e) => {
            log::error!("Error listando estudiantes de {}: {:?}", workshop, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// POST /api/workshops/{workshop}/students
pub async fn create_student_endpoint(
    student_service: web::Data<StudentService>,
    path: web::Path<String>,
    body: web::Json<CreateStudentRequest>,
) -> HttpResponse {
    let workshop = path.into_inner();
    let req = body.into_inner();

    if req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
        || req.email.trim().is_empty()
    {
        return HttpResponse::BadRequest().json(json!({
            "error": "Missing required fields"
        }));
    }

    match student_service.create_student(&workshop, req).await {
        Ok(student) => HttpResponse::Ok().json(student),
        Err(e) => {
            log::error!("Error creando estudiante en {}: {:?}", workshop, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// GET /api/workshops/{workshop}/students/{id}
pub async fn get_student_endpoint(
    student_service: web::Data<StudentService>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (workshop, id) = path.into_inner();

    match student_service.get_student(&workshop, &id).await {
        Ok(Some(student)) => HttpResponse::Ok().json(student),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Student not found" })),
        Err(e) => {
            log::error!("Error buscando estudiante {} de {}: {:?}", id, workshop, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// PUT /api/workshops/{workshop}/students/{id}
/// `present` togglea asistencia; sin `present` es edición parcial.
pub async fn update_student_endpoint(
    student_service: web::Data<StudentService>,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateStudentRequest>,
) -> HttpResponse {
    let (workshop, id) = path.into_inner();

    match student_service
        .update_student(&workshop, &id, body.into_inner())
        .await
    {
        Ok(Some(student)) => HttpResponse::Ok().json(student),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Student not found" })),
        Err(e) => {
            log::error!("Error actualizando estudiante {} de {}: {:?}", id, workshop, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// DELETE /api/workshops/{workshop}/students/{id}
pub async fn delete_student_endpoint(
    student_service: web::Data<StudentService>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (workshop, id) = path.into_inner();

    match student_service.delete_student(&workshop, &id).await {
        Ok(true) => HttpResponse::Ok().json(json!({ "status": "success" })),
        Ok(false) => HttpResponse::NotFound().json(json!({ "error": "Student not found" })),
        Err(e) => {
            log::error!("Error borrando estudiante {} de {}: {:?}", id, workshop, e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
