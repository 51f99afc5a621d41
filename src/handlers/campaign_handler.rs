use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::models::campaign_model::{CampaignError, SendCampaignRequest};
use crate::services::campaign_service::CampaignService;

#[derive(Deserialize)]
pub struct LogsQuery {
    limit: Option<i64>,
}

/// POST /api/campaigns/send
pub async fn send_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    body: web::Json<SendCampaignRequest>,
) -> HttpResponse {
    match campaign_service.send_campaign(body.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(CampaignError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": msg
        })),
        Err(CampaignError::NotFound(msg)) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": msg
        })),
        Err(CampaignError::Internal(e)) => {
            log::error!("Campaign dispatch error: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// GET /api/campaigns/logs
pub async fn list_logs_endpoint(
    campaign_service: web::Data<CampaignService>,
    query: web::Query<LogsQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    match campaign_service.list_logs(limit).await {
        Ok(logs) => HttpResponse::Ok().json(json!({ "logs": logs })),
        Err(e) => {
            log::error!("Error listando campaign logs: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": e.to_string()
            }))
        }
    }
}

/// GET /api/campaigns/logs/{id}
pub async fn get_log_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<String>,
) -> HttpResponse {
    let log_id = path.into_inner();

    match campaign_service.get_log(&log_id).await {
        Ok(Some(log)) => HttpResponse::Ok().json(log),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "error": "Campaign log not found"
        })),
        Err(e) => {
            log::error!("Error buscando campaign log {}: {:?}", log_id, e);
            HttpResponse::InternalServerError().json(json!({
                "error": e.to_string()
            }))
        }
    }
}
