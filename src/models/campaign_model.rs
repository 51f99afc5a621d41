use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Estados del ciclo de vida de un campaign log.
/// Solo avanza: pending -> in_progress -> {completed, failed}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::InProgress => "in_progress",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(CampaignStatus::Pending),
            "in_progress" => Ok(CampaignStatus::InProgress),
            "completed" => Ok(CampaignStatus::Completed),
            "failed" => Ok(CampaignStatus::Failed),
            other => Err(anyhow::anyhow!("Estado de campaña desconocido: {other}")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }
}

/// Destinatario que no pudo recibir el correo, con el motivo del transporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRecipient {
    pub email: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignLogRecord {
    pub id: String,
    pub template_id: String,
    pub workshop: String,
    pub sender_name: String,
    pub sender_email: String,
    pub recipient_count: i64,
    pub status: CampaignStatus,
    pub success_count: i64,
    pub failed_count: i64,
    pub failed_recipients: Vec<FailedRecipient>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Request para POST /api/campaigns/send
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignRequest {
    pub template_id: String,
    pub workshop: String,
    pub sender_name: String,
    pub sender_email: String,
    pub student_ids: Vec<String>,
    // Si viene, limita qué campos del estudiante se sustituyen en la plantilla
    pub placeholder_fields: Option<Vec<String>>,
    // true: responde de inmediato y despacha en background (consultar el log)
    #[serde(default)]
    pub async_send: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignResponse {
    pub success: bool,
    pub log_id: String,
    pub recipient_count: i64,
    pub success_count: i64,
    pub failed_count: i64,
}

/// Errores del despacho que el handler traduce a códigos HTTP.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
