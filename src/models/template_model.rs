use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub html: String,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una plantilla (cuerpo HTML con tokens {{campo}})
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: String,
    pub html: String,
}
