//! services/template_service.rs

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::template_model::{CreateTemplateRequest, TemplateRecord};
use crate::services::personalize::{personalize_html, sample_preview_fields};

#[derive(Clone, Debug)]
pub struct TemplateService {
    db_pool: Pool<Sqlite>,
}

impl TemplateService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        TemplateService { db_pool }
    }

    /// Crea la plantilla y la devuelve completa.
    pub async fn create_template(&self, req: CreateTemplateRequest) -> Result<TemplateRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO email_templates (id, name, subject, html, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.subject)
        .bind(&req.html)
        .bind(now.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar plantilla")?;

        Ok(TemplateRecord {
            id,
            name: req.name,
            subject: req.subject,
            html: req.html,
            created_at: now,
        })
    }

    /// Lista plantillas, la más reciente primero.
    pub async fn list_templates(&self) -> Result<Vec<TemplateRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, subject, html, created_at
            FROM email_templates
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar plantillas")?;

        rows.into_iter().map(row_to_template).collect()
    }

    pub async fn get_template(&self, id: &str) -> Result<Option<TemplateRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, subject, html, created_at
            FROM email_templates
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al buscar plantilla")?;

        row.map(row_to_template).transpose()
    }

    pub async fn delete_template(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = ?1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar plantilla")?;

        Ok(result.rows_affected() > 0)
    }

    /// Render de vista previa con datos de muestra (John Doe).
    pub async fn preview_template(&self, id: &str) -> Result<Option<String>> {
        let template = match self.get_template(id).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        let fields = sample_preview_fields();
        Ok(Some(personalize_html(&template.html, &fields)))
    }
}

fn row_to_template(row: SqliteRow) -> Result<TemplateRecord> {
    Ok(TemplateRecord {
        id: row.get("id"),
        name: row.get("name"),
        subject: row.get("subject"),
        html: row.get("html"),
        created_at: row.get::<String, _>("created_at").parse()?,
    })
}
