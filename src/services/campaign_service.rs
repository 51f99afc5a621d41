//! services/campaign_service.rs
//! Orquestador del despacho de campañas: valida, resuelve plantilla y
//! destinatarios, envía por lotes con pausa entre lotes y va persistiendo
//! el avance en campaign_logs hasta finalizar.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::config::dispatch_config::DispatchConfig;
use crate::models::campaign_model::{
    CampaignError, CampaignLogRecord, CampaignStatus, FailedRecipient, SendCampaignRequest,
    SendCampaignResponse,
};
use crate::models::student_model::StudentRecord;
use crate::models::template_model::TemplateRecord;
use crate::services::personalize::personalize_html;
use crate::services::student_service::StudentService;
use crate::services::template_service::TemplateService;
use crate::services::transport::{CampaignSender, CampaignTransport, OutgoingEmail};

#[derive(Clone)]
pub struct CampaignService {
    db_pool: Pool<Sqlite>,
    template_service: TemplateService,
    student_service: StudentService,
    transport: Arc<dyn CampaignTransport>,
    config: DispatchConfig,
}

impl CampaignService {
    pub fn new(
        db_pool: Pool<Sqlite>,
        template_service: TemplateService,
        student_service: StudentService,
        transport: Arc<dyn CampaignTransport>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            db_pool,
            template_service,
            student_service,
            transport,
            config,
        }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }

    // ======================================================
    // Entrada del despacho
    // ======================================================

    pub async fn send_campaign(
        &self,
        req: SendCampaignRequest,
    ) -> Result<SendCampaignResponse, CampaignError> {
        // 1) Validaciones rápidas, sin efectos secundarios
        if req.template_id.trim().is_empty() || req.workshop.trim().is_empty() {
            return Err(CampaignError::InvalidRequest(
                "Missing templateId or workshop".to_string(),
            ));
        }
        if req.sender_name.trim().is_empty() || req.sender_email.trim().is_empty() {
            return Err(CampaignError::InvalidRequest(
                "Missing senderName or senderEmail".to_string(),
            ));
        }
        if req.student_ids.is_empty() {
            return Err(CampaignError::InvalidRequest(
                "studentIds must not be empty".to_string(),
            ));
        }

        // 2) Resolver plantilla y destinatarios (fail fast, sin log todavía)
        let template = self
            .template_service
            .get_template(&req.template_id)
            .await
            .map_err(CampaignError::Internal)?
            .ok_or_else(|| CampaignError::NotFound("Template not found".to_string()))?;

        let students = self
            .student_service
            .find_by_ids(&req.workshop, &req.student_ids)
            .await
            .map_err(CampaignError::Internal)?;

        if students.is_empty() {
            return Err(CampaignError::InvalidRequest(
                "No recipients found for provided studentIds".to_string(),
            ));
        }

        // 3) Recién con todo resuelto se crea el log (pending)
        let log_id = self
            .create_log(&req, students.len() as i64)
            .await
            .map_err(CampaignError::Internal)?;

        log::info!(
            "(send_campaign) Campaña creada log={} workshop={} destinatarios={}",
            log_id,
            req.workshop,
            students.len()
        );

        let sender = CampaignSender {
            name: req.sender_name.clone(),
            email: req.sender_email.clone(),
        };
        let recipient_count = students.len() as i64;

        if req.async_send {
            // Variante en background: respondemos ya; el progreso se
            // consulta por GET /api/campaigns/logs/{id}
            let service = self.clone();
            let task_log_id = log_id.clone();
            let placeholder_fields = req.placeholder_fields.clone();
            tokio::spawn(async move {
                match service
                    .run_dispatch(
                        &task_log_id,
                        &template,
                        &sender,
                        &students,
                        placeholder_fields.as_deref(),
                    )
                    .await
                {
                    Ok(_) => log::info!("(send_campaign) Campaña async {} finalizada", task_log_id),
                    Err(e) => log::error!(
                        "(send_campaign) Campaña async {} abortada, el log queda no-terminal: {:?}",
                        task_log_id,
                        e
                    ),
                }
            });

            return Ok(SendCampaignResponse {
                success: true,
                log_id,
                recipient_count,
                success_count: 0,
                failed_count: 0,
            });
        }

        self.run_dispatch(
            &log_id,
            &template,
            &sender,
            &students,
            req.placeholder_fields.as_deref(),
        )
        .await
        .map_err(CampaignError::Internal)?;

        let log = self
            .get_log(&log_id)
            .await
            .map_err(CampaignError::Internal)?
            .ok_or_else(|| CampaignError::Internal(anyhow!("Campaign log disappeared")))?;

        Ok(SendCampaignResponse {
            success: true,
            log_id: log.id,
            recipient_count: log.recipient_count,
            success_count: log.success_count,
            failed_count: log.failed_count,
        })
    }

    /// Bucle de lotes: render por destinatario, una llamada al transporte
    /// por lote, acumulación de contadores y persistencia tras cada lote.
    /// Un lote fallido marca a todos sus destinatarios y la corrida sigue;
    /// un error de persistencia sí aborta (el log queda no-terminal).
    async fn run_dispatch(
        &self,
        log_id: &str,
        template: &TemplateRecord,
        sender: &CampaignSender,
        students: &[StudentRecord],
        placeholder_fields: Option<&[String]>,
    ) -> Result<()> {
        self.mark_in_progress(log_id).await?;

        let batch_size = self.config.batch_size.max(1);
        let mut success_count: i64 = 0;
        let mut failed_count: i64 = 0;
        let mut failed_recipients: Vec<FailedRecipient> = Vec::new();

        for (batch_idx, batch) in students.chunks(batch_size).enumerate() {
            if batch_idx > 0 {
                // pausa entre lotes para respetar el rate limit del proveedor
                tokio::time::sleep(self.config.batch_delay()).await;
            }

            let messages: Vec<OutgoingEmail> = batch
                .iter()
                .map(|student| {
                    let mut fields = student.placeholder_map();
                    if let Some(allowed) = placeholder_fields {
                        fields.retain(|key, _| allowed.iter().any(|f| f == key));
                    }
                    OutgoingEmail {
                        to_email: student.email.clone(),
                        to_name: format!("{} {}", student.first_name, student.last_name),
                        subject: template.subject.clone(),
                        html_body: personalize_html(&template.html, &fields),
                    }
                })
                .collect();

            match self.transport.send_batch(sender, &messages).await {
                Ok(()) => {
                    success_count += batch.len() as i64;
                    log::info!(
                        "(run_dispatch) log={} lote {} enviado ({} correos)",
                        log_id,
                        batch_idx + 1,
                        batch.len()
                    );
                }
                Err(e) => {
                    failed_count += batch.len() as i64;
                    let reason = e.to_string();
                    for student in batch {
                        failed_recipients.push(FailedRecipient {
                            email: student.email.clone(),
                            error: reason.clone(),
                        });
                    }
                    log::error!(
                        "(run_dispatch) log={} lote {} falló: {}",
                        log_id,
                        batch_idx + 1,
                        reason
                    );
                }
            }

            // Persistir el avance después de cada lote
            self.update_progress(log_id, success_count, failed_count, &failed_recipients)
                .await?;
        }

        self.finalize(log_id, success_count, failed_count, &failed_recipients)
            .await
    }

    // ======================================================
    // Máquina de estados del campaign log (persistida)
    // ======================================================

    async fn create_log(&self, req: &SendCampaignRequest, recipient_count: i64) -> Result<String> {
        let log_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO campaign_logs (
                id, template_id, workshop, sender_name, sender_email,
                recipient_count, status, success_count, failed_count,
                failed_recipients, started_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', 0, 0, '[]', ?7)
            "#,
        )
        .bind(&log_id)
        .bind(&req.template_id)
        .bind(&req.workshop)
        .bind(&req.sender_name)
        .bind(&req.sender_email)
        .bind(recipient_count)
        .bind(&now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar campaign log")?;

        Ok(log_id)
    }

    /// Transición guardada: solo avanza desde pending. Un log terminal
    /// nunca retrocede.
    pub(crate) async fn mark_in_progress(&self, log_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE campaign_logs
            SET status = 'in_progress'
            WHERE id = ?1 AND status IN ('pending', 'in_progress')
            "#,
        )
        .bind(log_id)
        .execute(&self.db_pool)
        .await
        .context("Fallo al marcar campaign log in_progress")?;

        Ok(())
    }

    /// Persiste contadores acumulados y la lista de fallos tras un lote.
    pub(crate) async fn update_progress(
        &self,
        log_id: &str,
        success_count: i64,
        failed_count: i64,
        failed_recipients: &[FailedRecipient],
    ) -> Result<()> {
        let failures_json = serde_json::to_string(failed_recipients)
            .context("Fallo al serializar failed_recipients")?;

        sqlx::query(
            r#"
            UPDATE campaign_logs
            SET success_count = ?2,
                failed_count = ?3,
                failed_recipients = ?4,
                status = 'in_progress'
            WHERE id = ?1 AND status IN ('pending', 'in_progress')
            "#,
        )
        .bind(log_id)
        .bind(success_count)
        .bind(failed_count)
        .bind(&failures_json)
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar progreso del campaign log")?;

        Ok(())
    }

    /// Cierra la corrida: completed si no hubo fallos, failed si hubo
    /// al menos uno. Guardado contra dobles finalizaciones.
    pub(crate) async fn finalize(
        &self,
        log_id: &str,
        success_count: i64,
        failed_count: i64,
        failed_recipients: &[FailedRecipient],
    ) -> Result<()> {
        let status = if failed_count == 0 {
            CampaignStatus::Completed
        } else {
            CampaignStatus::Failed
        };
        let now = Utc::now().to_rfc3339();
        let failures_json = serde_json::to_string(failed_recipients)
            .context("Fallo al serializar failed_recipients")?;

        sqlx::query(
            r#"
            UPDATE campaign_logs
            SET status = ?2,
                completed_at = ?3,
                success_count = ?4,
                failed_count = ?5,
                failed_recipients = ?6
            WHERE id = ?1 AND status IN ('pending', 'in_progress')
            "#,
        )
        .bind(log_id)
        .bind(status.as_str())
        .bind(&now)
        .bind(success_count)
        .bind(failed_count)
        .bind(&failures_json)
        .execute(&self.db_pool)
        .await
        .context("Fallo al finalizar campaign log")?;

        log::info!(
            "(finalize) log={} status={} success={} failed={}",
            log_id,
            status.as_str(),
            success_count,
            failed_count
        );

        Ok(())
    }

    // ======================================================
    // Consultas del log
    // ======================================================

    pub async fn get_log(&self, log_id: &str) -> Result<Option<CampaignLogRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, template_id, workshop, sender_name, sender_email,
                   recipient_count, status, success_count, failed_count,
                   failed_recipients, started_at, completed_at
            FROM campaign_logs
            WHERE id = ?1
            "#,
        )
        .bind(log_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al buscar campaign log")?;

        row.map(row_to_log).transpose()
    }

    /// Últimos logs, el más reciente primero.
    pub async fn list_logs(&self, limit: i64) -> Result<Vec<CampaignLogRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, template_id, workshop, sender_name, sender_email,
                   recipient_count, status, success_count, failed_count,
                   failed_recipients, started_at, completed_at
            FROM campaign_logs
            ORDER BY started_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar campaign logs")?;

        rows.into_iter().map(row_to_log).collect()
    }
}

fn row_to_log(row: SqliteRow) -> Result<CampaignLogRecord> {
    let status = CampaignStatus::parse(&row.get::<String, _>("status"))?;
    let failed_recipients: Vec<FailedRecipient> =
        serde_json::from_str(&row.get::<String, _>("failed_recipients"))
            .context("failed_recipients no es JSON válido")?;

    Ok(CampaignLogRecord {
        id: row.get("id"),
        template_id: row.get("template_id"),
        workshop: row.get("workshop"),
        sender_name: row.get("sender_name"),
        sender_email: row.get("sender_email"),
        recipient_count: row.get("recipient_count"),
        status,
        success_count: row.get("success_count"),
        failed_count: row.get("failed_count"),
        failed_recipients,
        started_at: row.get::<String, _>("started_at").parse()?,
        completed_at: row
            .get::<Option<String>, _>("completed_at")
            .map(|s| s.parse())
            .transpose()?,
    })
}
