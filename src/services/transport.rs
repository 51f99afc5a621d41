//! services/transport.rs
//! Capacidad de transporte de correo: enviar un lote de mensajes HTML
//! ya personalizados. El orquestador solo ve "lote entero ok / lote
//! entero falló", igual que la API del proveedor.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, Clone)]
pub struct CampaignSender {
    pub name: String,
    pub email: String,
}

/// Mensaje ya dirigido y renderizado, listo para el transporte.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait CampaignTransport: Send + Sync {
    /// Envía el lote completo. Err marca el lote entero como fallido.
    async fn send_batch(&self, sender: &CampaignSender, batch: &[OutgoingEmail]) -> Result<()>;
}

/// Transporte real por SMTP (lettre), credenciales desde el entorno.
pub struct SmtpCampaignTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpCampaignTransport {
    /// Lee SMTP_HOST / SMTP_PORT / SMTP_USER / SMTP_PASS del entorno.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST").context("Falta SMTP_HOST")?;
        let port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("SMTP_PORT inválido")?;
        let user = std::env::var("SMTP_USER").context("Falta SMTP_USER")?;
        let pass = std::env::var("SMTP_PASS").context("Falta SMTP_PASS")?;

        let tls_params = TlsParameters::new(host.clone())?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
            .port(port)
            .credentials(Credentials::new(user, pass))
            .tls(Tls::Required(tls_params))
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl CampaignTransport for SmtpCampaignTransport {
    async fn send_batch(&self, sender: &CampaignSender, batch: &[OutgoingEmail]) -> Result<()> {
        let from: Mailbox = format!("{} <{}>", sender.name, sender.email)
            .parse()
            .context("Invalid from address")?;

        // SMTP no tiene submit por lote: se envía uno por uno y el primer
        // error hace fallar el lote completo.
        for msg in batch {
            let to: Mailbox = format!("{} <{}>", msg.to_name, msg.to_email)
                .parse()
                .context("Invalid recipient address")?;

            let html_part = SinglePart::builder()
                .header(ContentType::parse("text/html; charset=utf-8")?)
                .body(msg.html_body.clone());

            let message = Message::builder()
                .from(from.clone())
                .to(to)
                .subject(&msg.subject)
                .singlepart(html_part)?;

            tokio::time::timeout(std::time::Duration::from_secs(30), self.mailer.send(message))
                .await??;
        }

        Ok(())
    }
}
