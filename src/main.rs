use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

use crate::config::dispatch_config::DispatchConfig;
use crate::logger::init_logger;
use crate::services::campaign_service::CampaignService;
use crate::services::student_service::StudentService;
use crate::services::template_service::TemplateService;
use crate::services::transport::SmtpCampaignTransport;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

async fn setup_database() -> Pool<Sqlite> {
    // 1) Crear carpeta "data"
    std::fs::create_dir_all("data").expect("No se pudo crear directorio 'data'");

    // 2) Ruta final: ./data/campaigns.db (mode=rwc crea el archivo si falta)
    let db_path = std::env::current_dir()
        .expect("No se pudo obtener el current_dir")
        .join("data")
        .join("campaigns.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.to_string_lossy());

    log::info!("Conectando a SQLite en {}", db_url);

    // 3) Conectarnos con SQLx
    Pool::<Sqlite>::connect(&db_url)
        .await
        .expect("No se pudo conectar a la base de datos SQLite.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    // Conectarnos a la DB
    let db_pool = setup_database().await;

    let template_service = TemplateService::new(db_pool.clone());
    let student_service = StudentService::new(db_pool.clone());

    // Transporte SMTP real (credenciales por entorno)
    let transport =
        Arc::new(SmtpCampaignTransport::from_env().expect("Configuración SMTP incompleta"));

    let dispatch_config = DispatchConfig::from_env();
    log::info!(
        "Despacho por lotes: batch_size={}, delay_ms={}",
        dispatch_config.batch_size,
        dispatch_config.batch_delay_ms
    );

    let campaign_service = CampaignService::new(
        db_pool.clone(),
        template_service.clone(),
        student_service.clone(),
        transport,
        dispatch_config,
    );
    if let Err(e) = campaign_service.run_migrations().await {
        panic!("Fallo en migraciones: {:?}", e);
    }

    // Levantar servidor
    log::info!("Levantando servidor en 0.0.0.0:5023");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(template_service.clone()))
            .app_data(web::Data::new(student_service.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .configure(app::init_app)
    })
    .bind(("0.0.0.0", 5023))?
    .run()
    .await
}
