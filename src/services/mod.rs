//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod campaign_service;
pub mod personalize;
pub mod student_service;
pub mod template_service;
pub mod transport;
