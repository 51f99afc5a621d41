//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers (campañas, plantillas, estudiantes).

pub mod campaign_handler;
pub mod student_handler;
pub mod template_handler;
