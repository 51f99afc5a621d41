use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub workshop: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,
    pub linkedin: String,
    pub ticket_id: String,
    pub attended: bool,
}

impl StudentRecord {
    /// Campos expuestos a la sustitución de placeholders, con las claves
    /// tal como aparecen en las plantillas ({{firstName}}, {{email}}, ...).
    /// Lista declarada explícita: id, workshop y attended nunca se exponen.
    pub fn placeholder_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("firstName".to_string(), self.first_name.clone()),
            ("lastName".to_string(), self.last_name.clone()),
            ("email".to_string(), self.email.clone()),
            ("phone".to_string(), self.phone.clone()),
            ("studentId".to_string(), self.student_id.clone()),
            ("linkedin".to_string(), self.linkedin.clone()),
            ("ticketId".to_string(), self.ticket_id.clone()),
        ])
    }
}

/// Request para PUT de un estudiante: si viene `present` se togglea la
/// asistencia; si no, es edición parcial de los campos permitidos.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub present: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub student_id: Option<String>,
}

/// Request para agregar un estudiante a un workshop
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub ticket_id: String,
}
