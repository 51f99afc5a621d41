//! services/student_service.rs

use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::student_model::{CreateStudentRequest, StudentRecord, UpdateStudentRequest};

// SQLite limita los parámetros por consulta (999 en builds viejos);
// las búsquedas por id se hacen en tandas de este tamaño.
pub(crate) const SQL_BIND_CHUNK: usize = 500;

#[derive(Clone, Debug)]
pub struct StudentService {
    db_pool: Pool<Sqlite>,
}

impl StudentService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        StudentService { db_pool }
    }

    pub async fn create_student(
        &self,
        workshop: &str,
        req: CreateStudentRequest,
    ) -> Result<StudentRecord> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO students (
                id, workshop, first_name, last_name, email,
                phone, student_id, linkedin, ticket_id, attended
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0)
            "#,
        )
        .bind(&id)
        .bind(workshop)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.student_id)
        .bind(&req.linkedin)
        .bind(&req.ticket_id)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar estudiante")?;

        Ok(StudentRecord {
            id,
            workshop: workshop.to_string(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            student_id: req.student_id,
            linkedin: req.linkedin,
            ticket_id: req.ticket_id,
            attended: false,
        })
    }

    pub async fn list_students(&self, workshop: &str) -> Result<Vec<StudentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, workshop, first_name, last_name, email,
                   phone, student_id, linkedin, ticket_id, attended
            FROM students
            WHERE workshop = ?1
            "#,
        )
        .bind(workshop)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar estudiantes")?;

        Ok(rows.into_iter().map(row_to_student).collect())
    }

    pub async fn get_student(&self, workshop: &str, id: &str) -> Result<Option<StudentRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, workshop, first_name, last_name, email,
                   phone, student_id, linkedin, ticket_id, attended
            FROM students
            WHERE workshop = ?1 AND id = ?2
            "#,
        )
        .bind(workshop)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al buscar estudiante")?;

        Ok(row.map(row_to_student))
    }

    /// Actualiza un estudiante. `present` togglea la asistencia; sin
    /// `present` es una edición parcial (solo los campos permitidos).
    /// Devuelve el registro actualizado, o None si no existe.
    pub async fn update_student(
        &self,
        workshop: &str,
        id: &str,
        req: UpdateStudentRequest,
    ) -> Result<Option<StudentRecord>> {
        if let Some(present) = req.present {
            sqlx::query("UPDATE students SET attended = ?1 WHERE workshop = ?2 AND id = ?3")
                .bind(present as i64)
                .bind(workshop)
                .bind(id)
                .execute(&self.db_pool)
                .await
                .context("Fallo al marcar asistencia")?;

            return self.get_student(workshop, id).await;
        }

        // Edición parcial: solo las columnas que vienen en el request
        let assignments: Vec<(&str, &String)> = [
            ("first_name", req.first_name.as_ref()),
            ("last_name", req.last_name.as_ref()),
            ("phone", req.phone.as_ref()),
            ("linkedin", req.linkedin.as_ref()),
            ("student_id", req.student_id.as_ref()),
        ]
        .into_iter()
        .filter_map(|(col, value)| value.map(|v| (col, v)))
        .collect();

        if !assignments.is_empty() {
            let set_sql = assignments
                .iter()
                .enumerate()
                .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE students SET {set_sql} WHERE workshop = ?{} AND id = ?{}",
                assignments.len() + 1,
                assignments.len() + 2
            );

            let mut query = sqlx::query(&sql);
            for (_, value) in &assignments {
                query = query.bind(*value);
            }
            query = query.bind(workshop).bind(id);

            query
                .execute(&self.db_pool)
                .await
                .context("Fallo al editar estudiante")?;
        }

        self.get_student(workshop, id).await
    }

    pub async fn delete_student(&self, workshop: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE workshop = ?1 AND id = ?2")
            .bind(workshop)
            .bind(id)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar estudiante")?;

        Ok(result.rows_affected() > 0)
    }

    /// Busca estudiantes por id dentro de un workshop, devolviéndolos en el
    /// MISMO orden de la lista pedida (SQL IN no garantiza orden). Ids que
    /// no existen simplemente se omiten. Listas largas se consultan en
    /// tandas de SQL_BIND_CHUNK para no exceder el límite de parámetros.
    pub async fn find_by_ids(&self, workshop: &str, ids: &[String]) -> Result<Vec<StudentRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<String, StudentRecord> = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(SQL_BIND_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                r#"
                SELECT id, workshop, first_name, last_name, email,
                       phone, student_id, linkedin, ticket_id, attended
                FROM students
                WHERE workshop = ? AND id IN ({placeholders})
                "#
            );

            let mut query = sqlx::query(&sql).bind(workshop);
            for id in chunk {
                query = query.bind(id);
            }

            let rows = query
                .fetch_all(&self.db_pool)
                .await
                .context("Fallo al buscar estudiantes por ids")?;

            for row in rows {
                let student = row_to_student(row);
                by_id.insert(student.id.clone(), student);
            }
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

fn row_to_student(row: SqliteRow) -> StudentRecord {
    StudentRecord {
        id: row.get("id"),
        workshop: row.get("workshop"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        student_id: row.get("student_id"),
        linkedin: row.get("linkedin"),
        ticket_id: row.get("ticket_id"),
        attended: row.get::<i64, _>("attended") != 0,
    }
}
