//! tests/template_tests.rs
//! Pruebas de TemplateService y StudentService sobre SQLite en memoria.

#[cfg(test)]
mod tests {
    use actix_rt::test;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    use crate::models::student_model::{CreateStudentRequest, UpdateStudentRequest};
    use crate::models::template_model::CreateTemplateRequest;
    use crate::services::student_service::{StudentService, SQL_BIND_CHUNK};
    use crate::services::template_service::TemplateService;

    async fn setup_pool() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("No se pudo abrir SQLite en memoria");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Fallo en migraciones");
        pool
    }

    fn student_req(first: &str, email: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            first_name: first.to_string(),
            last_name: "Pérez".to_string(),
            email: email.to_string(),
            phone: String::new(),
            student_id: String::new(),
            linkedin: String::new(),
            ticket_id: String::new(),
        }
    }

    #[test]
    async fn test_template_crud_roundtrip() {
        let pool = setup_pool().await;
        let service = TemplateService::new(pool);

        let created = service
            .create_template(CreateTemplateRequest {
                name: "bienvenida".to_string(),
                subject: "Bienvenido al taller".to_string(),
                html: "<p>Hola {{firstName}}</p>".to_string(),
            })
            .await
            .expect("create_template");

        let fetched = service.get_template(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "bienvenida");
        assert_eq!(fetched.html, "<p>Hola {{firstName}}</p>");

        assert!(service.delete_template(&created.id).await.unwrap());
        assert!(service.get_template(&created.id).await.unwrap().is_none());
        // borrar de nuevo ya no afecta filas
        assert!(!service.delete_template(&created.id).await.unwrap());
    }

    #[test]
    async fn test_template_preview_uses_sample_data() {
        let pool = setup_pool().await;
        let service = TemplateService::new(pool);

        let created = service
            .create_template(CreateTemplateRequest {
                name: "preview".to_string(),
                subject: "Asunto".to_string(),
                html: "<p>{{firstName}} {{lastName}} - {{email}} - {{ghost}}</p>".to_string(),
            })
            .await
            .unwrap();

        let html = service
            .preview_template(&created.id)
            .await
            .unwrap()
            .expect("preview");
        assert_eq!(html, "<p>John Doe - john.doe@example.com - {{ghost}}</p>");

        assert!(service.preview_template("no-existe").await.unwrap().is_none());
    }

    #[test]
    async fn test_students_scoped_by_workshop() {
        let pool = setup_pool().await;
        let service = StudentService::new(pool);

        let a = service
            .create_student("taller-a", student_req("Ana", "ana@example.com"))
            .await
            .unwrap();
        service
            .create_student("taller-b", student_req("Beto", "beto@example.com"))
            .await
            .unwrap();

        let listed = service.list_students("taller-a").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "ana@example.com");

        // find_by_ids no cruza workshops
        let found = service
            .find_by_ids("taller-b", &[a.id.clone()])
            .await
            .unwrap();
        assert!(found.is_empty());

        // borrar respeta el workshop
        assert!(!service.delete_student("taller-b", &a.id).await.unwrap());
        assert!(service.delete_student("taller-a", &a.id).await.unwrap());
    }

    fn empty_update() -> UpdateStudentRequest {
        UpdateStudentRequest {
            present: None,
            first_name: None,
            last_name: None,
            phone: None,
            linkedin: None,
            student_id: None,
        }
    }

    #[test]
    async fn test_update_student_attendance_toggle() {
        let pool = setup_pool().await;
        let service = StudentService::new(pool);

        let created = service
            .create_student("taller-a", student_req("Ana", "ana@example.com"))
            .await
            .unwrap();
        assert!(!created.attended);

        let mut req = empty_update();
        req.present = Some(true);
        let updated = service
            .update_student("taller-a", &created.id, req)
            .await
            .unwrap()
            .expect("update_student");
        assert!(updated.attended);

        // attended nunca entra al mapa de placeholders, ni marcado en true
        assert!(!updated.placeholder_map().contains_key("attended"));

        let mut req = empty_update();
        req.present = Some(false);
        let updated = service
            .update_student("taller-a", &created.id, req)
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.attended);
    }

    #[test]
    async fn test_update_student_partial_edit() {
        let pool = setup_pool().await;
        let service = StudentService::new(pool);

        let created = service
            .create_student("taller-a", student_req("Ana", "ana@example.com"))
            .await
            .unwrap();

        let mut req = empty_update();
        req.first_name = Some("Anita".to_string());
        req.linkedin = Some("in/anita".to_string());
        let updated = service
            .update_student("taller-a", &created.id, req)
            .await
            .unwrap()
            .expect("update_student");

        // solo cambian los campos enviados
        assert_eq!(updated.first_name, "Anita");
        assert_eq!(updated.linkedin, "in/anita");
        assert_eq!(updated.last_name, "Pérez");
        assert_eq!(updated.email, "ana@example.com");
        assert!(!updated.attended);

        // request vacío: no toca nada y devuelve el registro actual
        let same = service
            .update_student("taller-a", &created.id, empty_update())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(same.first_name, "Anita");

        // respeta el workshop y los ids inexistentes
        let mut req = empty_update();
        req.first_name = Some("Otra".to_string());
        assert!(service
            .update_student("taller-b", &created.id, req)
            .await
            .unwrap()
            .is_none());
        assert!(service
            .get_student("taller-a", "fantasma")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    async fn test_find_by_ids_handles_large_rosters() {
        let pool = setup_pool().await;
        let service = StudentService::new(pool);

        // más ids que el tamaño de tanda, para cruzar el límite de binds
        let total = SQL_BIND_CHUNK + 50;
        let mut ids = Vec::with_capacity(total);
        for i in 0..total {
            let rec = service
                .create_student(
                    "taller-a",
                    student_req(&format!("N{}", i), &format!("n{}@example.com", i)),
                )
                .await
                .unwrap();
            ids.push(rec.id);
        }
        ids.reverse();

        let found = service.find_by_ids("taller-a", &ids).await.unwrap();
        assert_eq!(found.len(), total);
        // el orden pedido se conserva incluso a través de las tandas
        let found_ids: Vec<String> = found.iter().map(|s| s.id.clone()).collect();
        assert_eq!(found_ids, ids);
    }

    #[test]
    async fn test_find_by_ids_returns_request_order() {
        let pool = setup_pool().await;
        let service = StudentService::new(pool);

        let mut ids = Vec::new();
        for i in 0..5 {
            let rec = service
                .create_student(
                    "taller-a",
                    student_req(&format!("N{}", i), &format!("n{}@example.com", i)),
                )
                .await
                .unwrap();
            ids.push(rec.id);
        }

        let shuffled = vec![
            ids[3].clone(),
            ids[0].clone(),
            ids[4].clone(),
            ids[1].clone(),
        ];
        let found = service.find_by_ids("taller-a", &shuffled).await.unwrap();

        let found_ids: Vec<String> = found.iter().map(|s| s.id.clone()).collect();
        assert_eq!(found_ids, shuffled);

        // ids inexistentes se omiten sin error
        let with_ghost = vec![ids[2].clone(), "fantasma".to_string()];
        let found = service.find_by_ids("taller-a", &with_ghost).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ids[2]);
    }
}
