//! tests/personalize_tests.rs
//! Pruebas de la sustitución de placeholders (función pura).

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::models::student_model::StudentRecord;
    use crate::services::personalize::{personalize_html, sample_preview_fields};

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_student() -> StudentRecord {
        StudentRecord {
            id: "abc-123".to_string(),
            workshop: "rustconf".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            student_id: "S-001".to_string(),
            linkedin: "in/ada".to_string(),
            ticket_id: "T-001".to_string(),
            attended: true,
        }
    }

    #[test]
    fn replaces_known_tokens() {
        let out = personalize_html(
            "Hola {{firstName}} {{lastName}}!",
            &fields(&[("firstName", "Ada"), ("lastName", "Lovelace")]),
        );
        assert_eq!(out, "Hola Ada Lovelace!");
    }

    #[test]
    fn replaces_repeated_tokens() {
        let out = personalize_html(
            "{{firstName}}, sí, {{firstName}}",
            &fields(&[("firstName", "Ada")]),
        );
        assert_eq!(out, "Ada, sí, Ada");
    }

    #[test]
    fn unmatched_tokens_stay_verbatim() {
        let out = personalize_html("Hi {{ghost}}", &fields(&[("firstName", "A")]));
        assert_eq!(out, "Hi {{ghost}}");
    }

    #[test]
    fn unclosed_token_stays_verbatim() {
        let out = personalize_html("Hola {{firstName", &fields(&[("firstName", "Ada")]));
        assert_eq!(out, "Hola {{firstName");
    }

    #[test]
    fn value_with_braces_is_not_resubstituted() {
        // un valor que parece token se inserta literal, sin recursión
        let out = personalize_html(
            "{{firstName}} {{lastName}}",
            &fields(&[("firstName", "{{lastName}}"), ("lastName", "Lovelace")]),
        );
        assert_eq!(out, "{{lastName}} Lovelace");
    }

    #[test]
    fn empty_value_replaces_with_empty_string() {
        let out = personalize_html("Hola {{firstName}}!", &fields(&[("firstName", "")]));
        assert_eq!(out, "Hola !");
    }

    #[test]
    fn rendering_is_deterministic() {
        let f = fields(&[("firstName", "Ada"), ("email", "ada@example.com")]);
        let template = "{{firstName}} <{{email}}> {{ghost}}";
        assert_eq!(
            personalize_html(template, &f),
            personalize_html(template, &f)
        );
    }

    #[test]
    fn excluded_student_fields_are_never_substituted() {
        let student = sample_student();
        let map = student.placeholder_map();

        // id, workshop y attended no están en la lista declarada
        assert!(!map.contains_key("id"));
        assert!(!map.contains_key("workshop"));
        assert!(!map.contains_key("attended"));

        let out = personalize_html("{{attended}} {{id}} {{firstName}}", &map);
        assert_eq!(out, "{{attended}} {{id}} Ada");
    }

    #[test]
    fn student_map_exposes_declared_fields() {
        let map = sample_student().placeholder_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "email",
                "firstName",
                "lastName",
                "linkedin",
                "phone",
                "studentId",
                "ticketId"
            ]
        );
    }

    #[test]
    fn preview_sample_fields_render() {
        let out = personalize_html(
            "{{firstName}} {{lastName}} <{{email}}>",
            &sample_preview_fields(),
        );
        assert_eq!(out, "John Doe <john.doe@example.com>");
    }
}
