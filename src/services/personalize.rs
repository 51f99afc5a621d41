//! services/personalize.rs
//! Sustitución de placeholders {{campo}} en el HTML de una plantilla.
//! Función pura: sin estado compartido, segura de correr por destinatario.

use std::collections::BTreeMap;

/// Reemplaza cada `{{clave}}` del template con el valor correspondiente.
/// - Tokens sin clave en `fields` quedan tal cual (no es error).
/// - Un solo paso sobre el template original: los valores insertados
///   nunca se re-sustituyen, aunque contengan `{{` o `}}`.
pub fn personalize_html(template: &str, fields: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match fields.get(key) {
                    Some(value) => out.push_str(value),
                    // token desconocido: se conserva literal
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                // "{{" sin cierre, el resto queda tal cual
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Datos de muestra para la vista previa de una plantilla.
pub fn sample_preview_fields() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("firstName".to_string(), "John".to_string()),
        ("lastName".to_string(), "Doe".to_string()),
        ("email".to_string(), "john.doe@example.com".to_string()),
    ])
}
