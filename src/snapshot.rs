//! Normalización de las respuestas del servicio documental a listas de
//! registros. Cualquier forma inesperada se degrada a un snapshot vacío.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

/// Extrae el array de registros de una respuesta: array directo, envoltorio
/// `data`, envoltorio `result` o, en última instancia, el primer campo de
/// tipo array en el orden en que llega en la respuesta.
fn unwrap_envelope(response: Value) -> Option<Vec<Value>> {
    match response {
        Value::Array(items) => Some(items),
        Value::Object(mut fields) => {
            for key in ["data", "result"] {
                if let Some(Value::Array(_)) = fields.get(key) {
                    if let Some(Value::Array(items)) = fields.remove(key) {
                        return Some(items);
                    }
                }
            }
            fields.into_iter().find_map(|(_, value)| match value {
                Value::Array(items) => Some(items),
                _ => None,
            })
        }
        _ => None,
    }
}

/// Convierte una respuesta cruda en registros. Los elementos que no
/// encajan con `T` se descartan con un aviso.
pub fn normalize<T: DeserializeOwned>(response: Value, label: &str) -> Vec<T> {
    let Some(items) = unwrap_envelope(response) else {
        warn!("Respuesta sin datos válidos para {label}; se usa un snapshot vacío.");
        return Vec::new();
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Registro {position} de {label} descartado: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!("{label}: {} de {total} registros descartados.", total - records.len());
    }
    records
}

/// Carga un snapshot desde un fichero JSON con la misma forma que la
/// respuesta del servicio.
pub fn load_file<T: DeserializeOwned>(path: &Path, label: &str) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("No se pudo leer {}", path.display()))?;
    let response: Value = serde_json::from_str(&raw)
        .with_context(|| format!("JSON inválido en {}", path.display()))?;
    let records = normalize(response, label);
    info!("Cargados {} registros de {label} desde {}", records.len(), path.display());
    Ok(records)
}
