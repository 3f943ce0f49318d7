//! Modelos de dominio: registros de categoría y de documento tal y como los
//! entrega el servicio documental remoto.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Módulo asignado a las categorías que llegan sin `MODULE_NAME`.
pub const DEFAULT_MODULE: &str = "Other Modules";

/// Representa una fila de `SYNM_DMS_DOC_CATEGORIES`.
/// Los campos que no usa el árbol se conservan en `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "MODULE_NAME", default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(rename = "CATEGORY_NAME")]
    pub category_name: String,
    #[serde(rename = "PATH_FOR_LAN", default, skip_serializing_if = "Option::is_none")]
    pub path_for_lan: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CategoryRecord {
    pub fn new(module_name: &str, category_name: &str, path_for_lan: Option<&str>) -> Self {
        Self {
            module_name: Some(module_name.to_string()),
            category_name: category_name.to_string(),
            path_for_lan: path_for_lan.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Nombre del módulo, con `"Other Modules"` si viene vacío.
    pub fn module(&self) -> &str {
        match self.module_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_MODULE,
        }
    }

    /// Ruta LAN de la categoría; por defecto `CATEGORY_NAME/`.
    pub fn lan_path(&self) -> String {
        match self.path_for_lan.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => format!("{}/", self.category_name),
        }
    }

    /// Copia del registro para una subcarpeta: mismo origen, pero con el
    /// nombre del segmento y la ruta acumulada hasta él.
    pub fn for_segment(&self, segment: &str, accumulated_path: &str) -> Self {
        Self {
            category_name: segment.to_string(),
            path_for_lan: Some(accumulated_path.to_string()),
            ..self.clone()
        }
    }
}

/// Número de secuencia de un documento. El servicio lo devuelve a veces
/// como texto y a veces como número.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefSeqNo {
    Number(Number),
    Text(String),
}

impl fmt::Display for RefSeqNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefSeqNo::Number(n) => write!(f, "{n}"),
            RefSeqNo::Text(s) => f.write_str(s),
        }
    }
}

/// Representa una fila de `DMS_GetDocMaster_List`.
/// El resto de columnas viaja opaco en `extra` hacia los diálogos de
/// permisos y de subida.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "DOCUMENT_NO", default, skip_serializing_if = "Option::is_none")]
    pub document_no: Option<String>,
    #[serde(rename = "DOCUMENT_DESCRIPTION", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "DOC_RELATED_CATEGORY", default, skip_serializing_if = "Option::is_none")]
    pub related_category: Option<String>,
    #[serde(rename = "PATH_FOR_LAN", default, skip_serializing_if = "Option::is_none")]
    pub path_for_lan: Option<String>,
    #[serde(rename = "REF_SEQ_NO", default, skip_serializing_if = "Option::is_none")]
    pub ref_seq_no: Option<RefSeqNo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentRecord {
    pub fn new(document_no: &str, description: &str, related_category: &str) -> Self {
        Self {
            document_no: Some(document_no.to_string()),
            description: Some(description.to_string()),
            related_category: Some(related_category.to_string()),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path_for_lan: &str) -> Self {
        self.path_for_lan = Some(path_for_lan.to_string());
        self
    }

    pub fn belongs_to(&self, category_name: &str) -> bool {
        self.related_category.as_deref() == Some(category_name)
    }

    /// Ruta del documento: `PATH_FOR_LAN` o `DOC_RELATED_CATEGORY/`.
    /// Sin ninguno de los dos el documento no cuelga de ningún nodo.
    pub fn lan_path(&self) -> Option<String> {
        match (self.path_for_lan.as_deref(), self.related_category.as_deref()) {
            (Some(path), _) if !path.is_empty() => Some(path.to_string()),
            (_, Some(category)) => Some(format!("{category}/")),
            _ => None,
        }
    }

    /// Coincidencia de búsqueda sobre número y descripción; `needle` ya
    /// viene en minúsculas.
    pub fn matches_text(&self, needle: &str) -> bool {
        [self.document_no.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_defaults_module_and_path() {
        let record: CategoryRecord = serde_json::from_value(json!({
            "MODULE_NAME": "  ",
            "CATEGORY_NAME": "Contracts",
            "DISPLAY_NAME": "Contratos"
        }))
        .unwrap();

        assert_eq!(record.module(), DEFAULT_MODULE);
        assert_eq!(record.lan_path(), "Contracts/");
        assert_eq!(record.extra.get("DISPLAY_NAME"), Some(&json!("Contratos")));
    }

    #[test]
    fn empty_path_falls_back_to_category_name() {
        let record = CategoryRecord::new("HR", "Policies", Some(""));
        assert_eq!(record.lan_path(), "Policies/");
    }

    #[test]
    fn segment_copy_overrides_name_and_path() {
        let record = CategoryRecord::new("Finance", "Invoices", Some("Invoices/2024/"));
        let copy = record.for_segment("2024", "Invoices/2024/");
        assert_eq!(copy.category_name, "2024");
        assert_eq!(copy.path_for_lan.as_deref(), Some("Invoices/2024/"));
        assert_eq!(copy.module(), "Finance");
    }

    #[test]
    fn ref_seq_no_accepts_text_and_numbers() {
        let numeric: DocumentRecord = serde_json::from_value(json!({ "REF_SEQ_NO": 42 })).unwrap();
        let text: DocumentRecord = serde_json::from_value(json!({ "REF_SEQ_NO": "42" })).unwrap();

        assert_eq!(numeric.ref_seq_no.unwrap().to_string(), "42");
        assert_eq!(text.ref_seq_no.unwrap().to_string(), "42");
    }

    #[test]
    fn document_path_fallbacks() {
        let by_category = DocumentRecord::new("D-1", "", "Leads");
        assert_eq!(by_category.lan_path().as_deref(), Some("Leads/"));

        let by_path = DocumentRecord::new("D-2", "", "Leads").with_path("Sales/Leads/");
        assert_eq!(by_path.lan_path().as_deref(), Some("Sales/Leads/"));

        assert_eq!(DocumentRecord::default().lan_path(), None);
    }

    #[test]
    fn text_match_is_case_insensitive() {
        let doc = DocumentRecord::new("DOC-99", "Leave Policy", "Policies");
        assert!(doc.matches_text("leave"));
        assert!(doc.matches_text("doc-9"));
        assert!(!doc.matches_text("invoice"));
    }

    #[test]
    fn unknown_document_columns_are_preserved() {
        let doc: DocumentRecord = serde_json::from_value(json!({
            "DOCUMENT_NO": "A-1",
            "DOC_EXT": "pdf",
            "CREATED_BY": "ana"
        }))
        .unwrap();

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["DOC_EXT"], json!("pdf"));
        assert_eq!(back["CREATED_BY"], json!("ana"));
    }
}
