//! Consultas auxiliares para el panel de documentos y el resumen.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::DocumentRecord;
use crate::tree::{CategoryTree, TreeNode};

/// Totales mostrados en la cabecera del explorador.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TotalCounts {
    pub module_count: usize,
    pub category_count: usize,
    pub document_count: usize,
}

/// Documentos bajo la ruta acumulada del nodo, incluidas sus subcarpetas.
/// La comparación es por prefijo de ruta, no por nombre de categoría.
pub fn documents_for_node<'a>(
    node: &TreeNode,
    documents: &'a [DocumentRecord],
) -> Vec<&'a DocumentRecord> {
    let prefix = node.selection_path();
    documents
        .iter()
        .filter(|doc| doc.lan_path().is_some_and(|path| path.starts_with(&prefix)))
        .collect()
}

/// `category_count` es el número de categorías de primer nivel;
/// `document_count` el tamaño del snapshot sin filtrar.
pub fn total_counts(annotated: &CategoryTree, documents: &[DocumentRecord]) -> TotalCounts {
    TotalCounts {
        module_count: annotated.module_indices().len(),
        category_count: annotated.modules().map(|module| module.children.len()).sum(),
        document_count: documents.len(),
    }
}

/// Nombres de módulo distintos, en orden de aparición.
pub fn unique_module_names(tree: &CategoryTree) -> Vec<String> {
    let mut seen = HashSet::new();
    tree.modules()
        .filter(|module| seen.insert(module.name.as_str()))
        .map(|module| module.name.clone())
        .collect()
}
