//! Recuento de documentos por categoría y por módulo.

use std::collections::HashMap;

use crate::models::DocumentRecord;
use crate::tree::CategoryTree;

/// Documentos cuyo `DOC_RELATED_CATEGORY` coincide exactamente con
/// `category_name`.
pub fn documents_for_category<'a>(
    documents: &'a [DocumentRecord],
    category_name: &str,
) -> Vec<&'a DocumentRecord> {
    documents
        .iter()
        .filter(|doc| doc.belongs_to(category_name))
        .collect()
}

/// Devuelve una copia del árbol con los contadores calculados.
///
/// Sólo las categorías (hijos directos de un módulo) se cuentan, por
/// coincidencia exacta del nombre de categoría de origen; el módulo suma
/// a sus hijos. Las subcarpetas quedan a cero.
pub fn annotate(tree: &CategoryTree, documents: &[DocumentRecord]) -> CategoryTree {
    let mut per_category: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        if let Some(category) = doc.related_category.as_deref() {
            *per_category.entry(category).or_default() += 1;
        }
    }

    let mut annotated = tree.clone();
    for &module_idx in tree.module_indices() {
        let mut total = 0;
        for &category_idx in &tree.node(module_idx).children {
            let count = tree
                .node(category_idx)
                .base_category()
                .and_then(|name| per_category.get(name).copied())
                .unwrap_or(0);
            annotated.node_mut(category_idx).document_count = count;
            total += count;
        }
        annotated.node_mut(module_idx).document_count = total;
    }
    annotated
}
