//! Estado derivado del explorador: snapshots de categorías y documentos,
//! árbol construido y árbol anotado.
//!
//! `annotate` sólo se recalcula cuando cambia alguno de los snapshots; las
//! búsquedas y el selector de módulo sólo vuelven a ejecutar el filtro.

use tracing::debug;

use crate::aggregate::{annotate, documents_for_category};
use crate::filter::{filter_annotated, ModuleFilter};
use crate::lookup::{documents_for_node, total_counts, unique_module_names, TotalCounts};
use crate::models::{CategoryRecord, DocumentRecord};
use crate::tree::{CategoryTree, NodeId};

#[derive(Debug, Clone, Default)]
pub struct CategoryTreeEngine {
    category_records: usize,
    documents: Vec<DocumentRecord>,
    tree: CategoryTree,
    annotated: CategoryTree,
}

impl CategoryTreeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sustituye el snapshot de categorías y reconstruye el árbol.
    pub fn replace_categories(&mut self, categories: &[CategoryRecord]) {
        self.category_records = categories.len();
        self.tree = CategoryTree::build(categories);
        self.annotated = annotate(&self.tree, &self.documents);
        debug!(
            "Árbol reconstruido: {} registros, {} nodos.",
            categories.len(),
            self.tree.len()
        );
    }

    /// Sustituye el snapshot de documentos; el árbol se conserva.
    pub fn replace_documents(&mut self, documents: Vec<DocumentRecord>) {
        self.documents = documents;
        self.annotated = annotate(&self.tree, &self.documents);
        debug!("Contadores recalculados para {} documentos.", self.documents.len());
    }

    pub fn category_records(&self) -> usize {
        self.category_records
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Árbol anotado sin filtrar.
    pub fn tree(&self) -> &CategoryTree {
        &self.annotated
    }

    pub fn view(&self, search_term: &str, selected_module: &ModuleFilter) -> CategoryTree {
        filter_annotated(&self.annotated, search_term, selected_module, &self.documents)
    }

    pub fn documents_for_category(&self, category_name: &str) -> Vec<&DocumentRecord> {
        documents_for_category(&self.documents, category_name)
    }

    /// `None` si el id no pertenece al árbol actual.
    pub fn documents_for_node(&self, id: &NodeId) -> Option<Vec<&DocumentRecord>> {
        self.annotated
            .find(id)
            .map(|node| documents_for_node(node, &self.documents))
    }

    pub fn total_counts(&self) -> TotalCounts {
        total_counts(&self.annotated, &self.documents)
    }

    pub fn unique_module_names(&self) -> Vec<String> {
        unique_module_names(&self.annotated)
    }
}
