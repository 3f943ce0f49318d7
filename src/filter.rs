//! Filtrado del árbol por módulo y por texto libre.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::aggregate::{annotate, documents_for_category};
use crate::models::DocumentRecord;
use crate::tree::{CategoryTree, NodeIndex, TreeNode};

/// Valor centinela del selector de módulos.
pub const ALL_MODULES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModuleFilter {
    #[default]
    All,
    Only(String),
}

impl ModuleFilter {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_MODULES {
            ModuleFilter::All
        } else {
            ModuleFilter::Only(raw.to_string())
        }
    }

    pub fn admits(&self, module_name: &str) -> bool {
        match self {
            ModuleFilter::All => true,
            ModuleFilter::Only(name) => name == module_name,
        }
    }
}

impl Serialize for ModuleFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModuleFilter::All => serializer.serialize_str(ALL_MODULES),
            ModuleFilter::Only(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for ModuleFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ModuleFilter::parse(&raw))
    }
}

/// Anota el árbol y aplica el filtro. Nunca modifica la entrada.
pub fn filter(
    tree: &CategoryTree,
    search_term: &str,
    selected_module: &ModuleFilter,
    documents: &[DocumentRecord],
) -> CategoryTree {
    let annotated = annotate(tree, documents);
    filter_annotated(&annotated, search_term, selected_module, documents)
}

/// Igual que [`filter`] pero sobre un árbol ya anotado.
pub fn filter_annotated(
    annotated: &CategoryTree,
    search_term: &str,
    selected_module: &ModuleFilter,
    documents: &[DocumentRecord],
) -> CategoryTree {
    let searching = !search_term.trim().is_empty();
    let needle = search_term.to_lowercase();

    let mut selection: Vec<(NodeIndex, Vec<NodeIndex>)> = Vec::new();
    for &module_idx in annotated.module_indices() {
        let module = annotated.node(module_idx);
        if !selected_module.admits(&module.name) {
            continue;
        }

        let categories: Vec<NodeIndex> = module
            .children
            .iter()
            .copied()
            .filter(|&idx| {
                !searching || category_matches(annotated.node(idx), &needle, documents)
            })
            .collect();

        if searching && categories.is_empty() {
            continue;
        }
        selection.push((module_idx, categories));
    }

    annotated.project(&selection)
}

fn category_matches(category: &TreeNode, needle: &str, documents: &[DocumentRecord]) -> bool {
    if category.name.to_lowercase().contains(needle) {
        return true;
    }
    let Some(base) = category.base_category() else {
        return false;
    };
    base.to_lowercase().contains(needle)
        || documents_for_category(documents, base)
            .iter()
            .any(|doc| doc.matches_text(needle))
}
