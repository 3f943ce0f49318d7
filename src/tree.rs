//! Construcción del árbol Módulo → Categoría → Subcarpeta a partir de la
//! lista plana de categorías.
//!
//! Los nodos viven en un arena (`Vec<TreeNode>`) y se referencian por
//! índice. Un mapa por id compuesto `(ruta acumulada, módulo)` evita
//! duplicar segmentos compartidos.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::models::CategoryRecord;

pub type NodeIndex = usize;

/// Identificador estable de un nodo. Dos construcciones sobre los mismos
/// registros producen los mismos ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeId {
    Module { module: String },
    Category { path: String, module: String },
}

impl NodeId {
    pub fn module(module: &str) -> Self {
        NodeId::Module {
            module: module.to_string(),
        }
    }

    pub fn category(path: &str, module: &str) -> Self {
        NodeId::Category {
            path: path.to_string(),
            module: module.to_string(),
        }
    }

    pub fn module_name(&self) -> &str {
        match self {
            NodeId::Module { module } | NodeId::Category { module, .. } => module,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            NodeId::Module { .. } => None,
            NodeId::Category { path, .. } => Some(path),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Module { module } => write!(f, "module_{module}"),
            NodeId::Category { path, module } => write!(f, "category_{path}_{module}"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Module,
    Category,
    Subfolder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub children: Vec<NodeIndex>,
    pub document_count: usize,
    /// `None` sólo en los módulos.
    pub original: Option<CategoryRecord>,
}

impl TreeNode {
    pub fn kind(&self) -> NodeKind {
        match self.depth {
            0 => NodeKind::Module,
            1 => NodeKind::Category,
            _ => NodeKind::Subfolder,
        }
    }

    /// `CATEGORY_NAME` del registro de origen. En un nodo de categoría es
    /// el nombre contra el que se cuentan los documentos.
    pub fn base_category(&self) -> Option<&str> {
        self.original.as_ref().map(|record| record.category_name.as_str())
    }

    /// Ruta acumulada del nodo para la selección por prefijo.
    pub fn selection_path(&self) -> String {
        match &self.original {
            Some(record) => record.lan_path(),
            None => format!("{}/", self.name),
        }
    }
}

/// Árbol completo de módulos. Se reconstruye entero cada vez que cambia
/// la lista de categorías.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTree {
    nodes: Vec<TreeNode>,
    modules: Vec<NodeIndex>,
    index: HashMap<NodeId, NodeIndex>,
}

/// Vista anidada de un nodo, lista para serializar hacia el frontend.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub module: String,
    pub path: Option<String>,
    pub document_count: usize,
    pub original_data: Option<CategoryRecord>,
    pub children: Vec<NodeView>,
}

/// Divide una ruta LAN en segmentos, descartando los vacíos.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.trim().is_empty())
}

impl CategoryTree {
    /// Construye el árbol respetando el orden de aparición de módulos y
    /// categorías en `categories`.
    pub fn build(categories: &[CategoryRecord]) -> Self {
        let mut tree = Self::default();

        for record in categories {
            let module_name = record.module();
            let mut parent = tree.module_entry(module_name);
            let lan_path = record.lan_path();
            let mut current_path = String::new();

            for (position, segment) in path_segments(&lan_path).enumerate() {
                current_path.push_str(segment);
                current_path.push('/');
                let id = NodeId::category(&current_path, module_name);

                parent = match tree.index.get(&id) {
                    Some(&existing) => existing,
                    None => {
                        let original = if position == 0 {
                            record.clone()
                        } else {
                            record.for_segment(segment, &current_path)
                        };
                        let depth = tree.nodes[parent].depth + 1;
                        tree.push_child(
                            parent,
                            TreeNode {
                                id,
                                name: segment.to_string(),
                                depth,
                                children: Vec::new(),
                                document_count: 0,
                                original: Some(original),
                            },
                        )
                    }
                };
            }
        }

        tree
    }

    fn module_entry(&mut self, module_name: &str) -> NodeIndex {
        let id = NodeId::module(module_name);
        if let Some(&existing) = self.index.get(&id) {
            return existing;
        }
        let idx = self.push_node(TreeNode {
            id,
            name: module_name.to_string(),
            depth: 0,
            children: Vec::new(),
            document_count: 0,
            original: None,
        });
        self.modules.push(idx);
        idx
    }

    fn push_node(&mut self, node: TreeNode) -> NodeIndex {
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    fn push_child(&mut self, parent: NodeIndex, node: TreeNode) -> NodeIndex {
        let idx = self.push_node(node);
        self.nodes[parent].children.push(idx);
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> &TreeNode {
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut TreeNode {
        &mut self.nodes[idx]
    }

    pub fn module_indices(&self) -> &[NodeIndex] {
        &self.modules
    }

    pub fn modules(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.modules.iter().map(|&idx| &self.nodes[idx])
    }

    pub fn children<'a>(&'a self, node: &'a TreeNode) -> impl Iterator<Item = &'a TreeNode> + 'a {
        node.children.iter().map(|&idx| &self.nodes[idx])
    }

    pub fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Copia en un árbol nuevo los módulos indicados, conservando de cada
    /// uno sólo las categorías elegidas (con todo su subárbol).
    pub(crate) fn project(&self, selection: &[(NodeIndex, Vec<NodeIndex>)]) -> CategoryTree {
        let mut projected = CategoryTree::default();
        for (module_idx, categories) in selection {
            let module = &self.nodes[*module_idx];
            let new_module = projected.push_node(TreeNode {
                children: Vec::new(),
                ..module.clone()
            });
            projected.modules.push(new_module);
            for &category in categories {
                self.copy_subtree(category, new_module, &mut projected);
            }
        }
        projected
    }

    fn copy_subtree(&self, idx: NodeIndex, parent: NodeIndex, into: &mut CategoryTree) {
        let node = &self.nodes[idx];
        let copied = into.push_child(
            parent,
            TreeNode {
                children: Vec::new(),
                ..node.clone()
            },
        );
        for &child in &node.children {
            self.copy_subtree(child, copied, into);
        }
    }

    pub fn to_view(&self) -> Vec<NodeView> {
        self.modules.iter().map(|&idx| self.view_of(idx)).collect()
    }

    fn view_of(&self, idx: NodeIndex) -> NodeView {
        let node = &self.nodes[idx];
        NodeView {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind(),
            module: node.id.module_name().to_string(),
            path: node.id.path().map(str::to_string),
            document_count: node.document_count,
            original_data: node.original.clone(),
            children: node.children.iter().map(|&child| self.view_of(child)).collect(),
        }
    }
}
