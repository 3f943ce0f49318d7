use dms_category_browser::{
    aggregate::annotate,
    engine::CategoryTreeEngine,
    filter::{filter, ModuleFilter},
    lookup::{documents_for_node, total_counts, TotalCounts},
    models::{CategoryRecord, DocumentRecord},
    snapshot,
    tree::{CategoryTree, NodeId, NodeKind},
};
use serde_json::json;

fn service_categories() -> Vec<CategoryRecord> {
    snapshot::normalize(
        json!({ "data": [
            {
                "MODULE_NAME": "Finance",
                "CATEGORY_NAME": "Invoices",
                "PATH_FOR_LAN": "Finance/Invoices/2024/"
            },
            {
                "MODULE_NAME": "Finance",
                "CATEGORY_NAME": "Archive",
                "PATH_FOR_LAN": "Finance/InvoicesArchive/"
            },
            { "MODULE_NAME": "HR", "CATEGORY_NAME": "Policies", "PATH_FOR_LAN": null },
            { "MODULE_NAME": "", "CATEGORY_NAME": "Misc" },
            { "MODULE_NAME": "Sales", "CATEGORY_NAME": "Leads", "PATH_FOR_LAN": "Sales/Leads/" },
            { "MODULE_NAME": "Sales", "CATEGORY_NAME": "Leads", "PATH_FOR_LAN": "Sales/Leads/" }
        ]}),
        "categorías",
    )
}

fn service_documents() -> Vec<DocumentRecord> {
    snapshot::normalize(
        json!([
            {
                "DOCUMENT_NO": "INV-1",
                "DOCUMENT_DESCRIPTION": "Supplier",
                "DOC_RELATED_CATEGORY": "Invoices",
                "PATH_FOR_LAN": "Finance/Invoices/"
            },
            {
                "DOCUMENT_NO": "INV-2",
                "DOCUMENT_DESCRIPTION": "Customer",
                "DOC_RELATED_CATEGORY": "Invoices",
                "PATH_FOR_LAN": "Finance/Invoices/2024/"
            },
            {
                "DOCUMENT_NO": "ARC-1",
                "DOCUMENT_DESCRIPTION": "Old",
                "DOC_RELATED_CATEGORY": "Archive",
                "PATH_FOR_LAN": "Finance/InvoicesArchive/"
            },
            {
                "DOCUMENT_NO": "DOC-99",
                "DOCUMENT_DESCRIPTION": "Leave Policy",
                "DOC_RELATED_CATEGORY": "Policies",
                "REF_SEQ_NO": 99
            },
            {
                "DOCUMENT_NO": "L-1",
                "DOCUMENT_DESCRIPTION": "Lead",
                "DOC_RELATED_CATEGORY": "Leads",
                "PATH_FOR_LAN": "Sales/Leads/"
            }
        ]),
        "documentos",
    )
}

#[test]
fn full_pipeline_over_service_responses() {
    let mut engine = CategoryTreeEngine::new();
    engine.replace_categories(&service_categories());
    engine.replace_documents(service_documents());

    assert_eq!(
        engine.unique_module_names(),
        vec!["Finance", "HR", "Other Modules", "Sales"]
    );
    assert_eq!(
        engine.total_counts(),
        TotalCounts {
            module_count: 4,
            category_count: 4,
            document_count: 5,
        }
    );

    // Ambas categorías de Finance comparten el nodo base "Finance/", que
    // conserva el registro de "Invoices".
    let finance = engine.tree().find(&NodeId::module("Finance")).unwrap();
    assert_eq!(finance.document_count, 2);

    let leads_base = engine.tree().find(&NodeId::category("Sales/", "Sales")).unwrap();
    let leads: Vec<_> = engine.tree().children(leads_base).collect();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].kind(), NodeKind::Subfolder);
}

#[test]
fn count_conservation_holds_for_every_module() {
    let tree = CategoryTree::build(&service_categories());
    let annotated = annotate(&tree, &service_documents());
    for module in annotated.modules() {
        let sum: usize = annotated.children(module).map(|c| c.document_count).sum();
        assert_eq!(module.document_count, sum, "módulo {}", module.name);
    }
}

#[test]
fn path_prefix_selection_excludes_sibling_prefixes() {
    let tree = CategoryTree::build(&service_categories());
    let docs = service_documents();
    let invoices = tree
        .find(&NodeId::category("Finance/Invoices/", "Finance"))
        .unwrap();

    let numbers: Vec<_> = documents_for_node(invoices, &docs)
        .into_iter()
        .filter_map(|d| d.document_no.as_deref())
        .collect();
    assert_eq!(numbers, vec!["INV-1", "INV-2"]);
}

#[test]
fn module_isolation_keeps_all_children() {
    let categories = service_categories();
    let docs = service_documents();
    let tree = CategoryTree::build(&categories);

    let out = filter(&tree, "", &ModuleFilter::parse("Finance"), &docs);
    let modules: Vec<_> = out.modules().collect();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].name, "Finance");

    let original = tree.find(&NodeId::module("Finance")).unwrap();
    assert_eq!(modules[0].children.len(), original.children.len());
}

#[test]
fn search_through_document_description() {
    let tree = CategoryTree::build(&[CategoryRecord::new("HR", "Policies", None)]);
    let docs = vec![DocumentRecord::new("DOC-99", "Leave Policy", "Policies")];

    let out = filter(&tree, "leave", &ModuleFilter::All, &docs);
    let hr = out.find(&NodeId::module("HR")).unwrap();
    let children: Vec<_> = out.children(hr).map(|c| c.name.as_str()).collect();
    assert_eq!(children, vec!["Policies"]);
}

#[test]
fn empty_snapshot_scenario() {
    let tree = CategoryTree::build(&[]);
    assert!(tree.is_empty());
    assert_eq!(total_counts(&annotate(&tree, &[]), &[]), TotalCounts::default());
}

#[test]
fn rebuild_is_idempotent_across_engines() {
    let mut first = CategoryTreeEngine::new();
    let mut second = CategoryTreeEngine::new();
    first.replace_categories(&service_categories());
    second.replace_categories(&service_categories());
    assert_eq!(first.tree(), second.tree());
}
