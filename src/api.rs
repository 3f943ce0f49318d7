use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    app_state::{AppState, Status},
    filter::ModuleFilter,
    lookup::TotalCounts,
    models::{CategoryRecord, DocumentRecord, RefSeqNo},
    rights::{self, DocumentRight, Permission},
    session::{CachedPermissions, UserPermissions},
    snapshot,
    tree::{NodeId, NodeView},
};

type ApiError = (StatusCode, Json<Value>);

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize, Default)]
pub struct TreeQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    module: ModuleFilter,
}

#[derive(Serialize)]
pub struct TreeResponse {
    modules: Vec<NodeView>,
    totals: TotalCounts,
    module_names: Vec<String>,
}

#[derive(Deserialize)]
pub struct NodeQuery {
    module: String,
    path: Option<String>,
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    name: String,
}

#[derive(Serialize)]
pub struct SnapshotResponse {
    records: usize,
}

#[derive(Deserialize)]
pub struct RightsCheckPayload {
    /// Respuesta cruda de `SYNM_DMS_DOC_USER_RIGHTS`.
    rights: Value,
    #[serde(default)]
    ref_seq_no: Option<RefSeqNo>,
    #[serde(default)]
    user: String,
    permission: Permission,
}

#[derive(Serialize)]
pub struct RightsCheckResponse {
    has_permission: bool,
    error: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    user: String,
    needs_refresh: bool,
    entry: Option<CachedPermissions>,
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/categories", post(load_categories_handler))
        .route("/api/documents", post(load_documents_handler))
        .route("/api/tree", get(tree_handler))
        .route("/api/node-documents", get(node_documents_handler))
        .route("/api/category-documents", get(category_documents_handler))
        .route("/api/summary", get(summary_handler))
        .route("/api/modules", get(modules_handler))
        .route("/api/rights/check", post(rights_check_handler))
        .route(
            "/api/session/:user",
            get(session_get_handler)
                .put(session_put_handler)
                .delete(session_delete_handler),
        )
        .route("/api/status", get(status_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers de snapshots ---

#[axum::debug_handler]
async fn load_categories_handler(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<SnapshotResponse> {
    let categories: Vec<CategoryRecord> = snapshot::normalize(payload, "categorías");
    let records = categories.len();
    state.engine().replace_categories(&categories);

    let mut status = state.status();
    status.category_records = records;
    status.message = format!("Snapshot de categorías actualizado ({records} registros).");
    status.last_update = Some(Utc::now().to_rfc3339());
    info!("{}", status.message);

    Json(SnapshotResponse { records })
}

#[axum::debug_handler]
async fn load_documents_handler(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<SnapshotResponse> {
    let documents: Vec<DocumentRecord> = snapshot::normalize(payload, "documentos");
    let records = documents.len();
    state.engine().replace_documents(documents);

    let mut status = state.status();
    status.document_records = records;
    status.message = format!("Snapshot de documentos actualizado ({records} registros).");
    status.last_update = Some(Utc::now().to_rfc3339());
    info!("{}", status.message);

    Json(SnapshotResponse { records })
}

// --- Handlers del árbol ---

#[axum::debug_handler]
async fn tree_handler(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> Json<TreeResponse> {
    let engine = state.engine();
    let filtered = engine.view(&query.search, &query.module);
    Json(TreeResponse {
        modules: filtered.to_view(),
        totals: engine.total_counts(),
        module_names: engine.unique_module_names(),
    })
}

#[axum::debug_handler]
async fn node_documents_handler(
    State(state): State<AppState>,
    Query(query): Query<NodeQuery>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    let id = match query.path.filter(|path| !path.is_empty()) {
        Some(path) => NodeId::category(&path, &query.module),
        None => NodeId::module(&query.module),
    };

    let engine = state.engine();
    match engine.documents_for_node(&id) {
        Some(documents) => Ok(Json(documents.into_iter().cloned().collect())),
        None => {
            warn!("Nodo desconocido solicitado: {id}");
            Err((
                StatusCode::NOT_FOUND,
                Json(json!({"error": format!("No existe el nodo {id}")})),
            ))
        }
    }
}

#[axum::debug_handler]
async fn category_documents_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<DocumentRecord>> {
    let engine = state.engine();
    Json(
        engine
            .documents_for_category(&query.name)
            .into_iter()
            .cloned()
            .collect(),
    )
}

#[axum::debug_handler]
async fn summary_handler(State(state): State<AppState>) -> Json<TotalCounts> {
    Json(state.engine().total_counts())
}

#[axum::debug_handler]
async fn modules_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine().unique_module_names())
}

// --- Permisos ---

#[axum::debug_handler]
async fn rights_check_handler(
    Json(payload): Json<RightsCheckPayload>,
) -> Json<RightsCheckResponse> {
    let rows: Vec<DocumentRight> = snapshot::normalize(payload.rights, "permisos");
    let ref_seq_no = payload
        .ref_seq_no
        .map(|r| r.to_string())
        .unwrap_or_default();

    let response = match rights::check_permission(
        &rows,
        &ref_seq_no,
        &payload.user,
        payload.permission,
        Utc::now(),
    ) {
        Ok(has_permission) => RightsCheckResponse {
            has_permission,
            error: None,
        },
        Err(e) => RightsCheckResponse {
            has_permission: false,
            error: Some(e.to_string()),
        },
    };
    Json(response)
}

#[axum::debug_handler]
async fn session_get_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Json<SessionResponse> {
    let sessions = state.sessions();
    Json(SessionResponse {
        needs_refresh: sessions.needs_refresh(&user, Utc::now()),
        entry: sessions.get(&user).cloned(),
        user,
    })
}

#[axum::debug_handler]
async fn session_put_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(permissions): Json<UserPermissions>,
) -> Json<SessionResponse> {
    let mut sessions = state.sessions();
    let entry = sessions.store(&user, permissions, Utc::now()).clone();
    info!("Permisos de sesión actualizados para {user}.");
    Json(SessionResponse {
        user,
        needs_refresh: false,
        entry: Some(entry),
    })
}

#[axum::debug_handler]
async fn session_delete_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Json<SessionResponse> {
    if state.sessions().remove(&user).is_some() {
        info!("Permisos de sesión invalidados para {user}.");
    }
    Json(SessionResponse {
        user,
        needs_refresh: true,
        entry: None,
    })
}

// --- Estado y Apagado ---

#[axum::debug_handler]
async fn status_handler(State(state): State<AppState>) -> Json<Status> {
    Json(state.status().clone())
}

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    if let Some(sender) = crate::app_state::lock(&state.shutdown_sender).take() {
        let _ = sender.send(());
    }
    StatusCode::OK
}
