//! HTTP service layer for the category tree.
//!
//! A thin axum shim over the two inbound operations: node info lookup and
//! subtree creation. All tree logic lives in [`crate::store`] and
//! [`crate::insert`]; this module only routes, serializes, and maps errors
//! onto status codes.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Json as ExtractJson, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::Error;
use crate::category::{Category, CategoryId, SubtreeSpec};
use crate::insert::SubtreeInserter;
use crate::store::TreeStore;

/// Node info response: a category plus its ancestor, child, and sibling sets.
#[derive(Debug, Serialize)]
pub struct NodeInfo {
    /// The requested category (id, name, parentId).
    #[serde(flatten)]
    pub category: Category,
    /// Every transitive ancestor, in no guaranteed order.
    pub parents: Vec<Category>,
    /// Direct children only.
    pub children: Vec<Category>,
    /// Categories sharing the same parent, excluding the category itself.
    pub siblings: Vec<Category>,
}

/// Assemble the full node-info record for one category.
pub async fn node_info(store: &TreeStore, id: &CategoryId) -> crate::Result<NodeInfo> {
    let category = store.get(id).await?;
    let parents = store.get_ancestors(id).await?;
    let children = store.get_children(id).await?;
    let siblings = store.get_siblings(id).await?;
    Ok(NodeInfo {
        category,
        parents,
        children,
        siblings,
    })
}

/// Build the service router over a shared store.
pub fn router(store: Arc<TreeStore>) -> Router {
    Router::new()
        .route("/api/v0/categories", post(create_subtree))
        .route("/api/v0/categories/{id}", get(get_category))
        .route("/health", get(health))
        .with_state(store)
}

/// Handler for `GET /health`.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Handler for `GET /api/v0/categories/{id}`.
async fn get_category(State(store): State<Arc<TreeStore>>, Path(id): Path<String>) -> Response {
    let id = CategoryId::new(id);
    match node_info(&store, &id).await {
        Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Handler for `POST /api/v0/categories`.
///
/// The body is a nested [`SubtreeSpec`]; a body that does not deserialize
/// (including a non-list `children` value) is as much a bad request as a
/// specification that fails validation.
async fn create_subtree(
    State(store): State<Arc<TreeStore>>,
    payload: Result<ExtractJson<SubtreeSpec>, JsonRejection>,
) -> Response {
    let ExtractJson(spec) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };

    match SubtreeInserter::new(&store).insert(&spec).await {
        Ok(root) => (StatusCode::CREATED, Json(root)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Map library errors onto HTTP statuses: 404 for unknown ids, 400 for both
/// invalid specifications and duplicate names, 500 for storage failures.
fn error_response(e: Error) -> Response {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_invalid_spec() || e.is_duplicate_name() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(error = %e, "storage failure");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    json_error(status, &e.to_string())
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
