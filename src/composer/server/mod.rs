// SPDX-License-Identifier: MIT

//! HTTP surface for the web editor
//!
//! The editor posts its current graph on every change for a live preview,
//! and posts it again to save the compiled document.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::fs;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::composer::config::ComposerConfig;
use crate::composer::workflow::builder::{Builder, Preview};
use crate::composer::workflow::types::GraphDocument;
use crate::error::{ComposerError, WorkflowError};

#[derive(Clone)]
pub struct AppState {
    config: Arc<ComposerConfig>,
    builder: Arc<Builder>,
}

impl AppState {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            config: Arc::new(config),
            builder: Arc::new(Builder::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/workflows/preview", post(preview_workflow))
        .route("/api/workflows/save", post(save_workflow))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(config: ComposerConfig) -> Result<(), ComposerError> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Error response: a status plus a JSON body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl<E> From<E> for ApiError
where
    E: Into<ComposerError>,
{
    fn from(err: E) -> Self {
        match err.into() {
            ComposerError::Workflow(WorkflowError::InvalidGraph(validation)) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: json!({ "validation": validation }),
            },
            ComposerError::Workflow(e) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: json!({ "error": e.to_string() }),
            },
            other => {
                log::error!("Request failed: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "error": other.to_string() }),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct SavedWorkflow {
    pub path: String,
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn preview_workflow(
    State(state): State<AppState>,
    Json(doc): Json<GraphDocument>,
) -> Result<Json<Preview>, ApiError> {
    let preview = state.builder.preview(&doc.metadata, &doc.graph)?;
    Ok(Json(preview))
}

async fn save_workflow(
    State(state): State<AppState>,
    Json(doc): Json<GraphDocument>,
) -> Result<Json<SavedWorkflow>, ApiError> {
    let text = state.builder.render(&doc.metadata, &doc.graph)?;

    fs::create_dir_all(&state.config.output_dir).await?;
    let path = state
        .config
        .output_dir
        .join(format!("workflow-{}.json", Uuid::new_v4()));
    fs::write(&path, text).await?;

    log::info!("Saved workflow document to {}", path.display());
    Ok(Json(SavedWorkflow {
        path: path.display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::workflow::document::{WorkflowDocument, WorkflowMetadata};
    use crate::composer::workflow::graph::{Edge, Node, StepMode, WorkflowGraph};

    fn state_in(dir: &std::path::Path) -> AppState {
        AppState::new(ComposerConfig {
            output_dir: dir.to_path_buf(),
            ..Default::default()
        })
    }

    fn chain_doc() -> GraphDocument {
        GraphDocument {
            metadata: WorkflowMetadata {
                workflow_name: Some("saved".to_string()),
                ..Default::default()
            },
            graph: WorkflowGraph::new(
                vec![
                    Node::start("start"),
                    Node::agent("a1", "Agent1"),
                    Node::end("end"),
                ],
                vec![Edge::connect("start", "a1"), Edge::connect("a1", "end")],
            ),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_preview_valid_graph() {
        let dir = tempfile::tempdir().unwrap();
        let Json(preview) = preview_workflow(State(state_in(dir.path())), Json(chain_doc()))
            .await
            .unwrap();

        assert!(preview.validation.is_valid);
        let document = preview.document.unwrap();
        assert_eq!(document.workflow_name, "saved");
        assert_eq!(document.workflow_steps[0].agents, vec!["Agent1"]);
    }

    #[tokio::test]
    async fn test_preview_empty_group_still_previews() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = chain_doc();
        doc.graph.nodes[1] = Node::step_group("a1", "New group", StepMode::Parallel, vec![]);

        let Json(preview) = preview_workflow(State(state_in(dir.path())), Json(doc))
            .await
            .unwrap();

        assert!(preview.validation.is_valid);
        assert_eq!(
            preview.step_group_error.as_deref(),
            Some("Step group 'New group' has no agents")
        );
        assert!(preview.document.is_none());
    }

    #[tokio::test]
    async fn test_preview_reports_issues() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = chain_doc();
        doc.graph.nodes.retain(|n| n.id != "end");

        let Json(preview) = preview_workflow(State(state_in(dir.path())), Json(doc))
            .await
            .unwrap();

        assert!(!preview.validation.is_valid);
        assert_eq!(preview.validation.messages(), vec!["End node is required"]);
        assert!(preview.document.is_none());
    }

    #[tokio::test]
    async fn test_save_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let Json(saved) = save_workflow(State(state_in(dir.path())), Json(chain_doc()))
            .await
            .unwrap();

        assert!(saved.path.ends_with(".json"));
        let text = std::fs::read_to_string(&saved.path).unwrap();
        let document: WorkflowDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(document.workflow_name, "saved");
        assert_eq!(document.workflow_model, "default");
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_graph() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = chain_doc();
        doc.graph.edges.clear();

        let err = save_workflow(State(state_in(dir.path())), Json(doc))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.body["validation"]["errors"],
            json!([
                "End node is not reachable from Start node",
                "2 disconnected nodes found: Agent1, End"
            ])
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_io_error_maps_to_500() {
        let err = ApiError::from(std::io::Error::other("disk full"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body["error"], "disk full");
    }
}
