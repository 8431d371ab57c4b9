//! Local server for `setup.html`: static files plus the small file API the
//! page uses to write integration files.

use super::activate::{remove_other_integration_files, IntegrationFile};
use crate::common::Context;
use crate::errors::CliError;
use crate::interrupt::CleanupScope;
use crate::setup_page::PageError;
use anyhow::Context as _;
use arf_config::FrameworkLayout;
use arf_logger as logger;
use arf_manifest::backup::write_with_backup;
use arf_manifest::{PluginBundle, PluginManifest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

const ALLOWED_EXTENSIONS: &[&str] = &[".md", ".json"];

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on (127.0.0.1 only)
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

#[derive(Clone)]
pub struct ServerState {
    layout: Arc<FrameworkLayout>,
    shutdown: Arc<Notify>,
}

impl ServerState {
    pub fn new(layout: FrameworkLayout) -> Self {
        Self {
            layout: Arc::new(layout),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Registered bundle directories that exist, re-read per request so
    /// bundles scaffolded while the server runs are accepted.
    fn plugin_entries(&self) -> Vec<String> {
        match PluginManifest::load_from_path(&self.layout.manifest_path()) {
            Ok(manifest) => manifest
                .plugins
                .into_iter()
                .map(|p| p.trim_end_matches('/').to_string())
                .filter(|p| self.layout.root().join(p).is_dir())
                .collect(),
            Err(e) => {
                logger::debug(&format!("No registered plugins: {}", e));
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_files: Option<Vec<String>>,
}

impl ApiResponse {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            cleaned_files: None,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiResponse {
            success: false,
            message: self.to_string(),
            cleaned_files: None,
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFileRequest {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CleanupRequest {
    #[serde(default)]
    pub keep_file: String,
}

/// Resolve a client-supplied file name to a path at the root or directly
/// inside a registered plugin directory.
pub fn resolve_target(root: &Path, plugin_entries: &[String], filename: &str) -> Result<PathBuf, String> {
    if !ALLOWED_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
        return Err("Invalid file type".to_string());
    }

    let relative = Path::new(filename);
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err("Invalid file location".to_string()),
        }
    }
    let Some(name) = parts.pop() else {
        return Err("Invalid file location".to_string());
    };

    if parts.is_empty() {
        return Ok(root.join(name));
    }
    let parent = parts.join("/");
    if plugin_entries.iter().any(|entry| *entry == parent) {
        Ok(root.join(parent).join(name))
    } else {
        Err("Invalid file location".to_string())
    }
}

pub async fn create_file(
    State(state): State<ServerState>,
    Json(request): Json<CreateFileRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    if request.filename.is_empty() || request.content.is_empty() {
        return Err(ApiError::BadRequest("Missing filename or content".to_string()));
    }
    let target = resolve_target(state.layout.root(), &state.plugin_entries(), &request.filename)
        .map_err(ApiError::BadRequest)?;

    write_with_backup(&target, &request.content)
        .map_err(|e| ApiError::Internal(format!("File creation failed: {}", e)))?;
    logger::info(&format!("Wrote {}", target.display()));
    Ok(ApiResponse::ok(format!(
        "File {} created successfully",
        request.filename
    )))
}

pub async fn cleanup_files(
    State(state): State<ServerState>,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    if request.keep_file.is_empty() {
        return Err(ApiError::BadRequest("Missing keep_file parameter".to_string()));
    }
    let keep = IntegrationFile::from_file_name(&request.keep_file).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown integration file '{}'", request.keep_file))
    })?;

    let root = state.layout.root();
    let mut dirs = vec![root.to_path_buf()];
    dirs.extend(
        state
            .plugin_entries()
            .iter()
            .map(|entry| PluginBundle::new(root, entry).dir().to_path_buf()),
    );

    let mut cleaned = Vec::new();
    for dir in dirs {
        for result in remove_other_integration_files(&dir, keep) {
            let path = result.map_err(|(path, e)| {
                ApiError::Internal(format!("Cleanup failed for {}: {}", path.display(), e))
            })?;
            let shown = path.strip_prefix(root).unwrap_or(&path);
            cleaned.push(shown.to_string_lossy().replace('\\', "/"));
        }
    }

    Ok(Json(ApiResponse {
        success: true,
        message: format!("Cleaned up {} conflicting files", cleaned.len()),
        cleaned_files: Some(cleaned),
    }))
}

pub async fn shutdown(State(state): State<ServerState>) -> Json<ApiResponse> {
    state.shutdown.notify_one();
    ApiResponse::ok("Server shutting down...")
}

pub fn router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let files = ServeDir::new(state.layout.root());

    Router::new()
        .route("/api/create-file", post(create_file))
        .route("/api/cleanup-files", post(cleanup_files))
        .route("/api/shutdown", post(shutdown))
        .fallback_service(files)
        .with_state(state)
        .layer(cors)
}

pub fn handle_serve(ctx: &Context, args: &ServeArgs) -> Result<(), CliError> {
    let page = ctx.layout.setup_page();
    if !page.is_file() {
        return Err(PageError::NotFound(page).into());
    }

    // Ctrl+C stops the server gracefully instead of exiting the process.
    let _scope = CleanupScope::enter();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(ctx.layout.clone(), args.port))?;
    Ok(())
}

async fn serve(layout: FrameworkLayout, port: u16) -> anyhow::Result<()> {
    let state = ServerState::new(layout);
    let shutdown_notify = state.shutdown.clone();
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    logger::success(&format!("Setup page at http://{}/setup.html", addr));
    logger::info("Press Ctrl+C to stop");

    let shutdown_signal = async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            () = shutdown_notify.notified() => {},
        }
        tracing::info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server failed")?;

    logger::info("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn framework(root: &Path) -> Result<ServerState, std::io::Error> {
        fs::create_dir_all(root.join("modules/memory-rules"))?;
        fs::create_dir_all(root.join("modules/unregistered"))?;
        fs::write(
            root.join("plugins.json"),
            r#"{"plugins": ["modules/memory-rules"]}"#,
        )?;
        Ok(ServerState::new(FrameworkLayout::new(root)))
    }

    #[test]
    fn test_resolve_target_rules() {
        let root = Path::new("/fw");
        let entries = vec!["modules/memory-rules".to_string()];

        assert_eq!(
            resolve_target(root, &entries, "AGENTS.md"),
            Ok(PathBuf::from("/fw/AGENTS.md"))
        );
        assert_eq!(
            resolve_target(root, &entries, "modules/memory-rules/settings.json"),
            Ok(PathBuf::from("/fw/modules/memory-rules/settings.json"))
        );
        assert!(resolve_target(root, &entries, "setup.html").is_err());
        assert!(resolve_target(root, &entries, "../AGENTS.md").is_err());
        assert!(resolve_target(root, &entries, "/etc/AGENTS.md").is_err());
        assert!(resolve_target(root, &entries, "modules/other/AGENTS.md").is_err());
        assert!(resolve_target(root, &entries, "modules/memory-rules/deep/AGENTS.md").is_err());
    }

    #[tokio::test]
    async fn test_create_file_backs_up_existing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let state = framework(dir.path())?;
        let target = dir.path().join("modules/memory-rules/AGENTS.md");
        fs::write(&target, "old")?;

        let response = create_file(
            State(state),
            Json(CreateFileRequest {
                filename: "modules/memory-rules/AGENTS.md".to_string(),
                content: "new".to_string(),
            }),
        )
        .await
        .map_err(|e| e.to_string())?;

        assert!(response.0.success);
        assert_eq!(fs::read_to_string(&target)?, "new");
        assert_eq!(
            fs::read_to_string(dir.path().join("modules/memory-rules/AGENTS.md.backup"))?,
            "old"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_file_rejects_unregistered_dir() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let state = framework(dir.path())?;
        let result = create_file(
            State(state),
            Json(CreateFileRequest {
                filename: "modules/unregistered/AGENTS.md".to_string(),
                content: "x".to_string(),
            }),
        )
        .await;

        let Err(err) = result else {
            return Err("expected a rejection".into());
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("modules/unregistered/AGENTS.md").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_cleanup_lists_removed_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let state = framework(dir.path())?;
        fs::write(dir.path().join("GEMINI.md"), "g")?;
        fs::write(dir.path().join("CLAUDE.md"), "keep")?;
        fs::write(dir.path().join("modules/memory-rules/AGENTS.md"), "a")?;
        fs::write(dir.path().join("modules/unregistered/AGENTS.md"), "untouched")?;

        let response = cleanup_files(
            State(state),
            Json(CleanupRequest {
                keep_file: "CLAUDE.md".to_string(),
            }),
        )
        .await
        .map_err(|e| e.to_string())?;

        assert_eq!(
            response.0.cleaned_files,
            Some(vec![
                "GEMINI.md".to_string(),
                "modules/memory-rules/AGENTS.md".to_string()
            ])
        );
        assert!(dir.path().join("CLAUDE.md").exists());
        assert!(dir.path().join("GEMINI.md.backup").exists());
        assert!(dir.path().join("modules/unregistered/AGENTS.md").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_notifies() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let state = framework(dir.path())?;
        let notify = state.shutdown.clone();

        let response = shutdown(State(state)).await;
        assert!(response.0.success);
        // The stored permit completes immediately.
        notify.notified().await;
        Ok(())
    }

    #[test]
    fn test_serve_requires_setup_page() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let result = handle_serve(&Context::for_root(dir.path()), &ServeArgs { port: 0 });
        assert!(matches!(result, Err(CliError::Page(PageError::NotFound(_)))));
        Ok(())
    }
}
