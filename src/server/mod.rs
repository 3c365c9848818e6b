//! Development server rendering documentation pages per request

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::generator::PageRenderer;
use crate::{Docs, DocsError};

/// Server state
struct ServerState {
    docs: Docs,
    pages: PageRenderer,
}

impl ServerState {
    fn index(&self) -> Result<String> {
        let documents = self.docs.loader().list_documents()?;
        self.pages.index_page(&documents)
    }

    fn document(&self, slug: &str) -> Result<String> {
        let document = self.docs.loader().load_document(slug)?;
        self.pages.document_page(&document)
    }

    fn not_found(&self) -> Response {
        match self.pages.not_found_page() {
            Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render 404 page: {}", e);
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
        }
    }

    fn error_response(&self, err: anyhow::Error) -> Response {
        match err.downcast_ref::<DocsError>() {
            Some(docs_err) if docs_err.is_not_found() => {
                tracing::debug!("{}", docs_err);
                self.not_found()
            }
            _ => {
                tracing::error!("{:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

/// Build the router for a site
pub fn router(docs: &Docs) -> Result<Router> {
    let state = Arc::new(ServerState {
        docs: docs.clone(),
        pages: PageRenderer::new(docs)?,
    });

    let index_route = docs.config.url_for(&docs.config.docs_path);
    let document_route = docs
        .config
        .url_for(&format!("{}/:slug", docs.config.structure_path.trim_matches('/')));

    let app = Router::new()
        .route(&index_route, get(index_handler))
        .route(&format!("{}/", index_route), get(index_handler))
        .route(&document_route, get(document_handler))
        .route(&format!("{}/", document_route), get(document_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the server
pub async fn start(docs: &Docs, ip: &str, port: u16) -> Result<()> {
    let app = router(docs)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Server running at http://{}:{}{}",
        ip,
        port,
        docs.config.docs_url()
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let worker = state.clone();
    match tokio::task::spawn_blocking(move || worker.index()).await {
        Ok(Ok(page)) => Html(page).into_response(),
        Ok(Err(e)) => state.error_response(e),
        Err(e) => state.error_response(e.into()),
    }
}

async fn document_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let worker = state.clone();
    match tokio::task::spawn_blocking(move || worker.document(&slug)).await {
        Ok(Ok(page)) => Html(page).into_response(),
        Ok(Err(e)) => state.error_response(e),
        Err(e) => state.error_response(e.into()),
    }
}

async fn fallback_handler(State(state): State<Arc<ServerState>>) -> Response {
    state.not_found()
}
