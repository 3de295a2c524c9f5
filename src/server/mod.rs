//! Development server with request-time post assembly
//!
//! Generated files are served from the public directory. A post page that
//! is not on disk is assembled from the store on request and written out.
//! Requests arriving while that assembly runs get the loading page; a slug
//! the store does not know gets the not-found page with a 404 status and is
//! looked up again on the next request.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::generator::{post_output_path, Generator};
use crate::helpers::is_safe_slug;
use crate::pipeline::PostView;
use crate::store::ContentStore;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    store: Arc<dyn ContentStore>,
    renderer: TemplateRenderer,
    fallback: PostFallback,
}

/// Slugs whose fallback assembly is running
#[derive(Debug, Default)]
struct PostFallback {
    in_flight: Mutex<HashSet<String>>,
}

impl PostFallback {
    /// Returns false when another request is already assembling `slug`
    async fn claim(&self, slug: &str) -> bool {
        self.in_flight.lock().await.insert(slug.to_string())
    }

    async fn finish(&self, slug: &str) {
        self.in_flight.lock().await.remove(slug);
    }
}

/// Build the router serving `public_dir` with post fallback
fn router(state: Arc<ServerState>) -> Router {
    let public_dir = &state.blog.public_dir;
    let files = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(public_dir.join("404.html")));

    Router::new()
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(blog: &Blog, store: Arc<dyn ContentStore>, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState {
        blog: blog.clone(),
        store,
        renderer: TemplateRenderer::new(&blog.config)?,
        fallback: PostFallback::default(),
    });

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve a post page from disk, or fall back to assembling it
async fn post_handler(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    if !is_safe_slug(&slug) {
        return render(&state, &PostView::NotFound);
    }

    let page = state.blog.public_dir.join(post_output_path(&slug));
    if let Ok(html) = tokio::fs::read_to_string(&page).await {
        return Html(html).into_response();
    }

    if !state.fallback.claim(&slug).await {
        return render(&state, &PostView::Loading);
    }

    tracing::info!("Assembling post {} on request", slug);
    // The task owns the in-flight entry, so a dropped request cannot leave
    // the slug stuck in the loading state
    let task = tokio::spawn(assemble(state.clone(), slug.clone()));
    match task.await {
        Ok(Ok(view)) => render(&state, &view),
        Ok(Err(e)) => {
            tracing::error!("Failed to assemble post {}: {:#}", slug, e);
            (StatusCode::BAD_GATEWAY, "Content store unavailable").into_response()
        }
        Err(e) => {
            tracing::error!("Assembly of post {} panicked: {}", slug, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn assemble(state: Arc<ServerState>, slug: String) -> Result<PostView> {
    let outcome = match Generator::new(&state.blog, state.store.as_ref()) {
        Ok(generator) => generator.generate_post(&slug).await,
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(PostView::Ready(_)) => tracing::info!("Generated post {}", slug),
        Ok(PostView::NotFound) => tracing::info!("Post {} does not exist", slug),
        Ok(PostView::Loading) | Err(_) => {}
    }

    state.fallback.finish(&slug).await;
    outcome
}

fn render(state: &ServerState, view: &PostView) -> Response {
    let status = match view {
        PostView::NotFound => StatusCode::NOT_FOUND,
        PostView::Loading | PostView::Ready(_) => StatusCode::OK,
    };

    match state.renderer.render_post_view(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
