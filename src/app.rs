use std::net::SocketAddr;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::MediaBackend;
use crate::error::ApiError;
use crate::forum::repo::PostWithAuthor;
use crate::state::AppState;
use crate::{auth, forum, locations, messages, photos, users, videos};

const HOME_POST_COUNT: i64 = 5;

/// Public home page: the most recent forum posts.
async fn home(State(state): State<AppState>) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    Ok(Json(
        forum::repo::list_recent_posts(&state.db, HOME_POST_COUNT).await?,
    ))
}

pub fn build_app(state: AppState) -> Router {
    let serve_uploads = match state.config.uploads.backend {
        MediaBackend::Local => Some(state.config.uploads.upload_dir.clone()),
        MediaBackend::S3 => None,
    };
    let max_body = state.config.uploads.max_upload_bytes;

    let mut app = Router::new()
        .route("/", get(home))
        .merge(auth::router())
        .merge(users::router())
        .merge(photos::router())
        .merge(videos::router())
        .merge(forum::router())
        .merge(messages::router())
        .merge(locations::router())
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        );

    // Local disk keys are served straight back as static files.
    if let Some(dir) = serve_uploads {
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }

    app
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
