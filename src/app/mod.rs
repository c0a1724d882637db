//! 应用层：路由装配

pub mod products;

use axum::{extract::State, http::Uri, middleware, response::Json, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::core::{
    error::{CoreError, CoreResult},
    middleware::request_logging_middleware,
    response::HealthResponse,
};
use products::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", products::routes())
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 健康检查，实际走一次数据库往返
async fn health_check(State(state): State<AppState>) -> CoreResult<Json<HealthResponse>> {
    state.product_service.health_check().await?;
    Ok(Json(HealthResponse::healthy()))
}

async fn fallback(uri: Uri) -> CoreError {
    CoreError::NotFound(uri.to_string())
}
