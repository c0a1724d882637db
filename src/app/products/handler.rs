//! Products 处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Json},
};

use super::{
    model::{CreateProductResponse, NewProduct, Product},
    service::ProductService,
};
use crate::core::error::{CoreError, CoreResult};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(product_service: ProductService) -> Self {
        Self { product_service }
    }
}

/// GET /api/products/:id
///
/// 找不到时返回 200 和 `null`。
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CoreResult<Json<Option<Product>>> {
    let id = parse_product_id(&id)?;
    let product = state.product_service.fetch_by_id(id).await?;
    Ok(Json(product))
}

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> CoreResult<impl IntoResponse> {
    let products = state.product_service.fetch_all().await?;
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        Json(products),
    ))
}

/// POST /api/products
///
/// 插入结果为 false 时同样返回 200。
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> CoreResult<Json<CreateProductResponse>> {
    let Json(payload) = payload.map_err(|e| CoreError::ValidationError(e.body_text()))?;
    let success = state.product_service.insert(payload).await?;
    Ok(Json(CreateProductResponse { success }))
}

fn parse_product_id(raw: &str) -> CoreResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::ValidationError(format!("invalid product id: {}", raw)))
}
