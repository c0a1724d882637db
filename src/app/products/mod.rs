//! Products 模块：单表的读取、列表和新增

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

use axum::{routing::get, Router};

pub use handler::AppState;
pub use model::{CreateProductResponse, NewProduct, Product};
pub use repository::{MemoryProductStore, PgProductStore, ProductStore};
pub use service::ProductService;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/products/:id", get(handler::get_product))
}
