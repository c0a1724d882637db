//! Products 存储层
//!
//! `ProductStore` 是服务层与数据库之间的接缝。每个方法都是一次独立的往返，
//! Postgres 实现从连接池借出一个连接，作用域结束时归还（成功、空结果、出错都一样）。

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::model::Product;
use crate::core::error::{CoreError, CoreResult};

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> CoreResult<Option<Product>>;

    async fn find_all(&self) -> CoreResult<Vec<Product>>;

    async fn count(&self) -> CoreResult<i64>;

    /// 返回受影响的行数
    async fn insert_row(&self, id: i32, name: Option<&str>, price: Option<f64>) -> CoreResult<u64>;

    async fn ping(&self) -> CoreResult<()>;
}

const SELECT_PRODUCTS: &str = r#"SELECT "ProductId", "Name", "Price"::float8 AS "Price" FROM "Products""#;

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_by_id(&self, id: i32) -> CoreResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(r#"{} WHERE "ProductId" = $1 LIMIT 1"#, SELECT_PRODUCTS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(product)
    }

    async fn find_all(&self) -> CoreResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;
        let products = sqlx::query_as::<_, Product>(SELECT_PRODUCTS)
            .fetch_all(&mut *conn)
            .await?;
        Ok(products)
    }

    async fn count(&self) -> CoreResult<i64> {
        let mut conn = self.pool.acquire().await?;
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Products""#)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    async fn insert_row(&self, id: i32, name: Option<&str>, price: Option<f64>) -> CoreResult<u64> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"INSERT INTO "Products" ("ProductId", "Name", "Price") VALUES ($1, $2, $3)"#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> CoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}

/// 进程内存储，测试用替身。
///
/// 默认与无主键的表行为一致：重复的 ProductId 会被静默接受。
/// `with_unique_ids` 模拟带主键约束的表。
#[derive(Clone, Default)]
pub struct MemoryProductStore {
    rows: Arc<RwLock<Vec<Product>>>,
    unique_ids: bool,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unique_ids() -> Self {
        Self {
            unique_ids: true,
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<Product>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            unique_ids: false,
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_by_id(&self, id: i32) -> CoreResult<Option<Product>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|p| p.product_id == id).cloned())
    }

    async fn find_all(&self) -> CoreResult<Vec<Product>> {
        Ok(self.rows.read().await.clone())
    }

    async fn count(&self) -> CoreResult<i64> {
        Ok(self.rows.read().await.len() as i64)
    }

    async fn insert_row(&self, id: i32, name: Option<&str>, price: Option<f64>) -> CoreResult<u64> {
        let mut rows = self.rows.write().await;
        if self.unique_ids && rows.iter().any(|p| p.product_id == id) {
            return Err(CoreError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint: ProductId={}",
                id
            )));
        }
        rows.push(Product {
            product_id: id,
            name: name.map(str::to_string),
            price,
        });
        Ok(1)
    }

    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }
}
