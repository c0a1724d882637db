//! Products 业务服务

use std::sync::Arc;
use tracing::{error, info};

use super::{
    model::{NewProduct, Product},
    repository::ProductStore,
};
use crate::core::error::{CoreError, CoreResult};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// 查不到返回 `None`，不是错误
    pub async fn fetch_by_id(&self, id: i32) -> CoreResult<Option<Product>> {
        self.store.find_by_id(id).await.map_err(|e| {
            error!("Error reading product {} from the database: {}", id, e);
            e
        })
    }

    pub async fn fetch_all(&self) -> CoreResult<Vec<Product>> {
        self.store.find_all().await.map_err(|e| {
            error!("Error fetching products from the database: {}", e);
            e
        })
    }

    /// 新 id 取 `COUNT(*) + 1`。
    ///
    /// 读计数与插入之间没有任何串行化：并发插入可能拿到同一个 id，
    /// 删除过行之后也可能与已有 id 冲突。结果取决于表上有没有主键约束，
    /// 有则其中一个请求得到 `ConstraintViolation`，没有则静默写入重复 id。
    pub async fn insert(&self, product: NewProduct) -> CoreResult<bool> {
        let result = self.insert_with_next_id(&product).await;
        match result {
            Ok((id, inserted)) => {
                info!("Inserted product {} ({:?}): {}", id, product.name, inserted);
                Ok(inserted)
            }
            Err(e) => {
                error!("Error adding product to the database: {}", e);
                Err(e)
            }
        }
    }

    async fn insert_with_next_id(&self, product: &NewProduct) -> CoreResult<(i32, bool)> {
        let count = self.store.count().await?;
        let id = i32::try_from(count + 1)
            .map_err(|_| CoreError::Storage(format!("row count {} exceeds id range", count)))?;

        let affected = self
            .store
            .insert_row(id, product.name.as_deref(), product.price)
            .await?;
        Ok((id, affected == 1))
    }

    pub async fn health_check(&self) -> CoreResult<()> {
        self.store.ping().await.map_err(|e| {
            error!("Database health check failed: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::repository::MemoryProductStore;
    use async_trait::async_trait;
    use tokio::sync::Barrier;

    fn service(store: MemoryProductStore) -> ProductService {
        ProductService::new(Arc::new(store))
    }

    fn widget(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: Some(name.to_string()),
            price: Some(price),
        }
    }

    #[tokio::test]
    async fn inserted_product_can_be_fetched_by_id() {
        let service = service(MemoryProductStore::new());
        assert!(service.insert(widget("Widget", 10.99)).await.unwrap());
        assert!(service.insert(widget("Gadget", 3.5)).await.unwrap());

        let product = service.fetch_by_id(2).await.unwrap().unwrap();
        assert_eq!(
            product,
            Product {
                product_id: 2,
                name: Some("Gadget".to_string()),
                price: Some(3.5),
            }
        );
    }

    #[tokio::test]
    async fn missing_id_is_none_not_error() {
        let service = service(MemoryProductStore::new());
        assert!(service.fetch_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_grows_listing_by_one() {
        let service = service(MemoryProductStore::new());
        for i in 0..3 {
            let before = service.fetch_all().await.unwrap().len();
            assert!(service.insert(widget("Item", i as f64)).await.unwrap());
            assert_eq!(service.fetch_all().await.unwrap().len(), before + 1);
        }
    }

    #[tokio::test]
    async fn id_after_deletion_collides_with_existing_row() {
        // 表里只剩 id 2（id 1 已被删除），count + 1 仍然是 2
        let store = MemoryProductStore::with_rows(vec![Product {
            product_id: 2,
            name: Some("Left".to_string()),
            price: Some(1.0),
        }]);
        let service = service(store);
        assert!(service.insert(widget("New", 2.0)).await.unwrap());

        let ids: Vec<i32> = service
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.product_id)
            .collect();
        assert_eq!(ids, vec![2, 2]);
    }

    /// 读完计数后在屏障处等待，保证两个插入都先读计数再写入
    struct InterleavingStore {
        inner: MemoryProductStore,
        barrier: Barrier,
    }

    #[async_trait]
    impl ProductStore for InterleavingStore {
        async fn find_by_id(&self, id: i32) -> CoreResult<Option<Product>> {
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> CoreResult<Vec<Product>> {
            self.inner.find_all().await
        }

        async fn count(&self) -> CoreResult<i64> {
            let count = self.inner.count().await?;
            self.barrier.wait().await;
            Ok(count)
        }

        async fn insert_row(
            &self,
            id: i32,
            name: Option<&str>,
            price: Option<f64>,
        ) -> CoreResult<u64> {
            self.inner.insert_row(id, name, price).await
        }

        async fn ping(&self) -> CoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn concurrent_inserts_race_to_the_same_id() {
        let service = ProductService::new(Arc::new(InterleavingStore {
            inner: MemoryProductStore::new(),
            barrier: Barrier::new(2),
        }));

        let (a, b) = tokio::join!(
            service.insert(widget("A", 1.0)),
            service.insert(widget("B", 2.0))
        );
        assert!(a.unwrap());
        assert!(b.unwrap());

        let ids: Vec<i32> = service
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.product_id)
            .collect();
        assert_eq!(ids, vec![1, 1]);
    }

    #[tokio::test]
    async fn concurrent_inserts_hit_unique_constraint() {
        let service = ProductService::new(Arc::new(InterleavingStore {
            inner: MemoryProductStore::with_unique_ids(),
            barrier: Barrier::new(2),
        }));

        let (a, b) = tokio::join!(
            service.insert(widget("A", 1.0)),
            service.insert(widget("B", 2.0))
        );
        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| matches!(r, Ok(true))).count(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|r| matches!(r, Err(CoreError::ConstraintViolation(_))))
                .count(),
            1
        );
        assert_eq!(service.fetch_all().await.unwrap().len(), 1);
    }
}
