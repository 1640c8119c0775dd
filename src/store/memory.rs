//! In-process catalog store with the same observable rules as the PostgreSQL tables:
//! generated ids, restrict-on-delete, inner-join listing.

use super::{CatalogStore, CATEGORY_IN_USE, UNKNOWN_CATEGORY};
use crate::error::AppError;
use crate::model::{Category, Good, GoodListing, NewCategory, NewGood, RenamedGood};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    goods: Vec<Good>,
    next_category_id: i32,
    next_product_id: i32,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: Mutex<Tables>,
    unavailable: bool,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the pool timed out.
    pub fn unavailable() -> Self {
        MemoryCatalogStore {
            unavailable: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        if self.unavailable {
            return Err(AppError::Acquire(sqlx::Error::PoolTimedOut));
        }
        self.tables
            .lock()
            .map_err(|_| AppError::Db(sqlx::Error::Protocol("memory store lock poisoned".into())))
    }
}

/// Next serial value, failing like an exhausted PostgreSQL sequence instead of wrapping.
fn next_id(current: i32, table: &str) -> Result<i32, AppError> {
    current.checked_add(1).ok_or_else(|| {
        AppError::Db(sqlx::Error::Protocol(format!("id sequence for {table} is exhausted")))
    })
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.lock()?.categories.clone())
    }

    async fn create_category(&self, new: &NewCategory) -> Result<Category, AppError> {
        let mut t = self.lock()?;
        t.next_category_id = next_id(t.next_category_id, "categories")?;
        let row = Category {
            category_id: t.next_category_id,
            category_name: new.category_name.clone(),
        };
        t.categories.push(row.clone());
        Ok(row)
    }

    async fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, AppError> {
        let mut t = self.lock()?;
        Ok(t.categories.iter_mut().find(|c| c.category_id == id).map(|c| {
            c.category_name = name.to_string();
            c.clone()
        }))
    }

    async fn delete_category(&self, id: i32) -> Result<bool, AppError> {
        let mut t = self.lock()?;
        if t.goods.iter().any(|g| g.category_id == id) {
            return Err(AppError::Conflict(CATEGORY_IN_USE.into()));
        }
        let before = t.categories.len();
        t.categories.retain(|c| c.category_id != id);
        Ok(t.categories.len() < before)
    }

    async fn list_goods(&self) -> Result<Vec<GoodListing>, AppError> {
        let t = self.lock()?;
        Ok(t.goods
            .iter()
            .filter_map(|g| {
                t.categories
                    .iter()
                    .find(|c| c.category_id == g.category_id)
                    .map(|c| GoodListing {
                        product_id: g.product_id,
                        product_name: g.product_name.clone(),
                        category_name: c.category_name.clone(),
                        price: g.price,
                    })
            })
            .collect())
    }

    async fn create_good(&self, new: &NewGood) -> Result<Good, AppError> {
        let mut t = self.lock()?;
        if !t.categories.iter().any(|c| c.category_id == new.category_id) {
            return Err(AppError::Conflict(UNKNOWN_CATEGORY.into()));
        }
        t.next_product_id = next_id(t.next_product_id, "goods")?;
        let row = Good {
            product_id: t.next_product_id,
            product_name: new.product_name.clone(),
            category_id: new.category_id,
            price: new.price,
        };
        t.goods.push(row.clone());
        Ok(row)
    }

    async fn rename_good(&self, id: i32, name: &str) -> Result<Option<RenamedGood>, AppError> {
        let mut t = self.lock()?;
        Ok(t.goods.iter_mut().find(|g| g.product_id == id).map(|g| {
            g.product_name = name.to_string();
            RenamedGood {
                product_id: g.product_id,
                product_name: g.product_name.clone(),
            }
        }))
    }

    async fn delete_good(&self, id: i32) -> Result<bool, AppError> {
        let mut t = self.lock()?;
        let before = t.goods.len();
        t.goods.retain(|g| g.product_id != id);
        Ok(t.goods.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_generated_and_not_reused() {
        let store = MemoryCatalogStore::new();
        let a = store.create_category(&NewCategory { category_name: "A".into() }).await.unwrap();
        assert!(store.delete_category(a.category_id).await.unwrap());
        let b = store.create_category(&NewCategory { category_name: "B".into() }).await.unwrap();
        assert_eq!(a.category_id, 1);
        assert_eq!(b.category_id, 2);
    }

    #[tokio::test]
    async fn referenced_category_cannot_be_deleted() {
        let store = MemoryCatalogStore::new();
        let c = store.create_category(&NewCategory { category_name: "Dairy".into() }).await.unwrap();
        store
            .create_good(&NewGood {
                product_name: "Milk".into(),
                category_id: c.category_id,
                price: None,
            })
            .await
            .unwrap();
        let err = store.delete_category(c.category_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exhausted_id_sequence_is_an_error() {
        let store = MemoryCatalogStore::new();
        store.tables.lock().unwrap().next_category_id = i32::MAX;
        let err = store
            .create_category(&NewCategory { category_name: "Dairy".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Db(_)), "{err:?}");
        assert!(store.list_categories().await.unwrap().is_empty());

        store.tables.lock().unwrap().next_category_id = 0;
        let c = store.create_category(&NewCategory { category_name: "Dairy".into() }).await.unwrap();
        store.tables.lock().unwrap().next_product_id = i32::MAX;
        let err = store
            .create_good(&NewGood {
                product_name: "Milk".into(),
                category_id: c.category_id,
                price: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Db(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unavailable_store_reports_acquisition_failure() {
        let store = MemoryCatalogStore::unavailable();
        assert!(matches!(store.ping().await, Err(AppError::Acquire(_))));
        assert!(matches!(store.list_goods().await, Err(AppError::Acquire(_))));
    }
}
