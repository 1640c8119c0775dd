//! Persistence seam for the catalog. One method, one statement.

mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::{ensure_tables, PgCatalogStore};

use crate::error::AppError;
use crate::model::{Category, Good, GoodListing, NewCategory, NewGood, RenamedGood};
use async_trait::async_trait;

pub(crate) const CATEGORY_IN_USE: &str = "category is still referenced by goods";
pub(crate) const UNKNOWN_CATEGORY: &str = "category_id does not reference an existing category";

/// Data access for categories and goods.
///
/// `rename_*` return `None` and `delete_*` return `false` when no row matched the id.
/// Acquisition failures surface as [`AppError::Acquire`], statement failures as [`AppError::Db`],
/// and foreign-key violations as [`AppError::Conflict`].
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn create_category(&self, new: &NewCategory) -> Result<Category, AppError>;

    async fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, AppError>;

    async fn delete_category(&self, id: i32) -> Result<bool, AppError>;

    async fn list_goods(&self) -> Result<Vec<GoodListing>, AppError>;

    async fn create_good(&self, new: &NewGood) -> Result<Good, AppError>;

    async fn rename_good(&self, id: i32, name: &str) -> Result<Option<RenamedGood>, AppError>;

    async fn delete_good(&self, id: i32) -> Result<bool, AppError>;

    /// Round trip to the backing store (readiness).
    async fn ping(&self) -> Result<(), AppError>;
}
