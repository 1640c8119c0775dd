//! PostgreSQL-backed catalog store.

use super::{CatalogStore, CATEGORY_IN_USE, UNKNOWN_CATEGORY};
use crate::error::AppError;
use crate::model::{Category, Good, GoodListing, NewCategory, NewGood, RenamedGood};
use crate::sql::{ensure_tables_ddl, Statements};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

/// Create the schema and both tables if missing.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    for ddl in ensure_tables_ddl(schema) {
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(schema, "catalog tables ensured");
    Ok(())
}

pub struct PgCatalogStore {
    pool: PgPool,
    sql: Statements,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgCatalogStore {
            pool,
            sql: Statements::for_schema(schema),
        }
    }

    /// Checked before any statement runs. The returned guard goes back to the pool when dropped.
    async fn acquire(&self) -> Result<PoolConnection<Postgres>, AppError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::warn!(
                error = %e,
                size = self.pool.size(),
                idle = self.pool.num_idle(),
                "connection acquisition failed"
            );
            AppError::Acquire(e)
        })
    }
}

/// Foreign-key violations become a conflict carrying `message`; anything else stays a query error.
fn on_foreign_key(e: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() {
            tracing::debug!(constraint = ?db.constraint(), "foreign key violation");
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Db(e)
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.list_categories, "query");
        let rows = sqlx::query_as::<_, Category>(&self.sql.list_categories)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn create_category(&self, new: &NewCategory) -> Result<Category, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.insert_category, "query");
        let row = sqlx::query_as::<_, Category>(&self.sql.insert_category)
            .bind(&new.category_name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.rename_category, id, "query");
        let row = sqlx::query_as::<_, Category>(&self.sql.rename_category)
            .bind(name)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn delete_category(&self, id: i32) -> Result<bool, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.delete_category, id, "query");
        let done = sqlx::query(&self.sql.delete_category)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| on_foreign_key(e, CATEGORY_IN_USE))?;
        Ok(done.rows_affected() > 0)
    }

    async fn list_goods(&self) -> Result<Vec<GoodListing>, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.list_goods, "query");
        let rows = sqlx::query_as::<_, GoodListing>(&self.sql.list_goods)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn create_good(&self, new: &NewGood) -> Result<Good, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.insert_good, "query");
        let row = sqlx::query_as::<_, Good>(&self.sql.insert_good)
            .bind(new.category_id)
            .bind(&new.product_name)
            .bind(new.price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| on_foreign_key(e, UNKNOWN_CATEGORY))?;
        Ok(row)
    }

    async fn rename_good(&self, id: i32, name: &str) -> Result<Option<RenamedGood>, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.rename_good, id, "query");
        let row = sqlx::query_as::<_, RenamedGood>(&self.sql.rename_good)
            .bind(name)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn delete_good(&self, id: i32) -> Result<bool, AppError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %self.sql.delete_good, id, "query");
        let done = sqlx::query(&self.sql.delete_good)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").fetch_optional(&mut *conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
    use std::time::Duration;

    /// A pool whose server never answers; nothing is connected until first use.
    fn unreachable_store() -> PgCatalogStore {
        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("catalog")
            .database("catalog");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(50))
            .connect_lazy_with(options);
        PgCatalogStore::new(pool, "public")
    }

    #[tokio::test]
    async fn unreachable_server_is_an_acquisition_error() {
        let store = unreachable_store();
        let err = store.list_categories().await.unwrap_err();
        assert!(matches!(err, AppError::Acquire(_)), "{err:?}");

        let err = store
            .create_good(&NewGood {
                product_name: "Milk".into(),
                category_id: 1,
                price: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Acquire(_)), "{err:?}");
        assert!(matches!(store.ping().await, Err(AppError::Acquire(_))));
    }

    #[test]
    fn non_database_errors_are_not_conflicts() {
        let err = on_foreign_key(sqlx::Error::RowNotFound, UNKNOWN_CATEGORY);
        assert!(matches!(err, AppError::Db(sqlx::Error::RowNotFound)));
    }
}
