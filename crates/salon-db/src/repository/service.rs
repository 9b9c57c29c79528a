//! # Service Repository
//!
//! The salon's service catalogue. Ids are supplied by the caller.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{count_rows, delete_row, UpdateStatement};
use salon_core::{NewService, Service, ServicePatch};

const TABLE: &str = "services";

#[derive(Debug, FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    duration: i64,
    price: f64,
    category: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id,
            name: row.name,
            duration: row.duration,
            price: row.price,
            category: row.category,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for service catalogue operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Lists every service, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, name, duration, price, category, description, created_at, updated_at
            FROM services
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded services");
        Ok(rows.into_iter().map(Service::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, name, duration, price, category, description, created_at, updated_at
            FROM services
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Service::from))
    }

    /// Creates a service under the caller's id.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The id is already taken
    pub async fn create(&self, input: NewService) -> DbResult<Service> {
        let service = input.into_service(Utc::now());

        debug!(id = %service.id, name = %service.name, "Creating service");
        self.insert(&service).await?;

        Ok(service)
    }

    pub async fn insert(&self, service: &Service) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, duration, price, category, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.duration)
        .bind(service.price)
        .bind(&service.category)
        .bind(&service.description)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, id: &str, patch: ServicePatch) -> DbResult<()> {
        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("name", patch.name)
            .set("duration", patch.duration)
            .set("price", patch.price)
            .set("category", patch.category)
            .set("description", patch.description);

        let fields = stmt.assignments();
        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, fields, affected, "Updated service");
        Ok(())
    }

    /// Hard-deletes a service.
    ///
    /// Appointments listing this id in `service_ids` are left as they are.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let affected = delete_row(&self.pool, TABLE, id).await?;
        debug!(id = %id, affected, "Deleted service");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.pool, TABLE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::{new_service, test_db, tick};

    #[tokio::test]
    async fn test_create_keeps_supplied_id() {
        let db = test_db().await;
        let repo = db.services();

        let created = repo
            .create(new_service("svc-haircut", "Haircut", 300.0))
            .await
            .unwrap();

        assert_eq!(created.id, "svc-haircut");
        assert_eq!(repo.get_by_id("svc-haircut").await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let db = test_db().await;
        let repo = db.services();

        repo.create(new_service("svc-1", "Haircut", 300.0)).await.unwrap();
        let err = repo
            .create(new_service("svc-1", "Shave", 150.0))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_get_all_orders_by_name() {
        let db = test_db().await;
        let repo = db.services();

        repo.create(new_service("svc-3", "Pedicure", 500.0)).await.unwrap();
        repo.create(new_service("svc-1", "Facial", 800.0)).await.unwrap();
        repo.create(new_service("svc-2", "Manicure", 400.0)).await.unwrap();

        let ids: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();

        assert_eq!(ids, vec!["svc-1", "svc-2", "svc-3"]);
    }

    #[tokio::test]
    async fn test_update_price_only() {
        let db = test_db().await;
        let repo = db.services();
        let before = repo.create(new_service("svc-1", "Haircut", 300.0)).await.unwrap();

        tick().await;
        repo.update(
            "svc-1",
            ServicePatch {
                price: Some(350.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let after = repo.get_by_id("svc-1").await.unwrap().unwrap();
        assert_eq!(after.price, 350.0);
        assert_eq!(after.name, "Haircut");
        assert_eq!(after.duration, before.duration);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let db = test_db().await;

        db.services().delete("svc-none").await.unwrap();
    }
}
