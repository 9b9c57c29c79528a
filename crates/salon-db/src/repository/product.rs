//! # Product Repository
//!
//! Retail products sold over the counter (shampoo, styling wax, ...).
//!
//! ## Key Operations
//! - CRUD operations under caller-supplied ids
//! - Stock adjustments through [`ProductPatch::stock`](salon_core::ProductPatch)

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{count_rows, delete_row, UpdateStatement};
use salon_core::{NewProduct, Product, ProductPatch};

const TABLE: &str = "products";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    image: Option<String>,
    category: String,
    stock: i64,
    description: Option<String>,
    brand: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            image: row.image,
            category: row.category,
            stock: row.stock,
            description: row.description,
            brand: row.brand,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let products = repo.get_all().await?;
/// let wax = repo.get_by_id("prod-wax").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                id, name, price, image, category, stock, description, brand,
                created_at, updated_at
            FROM products
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                id, name, price, image, category, stock, description, brand,
                created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Creates a product under the caller's id. Stock defaults to 0.
    pub async fn create(&self, input: NewProduct) -> DbResult<Product> {
        let product = input.into_product(Utc::now());

        debug!(id = %product.id, stock = product.stock, "Creating product");
        self.insert(&product).await?;

        Ok(product)
    }

    /// Inserts a fully materialized product as-is.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price, image, category, stock, description, brand,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, id: &str, patch: ProductPatch) -> DbResult<()> {
        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("name", patch.name)
            .set("price", patch.price)
            .set("image", patch.image)
            .set("category", patch.category)
            .set("stock", patch.stock)
            .set("description", patch.description)
            .set("brand", patch.brand);

        let fields = stmt.assignments();
        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, fields, affected, "Updated product");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let affected = delete_row(&self.pool, TABLE, id).await?;
        debug!(id = %id, affected, "Deleted product");
        Ok(())
    }

    /// Gets total product count.
    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.pool, TABLE).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
