//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Branch Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.branch_ids = '["b1","b2"]'   (JSON array in a TEXT column)    │
//! │                                                                         │
//! │  list(Some("b2"))                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EXISTS (SELECT 1 FROM json_each(branch_ids) WHERE value = 'b2') ✓      │
//! │                                                                         │
//! │  list(None) ──► every product (admin view)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{decode_ids, encode_ids, BRANCH_FILTER};
use crate::error::{DbError, DbResult};
use orbit_core::validation::validate_product;
use orbit_core::Product;

const SELECT_PRODUCT: &str = r#"
    SELECT
        id, name, barcode, description, brand_id, category_id,
        price_cents, offer_price_cents, stock, branch_ids, image_url,
        created_at, updated_at
    FROM products
"#;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    barcode: Option<String>,
    description: Option<String>,
    brand_id: Option<String>,
    category_id: Option<String>,
    price_cents: i64,
    offer_price_cents: Option<i64>,
    stock: i64,
    branch_ids: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            branch_ids: decode_ids("products.branch_ids", &row.branch_ids)?,
            id: row.id,
            name: row.name,
            barcode: row.barcode,
            description: row.description,
            brand_id: row.brand_id,
            category_id: row.category_id,
            price_cents: row.price_cents,
            offer_price_cents: row.offer_price_cents,
            stock: row.stock,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let at_branch = repo.list(Some("b1")).await?;
/// let tea = repo.get_by_id("p-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Products assigned to `branch_id`, or all products for `None`. By name.
    pub async fn list(&self, branch_id: Option<&str>) -> DbResult<Vec<Product>> {
        let sql = format!("{} WHERE {} ORDER BY name", SELECT_PRODUCT, BRANCH_FILTER);

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(branch_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(branch = ?branch_id, count = rows.len(), "Listed products");
        rows.into_iter().map(Product::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("{} WHERE id = ?1", SELECT_PRODUCT);

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        validate_product(product)?;
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, barcode, description, brand_id, category_id,
                price_cents, offer_price_cents, stock, branch_ids, image_url,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.description)
        .bind(&product.brand_id)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.offer_price_cents)
        .bind(product.stock)
        .bind(encode_ids("products.branch_ids", &product.branch_ids)?)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites every editable field. `updated_at` is set to now.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product(product)?;
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                barcode = ?3,
                description = ?4,
                brand_id = ?5,
                category_id = ?6,
                price_cents = ?7,
                offer_price_cents = ?8,
                stock = ?9,
                branch_ids = ?10,
                image_url = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.description)
        .bind(&product.brand_id)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.offer_price_cents)
        .bind(product.stock)
        .bind(encode_ids("products.branch_ids", &product.branch_ids)?)
        .bind(&product.image_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }
        Ok(())
    }

    /// Sets the on-hand quantity (restock or stock count).
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock, "Setting product stock");

        let result = sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
