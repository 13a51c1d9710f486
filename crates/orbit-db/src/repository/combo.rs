//! # Combo Repository
//!
//! Stores combo definitions: name, constituent ids, price, offer and branch
//! assignment. Totals, percentages and stock are not columns; the core
//! derives them from the products table on every read.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{decode_ids, encode_ids, BRANCH_FILTER};
use crate::error::{DbError, DbResult};
use orbit_core::Combo;

const SELECT_COMBO: &str = r#"
    SELECT
        id, name, description, product_ids, price_cents, offer_price_cents,
        branch_ids, created_at, updated_at
    FROM combos
"#;

#[derive(Debug, sqlx::FromRow)]
struct ComboRow {
    id: String,
    name: String,
    description: String,
    product_ids: String,
    price_cents: i64,
    offer_price_cents: Option<i64>,
    branch_ids: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ComboRow> for Combo {
    type Error = DbError;

    fn try_from(row: ComboRow) -> DbResult<Self> {
        Ok(Combo {
            product_ids: decode_ids("combos.product_ids", &row.product_ids)?,
            branch_ids: decode_ids("combos.branch_ids", &row.branch_ids)?,
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            offer_price_cents: row.offer_price_cents,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ComboRepository {
    pool: SqlitePool,
}

impl ComboRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ComboRepository { pool }
    }

    /// Combos assigned to `branch_id`, or all combos for `None`. By name.
    pub async fn list(&self, branch_id: Option<&str>) -> DbResult<Vec<Combo>> {
        let sql = format!("{} WHERE {} ORDER BY name", SELECT_COMBO, BRANCH_FILTER);

        let rows: Vec<ComboRow> = sqlx::query_as(&sql)
            .bind(branch_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(branch = ?branch_id, count = rows.len(), "Listed combos");
        rows.into_iter().map(Combo::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Combo>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COMBO);

        let row: Option<ComboRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Combo::try_from).transpose()
    }

    /// Inserts or replaces a combo definition. `created_at` survives an update.
    pub async fn save(&self, combo: &Combo) -> DbResult<()> {
        debug!(id = %combo.id, name = %combo.name, "Saving combo");

        sqlx::query(
            r#"
            INSERT INTO combos (
                id, name, description, product_ids, price_cents, offer_price_cents,
                branch_ids, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                product_ids = excluded.product_ids,
                price_cents = excluded.price_cents,
                offer_price_cents = excluded.offer_price_cents,
                branch_ids = excluded.branch_ids,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&combo.id)
        .bind(&combo.name)
        .bind(&combo.description)
        .bind(encode_ids("combos.product_ids", &combo.product_ids)?)
        .bind(combo.price_cents)
        .bind(combo.offer_price_cents)
        .bind(encode_ids("combos.branch_ids", &combo.branch_ids)?)
        .bind(combo.created_at)
        .bind(combo.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM combos WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Combo", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM combos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
