//! # Reference Data Repositories
//!
//! Branches, categories and brands. Small tables, read whole.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use orbit_core::{Branch, Brand, Category};

#[derive(Debug, sqlx::FromRow)]
struct BranchRow {
    id: String,
    name: String,
    address: Option<String>,
    phone: Option<String>,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Branch {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
        }
    }
}

/// Shared shape of the `categories` and `brands` tables.
#[derive(Debug, sqlx::FromRow)]
struct NamedRow {
    id: String,
    name: String,
    description: Option<String>,
}

// =============================================================================
// Branches
// =============================================================================

#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Branch>> {
        let rows: Vec<BranchRow> =
            sqlx::query_as("SELECT id, name, address, phone FROM branches ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Branch::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Branch>> {
        let row: Option<BranchRow> =
            sqlx::query_as("SELECT id, name, address, phone FROM branches WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Branch::from))
    }

    pub async fn insert(&self, branch: &Branch) -> DbResult<()> {
        debug!(id = %branch.id, name = %branch.name, "Inserting branch");

        sqlx::query("INSERT INTO branches (id, name, address, phone) VALUES (?1, ?2, ?3, ?4)")
            .bind(&branch.id)
            .bind(&branch.name)
            .bind(&branch.address)
            .bind(&branch.phone)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows: Vec<NamedRow> =
            sqlx::query_as("SELECT id, name, description FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| Category {
                id: r.id,
                name: r.name,
                description: r.description,
            })
            .collect())
    }

    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query("INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Brands
// =============================================================================

#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Brand>> {
        let rows: Vec<NamedRow> =
            sqlx::query_as("SELECT id, name, description FROM brands ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| Brand {
                id: r.id,
                name: r.name,
                description: r.description,
            })
            .collect())
    }

    pub async fn insert(&self, brand: &Brand) -> DbResult<()> {
        debug!(id = %brand.id, name = %brand.name, "Inserting brand");

        sqlx::query("INSERT INTO brands (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(&brand.id)
            .bind(&brand.name)
            .bind(&brand.description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_branches() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.branches();

        let downtown = Branch {
            id: "b1".into(),
            name: "Downtown".into(),
            address: Some("12 Main St".into()),
            phone: None,
        };
        repo.insert(&downtown).await.unwrap();

        assert_eq!(repo.list().await.unwrap(), vec![downtown.clone()]);
        assert_eq!(repo.get_by_id("b1").await.unwrap(), Some(downtown.clone()));

        let err = repo.insert(&downtown).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_categories_and_brands() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.categories()
            .insert(&Category {
                id: "c1".into(),
                name: "Beverages".into(),
                description: None,
            })
            .await
            .unwrap();
        db.brands()
            .insert(&Brand {
                id: "br1".into(),
                name: "Orbit Farms".into(),
                description: Some("House brand".into()),
            })
            .await
            .unwrap();

        assert_eq!(db.categories().list().await.unwrap().len(), 1);
        let brands = db.brands().list().await.unwrap();
        assert_eq!(brands[0].description.as_deref(), Some("House brand"));
    }
}
