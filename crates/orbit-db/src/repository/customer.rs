//! # Customer Repository
//!
//! Customers are registered ad hoc at the register. Transactions keep their
//! own snapshot of the customer, so rows here are never joined into history.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use orbit_core::{Customer, NewCustomer};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: String,
    email: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Stores a new customer under a fresh id.
    pub async fn create(&self, new: &NewCustomer) -> DbResult<Customer> {
        let customer = new.clone().into_customer();

        debug!(id = %customer.id, "Registering customer");

        sqlx::query(
            "INSERT INTO customers (id, name, phone, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> =
            sqlx::query_as("SELECT id, name, phone, email FROM customers WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Customer::from))
    }

    /// Most recently registered customer with this phone number.
    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT id, name, phone, email FROM customers WHERE phone = ?1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(phone.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }
}
