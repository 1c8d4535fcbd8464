//! # Customer Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use karu_core::Customer;

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, loyalty_points, is_student, total_spent_cents";

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// First `limit` customers by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), limit, "Loaded customers");
        Ok(customers)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, loyalty_points, is_student, total_spent_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(customer.loyalty_points)
        .bind(customer.is_student)
        .bind(customer.total_spent_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites the loyalty balance and lifetime spend.
    pub async fn set_loyalty(
        &self,
        id: &str,
        loyalty_points: i64,
        total_spent_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, loyalty_points, total_spent_cents, "Updating customer loyalty");

        let result = sqlx::query(
            "UPDATE customers SET loyalty_points = ?2, total_spent_cents = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(loyalty_points)
        .bind(total_spent_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            phone: "0700000000".to_string(),
            loyalty_points: 5,
            is_student: false,
            total_spent_cents: 1_000,
        }
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();
        for (id, name) in [("1", "Chebet"), ("2", "Akinyi"), ("3", "Baraka")] {
            repo.insert(&customer(id, name)).await.unwrap();
        }

        let names: Vec<_> = repo.list(2).await.unwrap().into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["Akinyi", "Baraka"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_set_loyalty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();
        repo.insert(&customer("1", "Chebet")).await.unwrap();

        repo.set_loyalty("1", 16, 12_600).await.unwrap();

        let stored = repo.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored.loyalty_points, 16);
        assert_eq!(stored.total_spent_cents, 12_600);

        assert!(repo.set_loyalty("ghost", 1, 1).await.is_err());
    }
}
