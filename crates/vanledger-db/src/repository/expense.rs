//! # Expense Repository
//!
//! Append-only expenses (fuel, loading, tea for the helper).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;
use vanledger_core::period::ReportPeriod;
use vanledger_core::validation::{validate_amount, validate_description};
use vanledger_core::{Expense, NewExpense, TenantId};

use crate::error::DbResult;

/// Repository for expenses of one tenant.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
    tenant: TenantId,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool, tenant: TenantId) -> Self {
        ExpenseRepository { pool, tenant }
    }

    pub async fn record(&self, input: &NewExpense) -> DbResult<Expense> {
        let description = input.description.trim();
        validate_description(description)?;
        validate_amount("amount", input.amount)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner_id: self.tenant.to_string(),
            description: description.to_string(),
            amount: input.amount,
            date: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO expenses (id, owner_id, description, amount, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.owner_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.date)
        .execute(&self.pool)
        .await?;

        info!(id = %expense.id, amount = %expense.amount, "Expense recorded");
        Ok(expense)
    }

    /// Lists expenses in the period, newest first.
    pub async fn list(&self, period: &ReportPeriod) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, owner_id, description, amount, date
            FROM expenses
            WHERE owner_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date DESC, id
            "#,
        )
        .bind(self.tenant.as_str())
        .bind(period.start())
        .bind(period.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, FixedOffset};
    use vanledger_core::period::business_date;
    use vanledger_core::Money;

    #[tokio::test]
    async fn test_record_and_list_today() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().register("Ravi", "9800000001", "secret-pass").await.unwrap();
        let db = db.tenant(TenantId::new(user.id));

        let expense = db
            .expenses()
            .record(&NewExpense {
                description: " Diesel ".to_string(),
                amount: Money::from_paise(50_000),
            })
            .await
            .unwrap();
        assert_eq!(expense.description, "Diesel");

        let utc = FixedOffset::east_opt(0).unwrap();
        let today = ReportPeriod::today(Utc::now(), utc).unwrap();
        let listed = db.expenses().list(&today).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, Money::from_paise(50_000));

        let yesterday = business_date(Utc::now() - Duration::days(1), utc);
        let earlier = ReportPeriod::days(yesterday, yesterday, utc).unwrap();
        assert!(db.expenses().list(&earlier).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_amount_must_be_positive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().register("Ravi", "9800000001", "secret-pass").await.unwrap();
        let db = db.tenant(TenantId::new(user.id));

        let result = db
            .expenses()
            .record(&NewExpense {
                description: "Tea".to_string(),
                amount: Money::zero(),
            })
            .await;
        assert!(result.is_err());
    }
}
