use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use acme_core::domain::customer::CustomerId;
use acme_core::domain::invoice::{
    AmountCents, Invoice, InvoiceChanges, InvoiceId, InvoiceStatus, NewInvoice,
};

use super::{InvoiceRepository, RepositoryError};
use crate::DbPool;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqlInvoiceRepository {
    pool: DbPool,
}

impl SqlInvoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InvoiceRepository for SqlInvoiceRepository {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, RepositoryError> {
        let id: String = sqlx::query_scalar(
            "INSERT INTO invoices (customer_id, amount, status, date)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&invoice.customer_id.0)
        .bind(invoice.amount.0)
        .bind(invoice.status.as_str())
        .bind(invoice.date.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(InvoiceId(id))
    }

    async fn update(
        &self,
        id: &InvoiceId,
        changes: InvoiceChanges,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE invoices
             SET customer_id = ?, amount = ?, status = ?
             WHERE id = ?",
        )
        .bind(&changes.customer_id.0)
        .bind(changes.amount.0)
        .bind(changes.status.as_str())
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM invoices WHERE id = ?").bind(&id.0).execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(invoice_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, customer_id, amount, status, date FROM invoices
             ORDER BY date DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(invoice_from_row).collect()
    }
}

fn invoice_from_row(row: &SqliteRow) -> Result<Invoice, RepositoryError> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<InvoiceStatus>()
        .map_err(|error| RepositoryError::Decode(error.to_string()))?;

    let date: String = row.try_get("date")?;
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|error| {
        RepositoryError::Decode(format!("invalid invoice date `{date}`: {error}"))
    })?;

    Ok(Invoice {
        id: InvoiceId(row.try_get("id")?),
        customer_id: CustomerId(row.try_get("customer_id")?),
        amount: AmountCents(row.try_get("amount")?),
        status,
        date,
    })
}
