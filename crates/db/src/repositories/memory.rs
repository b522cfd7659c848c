use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use acme_core::domain::customer::{Customer, CustomerId};
use acme_core::domain::invoice::{Invoice, InvoiceChanges, InvoiceId, NewInvoice};

use super::{CustomerRepository, InvoiceRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<String, Invoice>>,
}

impl InMemoryInvoiceRepository {
    /// Places an invoice with a caller-chosen id, bypassing id generation.
    pub async fn seed(&self, invoice: Invoice) {
        let mut invoices = self.invoices.write().await;
        invoices.insert(invoice.id.0.clone(), invoice);
    }
}

#[async_trait::async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, RepositoryError> {
        let id = InvoiceId(Uuid::new_v4().simple().to_string());
        let mut invoices = self.invoices.write().await;
        invoices.insert(
            id.0.clone(),
            Invoice {
                id: id.clone(),
                customer_id: invoice.customer_id,
                amount: invoice.amount,
                status: invoice.status,
                date: invoice.date,
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: &InvoiceId,
        changes: InvoiceChanges,
    ) -> Result<(), RepositoryError> {
        let mut invoices = self.invoices.write().await;
        if let Some(invoice) = invoices.get_mut(&id.0) {
            invoice.apply(changes);
        }
        Ok(())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<(), RepositoryError> {
        let mut invoices = self.invoices.write().await;
        invoices.remove(&id.0);
        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let invoices = self.invoices.read().await;
        Ok(invoices.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let invoices = self.invoices.read().await;
        let mut listed = invoices.values().cloned().collect::<Vec<_>>();
        listed.sort_by(|left, right| right.date.cmp(&left.date).then(left.id.0.cmp(&right.id.0)));
        Ok(listed)
    }
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<String, Customer>>,
}

impl InMemoryCustomerRepository {
    pub async fn save(&self, customer: Customer) {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id.0.clone(), customer);
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        let mut listed = customers.values().cloned().collect::<Vec<_>>();
        listed.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use acme_core::domain::customer::{Customer, CustomerId};
    use acme_core::domain::invoice::{
        AmountCents, Invoice, InvoiceChanges, InvoiceId, InvoiceStatus, NewInvoice,
    };

    use crate::repositories::{
        CustomerRepository, InMemoryCustomerRepository, InMemoryInvoiceRepository,
        InvoiceRepository,
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).expect("date")
    }

    #[tokio::test]
    async fn in_memory_invoice_repo_assigns_ids_on_insert() {
        let repo = InMemoryInvoiceRepository::default();
        let new_invoice = NewInvoice {
            customer_id: CustomerId("c1".to_string()),
            amount: AmountCents(1550),
            status: InvoiceStatus::Paid,
            date: date(),
        };

        let first = repo.insert(new_invoice.clone()).await.expect("insert first");
        let second = repo.insert(new_invoice).await.expect("insert second");

        assert_ne!(first, second);
        let found = repo.find_by_id(&first).await.expect("find").expect("exists");
        assert_eq!(found.amount, AmountCents(1550));
        assert_eq!(found.date, date());
    }

    #[tokio::test]
    async fn in_memory_invoice_repo_updates_in_place() {
        let repo = InMemoryInvoiceRepository::default();
        repo.seed(Invoice {
            id: InvoiceId("inv-1".to_string()),
            customer_id: CustomerId("c1".to_string()),
            amount: AmountCents(100),
            status: InvoiceStatus::Paid,
            date: date(),
        })
        .await;

        repo.update(
            &InvoiceId("inv-1".to_string()),
            InvoiceChanges {
                customer_id: CustomerId("c2".to_string()),
                amount: AmountCents(2000),
                status: InvoiceStatus::Pending,
            },
        )
        .await
        .expect("update");
        repo.delete(&InvoiceId("missing".to_string())).await.expect("delete missing");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_id, CustomerId("c2".to_string()));
        assert_eq!(listed[0].date, date());
    }

    #[tokio::test]
    async fn in_memory_customer_repo_round_trip() {
        let repo = InMemoryCustomerRepository::default();
        let customer = Customer {
            id: CustomerId("c1".to_string()),
            name: "Lee Robinson".to_string(),
            email: "lee@robinson.com".to_string(),
            image_url: "/customers/lee-robinson.png".to_string(),
        };

        repo.save(customer.clone()).await;
        let found = repo.find_by_id(&customer.id).await.expect("find customer");

        assert_eq!(found, Some(customer));
    }
}
