use async_trait::async_trait;
use thiserror::Error;

use acme_core::domain::customer::{Customer, CustomerId};
use acme_core::domain::invoice::{Invoice, InvoiceChanges, InvoiceId, NewInvoice};

pub mod customer;
pub mod invoice;
pub mod memory;

pub use customer::SqlCustomerRepository;
pub use invoice::SqlInvoiceRepository;
pub use memory::{InMemoryCustomerRepository, InMemoryInvoiceRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl RepositoryError {
    /// Short class label used in structured logs.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Decode(_) => "decode",
        }
    }
}

/// Persistence capability for invoices.
///
/// `update` and `delete` do not report whether a row matched; a missing id is
/// indistinguishable from a successful write.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn insert(&self, invoice: NewInvoice) -> Result<InvoiceId, RepositoryError>;
    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges)
        -> Result<(), RepositoryError>;
    async fn delete(&self, id: &InvoiceId) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;
}
