pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod seed;

pub use connection::{connect_in_memory, connect_with_settings, DbPool};
pub use repositories::{CustomerRepository, InvoiceRepository, RepositoryError};
pub use seed::{DemoSeed, SeedResult, SeedVerification};
