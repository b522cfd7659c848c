pub mod actions;
pub mod bootstrap;
pub mod cache;
pub mod health;
pub mod routes;

pub use actions::{ActionOutcome, FormState, InvoiceActions};
pub use bootstrap::{bootstrap_with_config, Application, BootstrapError};
pub use cache::{PageCache, ViewInvalidator};
