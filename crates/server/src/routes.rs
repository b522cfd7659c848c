//! Dashboard routes for invoices and customers.
//!
//! - `GET  /dashboard/invoices`: cached invoice listing (JSON)
//! - `POST /dashboard/invoices`: create from form fields
//! - `GET  /dashboard/invoices/{id}`: single invoice for the edit form
//! - `POST /dashboard/invoices/{id}/edit`: update from form fields
//! - `POST /dashboard/invoices/{id}/delete`: delete
//! - `GET  /dashboard/customers`: selectable customers

use std::sync::Arc;

use acme_core::domain::customer::Customer;
use acme_core::domain::invoice::{Invoice, InvoiceId};
use acme_core::validation::InvoiceFormInput;
use acme_db::repositories::{SqlCustomerRepository, SqlInvoiceRepository};
use acme_db::{CustomerRepository, DbPool, InvoiceRepository};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::actions::{ActionOutcome, InvoiceActions, INVOICES_PATH};
use crate::cache::PageCache;

#[derive(Clone)]
pub struct AppState {
    actions: InvoiceActions,
    invoices: Arc<dyn InvoiceRepository>,
    customers: Arc<dyn CustomerRepository>,
    page_cache: Arc<PageCache>,
}

impl AppState {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        customers: Arc<dyn CustomerRepository>,
        page_cache: Arc<PageCache>,
    ) -> Self {
        let actions = InvoiceActions::new(invoices.clone(), page_cache.clone());
        Self { actions, invoices, customers, page_cache }
    }

    pub fn from_pool(db_pool: DbPool, page_cache: Arc<PageCache>) -> Self {
        Self::new(
            Arc::new(SqlInvoiceRepository::new(db_pool.clone())),
            Arc::new(SqlCustomerRepository::new(db_pool)),
            page_cache,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceListing {
    pub invoices: Vec<Invoice>,
    pub rendered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(INVOICES_PATH, get(list_invoices).post(create_invoice))
        .route("/dashboard/invoices/{id}", get(show_invoice))
        .route("/dashboard/invoices/{id}/edit", post(update_invoice))
        .route("/dashboard/invoices/{id}/delete", post(delete_invoice))
        .route("/dashboard/customers", get(list_customers))
        .with_state(state)
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(path) => Redirect::to(path).into_response(),
            Self::Completed(state) => (StatusCode::OK, Json(state)).into_response(),
            Self::Invalid(state) => (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response(),
            Self::Failed(state) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
            }
        }
    }
}

fn unavailable(message: &str) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorBody { error: message.to_string() }))
        .into_response()
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(input): Form<InvoiceFormInput>,
) -> ActionOutcome {
    state.actions.create_invoice(&input).await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<InvoiceFormInput>,
) -> ActionOutcome {
    state.actions.update_invoice(&InvoiceId(id), &input).await
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ActionOutcome {
    state.actions.delete_invoice(&InvoiceId(id)).await
}

/// Serves the listing from the page cache, regenerating it after an invalidation.
pub async fn list_invoices(State(state): State<AppState>) -> Response {
    if let Some(body) = state.page_cache.get(INVOICES_PATH).await {
        return json_page(body, "hit");
    }

    // a mutation committing while the query runs bumps the generation
    let generation = state.page_cache.generation(INVOICES_PATH).await;
    let invoices = match state.invoices.list().await {
        Ok(invoices) => invoices,
        Err(err) => {
            warn!(event_name = "invoice.list.failed", error = %err, "invoice listing query failed");
            return unavailable("Database Error: Failed to Fetch Invoices.");
        }
    };

    let listing = InvoiceListing { invoices, rendered_at: Utc::now() };
    let body = match serde_json::to_string(&listing) {
        Ok(body) => body,
        Err(err) => {
            error!(event_name = "invoice.list.render_failed", error = %err, "render failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: err.to_string() }))
                .into_response();
        }
    };

    if !state.page_cache.put_if_current(INVOICES_PATH, body.clone(), generation).await {
        debug!(event_name = "invoice.list.render_discarded", "listing invalidated while rendering");
    }
    json_page(body, "miss")
}

fn json_page(body: String, cache_status: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::HeaderName::from_static("x-cache"), cache_status),
        ],
        body,
    )
        .into_response()
}

pub async fn show_invoice(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.invoices.find_by_id(&InvoiceId(id)).await {
        Ok(Some(invoice)) => Json(invoice).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody { error: "Invoice not found.".to_string() }),
        )
            .into_response(),
        Err(err) => {
            warn!(event_name = "invoice.fetch.failed", error = %err, "invoice lookup failed");
            unavailable("Database Error: Failed to Fetch Invoice.")
        }
    }
}

pub async fn list_customers(State(state): State<AppState>) -> Response {
    match state.customers.list().await {
        Ok(customers) => Json::<Vec<Customer>>(customers).into_response(),
        Err(err) => {
            warn!(event_name = "customer.list.failed", error = %err, "customer query failed");
            unavailable("Database Error: Failed to Fetch Customers.")
        }
    }
}
