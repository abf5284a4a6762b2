//! Billing Router
//!
//! All routes here are protected; the caller layers the auth middleware
//! on top. Static segments (`/stats`, `/summary`, `/categories`) are
//! registered before the `{id}` captures.

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::repository::{
    ClientRepository, ExpenseRepository, InvoiceRepository, ProductRepository,
};
use crate::infra::postgres::PgBillingRepository;
use crate::presentation::handlers::{self, BillingAppState};

/// Create the billing router with the PostgreSQL repository
pub fn billing_router(repo: PgBillingRepository) -> Router {
    billing_router_generic(repo)
}

/// Create a billing router for any repository implementation
pub fn billing_router_generic<R>(repo: R) -> Router
where
    R: ClientRepository
        + ProductRepository
        + InvoiceRepository
        + ExpenseRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = BillingAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        // Clients
        .route(
            "/clients",
            get(handlers::list_clients::<R>).post(handlers::create_client::<R>),
        )
        .route("/clients/stats", get(handlers::client_stats::<R>))
        .route(
            "/clients/{id}",
            get(handlers::get_client::<R>)
                .put(handlers::update_client::<R>)
                .delete(handlers::delete_client::<R>),
        )
        // Products
        .route(
            "/products",
            get(handlers::list_products::<R>).post(handlers::create_product::<R>),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product::<R>)
                .put(handlers::update_product::<R>)
                .delete(handlers::delete_product::<R>),
        )
        // Invoices
        .route(
            "/invoices",
            get(handlers::list_invoices::<R>).post(handlers::create_invoice::<R>),
        )
        .route("/invoices/stats", get(handlers::invoice_stats::<R>))
        .route(
            "/invoices/{id}",
            get(handlers::get_invoice::<R>)
                .put(handlers::update_invoice::<R>)
                .delete(handlers::delete_invoice::<R>),
        )
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses::<R>).post(handlers::create_expense::<R>),
        )
        .route("/expenses/summary", get(handlers::expense_summary::<R>))
        .route(
            "/expenses/categories",
            get(handlers::expense_categories::<R>),
        )
        .route(
            "/expenses/{id}",
            get(handlers::get_expense::<R>)
                .put(handlers::update_expense::<R>)
                .delete(handlers::delete_expense::<R>),
        )
        .with_state(state)
}
