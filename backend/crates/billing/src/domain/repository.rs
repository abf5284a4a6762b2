//! Repository Traits
//!
//! Interfaces for data persistence. Every lookup and mutation is
//! scoped to the owning user; a row owned by someone else behaves as
//! if it does not exist.

use auth::models::user_id::UserId;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entity::{client::Client, expense::Expense, invoice::Invoice, product::Product};
use crate::domain::value_object::InvoiceStatus;
use crate::error::BillingResult;

/// Listing window; handlers clamp the caller-supplied values
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub skip: i64,
}

/// Expense filters for list queries
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Per-currency expense total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTotal {
    pub currency: String,
    pub amount_minor: i64,
}

/// Per-category expense breakdown entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount_minor: i64,
    pub count: i64,
}

/// Expense summary aggregate
#[derive(Debug, Clone, Default)]
pub struct ExpenseSummary {
    pub total_count: i64,
    pub totals: Vec<CurrencyTotal>,
    pub by_category: Vec<CategoryTotal>,
}

/// Per-status invoice aggregate entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTotal {
    pub status: InvoiceStatus,
    pub count: i64,
    pub total_minor: i64,
}

/// Client repository trait
#[trait_variant::make(ClientRepository: Send)]
pub trait LocalClientRepository {
    async fn create_client(&self, client: &Client) -> BillingResult<()>;

    async fn find_client(&self, user_id: &UserId, client_id: Uuid) -> BillingResult<Option<Client>>;

    async fn list_clients(&self, user_id: &UserId, page: Page) -> BillingResult<Vec<Client>>;

    async fn update_client(&self, client: &Client) -> BillingResult<()>;

    /// Returns false when nothing was deleted (missing or foreign row)
    async fn delete_client(&self, user_id: &UserId, client_id: Uuid) -> BillingResult<bool>;

    async fn count_clients(&self, user_id: &UserId) -> BillingResult<i64>;
}

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn create_product(&self, product: &Product) -> BillingResult<()>;

    async fn find_product(&self, user_id: &UserId, product_id: Uuid) -> BillingResult<Option<Product>>;

    async fn list_products(
        &self,
        user_id: &UserId,
        category: Option<&str>,
        is_active: Option<bool>,
        page: Page,
    ) -> BillingResult<Vec<Product>>;

    async fn update_product(&self, product: &Product) -> BillingResult<()>;

    async fn delete_product(&self, user_id: &UserId, product_id: Uuid) -> BillingResult<bool>;

    /// SKU uniqueness check, optionally excluding one product (updates)
    async fn sku_exists(
        &self,
        user_id: &UserId,
        sku: &str,
        exclude: Option<Uuid>,
    ) -> BillingResult<bool>;
}

/// Invoice repository trait
#[trait_variant::make(InvoiceRepository: Send)]
pub trait LocalInvoiceRepository {
    /// Persist header, items and events together
    async fn create_invoice(&self, invoice: &Invoice) -> BillingResult<()>;

    async fn find_invoice(&self, user_id: &UserId, invoice_id: Uuid) -> BillingResult<Option<Invoice>>;

    async fn list_invoices(
        &self,
        user_id: &UserId,
        status: Option<InvoiceStatus>,
        page: Page,
    ) -> BillingResult<Vec<Invoice>>;

    /// Persist header changes and newly appended events
    async fn update_invoice(&self, invoice: &Invoice) -> BillingResult<()>;

    async fn delete_invoice(&self, user_id: &UserId, invoice_id: Uuid) -> BillingResult<bool>;

    /// Number of invoices this user holds (for auto-numbering)
    async fn count_invoices(&self, user_id: &UserId) -> BillingResult<i64>;

    async fn number_exists(&self, user_id: &UserId, number: &str) -> BillingResult<bool>;

    /// Count and total by status
    async fn invoice_stats(&self, user_id: &UserId) -> BillingResult<Vec<StatusTotal>>;
}

/// Expense repository trait
#[trait_variant::make(ExpenseRepository: Send)]
pub trait LocalExpenseRepository {
    async fn create_expense(&self, expense: &Expense) -> BillingResult<()>;

    async fn find_expense(&self, user_id: &UserId, expense_id: Uuid) -> BillingResult<Option<Expense>>;

    async fn list_expenses(
        &self,
        user_id: &UserId,
        filter: &ExpenseFilter,
        page: Page,
    ) -> BillingResult<Vec<Expense>>;

    async fn update_expense(&self, expense: &Expense) -> BillingResult<()>;

    async fn delete_expense(&self, user_id: &UserId, expense_id: Uuid) -> BillingResult<bool>;

    /// Count, per-currency totals and per-category breakdown
    async fn expense_summary(&self, user_id: &UserId) -> BillingResult<ExpenseSummary>;

    /// Distinct categories in use, sorted
    async fn expense_categories(&self, user_id: &UserId) -> BillingResult<Vec<String>>;
}
