//! API DTOs (Data Transfer Objects)
//!
//! Monetary fields are integer minor units (`*_minor`); rates are basis
//! points (`*_bps`); quantities are thousandths of a unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::client::Client;
use crate::domain::entity::expense::Expense;
use crate::domain::entity::invoice::{Invoice, InvoiceEvent, InvoiceItem};
use crate::domain::entity::product::Product;
use crate::domain::repository::{CategoryTotal, CurrencyTotal, ExpenseSummary, StatusTotal};
use crate::domain::value_object::InvoiceStatus;

fn default_limit() -> i64 {
    50
}

fn default_currency() -> String {
    "NGN".to_string()
}

fn default_quantity() -> i64 {
    1_000
}

fn default_true() -> bool {
    true
}

/// Common paging query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

// ============================================================================
// Clients
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ClientCreateRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<&Client> for ClientResponse {
    fn from(client: &Client) -> Self {
        Self {
            id: client.client_id.to_string(),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientStatsResponse {
    pub stats: ClientStats,
}

// ============================================================================
// Products
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreateRequest {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price_minor: i64,
    #[serde(default)]
    pub tax_rate_bps: i32,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub quantity_available: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdateRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price_minor: Option<i64>,
    pub tax_rate_bps: Option<i32>,
    pub currency: Option<String>,
    pub quantity_available: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price_minor: i64,
    pub tax_rate_bps: i32,
    pub currency: String,
    pub quantity_available: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.product_id.to_string(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            unit_price_minor: product.unit_price_minor,
            tax_rate_bps: product.tax_rate_bps,
            currency: product.currency.as_str().to_string(),
            quantity_available: product.quantity_available,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

// ============================================================================
// Invoices
// ============================================================================

/// Manually specified invoice line
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceItemRequest {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity_thousandths: i64,
    #[serde(default)]
    pub unit_price_minor: i64,
    #[serde(default)]
    pub tax_rate_bps: i32,
}

/// Catalog product reference for invoice creation
#[derive(Debug, Clone, Deserialize)]
pub struct ProductItemReference {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity_thousandths: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceCreateRequest {
    pub client_id: Uuid,
    /// Auto-generated when absent
    pub number: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub notes: Option<String>,
    pub payment_link: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItemRequest>,
    #[serde(default)]
    pub product_items: Vec<ProductItemReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceUpdateRequest {
    pub client_id: Option<Uuid>,
    pub number: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub payment_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceListQuery {
    pub status: Option<InvoiceStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItemResponse {
    pub product_id: Option<String>,
    pub description: String,
    pub quantity_thousandths: i64,
    pub unit_price_minor: i64,
    pub tax_rate_bps: i32,
    pub amount_minor: i64,
}

impl From<&InvoiceItem> for InvoiceItemResponse {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            product_id: item.product_id.map(|id| id.to_string()),
            description: item.description.clone(),
            quantity_thousandths: item.quantity_thousandths,
            unit_price_minor: item.unit_price_minor,
            tax_rate_bps: item.tax_rate_bps,
            amount_minor: item.amount_minor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceEventResponse {
    pub action: String,
    pub at: DateTime<Utc>,
    pub detail: Option<String>,
}

impl From<&InvoiceEvent> for InvoiceEventResponse {
    fn from(event: &InvoiceEvent) -> Self {
        Self {
            action: event.action.clone(),
            at: event.at,
            detail: event.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub client_id: String,
    pub number: String,
    pub status: InvoiceStatus,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub currency: String,
    pub subtotal_minor: i64,
    pub tax_minor: i64,
    pub total_minor: i64,
    pub notes: Option<String>,
    pub payment_link: Option<String>,
    pub items: Vec<InvoiceItemResponse>,
    pub events: Vec<InvoiceEventResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.invoice_id.to_string(),
            client_id: invoice.client_id.to_string(),
            number: invoice.number.clone(),
            status: invoice.status,
            issued_date: invoice.issued_date,
            due_date: invoice.due_date,
            currency: invoice.currency.as_str().to_string(),
            subtotal_minor: invoice.subtotal_minor,
            tax_minor: invoice.tax_minor,
            total_minor: invoice.total_minor,
            notes: invoice.notes.clone(),
            payment_link: invoice.payment_link.clone(),
            items: invoice.items.iter().map(Into::into).collect(),
            events: invoice.events.iter().map(Into::into).collect(),
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusTotalResponse {
    pub status: InvoiceStatus,
    pub count: i64,
    pub total_minor: i64,
}

impl From<&StatusTotal> for StatusTotalResponse {
    fn from(entry: &StatusTotal) -> Self {
        Self {
            status: entry.status,
            count: entry.count,
            total_minor: entry.total_minor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceStatsResponse {
    pub total_count: i64,
    pub by_status: Vec<StatusTotalResponse>,
}

// ============================================================================
// Expenses
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseCreateRequest {
    pub category: String,
    pub description: String,
    pub amount_minor: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub vendor: Option<String>,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseUpdateRequest {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount_minor: Option<i64>,
    pub currency: Option<String>,
    pub vendor: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseListQuery {
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseResponse {
    pub id: String,
    pub category: String,
    pub description: String,
    pub amount_minor: i64,
    pub currency: String,
    pub vendor: Option<String>,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.expense_id.to_string(),
            category: expense.category.clone(),
            description: expense.description.clone(),
            amount_minor: expense.amount_minor,
            currency: expense.currency.as_str().to_string(),
            vendor: expense.vendor.clone(),
            date: expense.date,
            receipt_url: expense.receipt_url.clone(),
            tags: expense.tags.clone(),
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyTotalResponse {
    pub currency: String,
    pub amount_minor: i64,
}

impl From<&CurrencyTotal> for CurrencyTotalResponse {
    fn from(entry: &CurrencyTotal) -> Self {
        Self {
            currency: entry.currency.clone(),
            amount_minor: entry.amount_minor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotalResponse {
    pub category: String,
    pub amount_minor: i64,
    pub count: i64,
}

impl From<&CategoryTotal> for CategoryTotalResponse {
    fn from(entry: &CategoryTotal) -> Self {
        Self {
            category: entry.category.clone(),
            amount_minor: entry.amount_minor,
            count: entry.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSummaryResponse {
    pub total_count: i64,
    pub totals: Vec<CurrencyTotalResponse>,
    pub by_category: Vec<CategoryTotalResponse>,
}

impl From<&ExpenseSummary> for ExpenseSummaryResponse {
    fn from(summary: &ExpenseSummary) -> Self {
        Self {
            total_count: summary.total_count,
            totals: summary.totals.iter().map(Into::into).collect(),
            by_category: summary.by_category.iter().map(Into::into).collect(),
        }
    }
}
