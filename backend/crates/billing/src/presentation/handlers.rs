//! HTTP Handlers
//!
//! Thin handlers over the repository traits. The authenticated user
//! arrives via the auth middleware's `CurrentUser` extension; every
//! repository call is scoped to it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use auth::CurrentUser;
use auth::models::user_id::UserId;

use crate::domain::entity::client::Client;
use crate::domain::entity::expense::Expense;
use crate::domain::entity::invoice::{Invoice, InvoiceItem};
use crate::domain::entity::product::Product;
use crate::domain::repository::{
    ClientRepository, ExpenseFilter, ExpenseRepository, InvoiceRepository, Page,
    ProductRepository,
};
use crate::domain::value_object::{Currency, normalize_category, normalize_tags};
use crate::error::{BillingError, BillingResult};
use crate::presentation::dto::{
    ClientCreateRequest, ClientResponse, ClientStats, ClientStatsResponse, ClientUpdateRequest,
    ExpenseCreateRequest, ExpenseListQuery, ExpenseResponse, ExpenseSummaryResponse,
    ExpenseUpdateRequest, InvoiceCreateRequest, InvoiceListQuery, InvoiceResponse,
    InvoiceStatsResponse, InvoiceUpdateRequest, PageQuery, ProductCreateRequest,
    ProductListQuery, ProductResponse, ProductUpdateRequest, StatusTotalResponse,
};

/// Shared state for billing handlers
#[derive(Clone)]
pub struct BillingAppState<R>
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
    pub repo: Arc<R>,
}

/// Maximum page size
const MAX_LIMIT: i64 = 100;

fn page(limit: i64, skip: i64) -> Page {
    Page {
        limit: limit.clamp(1, MAX_LIMIT),
        skip: skip.max(0),
    }
}

fn owner(current: &CurrentUser) -> UserId {
    current.0.user_id
}

/// Ten thousand basis points = 100%
const MAX_TAX_RATE_BPS: i32 = 10_000;

fn validate_tax_rate(tax_rate_bps: i32) -> BillingResult<()> {
    if !(0..=MAX_TAX_RATE_BPS).contains(&tax_rate_bps) {
        return Err(BillingError::Validation(
            "Tax rate must be between 0 and 10000 basis points".to_string(),
        ));
    }
    Ok(())
}

fn validate_non_negative(value: i64, field: &str) -> BillingResult<()> {
    if value < 0 {
        return Err(BillingError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(())
}

fn validate_required(value: &str, field: &str) -> BillingResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BillingError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Clients
// ============================================================================

/// GET /v1/clients
pub async fn list_clients<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> BillingResult<Json<Vec<ClientResponse>>>
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
    let clients = state
        .repo
        .list_clients(&owner(&current), page(query.limit, query.skip))
        .await?;

    Ok(Json(clients.iter().map(ClientResponse::from).collect()))
}

/// GET /v1/clients/stats
pub async fn client_stats<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> BillingResult<Json<ClientStatsResponse>>
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
    let total_count = state.repo.count_clients(&owner(&current)).await?;

    Ok(Json(ClientStatsResponse {
        stats: ClientStats { total_count },
    }))
}

/// POST /v1/clients
pub async fn create_client<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ClientCreateRequest>,
) -> BillingResult<impl IntoResponse>
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
    let name = validate_required(&req.name, "Client name")?;

    let client = Client::new(owner(&current), name, req.email, req.phone, req.address);
    state.repo.create_client(&client).await?;

    tracing::debug!(client_id = %client.client_id, "Client created");

    Ok((StatusCode::CREATED, Json(ClientResponse::from(&client))))
}

/// GET /v1/clients/{id}
pub async fn get_client<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(client_id): Path<Uuid>,
) -> BillingResult<Json<ClientResponse>>
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
    let client = state
        .repo
        .find_client(&owner(&current), client_id)
        .await?
        .ok_or(BillingError::NotFound("Client"))?;

    Ok(Json(ClientResponse::from(&client)))
}

/// PUT /v1/clients/{id}
pub async fn update_client<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(client_id): Path<Uuid>,
    Json(req): Json<ClientUpdateRequest>,
) -> BillingResult<Json<ClientResponse>>
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
    let mut client = state
        .repo
        .find_client(&owner(&current), client_id)
        .await?
        .ok_or(BillingError::NotFound("Client"))?;

    if let Some(name) = req.name {
        client.name = validate_required(&name, "Client name")?;
    }
    if let Some(email) = req.email {
        client.email = Some(email);
    }
    if let Some(phone) = req.phone {
        client.phone = Some(phone);
    }
    if let Some(address) = req.address {
        client.address = Some(address);
    }
    client.touch();

    state.repo.update_client(&client).await?;

    Ok(Json(ClientResponse::from(&client)))
}

/// DELETE /v1/clients/{id}
pub async fn delete_client<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(client_id): Path<Uuid>,
) -> BillingResult<StatusCode>
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
    if !state.repo.delete_client(&owner(&current), client_id).await? {
        return Err(BillingError::NotFound("Client"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Products
// ============================================================================

/// GET /v1/products
pub async fn list_products<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ProductListQuery>,
) -> BillingResult<Json<Vec<ProductResponse>>>
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
    let products = state
        .repo
        .list_products(
            &owner(&current),
            query.category.as_deref(),
            query.is_active,
            page(query.limit, query.skip),
        )
        .await?;

    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// POST /v1/products
pub async fn create_product<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ProductCreateRequest>,
) -> BillingResult<impl IntoResponse>
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
    let user_id = owner(&current);

    let sku = validate_required(&req.sku, "SKU")?;
    let name = validate_required(&req.name, "Product name")?;
    validate_non_negative(req.unit_price_minor, "Unit price")?;
    validate_non_negative(req.quantity_available, "Quantity available")?;
    validate_tax_rate(req.tax_rate_bps)?;
    let currency = Currency::new(req.currency)?;

    if state.repo.sku_exists(&user_id, &sku, None).await? {
        return Err(BillingError::DuplicateSku);
    }

    let product = Product::new(
        user_id,
        sku,
        name,
        req.description,
        req.category,
        req.unit_price_minor,
        req.tax_rate_bps,
        currency,
        req.quantity_available,
        req.is_active,
    );
    state.repo.create_product(&product).await?;

    tracing::debug!(product_id = %product.product_id, sku = %product.sku, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// GET /v1/products/{id}
pub async fn get_product<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> BillingResult<Json<ProductResponse>>
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
    let product = state
        .repo
        .find_product(&owner(&current), product_id)
        .await?
        .ok_or(BillingError::NotFound("Product"))?;

    Ok(Json(ProductResponse::from(&product)))
}

/// PUT /v1/products/{id}
pub async fn update_product<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<ProductUpdateRequest>,
) -> BillingResult<Json<ProductResponse>>
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
    let user_id = owner(&current);

    let mut product = state
        .repo
        .find_product(&user_id, product_id)
        .await?
        .ok_or(BillingError::NotFound("Product"))?;

    if let Some(sku) = req.sku {
        let sku = validate_required(&sku, "SKU")?;
        if state
            .repo
            .sku_exists(&user_id, &sku, Some(product_id))
            .await?
        {
            return Err(BillingError::DuplicateSku);
        }
        product.sku = sku;
    }
    if let Some(name) = req.name {
        product.name = validate_required(&name, "Product name")?;
    }
    if let Some(description) = req.description {
        product.description = Some(description);
    }
    if let Some(category) = req.category {
        product.category = Some(category);
    }
    if let Some(unit_price_minor) = req.unit_price_minor {
        validate_non_negative(unit_price_minor, "Unit price")?;
        product.unit_price_minor = unit_price_minor;
    }
    if let Some(tax_rate_bps) = req.tax_rate_bps {
        validate_tax_rate(tax_rate_bps)?;
        product.tax_rate_bps = tax_rate_bps;
    }
    if let Some(currency) = req.currency {
        product.currency = Currency::new(currency)?;
    }
    if let Some(quantity_available) = req.quantity_available {
        validate_non_negative(quantity_available, "Quantity available")?;
        product.quantity_available = quantity_available;
    }
    if let Some(is_active) = req.is_active {
        product.is_active = is_active;
    }
    product.touch();

    state.repo.update_product(&product).await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /v1/products/{id}
pub async fn delete_product<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> BillingResult<StatusCode>
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
    if !state
        .repo
        .delete_product(&owner(&current), product_id)
        .await?
    {
        return Err(BillingError::NotFound("Product"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Invoices
// ============================================================================

/// GET /v1/invoices
pub async fn list_invoices<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<InvoiceListQuery>,
) -> BillingResult<Json<Vec<InvoiceResponse>>>
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
    let invoices = state
        .repo
        .list_invoices(&owner(&current), query.status, page(query.limit, query.skip))
        .await?;

    Ok(Json(invoices.iter().map(InvoiceResponse::from).collect()))
}

/// GET /v1/invoices/stats
pub async fn invoice_stats<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> BillingResult<Json<InvoiceStatsResponse>>
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
    let by_status = state.repo.invoice_stats(&owner(&current)).await?;
    let total_count = by_status.iter().map(|s| s.count).sum();

    Ok(Json(InvoiceStatsResponse {
        total_count,
        by_status: by_status.iter().map(StatusTotalResponse::from).collect(),
    }))
}

/// POST /v1/invoices
pub async fn create_invoice<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<InvoiceCreateRequest>,
) -> BillingResult<impl IntoResponse>
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
    let user_id = owner(&current);

    // The referenced client must belong to this user
    state
        .repo
        .find_client(&user_id, req.client_id)
        .await?
        .ok_or(BillingError::NotFound("Client"))?;

    let currency = Currency::new(req.currency)?;

    let mut items = Vec::new();
    for item in &req.items {
        let description = validate_required(&item.description, "Item description")?;
        if item.quantity_thousandths <= 0 {
            return Err(BillingError::Validation(
                "Item quantity must be positive".to_string(),
            ));
        }
        validate_non_negative(item.unit_price_minor, "Item unit price")?;
        validate_tax_rate(item.tax_rate_bps)?;

        items.push(InvoiceItem::new(
            None,
            description,
            item.quantity_thousandths,
            item.unit_price_minor,
            item.tax_rate_bps,
        ));
    }

    // Catalog lines take description, price and tax from the product
    for reference in &req.product_items {
        if reference.quantity_thousandths <= 0 {
            return Err(BillingError::Validation(
                "Item quantity must be positive".to_string(),
            ));
        }

        let product = state
            .repo
            .find_product(&user_id, reference.product_id)
            .await?
            .ok_or(BillingError::NotFound("Product"))?;

        items.push(InvoiceItem::new(
            Some(reference.product_id),
            product.name.clone(),
            reference.quantity_thousandths,
            product.unit_price_minor,
            product.tax_rate_bps,
        ));
    }

    let number = match req.number {
        Some(number) => {
            let number = validate_required(&number, "Invoice number")?;
            if state.repo.number_exists(&user_id, &number).await? {
                return Err(BillingError::DuplicateNumber);
            }
            number
        }
        None => next_invoice_number(&state, &user_id).await?,
    };

    let invoice = Invoice::new(
        user_id,
        req.client_id,
        number,
        req.status,
        req.issued_date,
        req.due_date,
        currency,
        req.notes,
        req.payment_link,
        items,
    );
    state.repo.create_invoice(&invoice).await?;

    tracing::debug!(invoice_id = %invoice.invoice_id, number = %invoice.number, "Invoice created");

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(&invoice))))
}

/// GET /v1/invoices/{id}
pub async fn get_invoice<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(invoice_id): Path<Uuid>,
) -> BillingResult<Json<InvoiceResponse>>
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
    let invoice = state
        .repo
        .find_invoice(&owner(&current), invoice_id)
        .await?
        .ok_or(BillingError::NotFound("Invoice"))?;

    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// PUT /v1/invoices/{id}
pub async fn update_invoice<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(invoice_id): Path<Uuid>,
    Json(req): Json<InvoiceUpdateRequest>,
) -> BillingResult<Json<InvoiceResponse>>
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
    let user_id = owner(&current);

    let mut invoice = state
        .repo
        .find_invoice(&user_id, invoice_id)
        .await?
        .ok_or(BillingError::NotFound("Invoice"))?;

    let mut header_changed = false;

    if let Some(client_id) = req.client_id {
        state
            .repo
            .find_client(&user_id, client_id)
            .await?
            .ok_or(BillingError::NotFound("Client"))?;
        invoice.client_id = client_id;
        header_changed = true;
    }
    if let Some(number) = req.number {
        let number = validate_required(&number, "Invoice number")?;
        if number != invoice.number {
            if state.repo.number_exists(&user_id, &number).await? {
                return Err(BillingError::DuplicateNumber);
            }
            invoice.number = number;
            header_changed = true;
        }
    }
    if let Some(issued_date) = req.issued_date {
        invoice.issued_date = Some(issued_date);
        header_changed = true;
    }
    if let Some(due_date) = req.due_date {
        invoice.due_date = Some(due_date);
        header_changed = true;
    }
    if let Some(notes) = req.notes {
        invoice.notes = Some(notes);
        header_changed = true;
    }
    if let Some(payment_link) = req.payment_link {
        invoice.payment_link = Some(payment_link);
        header_changed = true;
    }

    if header_changed {
        invoice.record_update();
    }

    // Status last, so the status_changed event follows the updated one
    if let Some(status) = req.status {
        invoice.change_status(status);
    }

    state.repo.update_invoice(&invoice).await?;

    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// DELETE /v1/invoices/{id}
pub async fn delete_invoice<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(invoice_id): Path<Uuid>,
) -> BillingResult<StatusCode>
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
    if !state
        .repo
        .delete_invoice(&owner(&current), invoice_id)
        .await?
    {
        return Err(BillingError::NotFound("Invoice"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Generate the next free `INV-NNNN` number for a user
async fn next_invoice_number<R>(
    state: &BillingAppState<R>,
    user_id: &UserId,
) -> BillingResult<String>
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
    const MAX_ATTEMPTS: i64 = 1_000;

    let mut candidate = state.repo.count_invoices(user_id).await? + 1;
    for _ in 0..MAX_ATTEMPTS {
        let number = format!("INV-{:04}", candidate);
        if !state.repo.number_exists(user_id, &number).await? {
            return Ok(number);
        }
        candidate += 1;
    }

    Err(BillingError::Internal(
        "Could not allocate an invoice number".to_string(),
    ))
}

// ============================================================================
// Expenses
// ============================================================================

/// GET /v1/expenses
pub async fn list_expenses<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ExpenseListQuery>,
) -> BillingResult<Json<Vec<ExpenseResponse>>>
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
    let filter = ExpenseFilter {
        category: query.category.map(|c| normalize_category(&c)).transpose()?,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let expenses = state
        .repo
        .list_expenses(&owner(&current), &filter, page(query.limit, query.skip))
        .await?;

    Ok(Json(expenses.iter().map(ExpenseResponse::from).collect()))
}

/// GET /v1/expenses/summary
pub async fn expense_summary<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> BillingResult<Json<ExpenseSummaryResponse>>
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
    let summary = state.repo.expense_summary(&owner(&current)).await?;

    Ok(Json(ExpenseSummaryResponse::from(&summary)))
}

/// GET /v1/expenses/categories
pub async fn expense_categories<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> BillingResult<Json<Vec<String>>>
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
    let categories = state.repo.expense_categories(&owner(&current)).await?;

    Ok(Json(categories))
}

/// POST /v1/expenses
pub async fn create_expense<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ExpenseCreateRequest>,
) -> BillingResult<impl IntoResponse>
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
    let category = normalize_category(&req.category)?;
    let description = validate_required(&req.description, "Description")?;
    if req.amount_minor <= 0 {
        return Err(BillingError::Validation(
            "Amount must be positive".to_string(),
        ));
    }
    let currency = Currency::new(req.currency)?;

    let expense = Expense::new(
        owner(&current),
        category,
        description,
        req.amount_minor,
        currency,
        req.vendor,
        req.date,
        req.receipt_url,
        normalize_tags(&req.tags),
    );
    state.repo.create_expense(&expense).await?;

    tracing::debug!(expense_id = %expense.expense_id, "Expense created");

    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(&expense))))
}

/// GET /v1/expenses/{id}
pub async fn get_expense<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(expense_id): Path<Uuid>,
) -> BillingResult<Json<ExpenseResponse>>
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
    let expense = state
        .repo
        .find_expense(&owner(&current), expense_id)
        .await?
        .ok_or(BillingError::NotFound("Expense"))?;

    Ok(Json(ExpenseResponse::from(&expense)))
}

/// PUT /v1/expenses/{id}
pub async fn update_expense<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(expense_id): Path<Uuid>,
    Json(req): Json<ExpenseUpdateRequest>,
) -> BillingResult<Json<ExpenseResponse>>
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
    let mut expense = state
        .repo
        .find_expense(&owner(&current), expense_id)
        .await?
        .ok_or(BillingError::NotFound("Expense"))?;

    if let Some(category) = req.category {
        expense.category = normalize_category(&category)?;
    }
    if let Some(description) = req.description {
        expense.description = validate_required(&description, "Description")?;
    }
    if let Some(amount_minor) = req.amount_minor {
        if amount_minor <= 0 {
            return Err(BillingError::Validation(
                "Amount must be positive".to_string(),
            ));
        }
        expense.amount_minor = amount_minor;
    }
    if let Some(currency) = req.currency {
        expense.currency = Currency::new(currency)?;
    }
    if let Some(vendor) = req.vendor {
        expense.vendor = Some(vendor);
    }
    if let Some(date) = req.date {
        expense.date = date;
    }
    if let Some(receipt_url) = req.receipt_url {
        expense.receipt_url = Some(receipt_url);
    }
    if let Some(tags) = req.tags {
        expense.tags = normalize_tags(&tags);
    }
    expense.touch();

    state.repo.update_expense(&expense).await?;

    Ok(Json(ExpenseResponse::from(&expense)))
}

/// DELETE /v1/expenses/{id}
pub async fn delete_expense<R>(
    State(state): State<BillingAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(expense_id): Path<Uuid>,
) -> BillingResult<StatusCode>
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
    if !state
        .repo
        .delete_expense(&owner(&current), expense_id)
        .await?
    {
        return Err(BillingError::NotFound("Expense"));
    }

    Ok(StatusCode::NO_CONTENT)
}
