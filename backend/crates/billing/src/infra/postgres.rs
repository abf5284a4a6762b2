//! PostgreSQL Repository Implementations

use auth::models::user_id::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::entity::client::Client;
use crate::domain::entity::expense::Expense;
use crate::domain::entity::invoice::{Invoice, InvoiceEvent, InvoiceItem};
use crate::domain::entity::product::Product;
use crate::domain::repository::{
    CategoryTotal, ClientRepository, CurrencyTotal, ExpenseFilter, ExpenseRepository,
    ExpenseSummary, InvoiceRepository, Page, ProductRepository, StatusTotal,
};
use crate::domain::value_object::{Currency, InvoiceStatus};
use crate::error::{BillingError, BillingResult};

/// PostgreSQL-backed billing repository
#[derive(Clone)]
pub struct PgBillingRepository {
    pool: PgPool,
}

impl PgBillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Client Repository Implementation
// ============================================================================

impl ClientRepository for PgBillingRepository {
    async fn create_client(&self, client: &Client) -> BillingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (
                client_id, user_id, name, email, phone, address, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(client.client_id.as_uuid())
        .bind(client.user_id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_client(&self, user_id: &UserId, client_id: Uuid) -> BillingResult<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, user_id, name, email, phone, address, created_at, updated_at
            FROM clients
            WHERE client_id = $1 AND user_id = $2
            "#,
        )
        .bind(client_id)
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_client()))
    }

    async fn list_clients(&self, user_id: &UserId, page: Page) -> BillingResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, user_id, name, email, phone, address, created_at, updated_at
            FROM clients
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_client()).collect())
    }

    async fn update_client(&self, client: &Client) -> BillingResult<()> {
        sqlx::query(
            r#"
            UPDATE clients SET
                name = $3,
                email = $4,
                phone = $5,
                address = $6,
                updated_at = $7
            WHERE client_id = $1 AND user_id = $2
            "#,
        )
        .bind(client.client_id.as_uuid())
        .bind(client.user_id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_client(&self, user_id: &UserId, client_id: Uuid) -> BillingResult<bool> {
        let deleted = sqlx::query("DELETE FROM clients WHERE client_id = $1 AND user_id = $2")
            .bind(client_id)
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn count_clients(&self, user_id: &UserId) -> BillingResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// ============================================================================
// Product Repository Implementation
// ============================================================================

impl ProductRepository for PgBillingRepository {
    async fn create_product(&self, product: &Product) -> BillingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id, user_id, sku, name, description, category,
                unit_price_minor, tax_rate_bps, currency, quantity_available,
                is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.user_id.as_uuid())
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.unit_price_minor)
        .bind(product.tax_rate_bps)
        .bind(product.currency.as_str())
        .bind(product.quantity_available)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_product(&self, user_id: &UserId, product_id: Uuid) -> BillingResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{} WHERE product_id = $1 AND user_id = $2",
            SELECT_PRODUCT
        ))
        .bind(product_id)
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_product()))
    }

    async fn list_products(
        &self,
        user_id: &UserId,
        category: Option<&str>,
        is_active: Option<bool>,
        page: Page,
    ) -> BillingResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            {}
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::bool IS NULL OR is_active = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            SELECT_PRODUCT
        ))
        .bind(user_id.as_uuid())
        .bind(category)
        .bind(is_active)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_product()).collect())
    }

    async fn update_product(&self, product: &Product) -> BillingResult<()> {
        sqlx::query(
            r#"
            UPDATE products SET
                sku = $3,
                name = $4,
                description = $5,
                category = $6,
                unit_price_minor = $7,
                tax_rate_bps = $8,
                currency = $9,
                quantity_available = $10,
                is_active = $11,
                updated_at = $12
            WHERE product_id = $1 AND user_id = $2
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.user_id.as_uuid())
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.unit_price_minor)
        .bind(product.tax_rate_bps)
        .bind(product.currency.as_str())
        .bind(product.quantity_available)
        .bind(product.is_active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_product(&self, user_id: &UserId, product_id: Uuid) -> BillingResult<bool> {
        let deleted = sqlx::query("DELETE FROM products WHERE product_id = $1 AND user_id = $2")
            .bind(product_id)
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn sku_exists(
        &self,
        user_id: &UserId,
        sku: &str,
        exclude: Option<Uuid>,
    ) -> BillingResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM products
                WHERE user_id = $1 AND sku = $2
                  AND ($3::uuid IS NULL OR product_id != $3)
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(sku)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Invoice Repository Implementation
// ============================================================================

impl InvoiceRepository for PgBillingRepository {
    async fn create_invoice(&self, invoice: &Invoice) -> BillingResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_id, user_id, client_id, number, status,
                issued_date, due_date, currency,
                subtotal_minor, tax_minor, total_minor,
                notes, payment_link, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(invoice.invoice_id.as_uuid())
        .bind(invoice.user_id.as_uuid())
        .bind(invoice.client_id)
        .bind(&invoice.number)
        .bind(invoice.status.as_str())
        .bind(invoice.issued_date)
        .bind(invoice.due_date)
        .bind(invoice.currency.as_str())
        .bind(invoice.subtotal_minor)
        .bind(invoice.tax_minor)
        .bind(invoice.total_minor)
        .bind(&invoice.notes)
        .bind(&invoice.payment_link)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, invoice).await?;
        insert_events(&mut tx, invoice).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_invoice(&self, user_id: &UserId, invoice_id: Uuid) -> BillingResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} WHERE invoice_id = $1 AND user_id = $2",
            SELECT_INVOICE
        ))
        .bind(invoice_id)
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut children = self.load_children(&[invoice_id]).await?;
        let (items, events) = children.remove(&invoice_id).unwrap_or_default();

        Ok(Some(row.into_invoice(items, events)?))
    }

    async fn list_invoices(
        &self,
        user_id: &UserId,
        status: Option<InvoiceStatus>,
        page: Page,
    ) -> BillingResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            {}
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            SELECT_INVOICE
        ))
        .bind(user_id.as_uuid())
        .bind(status.map(|s| s.as_str()))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.invoice_id).collect();
        let mut children = self.load_children(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let (items, events) = children.remove(&row.invoice_id).unwrap_or_default();
                row.into_invoice(items, events)
            })
            .collect()
    }

    async fn update_invoice(&self, invoice: &Invoice) -> BillingResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE invoices SET
                client_id = $3,
                number = $4,
                status = $5,
                issued_date = $6,
                due_date = $7,
                currency = $8,
                subtotal_minor = $9,
                tax_minor = $10,
                total_minor = $11,
                notes = $12,
                payment_link = $13,
                updated_at = $14
            WHERE invoice_id = $1 AND user_id = $2
            "#,
        )
        .bind(invoice.invoice_id.as_uuid())
        .bind(invoice.user_id.as_uuid())
        .bind(invoice.client_id)
        .bind(&invoice.number)
        .bind(invoice.status.as_str())
        .bind(invoice.issued_date)
        .bind(invoice.due_date)
        .bind(invoice.currency.as_str())
        .bind(invoice.subtotal_minor)
        .bind(invoice.tax_minor)
        .bind(invoice.total_minor)
        .bind(&invoice.notes)
        .bind(&invoice.payment_link)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        // Items and events are replaced wholesale; both are small and
        // fully owned by the header row.
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(invoice.invoice_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM invoice_events WHERE invoice_id = $1")
            .bind(invoice.invoice_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        insert_items(&mut tx, invoice).await?;
        insert_events(&mut tx, invoice).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_invoice(&self, user_id: &UserId, invoice_id: Uuid) -> BillingResult<bool> {
        let deleted = sqlx::query("DELETE FROM invoices WHERE invoice_id = $1 AND user_id = $2")
            .bind(invoice_id)
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn count_invoices(&self, user_id: &UserId) -> BillingResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn number_exists(&self, user_id: &UserId, number: &str) -> BillingResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM invoices WHERE user_id = $1 AND number = $2)",
        )
        .bind(user_id.as_uuid())
        .bind(number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn invoice_stats(&self, user_id: &UserId) -> BillingResult<Vec<StatusTotal>> {
        let rows = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT status, COUNT(*), COALESCE(SUM(total_minor), 0)
            FROM invoices
            WHERE user_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(status, count, total_minor)| {
                Ok(StatusTotal {
                    status: InvoiceStatus::parse(&status)
                        .map_err(|e| BillingError::Internal(e.to_string()))?,
                    count,
                    total_minor,
                })
            })
            .collect()
    }
}

impl PgBillingRepository {
    /// Load items and events for a set of invoices in two queries
    async fn load_children(
        &self,
        ids: &[Uuid],
    ) -> BillingResult<HashMap<Uuid, (Vec<InvoiceItem>, Vec<InvoiceEvent>)>> {
        let mut children: HashMap<Uuid, (Vec<InvoiceItem>, Vec<InvoiceEvent>)> = HashMap::new();

        if ids.is_empty() {
            return Ok(children);
        }

        let item_rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT invoice_id, product_id, description,
                   quantity_thousandths, unit_price_minor, tax_rate_bps, amount_minor
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        for row in item_rows {
            children
                .entry(row.invoice_id)
                .or_default()
                .0
                .push(row.into_item());
        }

        let event_rows = sqlx::query_as::<_, InvoiceEventRow>(
            r#"
            SELECT invoice_id, action, at, detail
            FROM invoice_events
            WHERE invoice_id = ANY($1)
            ORDER BY at
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        for row in event_rows {
            children
                .entry(row.invoice_id)
                .or_default()
                .1
                .push(row.into_event());
        }

        Ok(children)
    }
}

async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    invoice: &Invoice,
) -> BillingResult<()> {
    for (position, item) in invoice.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                invoice_id, position, product_id, description,
                quantity_thousandths, unit_price_minor, tax_rate_bps, amount_minor
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invoice.invoice_id.as_uuid())
        .bind(position as i32)
        .bind(item.product_id)
        .bind(&item.description)
        .bind(item.quantity_thousandths)
        .bind(item.unit_price_minor)
        .bind(item.tax_rate_bps)
        .bind(item.amount_minor)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_events(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    invoice: &Invoice,
) -> BillingResult<()> {
    for event in &invoice.events {
        sqlx::query(
            r#"
            INSERT INTO invoice_events (invoice_id, action, at, detail)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(invoice.invoice_id.as_uuid())
        .bind(&event.action)
        .bind(event.at)
        .bind(&event.detail)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

// ============================================================================
// Expense Repository Implementation
// ============================================================================

impl ExpenseRepository for PgBillingRepository {
    async fn create_expense(&self, expense: &Expense) -> BillingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (
                expense_id, user_id, category, description, amount_minor,
                currency, vendor, date, receipt_url, tags, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(expense.expense_id.as_uuid())
        .bind(expense.user_id.as_uuid())
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_minor)
        .bind(expense.currency.as_str())
        .bind(&expense.vendor)
        .bind(expense.date)
        .bind(&expense.receipt_url)
        .bind(&expense.tags)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_expense(&self, user_id: &UserId, expense_id: Uuid) -> BillingResult<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "{} WHERE expense_id = $1 AND user_id = $2",
            SELECT_EXPENSE
        ))
        .bind(expense_id)
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_expense()))
    }

    async fn list_expenses(
        &self,
        user_id: &UserId,
        filter: &ExpenseFilter,
        page: Page,
    ) -> BillingResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            {}
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::date IS NULL OR date >= $3)
              AND ($4::date IS NULL OR date <= $4)
            ORDER BY date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
            SELECT_EXPENSE
        ))
        .bind(user_id.as_uuid())
        .bind(&filter.category)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_expense()).collect())
    }

    async fn update_expense(&self, expense: &Expense) -> BillingResult<()> {
        sqlx::query(
            r#"
            UPDATE expenses SET
                category = $3,
                description = $4,
                amount_minor = $5,
                currency = $6,
                vendor = $7,
                date = $8,
                receipt_url = $9,
                tags = $10,
                updated_at = $11
            WHERE expense_id = $1 AND user_id = $2
            "#,
        )
        .bind(expense.expense_id.as_uuid())
        .bind(expense.user_id.as_uuid())
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_minor)
        .bind(expense.currency.as_str())
        .bind(&expense.vendor)
        .bind(expense.date)
        .bind(&expense.receipt_url)
        .bind(&expense.tags)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_expense(&self, user_id: &UserId, expense_id: Uuid) -> BillingResult<bool> {
        let deleted = sqlx::query("DELETE FROM expenses WHERE expense_id = $1 AND user_id = $2")
            .bind(expense_id)
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn expense_summary(&self, user_id: &UserId) -> BillingResult<ExpenseSummary> {
        let total_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM expenses WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        let totals = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT currency, COALESCE(SUM(amount_minor), 0)
            FROM expenses
            WHERE user_id = $1
            GROUP BY currency
            ORDER BY currency
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(currency, amount_minor)| CurrencyTotal {
            currency,
            amount_minor,
        })
        .collect();

        let by_category = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT category, COALESCE(SUM(amount_minor), 0), COUNT(*)
            FROM expenses
            WHERE user_id = $1
            GROUP BY category
            ORDER BY 2 DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(category, amount_minor, count)| CategoryTotal {
            category,
            amount_minor,
            count,
        })
        .collect();

        Ok(ExpenseSummary {
            total_count,
            totals,
            by_category,
        })
    }

    async fn expense_categories(&self, user_id: &UserId) -> BillingResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM expenses WHERE user_id = $1 ORDER BY category",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

const SELECT_PRODUCT: &str = r#"
    SELECT product_id, user_id, sku, name, description, category,
           unit_price_minor, tax_rate_bps, currency, quantity_available,
           is_active, created_at, updated_at
    FROM products
"#;

const SELECT_INVOICE: &str = r#"
    SELECT invoice_id, user_id, client_id, number, status,
           issued_date, due_date, currency,
           subtotal_minor, tax_minor, total_minor,
           notes, payment_link, created_at, updated_at
    FROM invoices
"#;

const SELECT_EXPENSE: &str = r#"
    SELECT expense_id, user_id, category, description, amount_minor,
           currency, vendor, date, receipt_url, tags, created_at, updated_at
    FROM expenses
"#;

#[derive(sqlx::FromRow)]
struct ClientRow {
    client_id: Uuid,
    user_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClientRow {
    fn into_client(self) -> Client {
        Client {
            client_id: self.client_id.into(),
            user_id: UserId::from_uuid(self.user_id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    user_id: Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    category: Option<String>,
    unit_price_minor: i64,
    tax_rate_bps: i32,
    currency: String,
    quantity_available: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: self.product_id.into(),
            user_id: UserId::from_uuid(self.user_id),
            sku: self.sku,
            name: self.name,
            description: self.description,
            category: self.category,
            unit_price_minor: self.unit_price_minor,
            tax_rate_bps: self.tax_rate_bps,
            currency: Currency::from_db(self.currency),
            quantity_available: self.quantity_available,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    invoice_id: Uuid,
    user_id: Uuid,
    client_id: Uuid,
    number: String,
    status: String,
    issued_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    currency: String,
    subtotal_minor: i64,
    tax_minor: i64,
    total_minor: i64,
    notes: Option<String>,
    payment_link: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(
        self,
        items: Vec<InvoiceItem>,
        events: Vec<InvoiceEvent>,
    ) -> BillingResult<Invoice> {
        let status = InvoiceStatus::parse(&self.status)
            .map_err(|e| BillingError::Internal(e.to_string()))?;

        Ok(Invoice {
            invoice_id: self.invoice_id.into(),
            user_id: UserId::from_uuid(self.user_id),
            client_id: self.client_id,
            number: self.number,
            status,
            issued_date: self.issued_date,
            due_date: self.due_date,
            currency: Currency::from_db(self.currency),
            subtotal_minor: self.subtotal_minor,
            tax_minor: self.tax_minor,
            total_minor: self.total_minor,
            notes: self.notes,
            payment_link: self.payment_link,
            items,
            events,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceItemRow {
    invoice_id: Uuid,
    product_id: Option<Uuid>,
    description: String,
    quantity_thousandths: i64,
    unit_price_minor: i64,
    tax_rate_bps: i32,
    amount_minor: i64,
}

impl InvoiceItemRow {
    fn into_item(self) -> InvoiceItem {
        InvoiceItem {
            product_id: self.product_id,
            description: self.description,
            quantity_thousandths: self.quantity_thousandths,
            unit_price_minor: self.unit_price_minor,
            tax_rate_bps: self.tax_rate_bps,
            amount_minor: self.amount_minor,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceEventRow {
    invoice_id: Uuid,
    action: String,
    at: DateTime<Utc>,
    detail: Option<String>,
}

impl InvoiceEventRow {
    fn into_event(self) -> InvoiceEvent {
        InvoiceEvent {
            action: self.action,
            at: self.at,
            detail: self.detail,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    expense_id: Uuid,
    user_id: Uuid,
    category: String,
    description: String,
    amount_minor: i64,
    currency: String,
    vendor: Option<String>,
    date: NaiveDate,
    receipt_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExpenseRow {
    fn into_expense(self) -> Expense {
        Expense {
            expense_id: self.expense_id.into(),
            user_id: UserId::from_uuid(self.user_id),
            category: self.category,
            description: self.description,
            amount_minor: self.amount_minor,
            currency: Currency::from_db(self.currency),
            vendor: self.vendor,
            date: self.date,
            receipt_url: self.receipt_url,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
