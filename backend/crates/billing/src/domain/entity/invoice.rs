//! Invoice Entity
//!
//! Invoice header, line items and an append-only event trail.
//! Quantities are thousandths of a unit; money is integer minor units;
//! tax rates are basis points.

use auth::models::user_id::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::InvoiceId;
use uuid::Uuid;

use crate::domain::value_object::{Currency, InvoiceStatus};

/// One unit expressed in quantity thousandths
pub const QUANTITY_UNIT: i64 = 1_000;

/// Basis points in a whole
const BPS_DENOMINATOR: i64 = 10_000;

/// Invoice line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceItem {
    /// Reference to the product catalog when the line came from it
    pub product_id: Option<Uuid>,
    pub description: String,
    /// Quantity in thousandths (1500 = 1.5 units)
    pub quantity_thousandths: i64,
    pub unit_price_minor: i64,
    pub tax_rate_bps: i32,
    /// Line total before tax, in minor units
    pub amount_minor: i64,
}

impl InvoiceItem {
    /// Build a line, computing the amount from quantity and unit price
    pub fn new(
        product_id: Option<Uuid>,
        description: String,
        quantity_thousandths: i64,
        unit_price_minor: i64,
        tax_rate_bps: i32,
    ) -> Self {
        Self {
            product_id,
            description,
            quantity_thousandths,
            unit_price_minor,
            tax_rate_bps,
            amount_minor: line_amount_minor(quantity_thousandths, unit_price_minor),
        }
    }

    /// Tax owed on this line, in minor units
    pub fn tax_minor(&self) -> i64 {
        (self.amount_minor as i128 * self.tax_rate_bps as i128 / BPS_DENOMINATOR as i128) as i64
    }
}

/// Line total before tax: quantity (thousandths) times unit price,
/// rounded down to a minor unit
pub fn line_amount_minor(quantity_thousandths: i64, unit_price_minor: i64) -> i64 {
    (quantity_thousandths as i128 * unit_price_minor as i128 / QUANTITY_UNIT as i128) as i64
}

/// Audit-trail event
#[derive(Debug, Clone)]
pub struct InvoiceEvent {
    /// "created", "status_changed", "updated", ...
    pub action: String,
    pub at: DateTime<Utc>,
    pub detail: Option<String>,
}

impl InvoiceEvent {
    pub fn now(action: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            action: action.into(),
            at: Utc::now(),
            detail,
        }
    }
}

/// Invoice entity
#[derive(Debug, Clone)]
pub struct Invoice {
    pub invoice_id: InvoiceId,
    pub user_id: UserId,
    pub client_id: Uuid,
    /// Unique per user
    pub number: String,
    pub status: InvoiceStatus,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub currency: Currency,
    pub subtotal_minor: i64,
    pub tax_minor: i64,
    pub total_minor: i64,
    pub notes: Option<String>,
    pub payment_link: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub events: Vec<InvoiceEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Create an invoice, computing totals from the line items and
    /// recording the `created` event
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        client_id: Uuid,
        number: String,
        status: InvoiceStatus,
        issued_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
        currency: Currency,
        notes: Option<String>,
        payment_link: Option<String>,
        items: Vec<InvoiceItem>,
    ) -> Self {
        let now = Utc::now();
        let (subtotal_minor, tax_minor) = totals(&items);

        Self {
            invoice_id: InvoiceId::new(),
            user_id,
            client_id,
            number,
            status,
            issued_date,
            due_date,
            currency,
            subtotal_minor,
            tax_minor,
            total_minor: subtotal_minor + tax_minor,
            notes,
            payment_link,
            items,
            events: vec![InvoiceEvent::now("created", None)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute totals after the line items changed
    pub fn recompute_totals(&mut self) {
        let (subtotal_minor, tax_minor) = totals(&self.items);
        self.subtotal_minor = subtotal_minor;
        self.tax_minor = tax_minor;
        self.total_minor = subtotal_minor + tax_minor;
        self.updated_at = Utc::now();
    }

    /// Change status, appending a `status_changed` event. No-op when
    /// the status is unchanged.
    pub fn change_status(&mut self, new_status: InvoiceStatus) {
        if self.status == new_status {
            return;
        }

        let detail = format!("{} -> {}", self.status, new_status);
        self.status = new_status;
        self.events
            .push(InvoiceEvent::now("status_changed", Some(detail)));
        self.updated_at = Utc::now();
    }

    pub fn record_update(&mut self) {
        self.events.push(InvoiceEvent::now("updated", None));
        self.updated_at = Utc::now();
    }
}

fn totals(items: &[InvoiceItem]) -> (i64, i64) {
    let subtotal = items.iter().map(|i| i.amount_minor).sum();
    let tax = items.iter().map(|i| i.tax_minor()).sum();
    (subtotal, tax)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity_thousandths: i64, unit_price_minor: i64, tax_rate_bps: i32) -> InvoiceItem {
        InvoiceItem::new(
            None,
            "Line".to_string(),
            quantity_thousandths,
            unit_price_minor,
            tax_rate_bps,
        )
    }

    #[test]
    fn test_line_amount_whole_quantity() {
        // 2 units at 15.00 -> 30.00
        assert_eq!(line_amount_minor(2_000, 1_500), 3_000);
    }

    #[test]
    fn test_line_amount_fractional_quantity() {
        // 1.5 units at 10.00 -> 15.00
        assert_eq!(line_amount_minor(1_500, 1_000), 1_500);
        // 0.333 units at 10.00 -> 3.33
        assert_eq!(line_amount_minor(333, 1_000), 333);
    }

    #[test]
    fn test_line_tax() {
        // 100.00 at 7.5% -> 7.50
        let line = item(1_000, 10_000, 750);
        assert_eq!(line.amount_minor, 10_000);
        assert_eq!(line.tax_minor(), 750);
    }

    #[test]
    fn test_invoice_totals() {
        let invoice = Invoice::new(
            UserId::new(),
            Uuid::new_v4(),
            "INV-0001".to_string(),
            InvoiceStatus::Draft,
            None,
            None,
            Currency::new("NGN").unwrap(),
            None,
            None,
            vec![item(1_000, 10_000, 750), item(2_000, 500, 0)],
        );

        assert_eq!(invoice.subtotal_minor, 11_000);
        assert_eq!(invoice.tax_minor, 750);
        assert_eq!(invoice.total_minor, 11_750);
        assert_eq!(invoice.events.len(), 1);
        assert_eq!(invoice.events[0].action, "created");
    }

    #[test]
    fn test_status_change_appends_event() {
        let mut invoice = Invoice::new(
            UserId::new(),
            Uuid::new_v4(),
            "INV-0001".to_string(),
            InvoiceStatus::Draft,
            None,
            None,
            Currency::new("NGN").unwrap(),
            None,
            None,
            vec![],
        );

        invoice.change_status(InvoiceStatus::Sent);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.events.len(), 2);
        assert_eq!(invoice.events[1].action, "status_changed");
        assert_eq!(invoice.events[1].detail.as_deref(), Some("draft -> sent"));

        // Same status is a no-op
        invoice.change_status(InvoiceStatus::Sent);
        assert_eq!(invoice.events.len(), 2);
    }

    #[test]
    fn test_recompute_totals() {
        let mut invoice = Invoice::new(
            UserId::new(),
            Uuid::new_v4(),
            "INV-0001".to_string(),
            InvoiceStatus::Draft,
            None,
            None,
            Currency::new("NGN").unwrap(),
            None,
            None,
            vec![item(1_000, 1_000, 0)],
        );
        assert_eq!(invoice.total_minor, 1_000);

        invoice.items.push(item(1_000, 2_000, 0));
        invoice.recompute_totals();
        assert_eq!(invoice.total_minor, 3_000);
    }
}
