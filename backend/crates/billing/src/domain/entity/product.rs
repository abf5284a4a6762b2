//! Product Entity
//!
//! A catalog item with SKU, pricing and stock.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};
use kernel::id::ProductId;

use crate::domain::value_object::Currency;

#[derive(Debug, Clone)]
pub struct Product {
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Unique per user, trimmed
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Price per unit in minor currency units
    pub unit_price_minor: i64,
    /// Tax rate in basis points (750 = 7.5%)
    pub tax_rate_bps: i32,
    pub currency: Currency,
    pub quantity_available: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        sku: String,
        name: String,
        description: Option<String>,
        category: Option<String>,
        unit_price_minor: i64,
        tax_rate_bps: i32,
        currency: Currency,
        quantity_available: i64,
        is_active: bool,
    ) -> Self {
        let now = Utc::now();

        Self {
            product_id: ProductId::new(),
            user_id,
            sku,
            name,
            description,
            category,
            unit_price_minor,
            tax_rate_bps,
            currency,
            quantity_available,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
