//! Expense Entity
//!
//! A business expense with category, tags and date filtering support.

use auth::models::user_id::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::ExpenseId;

use crate::domain::value_object::Currency;

#[derive(Debug, Clone)]
pub struct Expense {
    pub expense_id: ExpenseId,
    pub user_id: UserId,
    /// Trimmed, lowercased
    pub category: String,
    pub description: String,
    /// Strictly positive, minor currency units
    pub amount_minor: i64,
    pub currency: Currency,
    pub vendor: Option<String>,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    /// Trimmed, lowercased, deduplicated
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        category: String,
        description: String,
        amount_minor: i64,
        currency: Currency,
        vendor: Option<String>,
        date: NaiveDate,
        receipt_url: Option<String>,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            expense_id: ExpenseId::new(),
            user_id,
            category,
            description,
            amount_minor,
            currency,
            vendor,
            date,
            receipt_url,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
