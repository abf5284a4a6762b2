//! Billing Value Objects

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Currency
// ============================================================================

/// ISO 4217 currency code, normalized to uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> AppResult<Self> {
        let code = code.into().trim().to_uppercase();

        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::bad_request(
                "Currency must be a three-letter ISO 4217 code",
            ));
        }

        Ok(Self(code))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Currency::new(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Invoice Status
// ============================================================================

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        match code {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            other => Err(AppError::bad_request(format!(
                "Unknown invoice status: {}",
                other
            ))),
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Normalization helpers
// ============================================================================

/// Trim and lowercase an expense category; empty is invalid
pub fn normalize_category(raw: &str) -> AppResult<String> {
    let category = raw.trim().to_lowercase();
    if category.is_empty() {
        return Err(AppError::bad_request("Category cannot be empty"));
    }
    Ok(category)
}

/// Trim, lowercase, drop empties, deduplicate (keeping first occurrence)
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let cleaned = tag.trim().to_lowercase();
        if !cleaned.is_empty() && !tags.contains(&cleaned) {
            tags.push(cleaned);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalizes_case() {
        assert_eq!(Currency::new("ngn").unwrap().as_str(), "NGN");
        assert_eq!(Currency::new(" usd ").unwrap().as_str(), "USD");
    }

    #[test]
    fn test_currency_rejects_bad_codes() {
        assert!(Currency::new("").is_err());
        assert!(Currency::new("US").is_err());
        assert!(Currency::new("USDX").is_err());
        assert!(Currency::new("U5D").is_err());
    }

    #[test]
    fn test_invoice_status_roundtrip() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Sent,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(InvoiceStatus::parse("shredded").is_err());
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Office ").unwrap(), "office");
        assert!(normalize_category("   ").is_err());
    }

    #[test]
    fn test_normalize_tags() {
        let raw = vec![
            "Travel".to_string(),
            " travel ".to_string(),
            "".to_string(),
            "Client-A".to_string(),
        ];
        assert_eq!(normalize_tags(&raw), vec!["travel", "client-a"]);
    }
}
