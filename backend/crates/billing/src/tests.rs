//! Unit tests for the billing crate
//!
//! Domain computations are tested next to the entities; this module
//! covers wire shapes and error mapping.

#[cfg(test)]
mod dto_tests {
    use crate::domain::value_object::InvoiceStatus;
    use crate::presentation::dto::*;

    #[test]
    fn test_invoice_create_request_defaults() {
        let json = r#"{"client_id":"00000000-0000-0000-0000-000000000000"}"#;
        let request: InvoiceCreateRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.status, InvoiceStatus::Draft);
        assert_eq!(request.currency, "NGN");
        assert!(request.number.is_none());
        assert!(request.items.is_empty());
        assert!(request.product_items.is_empty());
    }

    #[test]
    fn test_invoice_status_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Overdue).unwrap(),
            r#""overdue""#
        );
        let status: InvoiceStatus = serde_json::from_str(r#""paid""#).unwrap();
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_invoice_item_request_defaults() {
        let json = r#"{"description":"Consulting"}"#;
        let request: InvoiceItemRequest = serde_json::from_str(json).unwrap();

        // One whole unit, free, untaxed
        assert_eq!(request.quantity_thousandths, 1_000);
        assert_eq!(request.unit_price_minor, 0);
        assert_eq!(request.tax_rate_bps, 0);
    }

    #[test]
    fn test_product_create_request_defaults() {
        let json = r#"{"sku":"SKU-1","name":"Widget","unit_price_minor":2500}"#;
        let request: ProductCreateRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.currency, "NGN");
        assert_eq!(request.tax_rate_bps, 0);
        assert_eq!(request.quantity_available, 0);
        assert!(request.is_active);
    }

    #[test]
    fn test_expense_list_query_defaults() {
        let query: ExpenseListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
        assert_eq!(query.skip, 0);
        assert!(query.category.is_none());
        assert!(query.date_from.is_none());
    }

    #[test]
    fn test_expense_response_shape() {
        use crate::domain::entity::expense::Expense;
        use crate::domain::value_object::Currency;
        use auth::models::user_id::UserId;
        use chrono::NaiveDate;

        let expense = Expense::new(
            UserId::new(),
            "office".to_string(),
            "Printer paper".to_string(),
            4_500,
            Currency::new("USD").unwrap(),
            None,
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            None,
            vec!["supplies".to_string()],
        );

        let json = serde_json::to_value(ExpenseResponse::from(&expense)).unwrap();
        assert_eq!(json["amount_minor"], 4_500);
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["date"], "2026-03-14");
        assert_eq!(json["tags"][0], "supplies");
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::BillingError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(BillingError, StatusCode)> = vec![
            (BillingError::NotFound("Client"), StatusCode::NOT_FOUND),
            (BillingError::DuplicateSku, StatusCode::CONFLICT),
            (BillingError::DuplicateNumber, StatusCode::CONFLICT),
            (
                BillingError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                BillingError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_not_found_names_the_resource() {
        assert_eq!(
            BillingError::NotFound("Invoice").to_string(),
            "Invoice not found"
        );
    }
}
