//! Client Entity
//!
//! A customer the user invoices.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};
use kernel::id::ClientId;

#[derive(Debug, Clone)]
pub struct Client {
    pub client_id: ClientId,
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        user_id: UserId,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            client_id: ClientId::new(),
            user_id,
            name,
            email,
            phone,
            address,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
