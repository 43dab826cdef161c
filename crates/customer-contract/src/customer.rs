// crates/customer-contract/src/customer.rs
// ============================================================================
// Module: Customer Payloads
// Description: Wire types for the customer resource.
// Purpose: Decode responses and encode request bodies with camelCase names.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The server is the source of truth for identity; these types only mirror
//! the JSON shapes exchanged with it. Unknown response fields are ignored.

use serde::Deserialize;
use serde::Serialize;

/// Customer record as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Server-assigned identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

impl Customer {
    /// Builds a customer record.
    #[must_use]
    pub fn new(id: i64, first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        }
    }

    /// Returns the identity-free part of the record.
    #[must_use]
    pub fn fields(&self) -> NewCustomer {
        NewCustomer {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Customer body for `POST /customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

impl NewCustomer {
    /// Builds a creation body.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        }
    }

    /// Attaches an identifier, producing a `PUT` body.
    #[must_use]
    pub fn with_id(self, id: i64) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}
