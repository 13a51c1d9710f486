//! # Validation Module
//!
//! Input validation for catalog entries, customers and register input.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Front end         basic form checks, instant feedback        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE       business rules (offer <= price, phone)     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite            NOT NULL / CHECK / UNIQUE constraints      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orbit_core::validation::{validate_offer_price, validate_quantity};
//!
//! assert!(validate_offer_price(1000, Some(800)).is_ok());
//! assert!(validate_offer_price(1000, Some(1200)).is_err());
//! assert!(validate_quantity(0).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{Combo, NewCustomer, Product};

pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;
const MAX_QUANTITY: i64 = 9_999;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, combo, customer).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a search query. Empty is allowed (matches everything).
///
/// Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a phone number: 7-15 digits, optionally with `+`, spaces,
/// hyphens or parentheses.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "may contain only digits, spaces, +, - and parentheses".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 7 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Light email check: one `@` with something on both sides and a dot in the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.trim().split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested cart quantity. Zero is allowed (it means "remove").
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a product offer price against its list price.
pub fn validate_offer_price(price_cents: i64, offer_cents: Option<i64>) -> ValidationResult<()> {
    validate_price_cents("price", price_cents)?;

    if let Some(offer) = offer_cents {
        validate_price_cents("offer price", offer)?;
        if offer > price_cents {
            return Err(ValidationError::OfferAbovePrice {
                price: price_cents,
                offer,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    validate_offer_price(product.price_cents, product.offer_price_cents)?;

    if product.stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates the stored fields of a combo. Composition (2–3 products) is
/// checked by [`crate::combo::resolve_constituents`] against the catalog.
///
/// A combo offer above its list price is accepted; its discount reads as 0%.
pub fn validate_combo(combo: &Combo) -> ValidationResult<()> {
    validate_name("name", &combo.name)?;
    validate_price_cents("price", combo.price_cents)?;

    if let Some(offer) = combo.offer_price_cents {
        validate_price_cents("offer price", offer)?;
    }

    Ok(())
}

pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_name("customer name", &customer.name)?;
    validate_phone(&customer.phone)?;

    if let Some(email) = customer.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
