use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn email_is_valid(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn wire_name(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

/// Step-3 form state: payment method plus contact info.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactDetails {
    pub payment_method: Option<PaymentMethod>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl ContactDetails {
    /// Step-3 gate: everything but notes is required, and the email
    /// must match the basic pattern. Blocks locally, no network call.
    pub fn validate(&self) -> AppResult<()> {
        if self.payment_method.is_none()
            || self.name.is_empty()
            || self.email.is_empty()
            || self.phone.is_empty()
        {
            return Err(AppError::BadRequest(
                "Please fill in all required fields".to_string(),
            ));
        }
        if !email_is_valid(&self.email) {
            return Err(AppError::BadRequest(
                "Please enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentSplit {
    pub due: f64,
    pub remaining: f64,
}

/// The one place the cash 20%/80% split is computed. Cash takes a
/// round-half-up 20% deposit upfront, card pays in full. The success
/// page reuses this when the backend omits `amount_paid`.
pub fn payment_split(price: f64, method: PaymentMethod) -> PaymentSplit {
    match method {
        PaymentMethod::Cash => {
            let due = (price * 0.2).round();
            PaymentSplit {
                due,
                remaining: price - due,
            }
        }
        PaymentMethod::Card => PaymentSplit {
            due: price,
            remaining: 0.0,
        },
    }
}
