//! Multi-step checkout state machine.
//!
//! Shipping, then payment, then a review step. Each submission validates its
//! input before the state advances, so a state on [`CheckoutStep::Review`]
//! always carries a valid address and payment method.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::order::{Address, AddressError};

/// Checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Review,
}

impl CheckoutStep {
    pub const ALL: [Self; 3] = [Self::Shipping, Self::Payment, Self::Review];

    /// 1-based position.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Review => 3,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Review => "Review",
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Shipping | Self::Payment => Self::Shipping,
            Self::Review => Self::Payment,
        }
    }
}

/// Payment form validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentDetailsError {
    #[error("Card number must be 16 digits")]
    InvalidCardNumber,
    #[error("Cardholder name is required")]
    MissingHolder,
    #[error("Expiry date is required")]
    MissingExpiry,
    #[error("CVV must be 3 digits")]
    InvalidCvv,
}

/// Checkout errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Payment(#[from] PaymentDetailsError),
    #[error("shipping address must be entered before payment")]
    ShippingRequired,
    #[error("checkout is not ready to place an order")]
    NotReady,
    #[error("your cart is empty")]
    EmptyCart,
}

/// Payment details as entered by the shopper.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentDetails {
    Card {
        number: String,
        holder: String,
        expiry: String,
        cvv: String,
    },
    #[serde(rename = "paypal")]
    PayPal,
}

// Keep card data out of logs.
impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card { holder, .. } => f
                .debug_struct("Card")
                .field("number", &"[REDACTED]")
                .field("holder", holder)
                .finish_non_exhaustive(),
            Self::PayPal => f.write_str("PayPal"),
        }
    }
}

impl PaymentDetails {
    /// Validate and reduce to the form retained in the session.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaymentDetailsError`] found. PayPal always passes.
    pub fn validate(&self) -> Result<PaymentMethod, PaymentDetailsError> {
        match self {
            Self::Card {
                number,
                holder,
                expiry,
                cvv,
            } => {
                let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
                if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(PaymentDetailsError::InvalidCardNumber);
                }
                if holder.trim().is_empty() {
                    return Err(PaymentDetailsError::MissingHolder);
                }
                if expiry.trim().is_empty() {
                    return Err(PaymentDetailsError::MissingExpiry);
                }
                let cvv = cvv.trim();
                if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
                    return Err(PaymentDetailsError::InvalidCvv);
                }
                Ok(PaymentMethod::Card {
                    last4: digits.chars().skip(12).collect(),
                    holder: holder.trim().to_string(),
                })
            }
            Self::PayPal => Ok(PaymentMethod::PayPal),
        }
    }
}

/// Validated payment method. Card numbers are reduced to their last four digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card { last4: String, holder: String },
    #[serde(rename = "paypal")]
    PayPal,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card { last4, .. } => write!(f, "Card ending in {last4}"),
            Self::PayPal => f.write_str("PayPal"),
        }
    }
}

/// Progress through checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    pub step: CheckoutStep,
    pub shipping: Option<Address>,
    pub payment: Option<PaymentMethod>,
}

impl CheckoutState {
    /// Validate and store the address, then move to payment.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Address`] if a required field is blank; the
    /// state is unchanged.
    pub fn submit_shipping(&mut self, address: Address) -> Result<(), CheckoutError> {
        let address = address.normalized();
        address.validate()?;
        self.shipping = Some(address);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Validate and store the payment method, then move to review.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::ShippingRequired`] before an address has been
    /// entered, or [`CheckoutError::Payment`] for invalid details.
    pub fn submit_payment(&mut self, details: &PaymentDetails) -> Result<(), CheckoutError> {
        if self.shipping.is_none() {
            return Err(CheckoutError::ShippingRequired);
        }
        let method = details.validate()?;
        self.payment = Some(method);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Go back one step. Entered data is kept.
    pub const fn back(&mut self) {
        self.step = self.step.previous();
    }

    /// Address and payment method when the order can be placed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotReady`] unless on the review step with both present.
    pub fn ready(&self) -> Result<(&Address, &PaymentMethod), CheckoutError> {
        match (self.step, &self.shipping, &self.payment) {
            (CheckoutStep::Review, Some(address), Some(payment)) => Ok((address, payment)),
            _ => Err(CheckoutError::NotReady),
        }
    }
}
