//! Status enums for marketplace documents.
//!
//! The backend owns these vocabularies and may grow them at any time, so
//! every enum that is read from a document carries an `Other` fallback
//! instead of failing deserialization on an unknown value.

use serde::{Deserialize, Serialize};

/// Fulfillment status of a single order line item.
///
/// Maps to the backend's SCREAMING_SNAKE_CASE item statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    Packed,
    Shipped,
    Delivered,
    #[serde(alias = "CANCELLED")]
    Canceled,
    #[serde(other)]
    Other,
}

impl FulfillmentStatus {
    /// The wire value, used for display and badge classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Packed => "PACKED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
            Self::Other => "UNKNOWN",
        }
    }

    /// Whether the item has reached a state it can no longer leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Canceled)
    }
}

/// Seller store review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Other,
}

impl StoreStatus {
    /// Lowercase wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Other => "unknown",
        }
    }
}

/// Product listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
    #[serde(other)]
    Other,
}

impl ProductStatus {
    /// Lowercase wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Archived => "archived",
            Self::Other => "unknown",
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            other => Err(format!("invalid product status: {other}")),
        }
    }
}

/// Payment method accepted by the order-placement endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    /// `PromptPay` QR transfer.
    Promptpay,
    /// Card payment through the payment provider.
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "cod"),
            Self::Promptpay => write!(f, "promptpay"),
            Self::Card => write!(f, "card"),
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns a store and manages its products and orders.
    Seller,
    /// Marketplace operator.
    Admin,
    /// Buyer account. Unknown roles fall back here.
    #[default]
    #[serde(other)]
    Customer,
}

impl Role {
    /// Whether this role may open the seller dashboard.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Seller | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Seller => write!(f, "seller"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
