// src/model/cart.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::product::Product;

/// Who a cart belongs to.
///
/// Guests are identified by a client-generated session id, registered shoppers by their
/// customer id. When a request carries both, the customer id wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartOwner {
  Session(String),
  Customer(String),
}

impl CartOwner {
  /// Picks the effective owner key. Empty strings count as absent; `None` means the
  /// request identified no cart at all.
  pub fn resolve(session_id: Option<&str>, customer_id: Option<&str>) -> Option<Self> {
    match (session_id.filter(|s| !s.is_empty()), customer_id.filter(|s| !s.is_empty())) {
      (_, Some(customer)) => Some(CartOwner::Customer(customer.to_string())),
      (Some(session), None) => Some(CartOwner::Session(session.to_string())),
      (None, None) => None,
    }
  }

  pub fn session_id(&self) -> Option<&str> {
    match self {
      CartOwner::Session(id) => Some(id),
      CartOwner::Customer(_) => None,
    }
  }

  pub fn customer_id(&self) -> Option<&str> {
    match self {
      CartOwner::Customer(id) => Some(id),
      CartOwner::Session(_) => None,
    }
  }

  /// True when `item` is stored under this owner key.
  pub fn owns(&self, item: &CartItem) -> bool {
    match self {
      CartOwner::Session(id) => item.customer_id.is_none() && item.session_id.as_deref() == Some(id),
      CartOwner::Customer(id) => item.customer_id.as_deref() == Some(id),
    }
  }
}

impl fmt::Display for CartOwner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CartOwner::Session(id) => write!(f, "session:{id}"),
      CartOwner::Customer(id) => write!(f, "customer:{id}"),
    }
  }
}

/// One product line in a cart. Exactly one of `session_id`/`customer_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: Uuid,
  pub session_id: Option<String>,
  pub customer_id: Option<String>,
  pub product_id: Uuid,
  pub quantity: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A cart line together with the product it references. `product` is `None` when the
/// product has been deleted since the line was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  #[serde(flatten)]
  pub item: CartItem,
  pub product: Option<Product>,
}

/// Add-to-cart payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
  #[serde(default)]
  pub session_id: Option<String>,
  #[serde(default)]
  pub customer_id: Option<String>,
  pub product_id: Uuid,
  #[serde(default = "one")]
  #[validate(range(min = 1))]
  pub quantity: i32,
}

fn one() -> i32 {
  1
}

impl NewCartItem {
  pub fn owner(&self) -> Option<CartOwner> {
    CartOwner::resolve(self.session_id.as_deref(), self.customer_id.as_deref())
  }
}
