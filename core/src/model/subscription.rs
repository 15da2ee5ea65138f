// src/model/subscription.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::validation::validate_price;

/// A subscription plan offered on the premium page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub monthly_price: Decimal,
  pub yearly_price: Decimal,
  pub features: Vec<String>, // display order matters
  pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
  #[validate(length(min = 1))]
  pub name: String,
  #[validate(length(min = 1))]
  pub description: String,
  #[validate(custom(function = "validate_price"))]
  pub monthly_price: Decimal,
  #[validate(custom(function = "validate_price"))]
  pub yearly_price: Decimal,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default = "active_by_default")]
  pub active: bool,
}

fn active_by_default() -> bool {
  true
}
