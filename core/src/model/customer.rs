// src/model/customer.rs

//! Customer-side entities. They are part of the schema (and of the migration) but no
//! storage operation or route acts on them yet.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  pub id: Uuid,
  pub email: String, // unique
  pub name: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub status: String,
  pub payment_status: String,
  pub payment_id: Option<String>,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub unit_price: Decimal, // price at purchase time
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
  pub id: Uuid,
  pub product_id: Uuid,
  pub customer_id: Uuid,
  pub rating: i16, // 1..=5
  pub comment: Option<String>,
  pub approved: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSubscription {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub subscription_id: Uuid,
  pub status: String,
  pub billing_cycle: String, // "monthly" | "yearly"
  pub created_at: DateTime<Utc>,
}
