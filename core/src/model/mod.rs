// src/model/mod.rs

//! Data structures representing the storefront's database entities, together with the
//! insert and patch payloads accepted from clients.

pub mod cart;
pub mod category;
pub mod customer;
pub mod product;
pub mod subscription;
pub mod validation;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent JSON field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use together with `#[serde(default)]` on `Option<Option<T>>` fields.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(deserializer).map(Some)
}
