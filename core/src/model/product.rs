// src/model/product.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;
use validator::Validate;

use super::double_option;
use super::validation::validate_price;

/// Normalizes a money amount to exactly two decimal places (half away from zero).
pub fn round_price(price: Decimal) -> Decimal {
  let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  rounded.rescale(2);
  rounded
}

/// How a figure is printed. Stored as the `print_type_enum` Postgres type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "print_type_enum", rename_all = "lowercase")]
pub enum PrintType {
  Resin,
  Filament,
}

impl PrintType {
  pub fn as_str(&self) -> &'static str {
    match self {
      PrintType::Resin => "resin",
      PrintType::Filament => "filament",
    }
  }
}

impl fmt::Display for PrintType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PrintType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "resin" => Ok(PrintType::Resin),
      "filament" => Ok(PrintType::Filament),
      other => Err(format!("unknown print type '{other}', expected 'resin' or 'filament'")),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal, // 2dp
  pub category_id: Option<Uuid>,
  pub image_url: Option<String>,
  pub stl_file_url: Option<String>,
  pub print_type: PrintType,
  pub featured: bool,
  pub created_at: DateTime<Utc>,
}

/// Payload for creating a product. `id` and `createdAt` are server-assigned.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  #[validate(length(min = 1, max = 200))]
  pub name: String,
  #[validate(length(min = 1))]
  pub description: String,
  #[validate(custom(function = "validate_price"))]
  pub price: Decimal,
  #[serde(default)]
  pub category_id: Option<Uuid>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub stl_file_url: Option<String>,
  pub print_type: PrintType,
  #[serde(default)]
  pub featured: bool,
}

/// Partial update of a product.
///
/// Only the fields listed here can change; anything else in the request body (such as
/// `id` or `createdAt`) is ignored. For the nullable columns an explicit `null` clears
/// the value while an absent field leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
  #[validate(length(min = 1, max = 200))]
  pub name: Option<String>,
  #[validate(length(min = 1))]
  pub description: Option<String>,
  #[validate(custom(function = "validate_price"))]
  pub price: Option<Decimal>,
  #[serde(default, deserialize_with = "double_option")]
  pub category_id: Option<Option<Uuid>>,
  #[serde(default, deserialize_with = "double_option")]
  pub image_url: Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub stl_file_url: Option<Option<String>>,
  pub print_type: Option<PrintType>,
  pub featured: Option<bool>,
}

impl ProductPatch {
  pub fn is_empty(&self) -> bool {
    *self == ProductPatch::default()
  }

  /// Applies the patch in place. Used by backends that hold rows in memory.
  pub fn apply_to(&self, product: &mut Product) {
    if let Some(name) = &self.name {
      product.name = name.clone();
    }
    if let Some(description) = &self.description {
      product.description = description.clone();
    }
    if let Some(price) = self.price {
      product.price = round_price(price);
    }
    if let Some(category_id) = self.category_id {
      product.category_id = category_id;
    }
    if let Some(image_url) = &self.image_url {
      product.image_url = image_url.clone();
    }
    if let Some(stl_file_url) = &self.stl_file_url {
      product.stl_file_url = stl_file_url.clone();
    }
    if let Some(print_type) = self.print_type {
      product.print_type = print_type;
    }
    if let Some(featured) = self.featured {
      product.featured = featured;
    }
  }
}

/// Which slice of the catalog a listing request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductQuery {
  Featured,
  Search(String),
  Category(String), // category slug
  All,
}

impl ProductQuery {
  /// Resolves the optional listing parameters with precedence
  /// featured > search > category > all. Empty strings count as absent and only the
  /// literal `"true"` enables the featured filter.
  pub fn from_params(category: Option<&str>, search: Option<&str>, featured: Option<&str>) -> Self {
    if featured == Some("true") {
      return ProductQuery::Featured;
    }
    if let Some(term) = search.filter(|s| !s.is_empty()) {
      return ProductQuery::Search(term.to_string());
    }
    if let Some(slug) = category.filter(|s| !s.is_empty()) {
      return ProductQuery::Category(slug.to_string());
    }
    ProductQuery::All
  }
}
