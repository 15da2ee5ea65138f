// src/model/category.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::validation::validate_slug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub icon: String,
  pub slug: String, // unique
}

/// Payload for creating a category. The id is always server-assigned.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
  #[validate(length(min = 1, max = 120))]
  pub name: String,
  #[validate(length(min = 1, max = 120))]
  pub icon: String,
  #[validate(length(min = 1, max = 120), custom(function = "validate_slug"))]
  pub slug: String,
}

impl NewCategory {
  pub fn new(name: impl Into<String>, icon: impl Into<String>, slug: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      icon: icon.into(),
      slug: slug.into(),
    }
  }
}
