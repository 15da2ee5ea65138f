// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::str::FromStr;

use printshop::{Category, MemoryStore, NewCategory, NewProduct, PrintType, Product, Storage};
use rust_decimal::Decimal;
use tracing::Level;
use uuid::Uuid;

// --- Fixture builders ---
pub fn price(literal: &str) -> Decimal {
  Decimal::from_str(literal).expect("valid decimal literal")
}

pub fn new_product(name: &str, description: &str) -> NewProduct {
  NewProduct {
    name: name.to_string(),
    description: description.to_string(),
    price: price("10.00"),
    category_id: None,
    image_url: None,
    stl_file_url: None,
    print_type: PrintType::Resin,
    featured: false,
  }
}

pub async fn create_category(store: &dyn Storage, slug: &str) -> Category {
  store
    .create_category(NewCategory::new(format!("Category {slug}"), "fas fa-star", slug))
    .await
    .expect("create category")
}

pub async fn create_product_in(store: &dyn Storage, name: &str, category_id: Option<Uuid>, featured: bool) -> Product {
  let mut new = new_product(name, &format!("{name} description"));
  new.category_id = category_id;
  new.featured = featured;
  store.create_product(new).await.expect("create product")
}

pub fn names(products: &[Product]) -> Vec<&str> {
  products.iter().map(|p| p.name.as_str()).collect()
}

pub fn memory_store() -> MemoryStore {
  setup_tracing();
  MemoryStore::new()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
