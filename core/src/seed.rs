// src/seed.rs

//! First-run catalog seeding.

use rust_decimal::Decimal;
use tracing::info;

use crate::error::StoreResult;
use crate::model::category::NewCategory;
use crate::model::product::{NewProduct, PrintType};
use crate::model::subscription::NewSubscription;
use crate::store::Storage;

const CATEGORIES: [(&str, &str, &str); 5] = [
  ("Animais", "fas fa-paw", "animais"),
  ("Utilidades para o Lar", "fas fa-home", "utilidades"),
  ("Enfeites", "fas fa-star", "enfeites"),
  ("Lembranças", "fas fa-gift", "lembrancas"),
  ("Festas", "fas fa-birthday-cake", "festas"),
];

// (name, description, price, category slug, image, print type)
const PRODUCTS: [(&str, &str, Decimal, &str, &str, PrintType); 4] = [
  (
    "Dragão Fantasia",
    "Miniatura detalhada para pintura",
    cents(2500),
    "animais",
    "https://images.unsplash.com/photo-1578662996442-48f60103fc96?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
    PrintType::Resin,
  ),
  (
    "Vaso Geométrico",
    "Decoração moderna para casa",
    cents(1800),
    "utilidades",
    "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
    PrintType::Filament,
  ),
  (
    "Gatinho Fofo",
    "Perfeito para crianças",
    cents(1500),
    "animais",
    "https://images.unsplash.com/photo-1544568100-847a948585b9?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
    PrintType::Resin,
  ),
  (
    "Utensílio Cozinha",
    "Funcional e durável",
    cents(1200),
    "utilidades",
    "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300",
    PrintType::Filament,
  ),
];

/// Seeds the default categories, featured products and the premium plan.
///
/// Does nothing if any category already exists. Returns whether seeding ran.
pub async fn seed_catalog(store: &dyn Storage) -> StoreResult<bool> {
  if !store.list_categories().await?.is_empty() {
    info!("Catalog already initialized, skipping seed.");
    return Ok(false);
  }

  let mut created = Vec::with_capacity(CATEGORIES.len());
  for (name, icon, slug) in CATEGORIES {
    created.push(store.create_category(NewCategory::new(name, icon, slug)).await?);
  }

  for (name, description, price, slug, image, print_type) in PRODUCTS {
    let category_id = created.iter().find(|c| c.slug == slug).map(|c| c.id);
    store
      .create_product(NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price,
        category_id,
        image_url: Some(image.to_string()),
        stl_file_url: None,
        print_type,
        featured: true,
      })
      .await?;
  }

  store
    .create_subscription(NewSubscription {
      name: "Premium Mensal".to_string(),
      description: "Acesso a modelos exclusivos e descontos".to_string(),
      monthly_price: cents(2990),
      yearly_price: cents(29990),
      features: vec![
        "Acesso a modelos exclusivos".to_string(),
        "20% de desconto em todas as compras".to_string(),
        "Suporte prioritário".to_string(),
        "Tutoriais avançados de pintura".to_string(),
      ],
      active: true,
    })
    .await?;

  info!(
    categories = CATEGORIES.len(),
    products = PRODUCTS.len(),
    "Seeded default catalog."
  );
  Ok(true)
}

/// A two-decimal price from an amount in cents.
const fn cents(amount: u32) -> Decimal {
  Decimal::from_parts(amount, 0, 0, false, 2)
}
