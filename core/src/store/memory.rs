// src/store/memory.rs

//! In-memory backend. Each `MemoryStore` owns its own tables, so tests and development
//! servers never share state unless they share the instance.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::cart::{CartItem, CartOwner};
use crate::model::category::{Category, NewCategory};
use crate::model::product::{round_price, NewProduct, Product, ProductPatch};
use crate::model::subscription::{NewSubscription, Subscription};
use crate::store::Storage;

#[derive(Default)]
struct Tables {
  categories: Vec<Category>,
  products: Vec<Product>, // insertion order
  subscriptions: Vec<Subscription>,
  cart_items: Vec<CartItem>, // insertion order
}

impl Tables {
  /// Mirrors the `products.category_id` foreign key.
  fn ensure_category(&self, category_id: Option<Uuid>) -> StoreResult<()> {
    match category_id {
      Some(id) if !self.categories.iter().any(|c| c.id == id) => Err(StoreError::UnknownCategory(id)),
      _ => Ok(()),
    }
  }
}

#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

/// Newest first; rows created within the same instant keep reverse insertion order.
fn newest_first<'a>(products: impl DoubleEndedIterator<Item = &'a Product>) -> Vec<Product> {
  let mut out: Vec<Product> = products.rev().cloned().collect();
  out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  out
}

/// Monthly price ascending, then name.
fn cheapest_first<'a>(plans: impl Iterator<Item = &'a Subscription>) -> Vec<Subscription> {
  let mut out: Vec<Subscription> = plans.cloned().collect();
  out.sort_by(|a, b| a.monthly_price.cmp(&b.monthly_price).then_with(|| a.name.cmp(&b.name)));
  out
}

#[async_trait]
impl Storage for MemoryStore {
  async fn list_categories(&self) -> StoreResult<Vec<Category>> {
    let mut categories = self.tables.read().categories.clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
  }

  async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
    let tables = self.tables.read();
    Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
  }

  #[instrument(name = "memory::create_category", skip(self, new), fields(slug = %new.slug))]
  async fn create_category(&self, new: NewCategory) -> StoreResult<Category> {
    let mut tables = self.tables.write();
    if tables.categories.iter().any(|c| c.slug == new.slug) {
      return Err(StoreError::Conflict(format!("categories_slug_unique ({})", new.slug)));
    }
    let category = Category {
      id: Uuid::new_v4(),
      name: new.name,
      icon: new.icon,
      slug: new.slug,
    };
    tables.categories.push(category.clone());
    debug!(category_id = %category.id, "Category created.");
    Ok(category)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let tables = self.tables.read();
    Ok(newest_first(tables.products.iter()))
  }

  async fn products_by_category(&self, category_id: Uuid) -> StoreResult<Vec<Product>> {
    let tables = self.tables.read();
    let matching: Vec<&Product> = tables
      .products
      .iter()
      .filter(|p| p.category_id == Some(category_id))
      .collect();
    Ok(newest_first(matching.into_iter()))
  }

  async fn featured_products(&self) -> StoreResult<Vec<Product>> {
    let tables = self.tables.read();
    let matching: Vec<&Product> = tables.products.iter().filter(|p| p.featured).collect();
    Ok(newest_first(matching.into_iter()))
  }

  async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>> {
    let needle = term.to_lowercase();
    let tables = self.tables.read();
    let matching: Vec<&Product> = tables
      .products
      .iter()
      .filter(|p| p.name.to_lowercase().contains(&needle) || p.description.to_lowercase().contains(&needle))
      .collect();
    Ok(newest_first(matching.into_iter()))
  }

  async fn product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let tables = self.tables.read();
    Ok(tables.products.iter().find(|p| p.id == id).cloned())
  }

  #[instrument(name = "memory::create_product", skip(self, new), fields(name = %new.name))]
  async fn create_product(&self, new: NewProduct) -> StoreResult<Product> {
    let mut tables = self.tables.write();
    tables.ensure_category(new.category_id)?;
    let product = Product {
      id: Uuid::new_v4(),
      name: new.name,
      description: new.description,
      price: round_price(new.price),
      category_id: new.category_id,
      image_url: new.image_url,
      stl_file_url: new.stl_file_url,
      print_type: new.print_type,
      featured: new.featured,
      created_at: Utc::now(),
    };
    tables.products.push(product.clone());
    debug!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "memory::update_product", skip(self, patch))]
  async fn update_product(&self, id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>> {
    let mut tables = self.tables.write();
    let Some(index) = tables.products.iter().position(|p| p.id == id) else {
      return Ok(None);
    };
    if let Some(category_id) = patch.category_id {
      tables.ensure_category(category_id)?;
    }
    let product = &mut tables.products[index];
    patch.apply_to(product);
    Ok(Some(product.clone()))
  }

  #[instrument(name = "memory::delete_product", skip(self))]
  async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != id);
    Ok(tables.products.len() < before)
  }

  async fn list_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
    Ok(cheapest_first(self.tables.read().subscriptions.iter()))
  }

  async fn active_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
    let tables = self.tables.read();
    Ok(cheapest_first(tables.subscriptions.iter().filter(|s| s.active)))
  }

  async fn create_subscription(&self, new: NewSubscription) -> StoreResult<Subscription> {
    let subscription = Subscription {
      id: Uuid::new_v4(),
      name: new.name,
      description: new.description,
      monthly_price: round_price(new.monthly_price),
      yearly_price: round_price(new.yearly_price),
      features: new.features,
      active: new.active,
    };
    self.tables.write().subscriptions.push(subscription.clone());
    Ok(subscription)
  }

  async fn cart_items(&self, owner: &CartOwner) -> StoreResult<Vec<CartItem>> {
    let tables = self.tables.read();
    Ok(tables.cart_items.iter().filter(|item| owner.owns(item)).cloned().collect())
  }

  #[instrument(name = "memory::add_to_cart", skip(self), fields(owner = %owner))]
  async fn add_to_cart(&self, owner: &CartOwner, product_id: Uuid, quantity: i32) -> StoreResult<CartItem> {
    if quantity < 1 {
      return Err(StoreError::InvalidQuantity(quantity));
    }
    // Single write guard across lookup and write.
    let mut tables = self.tables.write();
    if !tables.products.iter().any(|p| p.id == product_id) {
      return Err(StoreError::UnknownProduct(product_id));
    }
    let now = Utc::now();
    if let Some(existing) = tables
      .cart_items
      .iter_mut()
      .find(|item| item.product_id == product_id && owner.owns(item))
    {
      existing.quantity = existing.quantity.saturating_add(quantity);
      existing.updated_at = now;
      debug!(cart_item_id = %existing.id, quantity = existing.quantity, "Merged into existing cart line.");
      return Ok(existing.clone());
    }
    let item = CartItem {
      id: Uuid::new_v4(),
      session_id: owner.session_id().map(str::to_string),
      customer_id: owner.customer_id().map(str::to_string),
      product_id,
      quantity,
      created_at: now,
      updated_at: now,
    };
    tables.cart_items.push(item.clone());
    debug!(cart_item_id = %item.id, "Inserted new cart line.");
    Ok(item)
  }

  async fn update_cart_item(&self, id: Uuid, quantity: i32) -> StoreResult<Option<CartItem>> {
    if quantity < 1 {
      return Err(StoreError::InvalidQuantity(quantity));
    }
    let mut tables = self.tables.write();
    let Some(item) = tables.cart_items.iter_mut().find(|item| item.id == id) else {
      return Ok(None);
    };
    item.quantity = quantity;
    item.updated_at = Utc::now();
    Ok(Some(item.clone()))
  }

  async fn remove_from_cart(&self, id: Uuid) -> StoreResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.cart_items.len();
    tables.cart_items.retain(|item| item.id != id);
    Ok(tables.cart_items.len() < before)
  }

  #[instrument(name = "memory::clear_cart", skip(self), fields(owner = %owner))]
  async fn clear_cart(&self, owner: &CartOwner) -> StoreResult<u64> {
    let mut tables = self.tables.write();
    let before = tables.cart_items.len();
    tables.cart_items.retain(|item| !owner.owns(item));
    Ok((before - tables.cart_items.len()) as u64)
  }
}
