// src/store/mod.rs

//! The storage contract and its backends.
//!
//! Everything above this module talks to an `Arc<dyn Storage>`; which backend sits behind
//! it is decided once, at startup. Behavior that is the same for every backend (listing
//! precedence, cart enrichment) lives in provided methods on the trait so it is written
//! exactly once.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::model::cart::{CartItem, CartLine, CartOwner};
use crate::model::category::{Category, NewCategory};
use crate::model::product::{NewProduct, Product, ProductPatch, ProductQuery};
use crate::model::subscription::{NewSubscription, Subscription};

#[async_trait]
pub trait Storage: Send + Sync {
  // --- Categories ---
  async fn list_categories(&self) -> StoreResult<Vec<Category>>;
  /// `Ok(None)` when no category has this slug.
  async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;
  /// Fails with `StoreError::Conflict` on a duplicate slug.
  async fn create_category(&self, new: NewCategory) -> StoreResult<Category>;

  // --- Products ---
  /// All products, newest first.
  async fn list_products(&self) -> StoreResult<Vec<Product>>;
  async fn products_by_category(&self, category_id: Uuid) -> StoreResult<Vec<Product>>;
  async fn featured_products(&self) -> StoreResult<Vec<Product>>;
  /// Case-insensitive substring match over name or description.
  async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>>;
  async fn product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;
  /// Fails with `StoreError::UnknownCategory` when `category_id` names no category.
  async fn create_product(&self, new: NewProduct) -> StoreResult<Product>;
  /// `Ok(None)` when the product does not exist.
  async fn update_product(&self, id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>>;
  /// Returns whether a row was removed.
  async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;

  // --- Subscriptions ---
  /// Cheapest monthly price first, ties broken by name.
  async fn list_subscriptions(&self) -> StoreResult<Vec<Subscription>>;
  async fn active_subscriptions(&self) -> StoreResult<Vec<Subscription>>;
  async fn create_subscription(&self, new: NewSubscription) -> StoreResult<Subscription>;

  // --- Cart ---
  /// Rows owned by `owner`, oldest first.
  async fn cart_items(&self, owner: &CartOwner) -> StoreResult<Vec<CartItem>>;
  /// Inserts a line or merges into the existing line for the same owner and product.
  /// The lookup and the write are atomic.
  async fn add_to_cart(&self, owner: &CartOwner, product_id: Uuid, quantity: i32) -> StoreResult<CartItem>;
  /// Fails with `StoreError::InvalidQuantity` for quantities below 1 without touching the row.
  async fn update_cart_item(&self, id: Uuid, quantity: i32) -> StoreResult<Option<CartItem>>;
  async fn remove_from_cart(&self, id: Uuid) -> StoreResult<bool>;
  /// Returns the number of removed lines.
  async fn clear_cart(&self, owner: &CartOwner) -> StoreResult<u64>;

  /// Resolves a listing request: featured > search > category > all.
  /// An unknown category slug yields an empty list.
  #[instrument(name = "store::query_products", skip(self))]
  async fn query_products(&self, query: &ProductQuery) -> StoreResult<Vec<Product>> {
    match query {
      ProductQuery::Featured => self.featured_products().await,
      ProductQuery::Search(term) => self.search_products(term).await,
      ProductQuery::Category(slug) => match self.category_by_slug(slug).await? {
        Some(category) => self.products_by_category(category.id).await,
        None => {
          debug!(slug = %slug, "Unknown category slug, returning no products.");
          Ok(Vec::new())
        }
      },
      ProductQuery::All => self.list_products().await,
    }
  }

  /// Cart rows joined with their products.
  async fn cart_lines(&self, owner: &CartOwner) -> StoreResult<Vec<CartLine>> {
    let items = self.cart_items(owner).await?;
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
      let product = self.product_by_id(item.product_id).await?;
      lines.push(CartLine { item, product });
    }
    Ok(lines)
  }
}
