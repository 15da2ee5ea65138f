// src/store/postgres.rs

//! PostgreSQL backend built on a `sqlx::PgPool`, using runtime-checked queries so the
//! crate builds without a live database.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult, FOREIGN_KEY_VIOLATION};
use crate::model::cart::{CartItem, CartLine, CartOwner};
use crate::model::category::{Category, NewCategory};
use crate::model::product::{round_price, NewProduct, Product, ProductPatch};
use crate::model::subscription::{NewSubscription, Subscription};
use crate::store::Storage;

const PRODUCT_COLUMNS: &str =
  "id, name, description, price, category_id, image_url, stl_file_url, print_type, featured, created_at";
const CART_COLUMNS: &str = "id, session_id, customer_id, product_id, quantity, created_at, updated_at";
const SUBSCRIPTION_COLUMNS: &str = "id, name, description, monthly_price, yearly_price, features, active";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Connects a pool and brings the schema up to date.
  pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await
      .map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        StoreError::Database(e)
      })?;
    info!("Successfully connected to the database.");
    let store = Self::new(pool);
    store.migrate().await?;
    Ok(store)
  }

  pub async fn migrate(&self) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  // `products.category_id` is the only foreign key products carry.
  fn category_violation(err: sqlx::Error, category_id: Option<Uuid>) -> StoreError {
    if let (sqlx::Error::Database(db_err), Some(id)) = (&err, category_id) {
      if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        return StoreError::UnknownCategory(id);
      }
    }
    err.into()
  }

  async fn products_where(&self, clause: &str) -> StoreResult<Vec<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products {clause} ORDER BY created_at DESC");
    Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
  }
}

#[async_trait]
impl Storage for PgStore {
  async fn list_categories(&self) -> StoreResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name, icon, slug FROM categories ORDER BY name ASC")
      .fetch_all(&self.pool)
      .await?;
    Ok(categories)
  }

  async fn category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name, icon, slug FROM categories WHERE slug = $1")
      .bind(slug)
      .fetch_optional(&self.pool)
      .await?;
    Ok(category)
  }

  #[instrument(name = "pg::create_category", skip(self, new), fields(slug = %new.slug), err)]
  async fn create_category(&self, new: NewCategory) -> StoreResult<Category> {
    let category = sqlx::query_as::<_, Category>(
      "INSERT INTO categories (id, name, icon, slug) VALUES ($1, $2, $3, $4) RETURNING id, name, icon, slug",
    )
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.icon)
    .bind(&new.slug)
    .fetch_one(&self.pool)
    .await?;
    Ok(category)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    self.products_where("").await
  }

  async fn products_by_category(&self, category_id: Uuid) -> StoreResult<Vec<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY created_at DESC");
    let products = sqlx::query_as::<_, Product>(&sql)
      .bind(category_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  async fn featured_products(&self) -> StoreResult<Vec<Product>> {
    self.products_where("WHERE featured = TRUE").await
  }

  async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>> {
    // strpos keeps the term literal; LIKE would treat % and _ as wildcards.
    let sql = format!(
      "SELECT {PRODUCT_COLUMNS} FROM products \
       WHERE strpos(lower(name), lower($1)) > 0 OR strpos(lower(description), lower($1)) > 0 \
       ORDER BY created_at DESC"
    );
    let products = sqlx::query_as::<_, Product>(&sql)
      .bind(term)
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  async fn product_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    let product = sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "pg::create_product", skip(self, new), fields(name = %new.name), err)]
  async fn create_product(&self, new: NewProduct) -> StoreResult<Product> {
    let sql = format!(
      "INSERT INTO products (id, name, description, price, category_id, image_url, stl_file_url, print_type, featured) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {PRODUCT_COLUMNS}"
    );
    let product = sqlx::query_as::<_, Product>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new.name)
      .bind(&new.description)
      .bind(round_price(new.price))
      .bind(new.category_id)
      .bind(&new.image_url)
      .bind(&new.stl_file_url)
      .bind(new.print_type)
      .bind(new.featured)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| Self::category_violation(e, new.category_id))?;
    debug!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "pg::update_product", skip(self, patch), err)]
  async fn update_product(&self, id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>> {
    if patch.is_empty() {
      return self.product_by_id(id).await;
    }

    let patched_category = patch.category_id.flatten();
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE products SET ");
    let mut set = builder.separated(", ");
    if let Some(name) = patch.name {
      set.push("name = ").push_bind_unseparated(name);
    }
    if let Some(description) = patch.description {
      set.push("description = ").push_bind_unseparated(description);
    }
    if let Some(price) = patch.price {
      set.push("price = ").push_bind_unseparated(round_price(price));
    }
    if let Some(category_id) = patch.category_id {
      set.push("category_id = ").push_bind_unseparated(category_id);
    }
    if let Some(image_url) = patch.image_url {
      set.push("image_url = ").push_bind_unseparated(image_url);
    }
    if let Some(stl_file_url) = patch.stl_file_url {
      set.push("stl_file_url = ").push_bind_unseparated(stl_file_url);
    }
    if let Some(print_type) = patch.print_type {
      set.push("print_type = ").push_bind_unseparated(print_type);
    }
    if let Some(featured) = patch.featured {
      set.push("featured = ").push_bind_unseparated(featured);
    }
    builder.push(" WHERE id = ").push_bind(id);
    builder.push(" RETURNING ").push(PRODUCT_COLUMNS);

    let product = builder
      .build_query_as::<Product>()
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| Self::category_violation(e, patched_category))?;
    Ok(product)
  }

  #[instrument(name = "pg::delete_product", skip(self), err)]
  async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
    let sql = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions ORDER BY monthly_price ASC, name ASC");
    Ok(sqlx::query_as::<_, Subscription>(&sql).fetch_all(&self.pool).await?)
  }

  async fn active_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
    let sql = format!(
      "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE active = TRUE ORDER BY monthly_price ASC, name ASC"
    );
    Ok(sqlx::query_as::<_, Subscription>(&sql).fetch_all(&self.pool).await?)
  }

  async fn create_subscription(&self, new: NewSubscription) -> StoreResult<Subscription> {
    let sql = format!(
      "INSERT INTO subscriptions (id, name, description, monthly_price, yearly_price, features, active) \
       VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {SUBSCRIPTION_COLUMNS}"
    );
    let subscription = sqlx::query_as::<_, Subscription>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new.name)
      .bind(&new.description)
      .bind(round_price(new.monthly_price))
      .bind(round_price(new.yearly_price))
      .bind(&new.features)
      .bind(new.active)
      .fetch_one(&self.pool)
      .await?;
    Ok(subscription)
  }

  async fn cart_items(&self, owner: &CartOwner) -> StoreResult<Vec<CartItem>> {
    let sql = match owner {
      CartOwner::Session(_) => {
        format!("SELECT {CART_COLUMNS} FROM cart_items WHERE session_id = $1 ORDER BY created_at ASC")
      }
      CartOwner::Customer(_) => {
        format!("SELECT {CART_COLUMNS} FROM cart_items WHERE customer_id = $1 ORDER BY created_at ASC")
      }
    };
    let key = owner.session_id().or(owner.customer_id());
    let items = sqlx::query_as::<_, CartItem>(&sql)
      .bind(key)
      .fetch_all(&self.pool)
      .await?;
    Ok(items)
  }

  #[instrument(name = "pg::add_to_cart", skip(self), fields(owner = %owner), err)]
  async fn add_to_cart(&self, owner: &CartOwner, product_id: Uuid, quantity: i32) -> StoreResult<CartItem> {
    if quantity < 1 {
      return Err(StoreError::InvalidQuantity(quantity));
    }
    // The partial unique indexes make the merge a single atomic statement; the EXISTS
    // guard turns an unknown product into "no row returned".
    let conflict_target = match owner {
      CartOwner::Session(_) => "(session_id, product_id) WHERE session_id IS NOT NULL",
      CartOwner::Customer(_) => "(customer_id, product_id) WHERE customer_id IS NOT NULL",
    };
    let sql = format!(
      "INSERT INTO cart_items (id, session_id, customer_id, product_id, quantity, created_at, updated_at) \
       SELECT $1, $2, $3, $4, $5, NOW(), NOW() \
       WHERE EXISTS (SELECT 1 FROM products WHERE id = $4) \
       ON CONFLICT {conflict_target} \
       DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW() \
       RETURNING {CART_COLUMNS}"
    );
    let item = sqlx::query_as::<_, CartItem>(&sql)
      .bind(Uuid::new_v4())
      .bind(owner.session_id())
      .bind(owner.customer_id())
      .bind(product_id)
      .bind(quantity)
      .fetch_optional(&self.pool)
      .await?
      .ok_or(StoreError::UnknownProduct(product_id))?;
    debug!(cart_item_id = %item.id, quantity = item.quantity, "Cart line upserted.");
    Ok(item)
  }

  async fn update_cart_item(&self, id: Uuid, quantity: i32) -> StoreResult<Option<CartItem>> {
    if quantity < 1 {
      return Err(StoreError::InvalidQuantity(quantity));
    }
    let sql = format!("UPDATE cart_items SET quantity = $1, updated_at = NOW() WHERE id = $2 RETURNING {CART_COLUMNS}");
    let item = sqlx::query_as::<_, CartItem>(&sql)
      .bind(quantity)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(item)
  }

  async fn remove_from_cart(&self, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg::clear_cart", skip(self), fields(owner = %owner), err)]
  async fn clear_cart(&self, owner: &CartOwner) -> StoreResult<u64> {
    let result = match owner {
      CartOwner::Session(id) => sqlx::query("DELETE FROM cart_items WHERE session_id = $1").bind(id),
      CartOwner::Customer(id) => sqlx::query("DELETE FROM cart_items WHERE customer_id = $1").bind(id),
    }
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected())
  }

  /// One batched product lookup instead of one query per line.
  async fn cart_lines(&self, owner: &CartOwner) -> StoreResult<Vec<CartLine>> {
    let items = self.cart_items(owner).await?;
    if items.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
    let mut products: HashMap<Uuid, Product> = sqlx::query_as::<_, Product>(&sql)
      .bind(&ids)
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(|p| (p.id, p))
      .collect();
    Ok(
      items
        .into_iter()
        .map(|item| {
          // Several lines can never share a product for one owner, so `remove` is safe.
          let product = products.remove(&item.product_id);
          CartLine { item, product }
        })
        .collect(),
    )
  }
}
