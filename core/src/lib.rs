// src/lib.rs

//! printshop: catalog, cart and subscription storage for a 3D-printed figure storefront.
//!
//! The crate provides:
//!  - Schema types for categories, products, subscriptions and cart lines, with
//!    insert/patch payloads validated through `validator`.
//!  - A single [`Storage`] contract with two interchangeable backends:
//!    [`MemoryStore`] for development and tests, [`PgStore`] for PostgreSQL.
//!  - The product listing precedence (featured > search > category > all) and the
//!    cart merge rule (same owner + product sums quantities), shared by every backend.
//!  - Idempotent first-run seeding of the default catalog.

pub mod error;
pub mod model;
pub mod seed;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{StoreError, StoreResult};

pub use crate::model::cart::{CartItem, CartLine, CartOwner, NewCartItem};
pub use crate::model::category::{Category, NewCategory};
pub use crate::model::product::{round_price, NewProduct, PrintType, Product, ProductPatch, ProductQuery};
pub use crate::model::subscription::{NewSubscription, Subscription};
pub use crate::model::validation::{field_errors, FieldError, MAX_PRICE};

pub use crate::store::memory::MemoryStore;
pub use crate::store::postgres::PgStore;
pub use crate::store::Storage;
