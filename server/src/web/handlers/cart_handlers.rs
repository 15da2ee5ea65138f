// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use printshop::{CartOwner, NewCartItem};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;

/// Cart owner keys, taken from the query string (reads) or JSON body (clear).
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OwnerKeys {
  pub session_id: Option<String>,
  pub customer_id: Option<String>,
}

impl OwnerKeys {
  fn owner(&self) -> Result<CartOwner, AppError> {
    CartOwner::resolve(self.session_id.as_deref(), self.customer_id.as_deref()).ok_or(AppError::MissingCartOwner)
  }
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub quantity: Option<i32>,
}

#[instrument(name = "handler::get_cart", skip(app_state, keys))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  keys: web::Query<OwnerKeys>,
) -> Result<HttpResponse, AppError> {
  let owner = keys.owner()?;
  let lines = app_state.store.cart_lines(&owner).await?;
  info!(%owner, lines = lines.len(), "Fetched cart.");
  Ok(HttpResponse::Ok().json(lines))
}

/// Adds a product to the cart, merging into an existing line for the same product.
#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload),
    fields(product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<NewCartItem>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let owner = payload.owner().ok_or(AppError::MissingCartOwner)?;
  payload
    .validate()
    .map_err(|e| AppError::invalid("Invalid cart item data", &e))?;

  let item = app_state
    .store
    .add_to_cart(&owner, payload.product_id, payload.quantity)
    .await?;
  info!(%owner, item_id = %item.id, quantity = item.quantity, "Cart line stored.");
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, path, payload), fields(item_id = %path.as_ref()))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<UpdateQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let quantity = payload.quantity.filter(|q| *q >= 1).ok_or(AppError::InvalidQuantity)?;
  let id = parse_id(&path, "Cart item")?;

  let item = app_state
    .store
    .update_cart_item(id, quantity)
    .await?
    .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;
  info!(quantity, "Cart item {} updated.", id);
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path), fields(item_id = %path.as_ref()))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Cart item")?;
  if !app_state.store.remove_from_cart(id).await? {
    warn!("Cart item {} not found.", id);
    return Err(AppError::NotFound("Cart item not found".to_string()));
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart" })))
}

/// Empties one owner's cart. Accepts the keys as a JSON body; a missing body counts as
/// no keys at all.
#[instrument(name = "handler::clear_cart", skip(app_state, keys))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  keys: Option<web::Json<OwnerKeys>>,
) -> Result<HttpResponse, AppError> {
  let keys = keys.map(web::Json::into_inner).unwrap_or_default();
  let owner = keys.owner()?;
  let removed = app_state.store.clear_cart(&owner).await?;
  info!(%owner, removed, "Cart cleared.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart cleared", "removed": removed })))
}
