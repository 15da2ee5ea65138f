// server/src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use printshop::{NewProduct, ProductPatch, ProductQuery};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::read_product_form;

#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  pub search: Option<String>,
  pub featured: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let query = ProductQuery::from_params(
    query_params.category.as_deref(),
    query_params.search.as_deref(),
    query_params.featured.as_deref(),
  );
  let products = app_state.store.query_products(&query).await?;
  info!(?query, count = products.len(), "Fetched products.");
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  match app_state.store.product_by_id(id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => {
      warn!("Product with ID {} not found.", id);
      Err(AppError::NotFound("Product not found".to_string()))
    }
  }
}

#[instrument(name = "handler::create_product", skip(app_state, payload), fields(name = %payload.name))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let new = payload.into_inner();
  new
    .validate()
    .map_err(|e| AppError::invalid("Invalid product data", &e))?;

  let product = app_state.store.create_product(new).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(product))
}

/// Same as [`create_product_handler`] but from a `multipart/form-data` body, optionally
/// carrying the model file in `stlFile`.
#[instrument(name = "handler::create_product_upload", skip(app_state, payload))]
pub async fn create_product_upload_handler(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let config = &app_state.config;
  let form = read_product_form(payload, &config.upload_dir, config.max_upload_bytes).await?;

  let new = match form.to_new_product() {
    Ok(new) => new,
    Err(errors) => {
      if let Some(stored) = &form.stl_file {
        stored.discard().await;
      }
      return Err(AppError::Validation {
        message: "Invalid product data".to_string(),
        errors,
      });
    }
  };

  match app_state.store.create_product(new).await {
    Ok(product) => {
      info!(
        product_id = %product.id,
        stl_file = ?product.stl_file_url,
        "Product created from form upload."
      );
      Ok(HttpResponse::Created().json(product))
    }
    Err(e) => {
      if let Some(stored) = &form.stl_file {
        stored.discard().await;
      }
      Err(e.into())
    }
  }
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<ProductPatch>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  let patch = payload.into_inner();
  patch
    .validate()
    .map_err(|e| AppError::invalid("Invalid product data", &e))?;

  let updated = app_state
    .store
    .update_product(id, patch)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
  info!("Product {} updated.", id);
  Ok(HttpResponse::Ok().json(updated))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let id = parse_id(&path, "Product")?;
  if !app_state.store.delete_product(id).await? {
    return Err(AppError::NotFound("Product not found".to_string()));
  }
  info!("Product {} deleted.", id);
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}
