// server/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use printshop::NewCategory;
use tracing::{info, instrument};
use validator::Validate;

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.store.list_categories().await?;
  info!(count = categories.len(), "Fetched categories.");
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(
    name = "handler::create_category",
    skip(app_state, payload),
    fields(slug = %payload.slug)
)]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewCategory>,
) -> Result<HttpResponse, AppError> {
  let new = payload.into_inner();
  new
    .validate()
    .map_err(|e| AppError::invalid("Invalid category data", &e))?;

  let category = app_state.store.create_category(new).await?;
  info!(category_id = %category.id, "Category created.");
  Ok(HttpResponse::Created().json(category))
}
