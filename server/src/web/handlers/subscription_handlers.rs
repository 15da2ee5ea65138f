// server/src/web/handlers/subscription_handlers.rs

use actix_web::{web, HttpResponse};
use printshop::NewSubscription;
use tracing::{info, instrument};
use validator::Validate;

use crate::errors::AppError;
use crate::state::AppState;

/// Only plans with `active = true` are offered to shoppers.
#[instrument(name = "handler::list_subscriptions", skip(app_state))]
pub async fn list_subscriptions_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let plans = app_state.store.active_subscriptions().await?;
  info!(count = plans.len(), "Fetched active subscription plans.");
  Ok(HttpResponse::Ok().json(plans))
}

#[instrument(name = "handler::create_subscription", skip(app_state, payload), fields(name = %payload.name))]
pub async fn create_subscription_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewSubscription>,
) -> Result<HttpResponse, AppError> {
  let new = payload.into_inner();
  new
    .validate()
    .map_err(|e| AppError::invalid("Invalid subscription data", &e))?;

  let plan = app_state.store.create_subscription(new).await?;
  info!(subscription_id = %plan.id, "Subscription plan created.");
  Ok(HttpResponse::Created().json(plan))
}
