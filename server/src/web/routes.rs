// server/src/web/routes.rs

use actix_web::{guard, http::header, web, HttpResponse};

use crate::web::handlers::{cart_handlers, category_handlers, product_handlers, subscription_handlers};

// Liveness only; does not touch storage.
async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Matches requests whose body is `multipart/form-data`.
fn multipart_guard(ctx: &guard::GuardContext<'_>) -> bool {
  ctx
    .head()
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
    .unwrap_or(false)
}

// Called from `build_app`; tests go through the same path.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/categories")
          .route("", web::get().to(category_handlers::list_categories_handler))
          .route("", web::post().to(category_handlers::create_category_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route(
            "",
            web::post()
              .guard(guard::fn_guard(multipart_guard))
              .to(product_handlers::create_product_upload_handler),
          )
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
      )
      .service(
        web::scope("/subscriptions")
          .route("", web::get().to(subscription_handlers::list_subscriptions_handler))
          .route("", web::post().to(subscription_handlers::create_subscription_handler)),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::post().to(cart_handlers::add_to_cart_handler))
          // Registered before `/{item_id}` so "clear" is never taken for an id.
          .route("/clear", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/clear", web::post().to(cart_handlers::clear_cart_handler))
          .route("/{item_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/{item_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
      ),
  );
}
