// server/src/web/mod.rs

pub mod handlers;
pub mod routes;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{error, web, App, HttpRequest};
use printshop::FieldError;
use tracing_actix_web::TracingLogger;

use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::UPLOADS_PREFIX;

pub use routes::configure_app_routes;

/// Assembles the full application: shared state, middleware, extractor error handling,
/// API routes and the static `/uploads` directory.
pub fn build_app(
  app_state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  let upload_dir = app_state.config.upload_dir.clone();

  App::new()
    .app_data(web::Data::new(app_state)) // Share AppState with handlers
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .configure(configure_app_routes)
    .service(actix_files::Files::new(UPLOADS_PREFIX, upload_dir))
    .wrap(cors())
    .wrap(TracingLogger::default())
}

fn cors() -> Cors {
  Cors::default()
    .allow_any_origin()
    .send_wildcard()
    .allow_any_method()
    .allow_any_header()
    .max_age(3600)
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::invalid_field("Invalid request body", FieldError::new("body", "json", err.to_string())).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::invalid_field("Invalid query string", FieldError::new("query", "query", err.to_string())).into()
}
