// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use printshop::{field_errors, FieldError, StoreError};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {message}")]
  Validation { message: String, errors: Vec<FieldError> },

  #[error("Session ID or Customer ID is required")]
  MissingCartOwner,

  #[error("Valid quantity is required")]
  InvalidQuantity,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Upload rejected: {0}")]
  Upload(String),

  #[error("Upload exceeds the {limit} byte limit")]
  UploadTooLarge { limit: usize },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Storage Error: {0}")]
  Store(#[from] StoreError),

  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),
}

impl AppError {
  /// A 400 carrying the offending fields as reported by `validator`.
  pub fn invalid(message: impl Into<String>, errors: &ValidationErrors) -> Self {
    AppError::Validation {
      message: message.into(),
      errors: field_errors(errors),
    }
  }

  /// A 400 for a single field that failed to parse.
  pub fn invalid_field(message: impl Into<String>, error: FieldError) -> Self {
    AppError::Validation {
      message: message.into(),
      errors: vec![error],
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } | AppError::MissingCartOwner | AppError::InvalidQuantity | AppError::Upload(_) => {
        StatusCode::BAD_REQUEST
      }
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
      AppError::Store(store_err) => match store_err {
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::InvalidQuantity(_) | StoreError::UnknownCategory(_) => StatusCode::BAD_REQUEST,
        StoreError::UnknownProduct(_) => StatusCode::NOT_FOUND,
        StoreError::Database(_) | StoreError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response; clients only see the summary.
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let body = match self {
      AppError::Validation { message, errors } => json!({ "message": message, "errors": errors }),
      AppError::MissingCartOwner | AppError::InvalidQuantity => json!({ "message": self.to_string() }),
      AppError::NotFound(m) | AppError::Upload(m) => json!({ "message": m }),
      AppError::UploadTooLarge { limit } => {
        json!({ "message": "File too large", "limit": limit })
      }
      AppError::Store(StoreError::Conflict(_)) => json!({ "message": "Resource already exists" }),
      AppError::Store(StoreError::InvalidQuantity(_)) => json!({ "message": "Valid quantity is required" }),
      AppError::Store(StoreError::UnknownProduct(_)) => json!({ "message": "Product not found" }),
      // Same shape as a validation failure so forms can flag the field.
      AppError::Store(StoreError::UnknownCategory(_)) => json!({
        "message": "Invalid product data",
        "errors": [FieldError::new("categoryId", "unknown", "category does not exist")],
      }),
      AppError::Store(_) | AppError::Config(_) | AppError::Io(_) => {
        json!({ "message": "Internal server error" })
      }
    };
    HttpResponse::build(status).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
