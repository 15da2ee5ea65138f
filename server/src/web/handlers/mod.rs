// server/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod category_handlers;
pub mod product_handlers;
pub mod subscription_handlers;

use uuid::Uuid;

use crate::errors::AppError;

/// Path ids that do not parse as UUIDs cannot name an existing row, so they are
/// reported as missing rather than as a malformed request.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", resource)))
}
