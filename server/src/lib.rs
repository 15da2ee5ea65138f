// server/src/lib.rs

//! HTTP front end for the printshop storefront: JSON API under `/api`, STL uploads
//! served from `/uploads`.

pub mod config;
pub mod errors;
pub mod state;
pub mod telemetry;
pub mod upload;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
pub use crate::web::build_app;
