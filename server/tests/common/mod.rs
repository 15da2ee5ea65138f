// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::Arc;

use once_cell::sync::Lazy;
use printshop::MemoryStore;
use printshop_server::config::AppConfig;
use printshop_server::state::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;
use tracing::Level;

/// Application state over a fresh memory store and a throwaway upload directory.
/// Keep the `TempDir` alive for as long as the app is used.
pub fn test_state() -> (AppState, TempDir) {
  test_state_with(|_| {})
}

pub fn test_state_with(tweak: impl FnOnce(&mut AppConfig)) -> (AppState, TempDir) {
  setup_tracing();
  let upload_dir = tempfile::tempdir().expect("create temp upload dir");
  let mut config = AppConfig::for_memory(upload_dir.path());
  tweak(&mut config);
  let state = AppState::new(Arc::new(MemoryStore::new()), config);
  (state, upload_dir)
}

pub fn product_body(name: &str) -> Value {
  json!({
    "name": name,
    "description": format!("{name} impresso em resina"),
    "price": "25.5",
    "printType": "resin"
  })
}

pub const BOUNDARY: &str = "----printshop-test-boundary";

/// One part of a hand-built `multipart/form-data` body.
pub enum Part<'a> {
  Text(&'a str, &'a str),
  File {
    name: &'a str,
    file_name: &'a str,
    content_type: &'a str,
    bytes: &'a [u8],
  },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
  let mut body = Vec::new();
  for part in parts {
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match part {
      Part::Text(name, value) => {
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
        body.extend_from_slice(value.as_bytes());
      }
      Part::File {
        name,
        file_name,
        content_type,
        bytes,
      } => {
        body.extend_from_slice(
          format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
          )
          .as_bytes(),
        );
        body.extend_from_slice(bytes);
      }
    }
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

pub fn multipart_content_type() -> String {
  format!("multipart/form-data; boundary={BOUNDARY}")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
