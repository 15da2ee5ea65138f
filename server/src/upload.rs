// server/src/upload.rs

//! `multipart/form-data` product creation with an optional STL attachment.
//!
//! The file part streams straight to `UPLOAD_DIR`; it is never buffered whole in memory.
//! Writing stops (and the partial file is removed) as soon as the byte cap is crossed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use chrono::Utc;
use futures_util::StreamExt;
use printshop::{FieldError, NewProduct, PrintType};
use rust_decimal::Decimal;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, Result};

/// Form field that carries the model file.
pub const STL_FIELD: &str = "stlFile";
/// Public prefix under which `UPLOAD_DIR` is served.
pub const UPLOADS_PREFIX: &str = "/uploads";

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// An STL file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
  pub file_name: String,
  pub path: PathBuf,
  pub size: usize,
}

impl StoredUpload {
  pub fn url(&self) -> String {
    format!("{}/{}", UPLOADS_PREFIX, self.file_name)
  }

  /// Best-effort removal, used when the rest of the form turns out to be invalid.
  pub async fn discard(&self) {
    if let Err(e) = tokio::fs::remove_file(&self.path).await {
      warn!(path = %self.path.display(), error = %e, "Failed to remove discarded upload");
    }
  }
}

/// Text fields plus the optional stored file of a product form.
#[derive(Debug, Default)]
pub struct ProductForm {
  pub fields: HashMap<String, String>,
  pub stl_file: Option<StoredUpload>,
}

/// True when a part looks like an STL model: `.stl` filename (any case) or a generic
/// binary content type.
pub fn is_stl(file_name: Option<&str>, content_type: Option<&str>) -> bool {
  let by_name = file_name
    .map(|n| n.to_ascii_lowercase().ends_with(".stl"))
    .unwrap_or(false);
  let by_type = content_type
    .map(|t| t.eq_ignore_ascii_case("application/octet-stream"))
    .unwrap_or(false);
  by_name || by_type
}

/// `<unix-millis>-<basename>`; directory components sent by the client are dropped.
pub fn stored_file_name(original: &str, millis: i64) -> String {
  let base = original
    .rsplit(|c| c == '/' || c == '\\')
    .next()
    .map(str::trim)
    .filter(|b| !b.is_empty() && *b != "." && *b != "..")
    .unwrap_or("model.stl");
  format!("{}-{}", millis, base)
}

/// Drains the multipart stream, saving the `stlFile` part (if any) under `upload_dir`.
pub async fn read_product_form(mut payload: Multipart, upload_dir: &Path, max_bytes: usize) -> Result<ProductForm> {
  let mut form = ProductForm::default();
  // Any failure after a file was stored must not leave it behind.
  if let Err(e) = read_parts(&mut payload, &mut form, upload_dir, max_bytes).await {
    if let Some(stored) = form.stl_file.take() {
      stored.discard().await;
    }
    return Err(e);
  }
  Ok(form)
}

async fn read_parts(payload: &mut Multipart, form: &mut ProductForm, upload_dir: &Path, max_bytes: usize) -> Result<()> {
  while let Some(item) = payload.next().await {
    let field = item.map_err(|e| AppError::Upload(format!("Malformed multipart body: {}", e)))?;
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_string);

    if name == STL_FIELD {
      // Browsers send an empty file part when no file was picked.
      let Some(original) = file_name.filter(|f| !f.is_empty()) else {
        continue;
      };
      let content_type = field.content_type().map(|m| m.essence_str().to_string());
      if !is_stl(Some(&original), content_type.as_deref()) {
        return Err(AppError::Upload("Only STL files are allowed".to_string()));
      }
      if let Some(previous) = form.stl_file.take() {
        previous.discard().await;
      }
      let stored_name = stored_file_name(&original, Utc::now().timestamp_millis());
      form.stl_file = Some(save_field(field, upload_dir, stored_name, max_bytes).await?);
    } else if file_name.is_none() {
      let value = read_text_field(field, &name).await?;
      form.fields.insert(name, value);
    }
    // Other file parts are skipped.
  }
  Ok(())
}

async fn read_text_field(mut field: Field, name: &str) -> Result<String> {
  let mut buf = Vec::new();
  while let Some(chunk) = field.next().await {
    let chunk = chunk.map_err(|e| AppError::Upload(format!("Failed reading field '{}': {}", name, e)))?;
    if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
      return Err(AppError::Upload(format!("Field '{}' is too long", name)));
    }
    buf.extend_from_slice(&chunk);
  }
  String::from_utf8(buf).map_err(|_| AppError::Upload(format!("Field '{}' is not valid UTF-8", name)))
}

async fn save_field(mut field: Field, upload_dir: &Path, file_name: String, max_bytes: usize) -> Result<StoredUpload> {
  let path = upload_dir.join(&file_name);
  let mut file = tokio::fs::File::create(&path).await?;
  let mut size = 0usize;

  while let Some(chunk) = field.next().await {
    let chunk = match chunk {
      Ok(chunk) => chunk,
      Err(e) => {
        drop(file);
        let _ = tokio::fs::remove_file(&path).await;
        return Err(AppError::Upload(format!("Upload interrupted: {}", e)));
      }
    };
    size += chunk.len();
    if size > max_bytes {
      drop(file);
      let _ = tokio::fs::remove_file(&path).await;
      return Err(AppError::UploadTooLarge { limit: max_bytes });
    }
    if let Err(e) = file.write_all(&chunk).await {
      drop(file);
      let _ = tokio::fs::remove_file(&path).await;
      return Err(e.into());
    }
  }
  file.flush().await?;
  debug!(file = %file_name, bytes = size, "Stored STL upload");

  Ok(StoredUpload { file_name, path, size })
}

impl ProductForm {
  /// Parses the text fields into a validated [`NewProduct`]. Every bad field is reported,
  /// not just the first one.
  pub fn to_new_product(&self) -> std::result::Result<NewProduct, Vec<FieldError>> {
    let mut errors = Vec::new();
    let text = |key: &str| self.fields.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    let price = match text("price") {
      None => {
        errors.push(FieldError::new("price", "required", "is required"));
        None
      }
      Some(raw) => match raw.parse::<Decimal>() {
        Ok(p) => Some(p),
        Err(_) => {
          errors.push(FieldError::new("price", "parse", "must be a decimal number"));
          None
        }
      },
    };

    let print_type = match text("printType") {
      None => {
        errors.push(FieldError::new("printType", "required", "is required"));
        None
      }
      Some(raw) => match raw.parse::<PrintType>() {
        Ok(t) => Some(t),
        Err(msg) => {
          errors.push(FieldError::new("printType", "parse", msg));
          None
        }
      },
    };

    let category_id = match text("categoryId") {
      None => None,
      Some(raw) => match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
          errors.push(FieldError::new("categoryId", "parse", "must be a UUID"));
          None
        }
      },
    };

    let featured = matches!(text("featured"), Some("true") | Some("on"));

    let (Some(price), Some(print_type)) = (price, print_type) else {
      errors.sort_by(|a, b| a.field.cmp(&b.field));
      return Err(errors);
    };

    let new = NewProduct {
      name: text("name").unwrap_or_default().to_string(),
      description: text("description").unwrap_or_default().to_string(),
      price,
      category_id,
      image_url: text("imageUrl").map(str::to_string),
      stl_file_url: self.stl_file.as_ref().map(StoredUpload::url),
      print_type,
      featured,
    };
    if let Err(validation) = new.validate() {
      errors.extend(printshop::field_errors(&validation));
    }
    if errors.is_empty() {
      Ok(new)
    } else {
      errors.sort_by(|a, b| a.field.cmp(&b.field));
      Err(errors)
    }
  }
}
