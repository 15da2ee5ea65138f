// tests/catalog_tests.rs
mod common;

use common::*;
use printshop::{NewCategory, PrintType, ProductPatch, ProductQuery, Storage, StoreError};
use uuid::Uuid;
use validator::Validate;

#[tokio::test]
async fn test_category_lookup_by_slug() {
  let store = memory_store();
  let created = create_category(&store, "animais").await;

  let found = store.category_by_slug("animais").await.unwrap();
  assert_eq!(found, Some(created));
  assert_eq!(store.category_by_slug("nope").await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_category_slug_is_a_conflict() {
  let store = memory_store();
  create_category(&store, "festas").await;

  let result = store
    .create_category(NewCategory::new("Festas 2", "fas fa-birthday-cake", "festas"))
    .await;
  assert!(matches!(result, Err(StoreError::Conflict(_))), "got {:?}", result);
  assert_eq!(store.list_categories().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_products_list_newest_first() {
  let store = memory_store();
  create_product_in(&store, "first", None, false).await;
  create_product_in(&store, "second", None, false).await;
  create_product_in(&store, "third", None, false).await;

  let products = store.list_products().await.unwrap();
  assert_eq!(names(&products), vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
  let store = memory_store();
  let category = create_category(&store, "enfeites").await;
  let mut new = new_product("Estrela", "Enfeite de parede");
  new.price = price("19.5");
  new.category_id = Some(category.id);
  new.image_url = Some("https://example.com/estrela.png".to_string());
  new.print_type = PrintType::Filament;
  new.featured = true;

  let created = store.create_product(new.clone()).await.unwrap();
  let fetched = store.product_by_id(created.id).await.unwrap().expect("product exists");

  assert_eq!(fetched, created);
  assert_eq!(fetched.name, new.name);
  assert_eq!(fetched.description, new.description);
  assert_eq!(fetched.price, price("19.50"));
  assert_eq!(fetched.category_id, new.category_id);
  assert_eq!(fetched.image_url, new.image_url);
  assert_eq!(fetched.stl_file_url, None);
  assert_eq!(fetched.print_type, PrintType::Filament);
  assert!(fetched.featured);
}

#[tokio::test]
async fn test_price_is_rounded_to_cents() {
  let store = memory_store();
  let mut new = new_product("Chaveiro", "Lembrança");
  new.price = price("3.456");
  let created = store.create_product(new).await.unwrap();
  assert_eq!(created.price, price("3.46"));
  assert_eq!(created.price.to_string(), "3.46");
}

#[tokio::test]
async fn test_search_is_case_insensitive_over_name_and_description() {
  let store = memory_store();
  let mut dragon = new_product("Dragão Fantasia", "Miniatura detalhada");
  dragon.featured = true;
  store.create_product(dragon).await.unwrap();
  store.create_product(new_product("Vaso", "Decoração MODERNA")).await.unwrap();
  store.create_product(new_product("Gato", "Fofo")).await.unwrap();

  assert_eq!(names(&store.search_products("DRAGÃO").await.unwrap()), vec!["Dragão Fantasia"]);
  assert_eq!(names(&store.search_products("moderna").await.unwrap()), vec!["Vaso"]);
  assert!(store.search_products("50%").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_query_featured_ignores_search_and_category() {
  let store = memory_store();
  let animais = create_category(&store, "animais").await;
  create_product_in(&store, "Dragão", Some(animais.id), true).await;
  create_product_in(&store, "Gato", Some(animais.id), false).await;
  create_product_in(&store, "Vaso", None, true).await;

  let query = ProductQuery::from_params(Some("animais"), Some("gato"), Some("true"));
  let products = store.query_products(&query).await.unwrap();
  assert_eq!(names(&products), vec!["Vaso", "Dragão"]);
}

#[tokio::test]
async fn test_query_search_ignores_category() {
  let store = memory_store();
  let animais = create_category(&store, "animais").await;
  create_product_in(&store, "Gato", Some(animais.id), false).await;
  create_product_in(&store, "Gato de jardim", None, false).await;

  let query = ProductQuery::from_params(Some("animais"), Some("gato"), None);
  let products = store.query_products(&query).await.unwrap();
  assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_query_by_category_slug() {
  let store = memory_store();
  let animais = create_category(&store, "animais").await;
  let festas = create_category(&store, "festas").await;
  create_product_in(&store, "Gato", Some(animais.id), false).await;
  create_product_in(&store, "Balão", Some(festas.id), false).await;
  create_product_in(&store, "Sem categoria", None, false).await;

  let products = store
    .query_products(&ProductQuery::Category("festas".to_string()))
    .await
    .unwrap();
  assert_eq!(names(&products), vec!["Balão"]);
}

#[tokio::test]
async fn test_query_unknown_category_slug_is_empty_not_error() {
  let store = memory_store();
  create_product_in(&store, "Gato", None, false).await;

  let products = store
    .query_products(&ProductQuery::Category("does-not-exist".to_string()))
    .await
    .unwrap();
  assert!(products.is_empty());
}

#[tokio::test]
async fn test_query_all_returns_everything() {
  let store = memory_store();
  create_product_in(&store, "a", None, false).await;
  create_product_in(&store, "b", None, true).await;
  let products = store.query_products(&ProductQuery::All).await.unwrap();
  assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_partial_update_changes_only_given_fields() {
  let store = memory_store();
  let category = create_category(&store, "animais").await;
  let mut new = new_product("Gato", "Fofo");
  new.category_id = Some(category.id);
  new.image_url = Some("https://example.com/gato.png".to_string());
  let created = store.create_product(new).await.unwrap();

  let patch = ProductPatch {
    price: Some(price("12.00")),
    image_url: Some(None),
    ..Default::default()
  };
  let updated = store.update_product(created.id, patch).await.unwrap().expect("exists");

  assert_eq!(updated.price, price("12.00"));
  assert_eq!(updated.image_url, None);
  assert_eq!(updated.name, "Gato");
  assert_eq!(updated.category_id, Some(category.id));
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(updated.id, created.id);
}

#[tokio::test]
async fn test_update_and_delete_unknown_product() {
  let store = memory_store();
  let missing = Uuid::new_v4();
  let patch = ProductPatch {
    featured: Some(true),
    ..Default::default()
  };
  assert_eq!(store.update_product(missing, patch).await.unwrap(), None);
  assert!(!store.delete_product(missing).await.unwrap());
}

#[tokio::test]
async fn test_delete_product_reports_removal_once() {
  let store = memory_store();
  let product = create_product_in(&store, "Vaso", None, false).await;
  assert!(store.delete_product(product.id).await.unwrap());
  assert!(!store.delete_product(product.id).await.unwrap());
  assert_eq!(store.product_by_id(product.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_category_is_rejected_on_create_and_update() {
  let store = memory_store();
  let missing = Uuid::new_v4();

  let mut new = new_product("Órfão", "Sem categoria");
  new.category_id = Some(missing);
  let result = store.create_product(new).await;
  assert!(matches!(result, Err(StoreError::UnknownCategory(id)) if id == missing), "got {:?}", result);
  assert!(store.list_products().await.unwrap().is_empty());

  let product = create_product_in(&store, "Vaso", None, false).await;
  let patch = ProductPatch {
    category_id: Some(Some(missing)),
    ..Default::default()
  };
  let result = store.update_product(product.id, patch).await;
  assert!(matches!(result, Err(StoreError::UnknownCategory(_))), "got {:?}", result);
  let unchanged = store.product_by_id(product.id).await.unwrap().expect("still there");
  assert_eq!(unchanged.category_id, None);

  let clear = ProductPatch {
    category_id: Some(None),
    ..Default::default()
  };
  assert!(store.update_product(product.id, clear).await.unwrap().is_some());
}

#[tokio::test]
async fn test_price_above_column_range_fails_validation() {
  let mut new = new_product("Caro", "Caro demais");
  new.price = price("123456789");
  let errors = printshop::field_errors(&new.validate().unwrap_err());
  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].field, "price");
  assert_eq!(errors[0].code, "max_price");

  new.price = price("99999999.99");
  assert!(new.validate().is_ok());

  let patch = ProductPatch {
    price: Some(price("100000000")),
    ..Default::default()
  };
  assert!(patch.validate().is_err());
}
