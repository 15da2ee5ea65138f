// tests/subscription_tests.rs
mod common;

use common::*;
use printshop::{NewSubscription, Storage};

fn plan(name: &str, active: bool) -> NewSubscription {
  NewSubscription {
    name: name.to_string(),
    description: format!("{name} plan"),
    monthly_price: price("9.9"),
    yearly_price: price("99"),
    features: vec!["one".to_string(), "two".to_string()],
    active,
  }
}

#[tokio::test]
async fn test_active_subscriptions_filter_inactive_plans() {
  let store = memory_store();
  store.create_subscription(plan("Basic", true)).await.unwrap();
  store.create_subscription(plan("Legacy", false)).await.unwrap();

  assert_eq!(store.list_subscriptions().await.unwrap().len(), 2);
  let active = store.active_subscriptions().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "Basic");
}

#[tokio::test]
async fn test_subscription_prices_and_feature_order_are_kept() {
  let store = memory_store();
  let created = store.create_subscription(plan("Basic", true)).await.unwrap();
  assert_eq!(created.monthly_price.to_string(), "9.90");
  assert_eq!(created.yearly_price.to_string(), "99.00");
  assert_eq!(created.features, vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test]
async fn test_plans_are_listed_cheapest_first() {
  let store = memory_store();
  let mut gold = plan("Gold", true);
  gold.monthly_price = price("49.90");
  let mut premium = plan("Premium", true);
  premium.monthly_price = price("29.90");
  let mut basic = plan("Basic", false);
  basic.monthly_price = price("29.90");
  for p in [gold, premium, basic] {
    store.create_subscription(p).await.unwrap();
  }

  let all: Vec<String> = store.list_subscriptions().await.unwrap().into_iter().map(|s| s.name).collect();
  assert_eq!(all, vec!["Basic", "Premium", "Gold"]);
  let active: Vec<String> = store.active_subscriptions().await.unwrap().into_iter().map(|s| s.name).collect();
  assert_eq!(active, vec!["Premium", "Gold"]);
}

#[test]
fn test_plan_price_above_column_range_fails_validation() {
  use validator::Validate;
  let mut expensive = plan("Ouro", true);
  expensive.yearly_price = price("100000000");
  assert!(expensive.validate().is_err());
}
