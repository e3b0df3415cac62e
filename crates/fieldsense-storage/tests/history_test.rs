//! Tests for recommendation history and the field registry.

use std::sync::Arc;

use chrono::NaiveDate;
use fieldsense_core::traits::BeliefStore;
use fieldsense_core::types::{Context, NewField, NewRecommendation, Product};
use fieldsense_storage::{DatabaseManager, SqliteBeliefStore};

fn memory_store() -> SqliteBeliefStore {
    SqliteBeliefStore::new(Arc::new(DatabaseManager::open_in_memory().unwrap()))
}

fn rec(field_id: i64, day: u32, product: Product) -> NewRecommendation {
    NewRecommendation {
        field_id,
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        context: Context::new(1.0, 0.0, 0.0, 7),
        product,
        confidence: 33.3,
    }
}

#[test]
fn test_recommendation_round_trips_snapshot() {
    let store = memory_store();
    let id = store.record_recommendation(&rec(4, 2, Product::NutrientBooster)).unwrap();
    let got = store.get_recommendation(id).unwrap().unwrap();
    assert_eq!(got.field_id, 4);
    assert_eq!(got.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    assert_eq!(got.context, Context::new(1.0, 0.0, 0.0, 7));
    assert_eq!(got.product, Product::NutrientBooster);
    assert_eq!(got.confidence, 33.3);
    assert!(store.get_recommendation(id + 1).unwrap().is_none());
}

#[test]
fn test_history_is_newest_first_and_limited() {
    let store = memory_store();
    let mut ids = Vec::new();
    for day in 1..=12 {
        ids.push(store.record_recommendation(&rec(1, day, Product::StressBuster)).unwrap());
    }
    store.record_recommendation(&rec(2, 1, Product::YieldBooster)).unwrap();

    let history = store.history(1, 10).unwrap();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].id, ids[11]);
    assert_eq!(history[9].id, ids[2]);
    assert!(history.iter().all(|h| h.field_id == 1));
}

#[test]
fn test_history_carries_latest_rating() {
    let store = memory_store();
    let rated = store.record_recommendation(&rec(1, 1, Product::StressBuster)).unwrap();
    let unrated = store.record_recommendation(&rec(1, 2, Product::YieldBooster)).unwrap();
    store.record_feedback(rated, 4, "").unwrap();
    store.record_feedback(rated, 8, "better").unwrap();

    let history = store.history(1, 10).unwrap();
    let by_id = |id| history.iter().find(|h| h.id == id).unwrap();
    assert_eq!(by_id(rated).rating, Some(8));
    assert_eq!(by_id(unrated).rating, None);
}

#[test]
fn test_history_for_unknown_field_is_empty() {
    let store = memory_store();
    assert!(store.history(77, 10).unwrap().is_empty());
}

#[test]
fn test_field_registry_round_trip() {
    let store = memory_store();
    let farmer_id = store.add_farmer("Ana", "Goias").unwrap();
    let other = store.add_farmer("Bruno", "Parana").unwrap();
    assert_eq!(store.get_farmer(farmer_id).unwrap().unwrap().name, "Ana");

    let field = NewField {
        farmer_id,
        name: "North".to_string(),
        latitude: -16.7,
        longitude: -49.3,
        crop_type: "corn".to_string(),
        size_hectares: 42.0,
        soil_quality: 6,
    };
    let field_id = store.add_field(&field).unwrap();
    store
        .add_field(&NewField {
            farmer_id: other,
            name: "South".to_string(),
            ..field.clone()
        })
        .unwrap();

    let got = store.get_field(field_id).unwrap().unwrap();
    assert_eq!(got.name, "North");
    assert_eq!(got.crop_type, "corn");
    assert_eq!(got.soil_quality, 6);
    assert_eq!(store.list_fields(Some(farmer_id)).unwrap().len(), 1);
    assert_eq!(store.list_fields(None).unwrap().len(), 2);
    assert_eq!(store.field_count().unwrap(), 2);
    assert!(store.get_field(999).unwrap().is_none());
}

#[test]
fn test_field_requires_existing_farmer() {
    let store = memory_store();
    let result = store.add_field(&NewField {
        farmer_id: 404,
        name: "Orphan".to_string(),
        latitude: 0.0,
        longitude: 0.0,
        crop_type: "rice".to_string(),
        size_hectares: 1.0,
        soil_quality: 5,
    });
    assert!(result.is_err());
}
