use ecolog_core::{now_epoch_ms, Activity, ActivityValidationError, Category};
use uuid::Uuid;

#[test]
fn new_assigns_identity_and_creation_time() {
    let before = now_epoch_ms();
    let activity = Activity::new("Bike commute", Category::Transport, 0.3).unwrap();
    let after = now_epoch_ms();

    assert!(!activity.uuid.is_nil());
    assert_eq!(activity.name, "Bike commute");
    assert_eq!(activity.category, Category::Transport);
    assert_eq!(activity.carbon_kg, 0.3);
    assert!(activity.created_at_ms >= before);
    assert!(activity.created_at_ms <= after);
}

#[test]
fn new_rejects_empty_and_whitespace_names() {
    let empty = Activity::new("", Category::Food, 1.0).unwrap_err();
    assert_eq!(empty, ActivityValidationError::EmptyName);

    let blank = Activity::new("   ", Category::Food, 1.0).unwrap_err();
    assert_eq!(blank, ActivityValidationError::EmptyName);
}

#[test]
fn new_rejects_non_finite_impact() {
    let err = Activity::new("Mystery", Category::Home, f64::NAN).unwrap_err();
    assert!(matches!(err, ActivityValidationError::NonFiniteImpact(_)));

    let err = Activity::new("Mystery", Category::Home, f64::INFINITY).unwrap_err();
    assert!(matches!(err, ActivityValidationError::NonFiniteImpact(_)));
}

#[test]
fn new_rejects_non_positive_impact() {
    let err = Activity::new("Nothing", Category::Energy, 0.0).unwrap_err();
    assert_eq!(err, ActivityValidationError::NonPositiveImpact(0.0));

    let err = Activity::new("Negative", Category::Energy, -2.5).unwrap_err();
    assert_eq!(err, ActivityValidationError::NonPositiveImpact(-2.5));
}

#[test]
fn with_parts_rejects_nil_uuid() {
    let err =
        Activity::with_parts(Uuid::nil(), "invalid", Category::Food, 1.0, 1_000).unwrap_err();
    assert_eq!(err, ActivityValidationError::NilUuid);
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let activity =
        Activity::with_parts(id, "Flight to Oslo", Category::Transport, 12.5, 1_700_000_000_000)
            .unwrap();

    let json = serde_json::to_value(&activity).unwrap();
    assert_eq!(json["uuid"], id.to_string());
    assert_eq!(json["name"], "Flight to Oslo");
    assert_eq!(json["category"], "transport");
    assert_eq!(json["carbon_kg"], 12.5);
    assert_eq!(json["created_at_ms"], 1_700_000_000_000_i64);

    let decoded: Activity = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, activity);
}

#[test]
fn category_canonical_order_is_stable() {
    assert_eq!(
        Category::ALL,
        [
            Category::Transport,
            Category::Food,
            Category::Home,
            Category::Energy,
        ]
    );

    // Ord follows the canonical order so sorted bucket keys match legends.
    let mut shuffled = vec![Category::Energy, Category::Transport, Category::Home, Category::Food];
    shuffled.sort();
    assert_eq!(shuffled, Category::ALL.to_vec());
}
